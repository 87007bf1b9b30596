// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use serde::{Deserialize, Serialize};
use tari_wallet_provider_client::substate::{ComponentAddress, ResourceAddress};

use crate::constants::{
    FIRST_TOKEN_COMPONENT_ADDRESS,
    FIRST_TOKEN_RESOURCE_ADDRESS,
    FIRST_TOKEN_SYMBOL,
    SECOND_TOKEN_COMPONENT_ADDRESS,
    SECOND_TOKEN_RESOURCE_ADDRESS,
    SECOND_TOKEN_SYMBOL,
};

/// The resource minted by a faucet and the faucet component that hands it out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSubstate {
    pub resource: ResourceAddress,
    pub component: ComponentAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub substate: TokenSubstate,
    pub symbol: String,
    /// Cached account balance. Only accurate directly after a balance refresh.
    #[serde(default)]
    pub balance: u64,
}

impl Token {
    pub fn new<T: Into<String>>(resource: ResourceAddress, component: ComponentAddress, symbol: T) -> Self {
        Self {
            substate: TokenSubstate { resource, component },
            symbol: symbol.into(),
            balance: 0,
        }
    }

    pub fn resource_address(&self) -> &ResourceAddress {
        &self.substate.resource
    }

    pub fn component_address(&self) -> &ComponentAddress {
        &self.substate.component
    }
}

/// The two faucet tokens this app tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub first: Token,
    pub second: Token,
}

impl TokenPair {
    pub fn iter(&self) -> impl Iterator<Item = &Token> + '_ {
        [&self.first, &self.second].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Token> + '_ {
        [&mut self.first, &mut self.second].into_iter()
    }
}

impl Default for TokenPair {
    fn default() -> Self {
        Self {
            first: Token::new(
                FIRST_TOKEN_RESOURCE_ADDRESS.into(),
                FIRST_TOKEN_COMPONENT_ADDRESS.into(),
                FIRST_TOKEN_SYMBOL,
            ),
            second: Token::new(
                SECOND_TOKEN_RESOURCE_ADDRESS.into(),
                SECOND_TOKEN_COMPONENT_ADDRESS.into(),
                SECOND_TOKEN_SYMBOL,
            ),
        }
    }
}
