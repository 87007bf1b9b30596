// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use log::*;
use tari_wallet_provider_client::{
    substate::{ComponentAddress, SubstateId, TemplateAddress},
    types::{Account, Amount, Arg, GetTransactionResultResponse, Instruction, SubstateDiff, SubstateRequirement},
    WalletProvider,
};

use crate::{
    constants::{FIRST_TOKEN_SYMBOL, FREE_COINS_WORKSPACE_KEY, SECOND_TOKEN_SYMBOL},
    error::FaucetError,
    token::{Token, TokenPair},
    wallet::{get_account, submit_and_wait, TransactionWaiter},
};

const LOG_TARGET: &str = "tari::faucet_demo::faucet";

pub fn mint_instruction(template_address: &TemplateAddress, initial_supply: Amount, symbol: &str) -> Instruction {
    Instruction::CallFunction {
        template_address: template_address.clone(),
        function: "mint_with_symbol".to_string(),
        args: vec![initial_supply.into(), Arg::literal(symbol)],
    }
}

/// Takes coins from the faucet, holds the bucket on the workspace and deposits it into the account
pub fn take_free_coins_instructions(faucet_component: &ComponentAddress, account: &Account) -> Vec<Instruction> {
    vec![
        Instruction::CallMethod {
            component_address: faucet_component.clone(),
            method: "take_free_coins".to_string(),
            args: vec![],
        },
        Instruction::PutLastInstructionOutputOnWorkspace {
            key: FREE_COINS_WORKSPACE_KEY.to_vec(),
        },
        Instruction::CallMethod {
            component_address: account.address.clone(),
            method: "deposit".to_string(),
            args: vec![Arg::workspace(FREE_COINS_WORKSPACE_KEY)],
        },
    ]
}

/// Finds the faucets created by a transaction that ran one `mint_with_symbol` call per symbol.
///
/// Each mint creates a resource and a faucet component. The n-th resource and the n-th component in emission order
/// belong to the n-th mint. The account component is skipped because paying the fee may bring it up too.
pub fn extract_minted_tokens(
    diff: &SubstateDiff,
    account: &Account,
    symbols: &[&str],
) -> Result<Vec<Token>, FaucetError> {
    let resources = diff.up_iter().filter_map(SubstateId::as_resource_address);
    let components = diff
        .up_iter()
        .filter_map(SubstateId::as_component_address)
        .filter(|addr| !addr.eq_ignore_case(&account.address));

    let tokens = resources
        .zip(components)
        .zip(symbols)
        .map(|((resource, component), symbol)| Token::new(resource.clone(), component.clone(), *symbol))
        .collect::<Vec<_>>();

    if tokens.len() < symbols.len() {
        return Err(FaucetError::missing_result_data(format!(
            "expected {} new resource/component pair(s) in up substates but found {}",
            symbols.len(),
            tokens.len()
        )));
    }

    Ok(tokens)
}

pub struct FaucetApi<'a, TProvider: ?Sized> {
    provider: &'a TProvider,
    waiter: &'a TransactionWaiter,
    fee: Amount,
}

impl<'a, TProvider> FaucetApi<'a, TProvider>
where TProvider: WalletProvider + ?Sized
{
    pub fn new(provider: &'a TProvider, waiter: &'a TransactionWaiter, fee: Amount) -> Self {
        Self { provider, waiter, fee }
    }

    /// Deploys a single faucet component that mints `initial_supply` of a new token with the given symbol
    pub async fn create_faucet(
        &self,
        template_address: &TemplateAddress,
        initial_supply: Amount,
        symbol: &str,
    ) -> Result<GetTransactionResultResponse, FaucetError> {
        let account = get_account(self.provider).await?;
        let instructions = vec![mint_instruction(template_address, initial_supply, symbol)];
        let required_substates = vec![SubstateRequirement::unversioned(&account.address)];

        info!(
            target: LOG_TARGET,
            "Creating faucet {} from template {} with supply {}", symbol, template_address, initial_supply
        );
        submit_and_wait(
            self.provider,
            self.waiter,
            &account,
            self.fee,
            instructions,
            required_substates,
        )
        .await
    }

    /// Deploys the two demo faucets in one transaction and returns their tokens
    pub async fn init_faucets(
        &self,
        account: &Account,
        template_address: &TemplateAddress,
        initial_supply: Amount,
    ) -> Result<TokenPair, FaucetError> {
        let symbols = [FIRST_TOKEN_SYMBOL, SECOND_TOKEN_SYMBOL];
        let instructions = symbols
            .iter()
            .map(|symbol| mint_instruction(template_address, initial_supply, symbol))
            .collect();

        let resp = submit_and_wait(self.provider, self.waiter, account, self.fee, instructions, vec![]).await?;
        let diff = resp
            .result
            .as_ref()
            .and_then(|result| result.accept())
            .ok_or_else(|| {
                FaucetError::missing_result_data(format!(
                    "no up substates found in transaction {} (status: {})",
                    resp.transaction_id, resp.status
                ))
            })?;

        let mut tokens = extract_minted_tokens(diff, account, &symbols)?.into_iter();
        let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
            return Err(FaucetError::missing_result_data("expected two minted tokens"));
        };
        info!(
            target: LOG_TARGET,
            "Deployed faucets {} ({}) and {} ({})",
            first.symbol,
            first.component_address(),
            second.symbol,
            second.component_address()
        );
        Ok(TokenPair { first, second })
    }

    pub async fn try_take_free_coins(
        &self,
        faucet_component: &ComponentAddress,
    ) -> Result<GetTransactionResultResponse, FaucetError> {
        let account = get_account(self.provider).await?;
        let instructions = take_free_coins_instructions(faucet_component, &account);
        let required_substates = vec![
            SubstateRequirement::unversioned(&account.address),
            SubstateRequirement::unversioned(faucet_component),
        ];

        submit_and_wait(
            self.provider,
            self.waiter,
            &account,
            self.fee,
            instructions,
            required_substates,
        )
        .await
    }

    /// Best-effort variant of [Self::try_take_free_coins]: failures are logged and None is returned
    pub async fn take_free_coins(&self, faucet_component: &ComponentAddress) -> Option<GetTransactionResultResponse> {
        match self.try_take_free_coins(faucet_component).await {
            Ok(resp) => Some(resp),
            Err(err) => {
                error!(
                    target: LOG_TARGET,
                    "Failed to take free coins from {}: {}", faucet_component, err
                );
                None
            },
        }
    }
}
