// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::fmt::{Display, Formatter};

use log::*;
use tari_wallet_provider_client::{
    substate::SubstateId,
    types::{Account, GetSubstateResponse},
    WalletProvider,
};

use crate::{error::FaucetError, token::Token, wallet};

const LOG_TARGET: &str = "tari::faucet_demo::view";

pub struct AccountView<'a, TProvider: ?Sized> {
    provider: &'a TProvider,
}

impl<'a, TProvider> AccountView<'a, TProvider>
where TProvider: WalletProvider + ?Sized
{
    pub fn new(provider: &'a TProvider) -> Self {
        Self { provider }
    }

    pub async fn get_account(&self) -> Result<Account, FaucetError> {
        wallet::get_account(self.provider).await
    }

    /// Sets the cached balance of each token from the wallet. Tokens the account holds no vault for get a balance of
    /// zero. Balances are only changed once all data has been fetched.
    pub async fn try_refresh_balances<'t, I>(&self, tokens: I) -> Result<(), FaucetError>
    where I: IntoIterator<Item = &'t mut Token> {
        let account = self.get_account().await?;
        let resp = self.provider.get_account_balances(&account.address).await?;

        for token in tokens {
            let balance = resp
                .find_balance(token.resource_address())
                .map(|entry| entry.balance.value())
                .unwrap_or(0);
            debug!(
                target: LOG_TARGET,
                "Balance of {} ({}): {}",
                token.symbol,
                token.resource_address(),
                balance
            );
            token.balance = balance;
        }
        Ok(())
    }

    /// Best-effort variant of [Self::try_refresh_balances]: failures are logged and the balances are left unchanged
    pub async fn refresh_balances<'t, I>(&self, tokens: I)
    where I: IntoIterator<Item = &'t mut Token> {
        if let Err(err) = self.try_refresh_balances(tokens).await {
            error!(target: LOG_TARGET, "Failed to refresh balances: {}", err);
        }
    }

    pub async fn get_substate(&self, substate_id: &SubstateId) -> Result<GetSubstateResponse, FaucetError> {
        debug!(
            target: LOG_TARGET,
            "Fetching {} substate {}",
            substate_id.substate_type(),
            substate_id
        );
        Ok(self.provider.get_substate(substate_id).await?)
    }
}

/// Text table of the tracked tokens
pub struct BalancePanel<'a> {
    tokens: Vec<&'a Token>,
}

impl<'a> BalancePanel<'a> {
    pub fn new<I: IntoIterator<Item = &'a Token>>(tokens: I) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }
}

impl Display for BalancePanel<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<8} {:>20}  {:<72} {:<72}", "Symbol", "Balance", "Resource", "Faucet")?;
        for token in &self.tokens {
            writeln!(
                f,
                "{:<8} {:>20}  {:<72} {:<72}",
                token.symbol,
                token.balance,
                token.resource_address().as_str(),
                token.component_address().as_str()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_helpers::{balance_entry, MockWalletProvider},
        token::TokenPair,
    };

    fn tracked_tokens() -> TokenPair {
        let mut tokens = TokenPair::default();
        tokens.first.balance = 7;
        tokens.second.balance = 9;
        tokens
    }

    #[tokio::test]
    async fn it_matches_resources_ignoring_case() {
        let mut tokens = tracked_tokens();
        let upper = tokens.first.resource_address().as_str().to_uppercase();
        let provider = MockWalletProvider::new().with_balances(vec![
            balance_entry("resource_ffff", 1),
            balance_entry(&upper, 500),
        ]);

        AccountView::new(&provider)
            .try_refresh_balances(tokens.iter_mut())
            .await
            .unwrap();
        assert_eq!(tokens.first.balance, 500);
        // Not held by the account
        assert_eq!(tokens.second.balance, 0);
    }

    #[tokio::test]
    async fn refresh_is_idempotent() {
        let mut tokens = tracked_tokens();
        let provider = MockWalletProvider::new().with_balances(vec![
            balance_entry(tokens.first.resource_address().as_str(), 100),
            balance_entry(tokens.second.resource_address().as_str(), 200),
        ]);
        let view = AccountView::new(&provider);

        view.try_refresh_balances(tokens.iter_mut()).await.unwrap();
        let once = tokens.clone();
        view.try_refresh_balances(tokens.iter_mut()).await.unwrap();
        assert_eq!(tokens, once);
        assert_eq!(tokens.first.balance, 100);
        assert_eq!(tokens.second.balance, 200);
        assert_eq!(provider.balance_calls(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_leaves_balances_unchanged() {
        let mut tokens = tracked_tokens();
        let provider = MockWalletProvider::new().with_failing_balances();
        let view = AccountView::new(&provider);

        view.refresh_balances(tokens.iter_mut()).await;
        assert_eq!(tokens, tracked_tokens());

        let err = view.try_refresh_balances(tokens.iter_mut()).await.unwrap_err();
        assert!(matches!(err, FaucetError::Provider(_)));
    }

    #[tokio::test]
    async fn refresh_without_account_fails() {
        let mut tokens = tracked_tokens();
        let provider = MockWalletProvider::new().without_account();
        let err = AccountView::new(&provider)
            .try_refresh_balances(tokens.iter_mut())
            .await
            .unwrap_err();
        assert!(matches!(err, FaucetError::AccountNotInitialized));
        assert_eq!(provider.balance_calls(), 0);
    }

    #[test]
    fn panel_lists_each_token() {
        let tokens = tracked_tokens();
        let panel = BalancePanel::new(tokens.iter()).to_string();
        let lines = panel.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("A "));
        assert!(lines[1].contains(" 7 "));
        assert!(lines[2].contains(tokens.second.component_address().as_str()));
    }
}
