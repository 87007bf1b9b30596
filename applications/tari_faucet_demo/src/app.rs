// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Context;
use log::*;
use tari_wallet_provider_client::{
    substate::{SubstateId, TemplateAddress},
    types::{Amount, GetSubstateResponse, GetTransactionResultResponse},
    WalletProvider,
};
use tokio::sync::RwLock;

use crate::{
    config::Config,
    error::FaucetError,
    faucet::FaucetApi,
    helpers::write_tokens_file,
    token::TokenPair,
    view::{AccountView, BalancePanel},
    wallet::{get_account, TransactionWaiter},
};

const LOG_TARGET: &str = "tari::faucet_demo::app";

/// The result of claiming coins from one faucet. `result` is None if the claim failed.
#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    pub symbol: String,
    pub result: Option<GetTransactionResultResponse>,
}

impl ClaimOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

/// Owns the tracked tokens and runs the user facing actions one at a time
pub struct FaucetApp {
    provider: Arc<dyn WalletProvider>,
    waiter: TransactionWaiter,
    fee: Amount,
    initial_supply: Amount,
    faucet_template_address: TemplateAddress,
    tokens_file: PathBuf,
    tokens: RwLock<TokenPair>,
    in_flight: AtomicBool,
}

impl FaucetApp {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        config: &Config,
        waiter: TransactionWaiter,
        tokens: TokenPair,
    ) -> Self {
        Self {
            provider,
            waiter,
            fee: config.fee(),
            initial_supply: config.initial_supply(),
            faucet_template_address: config.faucet_template_address.clone(),
            tokens_file: config.get_tokens_file(),
            tokens: RwLock::new(tokens),
            in_flight: AtomicBool::new(false),
        }
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, FaucetError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| FaucetError::OperationInProgress)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    fn faucet_api(&self) -> FaucetApi<'_, dyn WalletProvider> {
        FaucetApi::new(&*self.provider, &self.waiter, self.fee)
    }

    fn account_view(&self) -> AccountView<'_, dyn WalletProvider> {
        AccountView::new(&*self.provider)
    }

    pub async fn tokens(&self) -> TokenPair {
        self.tokens.read().await.clone()
    }

    pub async fn balance_panel(&self) -> String {
        let tokens = self.tokens.read().await;
        BalancePanel::new(tokens.iter()).to_string()
    }

    /// Deploys two new faucets, tracks their tokens instead of the current ones and saves them to the tokens file
    pub async fn deploy(&self) -> anyhow::Result<TokenPair> {
        let _guard = self.begin()?;
        let account = get_account(&*self.provider).await?;
        let tokens = self
            .faucet_api()
            .init_faucets(&account, &self.faucet_template_address, self.initial_supply)
            .await?;

        write_tokens_file(&self.tokens_file, &tokens)
            .await
            .context("Faucets were deployed but could not be saved")?;
        info!(
            target: LOG_TARGET,
            "Saved deployed tokens to {}",
            self.tokens_file.display()
        );

        *self.tokens.write().await = tokens.clone();
        Ok(tokens)
    }

    pub async fn create_faucet(
        &self,
        template_address: Option<TemplateAddress>,
        initial_supply: Option<Amount>,
        symbol: &str,
    ) -> anyhow::Result<GetTransactionResultResponse> {
        let _guard = self.begin()?;
        let template_address = template_address.unwrap_or_else(|| self.faucet_template_address.clone());
        let initial_supply = initial_supply.unwrap_or(self.initial_supply);
        let resp = self
            .faucet_api()
            .create_faucet(&template_address, initial_supply, symbol)
            .await?;
        Ok(resp)
    }

    /// Claims free coins from both faucets and then refreshes the balances. A failed claim does not stop the other
    /// claim or the refresh.
    pub async fn take_coins(&self) -> anyhow::Result<Vec<ClaimOutcome>> {
        let _guard = self.begin()?;
        let tokens = self.tokens.read().await.clone();
        let api = self.faucet_api();

        let mut outcomes = Vec::with_capacity(2);
        for token in tokens.iter() {
            info!(
                target: LOG_TARGET,
                "Taking free {} coins from {}",
                token.symbol,
                token.component_address()
            );
            let result = api.take_free_coins(token.component_address()).await;
            outcomes.push(ClaimOutcome {
                symbol: token.symbol.clone(),
                result,
            });
        }

        let mut tokens = self.tokens.write().await;
        self.account_view().refresh_balances(tokens.iter_mut()).await;
        Ok(outcomes)
    }

    pub async fn refresh(&self) -> anyhow::Result<TokenPair> {
        let _guard = self.begin()?;
        let mut tokens = self.tokens.write().await;
        self.account_view().try_refresh_balances(tokens.iter_mut()).await?;
        Ok(tokens.clone())
    }

    pub async fn get_substate(&self, substate_id: &SubstateId) -> anyhow::Result<GetSubstateResponse> {
        let resp = self.account_view().get_substate(substate_id).await?;
        Ok(resp)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tari_wallet_provider_client::{
        substate::{ComponentAddress, ResourceAddress},
        types::TransactionStatus,
    };

    use super::*;
    use crate::{
        constants::{FAUCET_TEMPLATE_ADDRESS, INIT_SUPPLY},
        helpers::read_tokens_file,
        test_helpers::{accepted, balance_entry, result_with_status, MockWalletProvider, TEST_ACCOUNT_ADDRESS},
    };

    fn config(base_dir: PathBuf) -> Config {
        Config {
            wallet_daemon_url: "http://127.0.0.1:9000/json_rpc".parse().unwrap(),
            network: 0x10,
            base_dir,
            fee_amount: 2000,
            initial_supply: INIT_SUPPLY,
            faucet_template_address: TemplateAddress::new(FAUCET_TEMPLATE_ADDRESS),
            poll_interval: Duration::from_secs(1),
            poll_timeout: None,
            log_level: "info".to_string(),
        }
    }

    fn app(provider: Arc<MockWalletProvider>, base_dir: PathBuf) -> FaucetApp {
        FaucetApp::new(
            provider,
            &config(base_dir),
            TransactionWaiter::default(),
            TokenPair::default(),
        )
    }

    fn assert_in_progress(err: &anyhow::Error) {
        assert!(
            matches!(err.downcast_ref::<FaucetError>(), Some(FaucetError::OperationInProgress)),
            "unexpected error: {:?}",
            err
        );
    }

    #[tokio::test(start_paused = true)]
    async fn it_rejects_actions_while_one_is_running() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(
            MockWalletProvider::new()
                .with_transaction_id("tx1")
                .with_transaction_id("tx2")
                .with_results(vec![
                    result_with_status("tx1", TransactionStatus::Pending),
                    accepted("tx1", vec![]),
                ]),
        );
        let app = app(provider.clone(), dir.path().to_path_buf());

        let (claims, refresh, again) = tokio::join!(app.take_coins(), app.refresh(), app.take_coins());
        let claims = claims.unwrap();
        assert_in_progress(&refresh.unwrap_err());
        assert_in_progress(&again.unwrap_err());

        assert_eq!(claims.len(), 2);
        assert!(claims.iter().all(ClaimOutcome::is_success));
        assert_eq!(provider.submitted().len(), 2);

        // The guard is released once the action completes
        app.refresh().await.unwrap();
    }

    #[tokio::test]
    async fn take_coins_refreshes_after_a_failed_claim() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = TokenPair::default();
        let provider = Arc::new(
            MockWalletProvider::new()
                .with_transaction_id("tx1")
                .with_results(vec![accepted("tx1", vec![])])
                .with_balances(vec![balance_entry(tokens.first.resource_address().as_str(), 1000)]),
        );
        let app = app(provider.clone(), dir.path().to_path_buf());

        let claims = app.take_coins().await.unwrap();
        assert_eq!(claims[0].symbol, "A");
        assert!(claims[0].is_success());
        // No transaction id left for the second claim
        assert_eq!(claims[1].symbol, "B");
        assert!(!claims[1].is_success());

        assert_eq!(provider.balance_calls(), 1);
        let tokens = app.tokens().await;
        assert_eq!(tokens.first.balance, 1000);
        assert_eq!(tokens.second.balance, 0);
    }

    #[tokio::test]
    async fn deploy_replaces_and_saves_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(
            MockWalletProvider::new()
                .with_transaction_id("tx1")
                .with_results(vec![accepted("tx1", vec![
                    SubstateId::Component(ComponentAddress::new(TEST_ACCOUNT_ADDRESS)),
                    SubstateId::Resource(ResourceAddress::new("resource_aaaa")),
                    SubstateId::Component(ComponentAddress::new("component_aaaa")),
                    SubstateId::Resource(ResourceAddress::new("resource_bbbb")),
                    SubstateId::Component(ComponentAddress::new("component_bbbb")),
                ])]),
        );
        let app = app(provider, dir.path().to_path_buf());

        let tokens = app.deploy().await.unwrap();
        assert_eq!(tokens.first.resource_address().as_str(), "resource_aaaa");
        assert_eq!(tokens.second.component_address().as_str(), "component_bbbb");
        assert_eq!(app.tokens().await, tokens);

        let saved = read_tokens_file(dir.path().join("tokens.json")).await.unwrap();
        assert_eq!(saved, Some(tokens));
    }

    #[tokio::test]
    async fn refresh_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockWalletProvider::new().with_failing_balances());
        let app = app(provider, dir.path().to_path_buf());

        let err = app.refresh().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FaucetError>(),
            Some(FaucetError::Provider(_))
        ));
        assert_eq!(app.tokens().await, TokenPair::default());
    }

    #[tokio::test]
    async fn create_faucet_falls_back_to_configured_template() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(
            MockWalletProvider::new()
                .with_transaction_id("tx1")
                .with_results(vec![accepted("tx1", vec![])]),
        );
        let app = app(provider.clone(), dir.path().to_path_buf());

        app.create_faucet(None, Some(Amount::new(10)), "C").await.unwrap();
        let submitted = provider.submitted();
        assert_eq!(
            submitted[0].instructions,
            vec![crate::faucet::mint_instruction(
                &TemplateAddress::new(FAUCET_TEMPLATE_ADDRESS),
                Amount::new(10),
                "C"
            )]
        );
    }
}
