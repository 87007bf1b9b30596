//   Copyright 2024 The Tari Project
//   SPDX-License-Identifier: BSD-3-Clause

use async_trait::async_trait;

use crate::{
    error::WalletProviderError,
    substate::{ComponentAddress, SubstateId},
    types::{
        Account,
        AccountBalancesResponse,
        GetSubstateResponse,
        GetTransactionResultResponse,
        SubmitTransactionRequest,
        SubmitTransactionResponse,
        TransactionId,
    },
};

/// The wallet calls an application needs. The wallet owns keys, signing, input resolution and submission to the
/// network.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The active account, or None if the wallet has no account configured.
    async fn get_account(&self) -> Result<Option<Account>, WalletProviderError>;

    /// Submits the transaction and returns without waiting for it to be finalized. None is returned if the wallet did
    /// not hand back a transaction.
    async fn submit_transaction(
        &self,
        request: SubmitTransactionRequest,
    ) -> Result<Option<SubmitTransactionResponse>, WalletProviderError>;

    async fn get_transaction_result(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<GetTransactionResultResponse, WalletProviderError>;

    async fn get_account_balances(
        &self,
        address: &ComponentAddress,
    ) -> Result<AccountBalancesResponse, WalletProviderError>;

    async fn get_substate(&self, substate_id: &SubstateId) -> Result<GetSubstateResponse, WalletProviderError>;
}
