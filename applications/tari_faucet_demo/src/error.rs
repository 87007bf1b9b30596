// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::time::Duration;

use tari_wallet_provider_client::{types::TransactionId, WalletProviderError};

#[derive(Debug, thiserror::Error)]
pub enum FaucetError {
    #[error("Account not initialized: the wallet has no active account")]
    AccountNotInitialized,
    #[error("Transaction submission failed: the wallet did not return a transaction")]
    SubmissionFailed,
    #[error("Transaction {transaction_id} rejected: {details}")]
    TransactionRejected {
        transaction_id: TransactionId,
        details: String,
    },
    #[error("Transaction result is missing expected data: {details}")]
    MissingResultData { details: String },
    #[error("Fee amount must be greater than zero")]
    InvalidFeeAmount,
    #[error("Timed out after {timeout:?} waiting for transaction {transaction_id}")]
    PollTimeout {
        transaction_id: TransactionId,
        timeout: Duration,
    },
    #[error("Stopped waiting for transaction {transaction_id}: cancelled")]
    PollCancelled { transaction_id: TransactionId },
    #[error("Another operation is already in progress")]
    OperationInProgress,
    #[error("Wallet provider error: {0}")]
    Provider(#[from] WalletProviderError),
}

impl FaucetError {
    pub fn missing_result_data<T: Into<String>>(details: T) -> Self {
        Self::MissingResultData {
            details: details.into(),
        }
    }
}
