// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{future, time::Duration};

use log::*;
use tari_wallet_provider_client::{
    types::{
        Account,
        Amount,
        GetTransactionResultResponse,
        Instruction,
        SubmitTransactionRequest,
        SubstateRequirement,
        TransactionId,
        TransactionStatus,
    },
    WalletProvider,
};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::{constants::DEFAULT_POLL_INTERVAL, error::FaucetError};

const LOG_TARGET: &str = "tari::faucet_demo::wallet";

pub async fn get_account<TProvider: WalletProvider + ?Sized>(provider: &TProvider) -> Result<Account, FaucetError> {
    provider.get_account().await?.ok_or(FaucetError::AccountNotInitialized)
}

/// The `pay_fee` call on the account that every transaction starts with
pub fn fee_instruction(account: &Account, fee: Amount) -> Instruction {
    Instruction::CallMethod {
        component_address: account.address.clone(),
        method: "pay_fee".to_string(),
        args: vec![fee.into()],
    }
}

pub fn build_transaction_request(
    account: &Account,
    fee: Amount,
    instructions: Vec<Instruction>,
    required_substates: Vec<SubstateRequirement>,
) -> SubmitTransactionRequest {
    SubmitTransactionRequest {
        account_id: account.account_id,
        fee_instructions: vec![fee_instruction(account, fee)],
        instructions,
        inputs: vec![],
        input_refs: vec![],
        required_substates,
        is_dry_run: false,
        min_epoch: None,
        max_epoch: None,
    }
}

/// Submits the instructions paying `fee` from the account. Returns as soon as the wallet has accepted the transaction
/// for submission.
pub async fn submit_transaction<TProvider: WalletProvider + ?Sized>(
    provider: &TProvider,
    account: &Account,
    fee: Amount,
    instructions: Vec<Instruction>,
    required_substates: Vec<SubstateRequirement>,
) -> Result<TransactionId, FaucetError> {
    if fee.is_zero() {
        return Err(FaucetError::InvalidFeeAmount);
    }

    let request = build_transaction_request(account, fee, instructions, required_substates);
    for instruction in &request.instructions {
        debug!(target: LOG_TARGET, "Instruction: {}", instruction);
    }

    let response = provider
        .submit_transaction(request)
        .await?
        .ok_or(FaucetError::SubmissionFailed)?;

    info!(
        target: LOG_TARGET,
        "Submitted transaction {} (fee: {})", response.transaction_id, fee
    );
    Ok(response.transaction_id)
}

pub async fn submit_and_wait<TProvider: WalletProvider + ?Sized>(
    provider: &TProvider,
    waiter: &TransactionWaiter,
    account: &Account,
    fee: Amount,
    instructions: Vec<Instruction>,
    required_substates: Vec<SubstateRequirement>,
) -> Result<GetTransactionResultResponse, FaucetError> {
    let transaction_id = submit_transaction(provider, account, fee, instructions, required_substates).await?;
    waiter.wait_for_result(provider, &transaction_id).await
}

/// Polls the wallet at a fixed interval until a transaction is finalized
#[derive(Debug, Clone)]
pub struct TransactionWaiter {
    interval: Duration,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl TransactionWaiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
            cancel: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until the transaction reaches a final status and returns the response as received. A rejected transaction
    /// is returned as an error. The timeout and cancellation token also interrupt a status query that has not
    /// returned. Without either this waits for as long as the transaction stays pending.
    pub async fn wait_for_result<TProvider: WalletProvider + ?Sized>(
        &self,
        provider: &TProvider,
        transaction_id: &TransactionId,
    ) -> Result<GetTransactionResultResponse, FaucetError> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let cancelled = async {
            match &self.cancel {
                Some(cancel) => cancel.cancelled().await,
                None => future::pending().await,
            }
        };
        let timed_out = async {
            match deadline {
                Some(deadline) => time::sleep_until(deadline).await,
                None => future::pending().await,
            }
        };
        tokio::pin!(cancelled);
        tokio::pin!(timed_out);

        loop {
            let resp = tokio::select! {
                biased;
                _ = &mut cancelled => return Err(self.cancelled_error(transaction_id)),
                _ = &mut timed_out => return Err(self.timeout_error(transaction_id)),
                resp = provider.get_transaction_result(transaction_id) => resp?,
            };
            debug!(
                target: LOG_TARGET,
                "Transaction {} status: {}", transaction_id, resp.status
            );

            if resp.status == TransactionStatus::Rejected {
                let details = serde_json::to_string(&resp.result)
                    .unwrap_or_else(|e| format!("<unable to encode rejection result: {}>", e));
                return Err(FaucetError::TransactionRejected {
                    transaction_id: transaction_id.clone(),
                    details,
                });
            }
            if resp.status.is_finalized() {
                info!(
                    target: LOG_TARGET,
                    "Transaction {} finalized with status {}", transaction_id, resp.status
                );
                return Ok(resp);
            }

            tokio::select! {
                biased;
                _ = &mut cancelled => return Err(self.cancelled_error(transaction_id)),
                _ = &mut timed_out => return Err(self.timeout_error(transaction_id)),
                _ = time::sleep(self.interval) => {},
            }
        }
    }

    fn cancelled_error(&self, transaction_id: &TransactionId) -> FaucetError {
        warn!(target: LOG_TARGET, "Cancelled while waiting for transaction {}", transaction_id);
        FaucetError::PollCancelled {
            transaction_id: transaction_id.clone(),
        }
    }

    fn timeout_error(&self, transaction_id: &TransactionId) -> FaucetError {
        FaucetError::PollTimeout {
            transaction_id: transaction_id.clone(),
            timeout: self.timeout.unwrap_or_default(),
        }
    }
}

impl Default for TransactionWaiter {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}
