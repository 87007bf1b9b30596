// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use serde_json::json;
use tari_wallet_provider_client::{
    substate::{ComponentAddress, ResourceAddress, SubstateId},
    types::{
        Account,
        AccountBalancesResponse,
        Amount,
        BalanceEntry,
        FinalizeResult,
        GetSubstateResponse,
        GetTransactionResultResponse,
        SubmitTransactionRequest,
        SubmitTransactionResponse,
        SubstateDiff,
        TransactionId,
        TransactionOutcome,
        TransactionStatus,
    },
    WalletProvider,
    WalletProviderError,
};

pub const TEST_ACCOUNT_ADDRESS: &str = "component_0000aaaa";

pub fn test_account() -> Account {
    Account {
        account_id: 1,
        address: ComponentAddress::new(TEST_ACCOUNT_ADDRESS),
        name: Some("test".to_string()),
    }
}

pub fn accepted<T: Into<String>>(transaction_id: T, up_substates: Vec<SubstateId>) -> GetTransactionResultResponse {
    GetTransactionResultResponse {
        transaction_id: TransactionId::new(transaction_id),
        status: TransactionStatus::Accepted,
        result: Some(FinalizeResult {
            result: TransactionOutcome::Accept(SubstateDiff {
                up_substates: up_substates.into_iter().map(|id| (id, json!({}))).collect(),
                down_substates: vec![],
            }),
        }),
    }
}

pub fn result_with_status<T: Into<String>>(transaction_id: T, status: TransactionStatus) -> GetTransactionResultResponse {
    let result = match status {
        TransactionStatus::Accepted | TransactionStatus::DryRun => Some(FinalizeResult {
            result: TransactionOutcome::Accept(SubstateDiff {
                up_substates: vec![],
                down_substates: vec![],
            }),
        }),
        TransactionStatus::OnlyFeeAccepted => Some(FinalizeResult {
            result: TransactionOutcome::AcceptFeeRejectRest(
                SubstateDiff {
                    up_substates: vec![],
                    down_substates: vec![],
                },
                json!({ "ExecutionFailure": "panic" }),
            ),
        }),
        TransactionStatus::Rejected => Some(FinalizeResult {
            result: TransactionOutcome::Reject(json!({ "ExecutionFailure": "Insufficient funds" })),
        }),
        TransactionStatus::New | TransactionStatus::Pending | TransactionStatus::InvalidTransaction => None,
    };
    GetTransactionResultResponse {
        transaction_id: TransactionId::new(transaction_id),
        status,
        result,
    }
}

pub fn balance_entry(resource_address: &str, balance: u64) -> BalanceEntry {
    BalanceEntry {
        vault_address: None,
        resource_address: ResourceAddress::new(resource_address),
        balance: Amount::new(balance),
        resource_type: Some("Fungible".to_string()),
        token_symbol: None,
    }
}

/// An in-memory wallet that replays scripted responses and records what it was asked to do
pub struct MockWalletProvider {
    account: Option<Account>,
    transaction_ids: Mutex<VecDeque<TransactionId>>,
    results: Mutex<VecDeque<GetTransactionResultResponse>>,
    balances: Mutex<Vec<BalanceEntry>>,
    fail_balances: bool,
    hang_results: bool,
    submitted: Mutex<Vec<SubmitTransactionRequest>>,
    result_calls: AtomicUsize,
    balance_calls: AtomicUsize,
}

impl MockWalletProvider {
    pub fn new() -> Self {
        Self {
            account: Some(test_account()),
            transaction_ids: Mutex::new(VecDeque::new()),
            results: Mutex::new(VecDeque::new()),
            balances: Mutex::new(vec![]),
            fail_balances: false,
            hang_results: false,
            submitted: Mutex::new(vec![]),
            result_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
        }
    }

    pub fn without_account(mut self) -> Self {
        self.account = None;
        self
    }

    /// Each submission takes the next id. Submissions after the ids run out get no response.
    pub fn with_transaction_id<T: Into<String>>(self, transaction_id: T) -> Self {
        self.transaction_ids
            .lock()
            .unwrap()
            .push_back(TransactionId::new(transaction_id));
        self
    }

    /// Results are returned in order. The last one is repeated once the others are used up.
    pub fn with_results(self, results: Vec<GetTransactionResultResponse>) -> Self {
        self.results.lock().unwrap().extend(results);
        self
    }

    pub fn with_balances(self, balances: Vec<BalanceEntry>) -> Self {
        *self.balances.lock().unwrap() = balances;
        self
    }

    pub fn with_failing_balances(mut self) -> Self {
        self.fail_balances = true;
        self
    }

    /// Result queries are counted but never answered
    pub fn with_hanging_results(mut self) -> Self {
        self.hang_results = true;
        self
    }

    pub fn submitted(&self) -> Vec<SubmitTransactionRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn result_calls(&self) -> usize {
        self.result_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn get_account(&self) -> Result<Option<Account>, WalletProviderError> {
        Ok(self.account.clone())
    }

    async fn submit_transaction(
        &self,
        request: SubmitTransactionRequest,
    ) -> Result<Option<SubmitTransactionResponse>, WalletProviderError> {
        self.submitted.lock().unwrap().push(request);
        let transaction_id = self.transaction_ids.lock().unwrap().pop_front();
        Ok(transaction_id.map(|transaction_id| SubmitTransactionResponse { transaction_id }))
    }

    async fn get_transaction_result(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<GetTransactionResultResponse, WalletProviderError> {
        self.result_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_results {
            return std::future::pending().await;
        }
        let mut results = self.results.lock().unwrap();
        let result = if results.len() > 1 {
            results.pop_front()
        } else {
            results.front().cloned()
        };
        result.ok_or_else(|| WalletProviderError::Rpc {
            code: 404,
            message: format!("Transaction {} not found", transaction_id),
        })
    }

    async fn get_account_balances(
        &self,
        address: &ComponentAddress,
    ) -> Result<AccountBalancesResponse, WalletProviderError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_balances {
            return Err(WalletProviderError::invalid_response("balances unavailable"));
        }
        Ok(AccountBalancesResponse {
            address: address.clone(),
            balances: self.balances.lock().unwrap().clone(),
        })
    }

    async fn get_substate(&self, substate_id: &SubstateId) -> Result<GetSubstateResponse, WalletProviderError> {
        Ok(GetSubstateResponse {
            substate_id: substate_id.clone(),
            version: Some(0),
            value: json!({ "substate": substate_id.to_string() }),
        })
    }
}
