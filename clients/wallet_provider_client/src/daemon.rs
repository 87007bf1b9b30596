//   Copyright 2024 The Tari Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use log::*;
use reqwest::header;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::{
    error::WalletProviderError,
    permissions::{ProviderPermissions, WalletPermission, WalletPermissions},
    provider::WalletProvider,
    substate::{ComponentAddress, SubstateId},
    types::{
        Account,
        AccountBalancesResponse,
        GetSubstateResponse,
        GetTransactionResultResponse,
        Instruction,
        SubmitTransactionRequest,
        SubmitTransactionResponse,
        SubstateRequirement,
        TransactionId,
    },
};

const LOG_TARGET: &str = "tari::wallet_provider_client::daemon";

/// Network byte of a local development network
pub const DEFAULT_NETWORK: u8 = 0x10;

/// [WalletProvider] backed by the wallet daemon JSON-RPC API
#[derive(Debug)]
pub struct WalletDaemonProvider {
    client: reqwest::Client,
    endpoint: Url,
    network: u8,
    request_id: AtomicI64,
    token: Option<String>,
}

impl WalletDaemonProvider {
    pub fn new(endpoint: Url) -> Result<Self, WalletProviderError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            endpoint,
            network: DEFAULT_NETWORK,
            request_id: AtomicI64::new(0),
            token: None,
        })
    }

    /// Creates the provider and requests the given permissions from the wallet
    pub async fn connect(
        endpoint: Url,
        network: u8,
        permissions: &ProviderPermissions,
        app_name: &str,
    ) -> Result<Self, WalletProviderError> {
        let mut provider = Self::new(endpoint)?.with_network(network);
        provider.authenticate(permissions, app_name).await?;
        Ok(provider)
    }

    /// The network byte transactions are built for
    pub fn with_network(mut self, network: u8) -> Self {
        self.network = network;
        self
    }

    pub async fn authenticate(
        &mut self,
        permissions: &ProviderPermissions,
        app_name: &str,
    ) -> Result<(), WalletProviderError> {
        let request = AuthRequest::new(permissions);
        let granted = request
            .permissions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let AuthRequestResponse { auth_token } = self.send_request("auth.request", &request).await?;
        let AuthAcceptResponse { permissions_token } = self
            .send_request("auth.accept", &json!({ "auth_token": auth_token, "name": app_name }))
            .await?;
        info!(
            target: LOG_TARGET,
            "Authenticated with wallet at {} ({})", self.endpoint, granted
        );
        self.token = Some(permissions_token);
        Ok(())
    }

    async fn send_request<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &T,
    ) -> Result<R, WalletProviderError> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!(target: LOG_TARGET, "Sending request {} ({})", method, id);

        let mut request = self.client.post(self.endpoint.clone()).json(&body);
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let resp = request.send().await?.error_for_status()?;
        let val = resp.json::<serde_json::Value>().await?;
        let result = extract_result(val)?;
        serde_json::from_value(result).map_err(|source| WalletProviderError::Deserialize {
            method: method.to_string(),
            source,
        })
    }
}

fn extract_result(mut val: serde_json::Value) -> Result<serde_json::Value, WalletProviderError> {
    if let Some(error) = val.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("<no message>")
            .to_string();
        return Err(WalletProviderError::Rpc { code, message });
    }

    if val.get("result").is_none() {
        return Err(WalletProviderError::invalid_response(format!(
            "Missing result field in response: {}",
            val
        )));
    }
    Ok(val["result"].take())
}

#[async_trait]
impl WalletProvider for WalletDaemonProvider {
    async fn get_account(&self) -> Result<Option<Account>, WalletProviderError> {
        let resp: Option<AccountGetResponse> = self.send_request("accounts.get_default", &json!({})).await?;
        resp.map(|resp| Account::try_from(resp.account)).transpose()
    }

    async fn submit_transaction(
        &self,
        request: SubmitTransactionRequest,
    ) -> Result<Option<SubmitTransactionResponse>, WalletProviderError> {
        let method = if request.is_dry_run {
            "transactions.submit_dry_run"
        } else {
            "transactions.submit"
        };
        let request = TransactionSubmitRequest::new(request, self.network);
        self.send_request(method, &request).await
    }

    async fn get_transaction_result(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<GetTransactionResultResponse, WalletProviderError> {
        self.send_request("transactions.get_result", &json!({ "transaction_id": transaction_id }))
            .await
    }

    async fn get_account_balances(
        &self,
        address: &ComponentAddress,
    ) -> Result<AccountBalancesResponse, WalletProviderError> {
        self.send_request(
            "accounts.get_balances",
            &json!({ "account": { "ComponentAddress": address }, "refresh": false }),
        )
        .await
    }

    async fn get_substate(&self, substate_id: &SubstateId) -> Result<GetSubstateResponse, WalletProviderError> {
        self.send_request("substates.get", &json!({ "substate_id": substate_id.to_string() }))
            .await
    }
}

#[derive(Debug, Serialize)]
struct AuthRequest {
    permissions: WalletPermissions,
    optional_permissions: WalletPermissions,
    duration: Option<u64>,
}

impl AuthRequest {
    /// Polling for results needs `TransactionGet` on top of the requested permissions
    fn new(permissions: &ProviderPermissions) -> Self {
        Self {
            permissions: permissions
                .permissions
                .clone()
                .add_permission(WalletPermission::TransactionGet),
            optional_permissions: permissions.optional_permissions.clone(),
            duration: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthRequestResponse {
    auth_token: String,
}

#[derive(Debug, Deserialize)]
struct AuthAcceptResponse {
    permissions_token: String,
}

#[derive(Debug, Deserialize)]
struct AccountGetResponse {
    account: DaemonAccount,
}

#[derive(Debug, Deserialize)]
struct DaemonAccount {
    #[serde(default)]
    name: Option<String>,
    address: SubstateId,
    key_index: u64,
}

impl TryFrom<DaemonAccount> for Account {
    type Error = WalletProviderError;

    fn try_from(account: DaemonAccount) -> Result<Self, Self::Error> {
        let address = account.address.as_component_address().cloned().ok_or_else(|| {
            WalletProviderError::invalid_response(format!("Account address {} is not a component", account.address))
        })?;
        Ok(Account {
            account_id: account.key_index,
            address,
            name: account.name,
        })
    }
}

/// The wallet signs with the key of `signing_key_index` and resolves input versions itself
#[derive(Debug, Serialize)]
struct TransactionSubmitRequest {
    transaction: UnsignedTransaction,
    signing_key_index: Option<u64>,
    autofill_inputs: Vec<SubstateRequirement>,
    detect_inputs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    detect_inputs_use_unversioned: Option<bool>,
    proof_ids: Vec<u64>,
}

#[derive(Debug, Serialize)]
enum UnsignedTransaction {
    V1(UnsignedTransactionV1),
}

#[derive(Debug, Serialize)]
struct UnsignedTransactionV1 {
    network: u8,
    fee_instructions: Vec<Instruction>,
    instructions: Vec<Instruction>,
    inputs: Vec<SubstateRequirement>,
    min_epoch: Option<u64>,
    max_epoch: Option<u64>,
    is_seal_signer_authorized: bool,
}

impl TransactionSubmitRequest {
    fn new(request: SubmitTransactionRequest, network: u8) -> Self {
        let SubmitTransactionRequest {
            account_id,
            fee_instructions,
            instructions,
            inputs,
            input_refs,
            required_substates,
            is_dry_run,
            min_epoch,
            max_epoch,
        } = request;

        let mut all_inputs = Vec::with_capacity(required_substates.len() + inputs.len() + input_refs.len());
        for input in required_substates.into_iter().chain(inputs).chain(input_refs) {
            if !all_inputs.contains(&input) {
                all_inputs.push(input);
            }
        }

        Self {
            transaction: UnsignedTransaction::V1(UnsignedTransactionV1 {
                network,
                fee_instructions,
                instructions,
                inputs: all_inputs,
                min_epoch,
                max_epoch,
                is_seal_signer_authorized: true,
            }),
            signing_key_index: Some(account_id),
            autofill_inputs: vec![],
            detect_inputs: true,
            detect_inputs_use_unversioned: (!is_dry_run).then_some(true),
            proof_ids: vec![],
        }
    }
}
