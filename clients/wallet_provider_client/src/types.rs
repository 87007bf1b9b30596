//   Copyright 2024 The Tari Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::substate::{ComponentAddress, ResourceAddress, SubstateId, TemplateAddress};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The literal form the transaction argument parser understands e.g. `Amount(2000)`
    pub fn to_arg_literal(&self) -> String {
        format!("Amount({})", self.0)
    }
}

impl From<u64> for Amount {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An instruction argument. Literals are parsed by the wallet (e.g. `"Amount(10)"`, `"A"`) and workspace args refer to
/// a value stored by a previous `PutLastInstructionOutputOnWorkspace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Workspace {
        #[serde(rename = "Workspace")]
        key: Vec<u8>,
    },
    Literal(String),
}

impl Arg {
    pub fn literal<T: Into<String>>(value: T) -> Self {
        Self::Literal(value.into())
    }

    pub fn workspace<T: AsRef<[u8]>>(key: T) -> Self {
        Self::Workspace {
            key: key.as_ref().to_vec(),
        }
    }
}

impl From<Amount> for Arg {
    fn from(amount: Amount) -> Self {
        Self::Literal(amount.to_arg_literal())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    CallFunction {
        template_address: TemplateAddress,
        function: String,
        args: Vec<Arg>,
    },
    CallMethod {
        component_address: ComponentAddress,
        method: String,
        args: Vec<Arg>,
    },
    PutLastInstructionOutputOnWorkspace {
        key: Vec<u8>,
    },
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CallFunction {
                template_address,
                function,
                args,
            } => write!(
                f,
                "CallFunction {{ template_address: {}, function: {}, args: {:?} }}",
                template_address, function, args
            ),
            Self::CallMethod {
                component_address,
                method,
                args,
            } => write!(
                f,
                "CallMethod {{ component_address: {}, method: {}, args: {:?} }}",
                component_address, method, args
            ),
            Self::PutLastInstructionOutputOnWorkspace { key } => {
                write!(f, "PutLastInstructionOutputOnWorkspace {{ key: {:?} }}", key)
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: u64,
    pub address: ComponentAddress,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstateRequirement {
    pub substate_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl SubstateRequirement {
    pub fn unversioned<T: ToString>(substate_id: T) -> Self {
        Self {
            substate_id: substate_id.to_string(),
            version: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitTransactionRequest {
    pub account_id: u64,
    pub fee_instructions: Vec<Instruction>,
    pub instructions: Vec<Instruction>,
    pub inputs: Vec<SubstateRequirement>,
    pub input_refs: Vec<SubstateRequirement>,
    pub required_substates: Vec<SubstateRequirement>,
    pub is_dry_run: bool,
    pub min_epoch: Option<u64>,
    pub max_epoch: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitTransactionResponse {
    pub transaction_id: TransactionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    New,
    DryRun,
    Pending,
    Accepted,
    Rejected,
    InvalidTransaction,
    OnlyFeeAccepted,
}

impl TransactionStatus {
    /// Returns true if the transaction will not change status again
    pub fn is_finalized(&self) -> bool {
        match self {
            TransactionStatus::New | TransactionStatus::Pending => false,
            TransactionStatus::DryRun |
            TransactionStatus::Accepted |
            TransactionStatus::Rejected |
            TransactionStatus::InvalidTransaction |
            TransactionStatus::OnlyFeeAccepted => true,
        }
    }

    pub fn as_key_str(&self) -> &'static str {
        match self {
            TransactionStatus::New => "New",
            TransactionStatus::DryRun => "DryRun",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Accepted => "Accepted",
            TransactionStatus::Rejected => "Rejected",
            TransactionStatus::InvalidTransaction => "InvalidTransaction",
            TransactionStatus::OnlyFeeAccepted => "OnlyFeeAccepted",
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_key_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstateDiff {
    /// Substates created or updated by the transaction, in the order the engine emitted them
    pub up_substates: Vec<(SubstateId, serde_json::Value)>,
    #[serde(default)]
    pub down_substates: Vec<(SubstateId, u32)>,
}

impl SubstateDiff {
    pub fn up_iter(&self) -> impl Iterator<Item = &SubstateId> + '_ {
        self.up_substates.iter().map(|(id, _)| id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransactionOutcome {
    Accept(SubstateDiff),
    AcceptFeeRejectRest(SubstateDiff, serde_json::Value),
    Reject(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizeResult {
    pub result: TransactionOutcome,
}

impl FinalizeResult {
    /// The diff of a fully accepted transaction
    pub fn accept(&self) -> Option<&SubstateDiff> {
        match &self.result {
            TransactionOutcome::Accept(diff) => Some(diff),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetTransactionResultResponse {
    pub transaction_id: TransactionId,
    pub status: TransactionStatus,
    pub result: Option<FinalizeResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    #[serde(default)]
    pub vault_address: Option<String>,
    pub resource_address: ResourceAddress,
    pub balance: Amount,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalancesResponse {
    pub address: ComponentAddress,
    pub balances: Vec<BalanceEntry>,
}

impl AccountBalancesResponse {
    pub fn find_balance(&self, resource_address: &ResourceAddress) -> Option<&BalanceEntry> {
        self.balances
            .iter()
            .find(|entry| entry.resource_address.eq_ignore_case(resource_address))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetSubstateResponse {
    pub substate_id: SubstateId,
    #[serde(default)]
    pub version: Option<u32>,
    pub value: serde_json::Value,
}
