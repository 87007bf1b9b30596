//   Copyright 2024 The Tari Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::{
    convert::Infallible,
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

macro_rules! string_address {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new<T: Into<String>>(address: T) -> Self {
                Self(address.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Addresses are hex-encoded so letter casing carries no meaning.
            pub fn eq_ignore_case(&self, other: &Self) -> bool {
                self.0.eq_ignore_ascii_case(&other.0)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(address: &str) -> Self {
                Self::new(address)
            }
        }

        impl From<String> for $name {
            fn from(address: String) -> Self {
                Self::new(address)
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::new(s))
            }
        }
    };
}

string_address!(
    /// A `component_...` address
    ComponentAddress
);
string_address!(
    /// A `resource_...` address
    ResourceAddress
);
string_address!(
    /// The hex-encoded hash of a published template
    TemplateAddress
);


/// A ledger address tagged with the kind of substate it points at. Serialized externally tagged, e.g.
/// `{"Resource": "resource_..."}`. Deserializes from the tagged form or from the prefixed string form used by the
/// wallet daemon (`"resource_..."`).
///
/// Non-fungible addresses are structured by the engine and are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SubstateId {
    Component(ComponentAddress),
    Resource(ResourceAddress),
    Vault(String),
    UnclaimedConfidentialOutput(String),
    NonFungible(Value),
    TransactionReceipt(String),
    NonFungibleIndex(Value),
    ValidatorFeePool(String),
    Template(TemplateAddress),
}

impl SubstateId {
    fn from_parts(substate_type: SubstateType, payload: Value) -> Result<Self, InvalidSubstateId> {
        let into_string = |payload: Value| match payload {
            Value::String(id) => Ok(id),
            other => Err(InvalidSubstateId(other.to_string())),
        };

        let id = match substate_type {
            SubstateType::Component => SubstateId::Component(ComponentAddress::new(into_string(payload)?)),
            SubstateType::Resource => SubstateId::Resource(ResourceAddress::new(into_string(payload)?)),
            SubstateType::Vault => SubstateId::Vault(into_string(payload)?),
            SubstateType::UnclaimedConfidentialOutput => {
                SubstateId::UnclaimedConfidentialOutput(into_string(payload)?)
            },
            SubstateType::NonFungible => SubstateId::NonFungible(payload),
            SubstateType::TransactionReceipt => SubstateId::TransactionReceipt(into_string(payload)?),
            SubstateType::NonFungibleIndex => SubstateId::NonFungibleIndex(payload),
            SubstateType::ValidatorFeePool => SubstateId::ValidatorFeePool(into_string(payload)?),
            SubstateType::Template => SubstateId::Template(TemplateAddress::new(into_string(payload)?)),
        };
        Ok(id)
    }

    pub fn substate_type(&self) -> SubstateType {
        match self {
            SubstateId::Component(_) => SubstateType::Component,
            SubstateId::Resource(_) => SubstateType::Resource,
            SubstateId::Vault(_) => SubstateType::Vault,
            SubstateId::UnclaimedConfidentialOutput(_) => SubstateType::UnclaimedConfidentialOutput,
            SubstateId::NonFungible(_) => SubstateType::NonFungible,
            SubstateId::TransactionReceipt(_) => SubstateType::TransactionReceipt,
            SubstateId::NonFungibleIndex(_) => SubstateType::NonFungibleIndex,
            SubstateId::ValidatorFeePool(_) => SubstateType::ValidatorFeePool,
            SubstateId::Template(_) => SubstateType::Template,
        }
    }

    pub fn as_component_address(&self) -> Option<&ComponentAddress> {
        match self {
            Self::Component(address) => Some(address),
            _ => None,
        }
    }

    pub fn as_resource_address(&self) -> Option<&ResourceAddress> {
        match self {
            Self::Resource(address) => Some(address),
            _ => None,
        }
    }
}

impl Display for SubstateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SubstateId::Component(addr) => write!(f, "{}", addr),
            SubstateId::Resource(addr) => write!(f, "{}", addr),
            SubstateId::Template(addr) => write!(f, "{}", addr),
            SubstateId::Vault(addr) |
            SubstateId::UnclaimedConfidentialOutput(addr) |
            SubstateId::TransactionReceipt(addr) |
            SubstateId::ValidatorFeePool(addr) => write!(f, "{}", addr),
            SubstateId::NonFungible(value) | SubstateId::NonFungibleIndex(value) => match value {
                Value::String(addr) => write!(f, "{}", addr),
                other => write!(f, "{}", other),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid substate id '{0}': expected a known prefix such as component_ or resource_")]
pub struct InvalidSubstateId(String);

impl FromStr for SubstateId {
    type Err = InvalidSubstateId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let substate_type = s
            .split_once('_')
            .and_then(|(prefix, _)| SubstateType::from_prefix(prefix))
            .ok_or_else(|| InvalidSubstateId(s.to_string()))?;
        Self::from_parts(substate_type, Value::String(s.to_string()))
    }
}

impl TryFrom<Value> for SubstateId {
    type Error = InvalidSubstateId;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => s.parse(),
            Value::Object(map) if map.len() == 1 => {
                let Some((tag, payload)) = map.into_iter().next() else {
                    return Err(InvalidSubstateId("{}".to_string()));
                };
                let substate_type =
                    SubstateType::from_tag(&tag).ok_or_else(|| InvalidSubstateId(format!("{{\"{}\": ..}}", tag)))?;
                Self::from_parts(substate_type, payload)
            },
            other => Err(InvalidSubstateId(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for SubstateId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        let value = Value::deserialize(deserializer)?;
        SubstateId::try_from(value).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SubstateType {
    Component,
    Resource,
    Vault,
    UnclaimedConfidentialOutput,
    NonFungible,
    TransactionReceipt,
    NonFungibleIndex,
    ValidatorFeePool,
    Template,
}

impl SubstateType {
    const ALL: [SubstateType; 9] = [
        SubstateType::Component,
        SubstateType::Resource,
        SubstateType::Vault,
        SubstateType::UnclaimedConfidentialOutput,
        SubstateType::NonFungible,
        SubstateType::TransactionReceipt,
        SubstateType::NonFungibleIndex,
        SubstateType::ValidatorFeePool,
        SubstateType::Template,
    ];

    pub fn as_prefix_str(&self) -> &'static str {
        match self {
            SubstateType::Component => "component",
            SubstateType::Resource => "resource",
            SubstateType::Vault => "vault",
            SubstateType::UnclaimedConfidentialOutput => "commitment",
            SubstateType::NonFungible => "nft",
            SubstateType::TransactionReceipt => "txreceipt",
            SubstateType::NonFungibleIndex => "nftindex",
            SubstateType::ValidatorFeePool => "vnfp",
            SubstateType::Template => "template",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_prefix_str() == prefix)
    }

    /// The variant name used as the tag in the externally tagged form
    fn from_tag(tag: &str) -> Option<Self> {
        serde_json::from_value(Value::String(tag.to_string())).ok()
    }
}

impl Display for SubstateType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_prefix_str())
    }
}
