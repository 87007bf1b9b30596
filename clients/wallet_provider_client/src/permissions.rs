//   Copyright 2024 The Tari Project
//   SPDX-License-Identifier: BSD-3-Clause

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::substate::SubstateId;

/// A capability granted by the wallet to a connected application. `TransactionSend` may be restricted to transactions
/// involving one substate, None allows any transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletPermission {
    KeyList,
    AccountInfo,
    TransactionSend(Option<SubstateId>),
    TransactionGet,
    SubstatesRead,
}

impl Display for WalletPermission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransactionSend(Some(id)) => write!(f, "TransactionSend({})", id),
            Self::TransactionSend(None) => write!(f, "TransactionSend"),
            other => write!(f, "{:?}", other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletPermissions(Vec<WalletPermission>);

impl WalletPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a permission. Adding the same permission twice has no effect.
    pub fn add_permission(mut self, permission: WalletPermission) -> Self {
        if !self.0.contains(&permission) {
            self.0.push(permission);
        }
        self
    }

    pub fn contains(&self, permission: &WalletPermission) -> bool {
        self.0.contains(permission)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WalletPermission> + '_ {
        self.0.iter()
    }
}

/// The permissions requested when connecting to the wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPermissions {
    pub permissions: WalletPermissions,
    pub optional_permissions: WalletPermissions,
}

impl Default for ProviderPermissions {
    fn default() -> Self {
        Self {
            permissions: WalletPermissions::new()
                .add_permission(WalletPermission::KeyList)
                .add_permission(WalletPermission::AccountInfo)
                .add_permission(WalletPermission::TransactionSend(None))
                .add_permission(WalletPermission::SubstatesRead),
            optional_permissions: WalletPermissions::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn default_permission_set() {
        let perms = ProviderPermissions::default();
        assert!(perms.permissions.contains(&WalletPermission::KeyList));
        assert!(perms.permissions.contains(&WalletPermission::AccountInfo));
        assert!(perms.permissions.contains(&WalletPermission::TransactionSend(None)));
        assert!(perms.permissions.contains(&WalletPermission::SubstatesRead));
        assert_eq!(perms.permissions.iter().count(), 4);
        assert!(perms.optional_permissions.is_empty());
    }

    #[test]
    fn it_serializes_like_the_wallet_daemon() {
        let perms = ProviderPermissions::default();
        assert_eq!(
            serde_json::to_value(&perms.permissions).unwrap(),
            json!(["KeyList", "AccountInfo", { "TransactionSend": null }, "SubstatesRead"])
        );
        let restricted = WalletPermission::TransactionSend(Some("component_01".parse().unwrap()));
        assert_eq!(restricted.to_string(), "TransactionSend(component_01)");
    }

    #[test]
    fn it_deduplicates() {
        let perms = WalletPermissions::new()
            .add_permission(WalletPermission::KeyList)
            .add_permission(WalletPermission::KeyList);
        assert_eq!(perms.iter().count(), 1);
        assert_eq!(serde_json::to_string(&perms).unwrap(), r#"["KeyList"]"#);
    }
}
