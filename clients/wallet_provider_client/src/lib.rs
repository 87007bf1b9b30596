//   Copyright 2024 The Tari Project
//   SPDX-License-Identifier: BSD-3-Clause

mod daemon;
mod error;
pub mod permissions;
mod provider;
pub mod substate;
pub mod types;

pub use daemon::{WalletDaemonProvider, DEFAULT_NETWORK};
pub use error::WalletProviderError;
pub use provider::WalletProvider;
