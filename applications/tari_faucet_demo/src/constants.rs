// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::time::Duration;

pub const APP_NAME: &str = "tari_faucet_demo";
pub const DEFAULT_BASE_DIR: &str = "data/faucet_demo/";
pub const DEFAULT_WALLET_DAEMON_URL: &str = "http://127.0.0.1:9000/json_rpc";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const TOKENS_FILE_NAME: &str = "tokens.json";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const FEE_AMOUNT: u64 = 2000;
pub const INIT_SUPPLY: u64 = 100_000;
pub const FAUCET_TEMPLATE_ADDRESS: &str = "e9afe3eda226a3c5e43ac9bd82adeea08677e562d3d286a3983277df1b9256ee";

pub const FIRST_TOKEN_RESOURCE_ADDRESS: &str = "resource_e71c7c68bd239f3c4938d98b408e680259369ef415165801db0ef56b";
pub const FIRST_TOKEN_COMPONENT_ADDRESS: &str = "component_e71c7c68bd239f3c4938d98b408e680259369ef4abe881c6f48043fe";
pub const FIRST_TOKEN_SYMBOL: &str = "A";

pub const SECOND_TOKEN_RESOURCE_ADDRESS: &str = "resource_a9af4f7fd8233de7e03e771b70bbbcd66f2e9a0a485135ef64d5a68a";
pub const SECOND_TOKEN_COMPONENT_ADDRESS: &str = "component_a9af4f7fd8233de7e03e771b70bbbcd66f2e9a0aabe881c6f48043fe";
pub const SECOND_TOKEN_SYMBOL: &str = "B";

/// Workspace slot the claimed bucket is stored in before it is deposited
pub const FREE_COINS_WORKSPACE_KEY: [u8; 1] = [0];
