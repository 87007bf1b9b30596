// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{path::PathBuf, time::Duration};

use tari_wallet_provider_client::{substate::TemplateAddress, types::Amount, DEFAULT_NETWORK};
use tokio::io::{self, AsyncWriteExt};
use url::Url;

use crate::{
    cli::Cli,
    constants::{
        DEFAULT_LOG_LEVEL,
        DEFAULT_POLL_INTERVAL,
        DEFAULT_WALLET_DAEMON_URL,
        FAUCET_TEMPLATE_ADDRESS,
        FEE_AMOUNT,
        INIT_SUPPLY,
        TOKENS_FILE_NAME,
    },
};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// The wallet daemon JSON-RPC URL
    pub wallet_daemon_url: Url,

    /// Network byte transactions are built for
    #[serde(default = "default_network")]
    pub network: u8,

    /// The base directory with configuration and data files
    pub base_dir: PathBuf,

    /// The fee paid from the account for every transaction
    pub fee_amount: u64,

    /// The supply minted by each faucet on deployment
    pub initial_supply: u64,

    /// The template used to deploy faucets
    pub faucet_template_address: TemplateAddress,

    /// How long to wait between transaction status queries
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Give up waiting for a transaction after this long. Waits indefinitely if not set.
    #[serde(with = "humantime_serde", default, skip_serializing_if = "Option::is_none")]
    pub poll_timeout: Option<Duration>,

    /// One of off, error, warn, info, debug or trace
    pub log_level: String,
}

impl Config {
    pub(crate) async fn write<W: io::AsyncWrite + Unpin>(&self, mut writer: W) -> anyhow::Result<()> {
        let toml = toml::to_string_pretty(self)?;
        writer.write_all(toml.as_bytes()).await?;
        Ok(())
    }

    pub fn get_tokens_file(&self) -> PathBuf {
        self.base_dir.join(TOKENS_FILE_NAME)
    }

    pub fn fee(&self) -> Amount {
        Amount::new(self.fee_amount)
    }

    pub fn initial_supply(&self) -> Amount {
        Amount::new(self.initial_supply)
    }
}

fn default_network() -> u8 {
    DEFAULT_NETWORK
}

pub fn get_base_config(cli: &Cli) -> anyhow::Result<Config> {
    Ok(Config {
        wallet_daemon_url: DEFAULT_WALLET_DAEMON_URL.parse()?,
        network: DEFAULT_NETWORK,
        base_dir: cli.get_base_path(),
        fee_amount: FEE_AMOUNT,
        initial_supply: INIT_SUPPLY,
        faucet_template_address: TemplateAddress::new(FAUCET_TEMPLATE_ADDRESS),
        poll_interval: DEFAULT_POLL_INTERVAL,
        poll_timeout: None,
        log_level: DEFAULT_LOG_LEVEL.to_string(),
    })
}
