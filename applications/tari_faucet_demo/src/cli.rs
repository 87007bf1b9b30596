// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use tari_wallet_provider_client::substate::{SubstateId, TemplateAddress};
use url::Url;

use crate::{config::Config, constants::DEFAULT_BASE_DIR};

#[derive(Clone, Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonCli,
    #[clap(flatten)]
    pub overrides: Overrides,
    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn get_config_path(&self) -> PathBuf {
        self.relative_to_base_path(&self.common.config_path)
    }

    pub fn get_base_path(&self) -> PathBuf {
        abs_or_with_base_dir(&self.common.base_dir)
    }

    fn relative_to_base_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.get_base_path().join(path)
    }
}

fn abs_or_with_base_dir<P: AsRef<Path>>(path: P) -> PathBuf {
    let p = path.as_ref();
    if p.is_absolute() {
        return p.to_path_buf();
    }
    env::current_dir()
        .map(|dir| dir.join(p))
        .unwrap_or_else(|_| p.to_path_buf())
}

#[derive(Debug, Clone, clap::Args)]
pub struct CommonCli {
    #[clap(short = 'b', long, parse(from_os_str), default_value = DEFAULT_BASE_DIR)]
    pub base_dir: PathBuf,
    #[clap(short = 'c', long, parse(from_os_str), default_value = "config.toml")]
    pub config_path: PathBuf,
}

#[derive(Clone, Debug, clap::Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init(InitArgs),
    /// Deploy both faucets in a single transaction and start tracking their tokens
    Deploy,
    /// Deploy a single faucet from a template
    CreateFaucet(CreateFaucetArgs),
    /// Claim free coins from both faucets into the account
    TakeCoins,
    /// Refresh and display the account balances of the tracked tokens
    Balances,
    /// Fetch a substate from the wallet
    Substate(SubstateArgs),
}

#[derive(Clone, Debug, clap::Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[clap(long, short = 'f')]
    pub force: bool,
}

#[derive(Clone, Debug, clap::Args)]
pub struct CreateFaucetArgs {
    /// The faucet template address. Defaults to the configured faucet template.
    #[clap(long, short = 't')]
    pub template: Option<TemplateAddress>,
    /// Initial supply to mint. Defaults to the configured initial supply.
    #[clap(long, short = 's')]
    pub supply: Option<u64>,
    #[clap(long)]
    pub symbol: String,
}

#[derive(Clone, Debug, clap::Args)]
pub struct SubstateArgs {
    /// e.g. component_xxx or resource_xxx
    pub substate_id: SubstateId,
}

#[derive(Clone, Debug, clap::Args)]
pub struct Overrides {
    /// Stop waiting for a transaction result after this long (e.g. "2m")
    #[clap(long, parse(try_from_str = humantime::parse_duration))]
    pub poll_timeout: Option<Duration>,

    /// Override the configured wallet daemon URL. Written to the config by `init`.
    #[clap(long)]
    pub wallet_daemon_url: Option<Url>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(timeout) = self.poll_timeout {
            log::info!("Overriding poll timeout to {}", humantime::format_duration(timeout));
            config.poll_timeout = Some(timeout);
        }
        if let Some(url) = self.wallet_daemon_url.clone() {
            log::info!("Overriding wallet daemon URL to {}", url);
            config.wallet_daemon_url = url;
        }
    }
}
