// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use tari_wallet_provider_client::{permissions::ProviderPermissions, types::Amount, WalletDaemonProvider};
use tokio::fs;
use tokio_util::sync::CancellationToken;

use crate::{
    app::FaucetApp,
    cli::{Cli, Commands},
    config::{get_base_config, Config},
    constants::{APP_NAME, DEFAULT_LOG_LEVEL},
    helpers::{read_config_file, read_tokens_file, run_until_cancelled},
    logger::init_logger,
    wallet::TransactionWaiter,
};

mod app;
mod cli;
mod config;
mod constants;
mod error;
mod faucet;
mod helpers;
mod logger;
mod token;
mod view;
mod wallet;

#[cfg(test)]
mod test_helpers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::init();
    let config_path = cli.get_config_path();

    if config_path.is_dir() {
        bail!(
            "Config path '{}' points to a directory, expected a file",
            config_path.display()
        );
    }

    if let Commands::Init(ref args) = cli.command {
        init_logger(DEFAULT_LOG_LEVEL)?;
        if !args.force && config_path.exists() {
            bail!(
                "Config file already exists at {} (use --force to overwrite)",
                config_path.display()
            );
        }
        let parent = config_path.parent().context("parent path")?;
        fs::create_dir_all(parent).await?;

        let mut config = get_base_config(&cli)?;
        cli.overrides.apply(&mut config);

        let file = fs::File::create(&config_path)
            .await
            .with_context(|| anyhow!("Failed to open config path {}", config_path.display()))?;
        config.write(file).await.context("Writing config failed")?;

        log::info!("Config file created at {}", config_path.display());
        return Ok(());
    }

    let (mut config, read_err) = match read_config_file(config_path.clone()).await {
        Ok(config) => (config, None),
        Err(err) => (get_base_config(&cli)?, Some(err)),
    };
    init_logger(&config.log_level)?;
    if let Some(err) = read_err {
        log::warn!("{}. Using the default config (run `init` to create one)", err);
    }
    cli.overrides.apply(&mut config);

    run(cli.command, config).await
}

async fn run(command: Commands, config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, cancelling");
            signal.cancel();
        }
    });

    run_until_cancelled(&cancel, execute(command, config, cancel.clone())).await
}

async fn execute(command: Commands, config: Config, cancel: CancellationToken) -> anyhow::Result<()> {
    let provider = WalletDaemonProvider::connect(
        config.wallet_daemon_url.clone(),
        config.network,
        &ProviderPermissions::default(),
        APP_NAME,
    )
    .await
    .with_context(|| format!("Failed to connect to wallet daemon at {}", config.wallet_daemon_url))?;

    let tokens_file = config.get_tokens_file();
    let tokens = match read_tokens_file(&tokens_file).await? {
        Some(tokens) => tokens,
        None => {
            log::info!(
                "No tokens file at {}, tracking the default faucets",
                tokens_file.display()
            );
            Default::default()
        },
    };

    let waiter = TransactionWaiter::new(config.poll_interval)
        .with_timeout(config.poll_timeout)
        .with_cancellation(cancel);
    log::debug!(
        "Polling transaction results every {}",
        humantime::format_duration(waiter.interval())
    );
    let app = FaucetApp::new(Arc::new(provider), &config, waiter, tokens);

    match command {
        Commands::Init(_) => bail!("init is handled before connecting to the wallet"),
        Commands::Deploy => {
            let tokens = app.deploy().await?;
            for token in tokens.iter() {
                println!(
                    "Deployed {}: resource {} faucet {}",
                    token.symbol,
                    token.resource_address(),
                    token.component_address()
                );
            }
        },
        Commands::CreateFaucet(args) => {
            let resp = app
                .create_faucet(args.template, args.supply.map(Amount::new), &args.symbol)
                .await?;
            println!("Transaction {} finalized: {}", resp.transaction_id, resp.status);
        },
        Commands::TakeCoins => {
            let outcomes = app.take_coins().await?;
            for outcome in &outcomes {
                match &outcome.result {
                    Some(resp) => println!("{}: transaction {} {}", outcome.symbol, resp.transaction_id, resp.status),
                    None => println!("{}: claim failed (see log)", outcome.symbol),
                }
            }
            print!("{}", app.balance_panel().await);
            if outcomes.iter().all(|outcome| !outcome.is_success()) {
                bail!("All claims failed");
            }
        },
        Commands::Balances => {
            app.refresh().await?;
            print!("{}", app.balance_panel().await);
        },
        Commands::Substate(args) => {
            let resp = app.get_substate(&args.substate_id).await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        },
    }

    Ok(())
}
