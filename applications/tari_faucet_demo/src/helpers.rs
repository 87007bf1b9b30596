// Copyright 2024 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::{
    future::Future,
    io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context};
use tokio::fs;
use tokio_util::sync::CancellationToken;

use crate::{config::Config, token::TokenPair};

pub async fn read_config_file(path: PathBuf) -> anyhow::Result<Config> {
    let content = fs::read_to_string(&path)
        .await
        .map_err(|_| anyhow!("Failed to read config file at {}", path.display()))?;

    let config = toml::from_str(&content)?;

    Ok(config)
}

/// Reads the tracked tokens. Returns None if no faucets have been deployed from this base dir yet.
pub async fn read_tokens_file<P: AsRef<Path>>(tokens_file: P) -> anyhow::Result<Option<TokenPair>> {
    log::debug!("Using tokens file at: {}", tokens_file.as_ref().display());
    match fs::read_to_string(tokens_file.as_ref()).await {
        Ok(content) => {
            let tokens = serde_json::from_str(&content)
                .with_context(|| format!("Invalid tokens file {}", tokens_file.as_ref().display()))?;
            Ok(Some(tokens))
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => {
            log::error!("Failed to read tokens file: {}", e);
            Err(e.into())
        },
    }
}

pub async fn write_tokens_file<P: AsRef<Path>>(tokens_file: P, tokens: &TokenPair) -> anyhow::Result<()> {
    let path = tokens_file.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(tokens)?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write tokens file {}", path.display()))?;
    Ok(())
}

/// Drives `fut` to completion unless `cancel` fires first, in which case `fut` is dropped
pub async fn run_until_cancelled<T, F>(cancel: &CancellationToken, fut: F) -> anyhow::Result<T>
where F: Future<Output = anyhow::Result<T>> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => bail!("Interrupted"),
        res = fut => res,
    }
}
