//   Copyright 2024 The Tari Project
//   SPDX-License-Identifier: BSD-3-Clause

#[derive(Debug, thiserror::Error)]
pub enum WalletProviderError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to deserialize response for method {method}: {source}")]
    Deserialize {
        method: String,
        source: serde_json::Error,
    },
    #[error("Wallet returned error code {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Invalid response from wallet: {details}")]
    InvalidResponse { details: String },
}

impl WalletProviderError {
    pub fn invalid_response<T: Into<String>>(details: T) -> Self {
        Self::InvalidResponse {
            details: details.into(),
        }
    }
}
