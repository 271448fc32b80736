//! Per-trial and configuration error types.

use std::path::PathBuf;

use core_crypto::CryptoError;
use thiserror::Error;

use crate::trial::Status;

/// Everything that can stop a single trial. None of these ever abort a
/// sweep; the controller turns each one into a non-OK [`Status`].
#[derive(Debug, Error)]
pub enum TrialError {
    #[error("payload of {len} bytes exceeds the {max}-byte bound")]
    SizeLimit { len: usize, max: usize },

    #[error("resource not found: {}", path.display())]
    ResourceMissing { path: PathBuf },

    #[error("key generation failed: {0}")]
    KeyGeneration(#[source] CryptoError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrialError {
    pub fn status(&self) -> Status {
        match self {
            TrialError::SizeLimit { .. } => Status::SizeLimitExceeded,
            TrialError::ResourceMissing { .. } => Status::ResourceNotFound,
            TrialError::KeyGeneration(_) | TrialError::Crypto(_) | TrialError::Io { .. } => {
                Status::RuntimeError
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
