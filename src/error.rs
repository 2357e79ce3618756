//! Crate-wide error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Startup precondition violated (e.g. odd Nsca or odd lf).
    #[error("domain error: {0}")]
    Domain(String),

    /// The connectivity oracle gave different answers from different start
    /// filaments. This is an internal bug, not a rejectable move.
    #[error("invariant violation: {0}")]
    Inconsistency(String),

    /// Malformed bias restart file.
    #[error("bad bias file {path}: {detail}")]
    BiasFile { path: String, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
