//! Error types for the swap cycler

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Price oracle error: {0}")]
    Oracle(String),

    #[error("Invalid swap quote: {0}")]
    Quote(String),

    #[error("Invalid proxy descriptor: {0}")]
    Proxy(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
