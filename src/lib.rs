//! Swap Cycler
//!
//! Drives a repeated swap cycle for a batch of EVM wallets against a single
//! Uniswap-V2 style router:
//! - price the swap from a public ticker
//! - swap the native currency in, approve the router, swap the token back out
//! - route every wallet's RPC traffic through its own HTTP proxy
//!
//! # Security Model
//!
//! - Private keys never leave the wallet module; `Debug` output is redacted
//! - Proxy passwords are held as `SecretString`
//! - One wallet's failure is logged and never aborts the batch

pub mod amounts;
pub mod audit;
pub mod chain;
pub mod config;
pub mod contracts;
pub mod executor;
pub mod logging;
pub mod oracle;
pub mod pacing;
pub mod proxy;
pub mod runner;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use chain::{AlloyChainClient, AlloyClientFactory, ChainClient, ClientFactory};
pub use config::{Config, SleepRange, PRICE_API_URL_ENV, RPC_URL_ENV};
pub use error::{Error, Result};
pub use executor::{CycleReport, SwapExecutor};
pub use oracle::{BinanceOracle, PriceOracle, StaticPriceOracle};
pub use runner::{BatchRunner, BatchSummary, CycleExecutor};
