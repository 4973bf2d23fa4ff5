//! Configuration for the swap cycler
//!
//! Values are layered: built-in defaults, then an optional JSON file, then
//! environment overrides (see [`rpc`]), then CLI flags applied in `main`.
//! The resulting [`Config`] is immutable and passed by reference.

pub mod rpc;

use crate::{Error, Result};
use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use rpc::{PRICE_API_URL_ENV, RPC_URL_ENV};

/// Default zkFair RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://rpc.zkfair.io";

/// Binance public ticker endpoint
pub const DEFAULT_PRICE_API_URL: &str = "https://api.binance.com/api/v3/ticker/price";

/// Longest accepted pause, in seconds (one day)
pub const MAX_SLEEP_SECS: f64 = 86_400.0;

/// Longest accepted swap deadline offset, in seconds (one day)
pub const MAX_DEADLINE_SECS: u64 = 86_400;

/// Well-known contract addresses on zkFair
pub mod addresses {
    use super::*;

    pub const SWAP_ROUTER: Address = address!("72E25Dd6a6E75fC8f7820bA2eDEc3F89bB61f7A4");
    pub const WUSDC: Address = address!("D33Db7EC50A98164cC865dfaa64666906d79319C");
    pub const WETH: Address = address!("4b21b980d0Dc7D3C0C6175b0A412694F3A1c7c6b");
}

/// Inclusive range of seconds to sleep, sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl SleepRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// A range that never sleeps (useful for tests and dry runs)
    pub const fn none() -> Self {
        Self::new(0.0, 0.0)
    }

    fn validate(&self, name: &str) -> Result<()> {
        let valid = self.min_secs.is_finite()
            && self.max_secs.is_finite()
            && self.min_secs >= 0.0
            && self.min_secs <= self.max_secs
            && self.max_secs <= MAX_SLEEP_SECS;
        if !valid {
            return Err(Error::Config(format!(
                "{} must satisfy 0 <= min <= max <= {}, got [{}, {}]",
                name, MAX_SLEEP_SECS, self.min_secs, self.max_secs
            )));
        }
        Ok(())
    }
}

/// Router and token addresses for the swap pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractAddresses {
    /// Uniswap-V2 style router
    pub router: Address,
    /// Token spent on the way in (wrapped native side of the router path)
    pub token_in: Address,
    /// Token bought, approved and sold back
    pub token_out: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            router: addresses::SWAP_ROUTER,
            token_in: addresses::WUSDC,
            token_out: addresses::WETH,
        }
    }
}

/// Locations of the flat files read at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePaths {
    /// One private key per line
    pub wallets: PathBuf,
    /// One `ip:port:user:password` per line
    pub proxies: PathBuf,
    pub router_abi: PathBuf,
    pub token_abi: PathBuf,
}

impl Default for FilePaths {
    fn default() -> Self {
        Self {
            wallets: PathBuf::from("wallets.txt"),
            proxies: PathBuf::from("proxies.txt"),
            router_abi: PathBuf::from("abi/swap_abi.json"),
            token_abi: PathBuf::from("abi/erc20_abi.json"),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// USD notional spent on every swap-in
    pub swap_amount_usd: f64,
    /// Gas limit for both router swaps
    pub gas_limit: u64,
    /// Gas limit for the approve call
    pub approve_gas_limit: u64,
    /// How many times the whole wallet list is cycled
    pub loops: u32,
    pub sleep_between_actions: SleepRange,
    pub sleep_between_wallets: SleepRange,
    /// JSON-RPC endpoint, reached through each wallet's proxy
    pub rpc_url: String,
    /// Price ticker endpoint (never proxied)
    pub price_api_url: String,
    /// Ticker symbol used to price the swap (e.g. "ETHUSDT")
    pub price_symbol: String,
    /// Slippage tolerance on the swap-in leg, in basis points
    pub slippage_bps: u32,
    /// Seconds added to the current time for swap deadlines
    pub deadline_secs: u64,
    pub contracts: ContractAddresses,
    pub files: FilePaths,
    /// Optional JSONL journal of submitted transactions
    pub audit_log_path: Option<PathBuf>,
    /// Build and sign, but never submit
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            swap_amount_usd: 1.0,
            gas_limit: 200_000,
            approve_gas_limit: 50_000,
            loops: 1,
            sleep_between_actions: SleepRange::new(5.0, 10.0),
            sleep_between_wallets: SleepRange::new(10.0, 20.0),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            price_api_url: DEFAULT_PRICE_API_URL.to_string(),
            price_symbol: "ETHUSDT".to_string(),
            slippage_bps: 500,
            deadline_secs: 600,
            contracts: ContractAddresses::default(),
            files: FilePaths::default(),
            audit_log_path: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Load a JSON config file; missing fields fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Apply environment overrides on top of the current values
    pub fn with_env_overrides(mut self) -> Self {
        self.rpc_url = rpc::resolve_rpc_url(&self.rpc_url);
        self.price_api_url = rpc::resolve_price_api_url(&self.price_api_url);
        self
    }

    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.swap_amount_usd.is_finite() || self.swap_amount_usd <= 0.0 {
            return Err(Error::Config(format!(
                "swap_amount_usd must be positive, got {}",
                self.swap_amount_usd
            )));
        }
        if self.slippage_bps > 10_000 {
            return Err(Error::Config(format!(
                "slippage_bps must be at most 10000, got {}",
                self.slippage_bps
            )));
        }
        if self.gas_limit == 0 || self.approve_gas_limit == 0 {
            return Err(Error::Config("gas limits must be non-zero".to_string()));
        }
        if self.deadline_secs == 0 || self.deadline_secs > MAX_DEADLINE_SECS {
            return Err(Error::Config(format!(
                "deadline_secs must be in 1..={}, got {}",
                MAX_DEADLINE_SECS, self.deadline_secs
            )));
        }
        self.sleep_between_actions.validate("sleep_between_actions")?;
        self.sleep_between_wallets.validate("sleep_between_wallets")?;
        url::Url::parse(&self.rpc_url)
            .map_err(|e| Error::Config(format!("Invalid rpc_url: {}", e)))?;
        url::Url::parse(&self.price_api_url)
            .map_err(|e| Error::Config(format!("Invalid price_api_url: {}", e)))?;
        Ok(())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_zkfair_deployment() {
        let config = Config::default();
        assert_eq!(config.gas_limit, 200_000);
        assert_eq!(config.approve_gas_limit, 50_000);
        assert_eq!(config.slippage_bps, 500);
        assert_eq!(config.contracts.router, addresses::SWAP_ROUTER);
        assert_eq!(config.sleep_between_wallets, SleepRange::new(10.0, 20.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let value = serde_json::json!({
            "loops": 3,
            "sleep_between_actions": { "min_secs": 1.0, "max_secs": 2.0 }
        });
        let parsed: Config = serde_json::from_value(value).expect("parse config");
        assert_eq!(parsed.loops, 3);
        assert_eq!(parsed.sleep_between_actions, SleepRange::new(1.0, 2.0));
        assert_eq!(parsed.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(parsed.price_symbol, "ETHUSDT");
    }

    #[test]
    fn from_file_reports_path_on_bad_json() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{ not json").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn validate_rejects_inverted_sleep_range() {
        let config = Config {
            sleep_between_wallets: SleepRange::new(20.0, 10.0),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sleep_between_wallets"));
    }

    #[test]
    fn validate_rejects_huge_sleep_range() {
        let config = Config {
            sleep_between_actions: SleepRange::new(1.0, 1e20),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sleep_between_actions"));
    }

    #[test]
    fn validate_bounds_deadline() {
        for deadline_secs in [0, MAX_DEADLINE_SECS + 1, u64::MAX] {
            let config = Config {
                deadline_secs,
                ..Config::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("deadline_secs"), "{deadline_secs}");
        }
    }

    #[test]
    fn validate_rejects_non_positive_notional() {
        let config = Config {
            swap_amount_usd: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
