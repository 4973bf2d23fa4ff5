//! Endpoint overrides from the environment
//!
//! Priority, highest first:
//! 1. `SWAP_RPC_URL` / `PRICE_API_URL` environment variables (a `.env` file is
//!    loaded by the binary before config resolution)
//! 2. The value from the config file
//! 3. The built-in default
//!
//! # Examples
//!
//! ```bash
//! export SWAP_RPC_URL="https://rpc.zkfair.io"
//! export PRICE_API_URL="https://api.binance.com/api/v3/ticker/price"
//! ```

/// RPC endpoint override
pub const RPC_URL_ENV: &str = "SWAP_RPC_URL";

/// Price ticker endpoint override
pub const PRICE_API_URL_ENV: &str = "PRICE_API_URL";

/// Resolve the RPC URL, preferring the environment over `configured`
pub fn resolve_rpc_url(configured: &str) -> String {
    resolve(RPC_URL_ENV, configured)
}

/// Resolve the price API URL, preferring the environment over `configured`
pub fn resolve_price_api_url(configured: &str) -> String {
    resolve(PRICE_API_URL_ENV, configured)
}

fn resolve(var: &str, configured: &str) -> String {
    match std::env::var(var) {
        Ok(url) if !url.trim().is_empty() => {
            tracing::debug!(var, "Using endpoint from environment");
            url.trim().to_string()
        }
        _ => configured.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_configured_value() {
        let value = resolve("SWAP_CYCLER_TEST_UNSET_VAR", "https://custom.rpc");
        assert_eq!(value, "https://custom.rpc");
    }

    #[test]
    fn environment_wins_over_configured_value() {
        std::env::set_var("SWAP_CYCLER_TEST_RPC", " https://env.rpc ");
        let value = resolve("SWAP_CYCLER_TEST_RPC", "https://custom.rpc");
        std::env::remove_var("SWAP_CYCLER_TEST_RPC");
        assert_eq!(value, "https://env.rpc");
    }

    #[test]
    fn blank_environment_value_is_ignored() {
        std::env::set_var("SWAP_CYCLER_TEST_BLANK", "  ");
        let value = resolve("SWAP_CYCLER_TEST_BLANK", "https://custom.rpc");
        std::env::remove_var("SWAP_CYCLER_TEST_BLANK");
        assert_eq!(value, "https://custom.rpc");
    }
}
