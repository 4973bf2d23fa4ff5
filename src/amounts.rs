//! Swap amount calculation
//!
//! Converts the USD notional of a swap into 18-decimal wei amounts using the
//! oracle price, and derives slippage-protected minimum outputs.

use crate::oracle::PriceOracle;
use crate::{Error, Result};
use alloy::primitives::U256;

/// 10^18, the wei scaling factor
pub const WEI_PER_UNIT: f64 = 1e18;

const BPS_DENOMINATOR: u64 = 10_000;

/// Input and expected output of one swap-in, in wei
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// `usd_notional * 1e18`
    pub input_wei: U256,
    /// `usd_notional / price * 1e18`
    pub output_wei: U256,
}

/// Compute swap amounts for `usd_notional` at `price`
///
/// Both values are truncated toward zero. A zero, negative or non-finite
/// price is rejected rather than turned into a nonsensical amount.
pub fn compute_swap_amounts(usd_notional: f64, price: f64) -> Result<SwapQuote> {
    if !usd_notional.is_finite() || usd_notional < 0.0 {
        return Err(Error::Quote(format!(
            "USD notional must be a non-negative finite number, got {}",
            usd_notional
        )));
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::Quote(format!(
            "Oracle price must be positive and finite, got {}",
            price
        )));
    }

    Ok(SwapQuote {
        input_wei: to_wei(usd_notional * WEI_PER_UNIT)?,
        output_wei: to_wei((usd_notional / price) * WEI_PER_UNIT)?,
    })
}

/// Fetch the price for `symbol` and compute the swap amounts
pub async fn quote_swap<O>(oracle: &O, symbol: &str, usd_notional: f64) -> Result<SwapQuote>
where
    O: PriceOracle + ?Sized,
{
    let price = oracle.fetch_price(symbol).await?;
    let quote = compute_swap_amounts(usd_notional, price)?;
    tracing::debug!(
        symbol,
        price,
        input_wei = %quote.input_wei,
        output_wei = %quote.output_wei,
        "Computed swap amounts"
    );
    Ok(quote)
}

/// Minimum accepted output after applying `slippage_bps` of tolerance
///
/// `floor(amount * (10000 - slippage_bps) / 10000)`; 500 bps keeps 95%.
pub fn min_amount_out(amount: U256, slippage_bps: u32) -> U256 {
    let keep = BPS_DENOMINATOR.saturating_sub(u64::from(slippage_bps));
    amount * U256::from(keep) / U256::from(BPS_DENOMINATOR)
}

fn to_wei(value: f64) -> Result<U256> {
    let truncated = value.trunc();
    if truncated > u128::MAX as f64 {
        return Err(Error::Quote(format!("Amount {} overflows u128", value)));
    }
    Ok(U256::from(truncated as u128))
}
