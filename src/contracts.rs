//! Contract bindings and ABI file validation
//!
//! Calldata is encoded through the compiled `sol!` bindings. The JSON ABIs
//! shipped next to the binary are still loaded at startup so a deployment
//! pointing at a router with a different interface fails before any wallet
//! is touched.

use crate::{Error, Result};
use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, Bytes, FixedBytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use std::path::Path;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface ISwapRouter {
        function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
        function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
    }

    #[derive(Debug, PartialEq, Eq)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// Encode `swapExactETHForTokens`
pub fn swap_exact_eth_for_tokens(
    amount_out_min: U256,
    path: Vec<Address>,
    to: Address,
    deadline: U256,
) -> Bytes {
    ISwapRouter::swapExactETHForTokensCall {
        amountOutMin: amount_out_min,
        path,
        to,
        deadline,
    }
    .abi_encode()
    .into()
}

/// Encode `swapExactTokensForETH`
pub fn swap_exact_tokens_for_eth(
    amount_in: U256,
    amount_out_min: U256,
    path: Vec<Address>,
    to: Address,
    deadline: U256,
) -> Bytes {
    ISwapRouter::swapExactTokensForETHCall {
        amountIn: amount_in,
        amountOutMin: amount_out_min,
        path,
        to,
        deadline,
    }
    .abi_encode()
    .into()
}

/// Encode ERC-20 `approve`
pub fn approve(spender: Address, amount: U256) -> Bytes {
    IERC20::approveCall { spender, amount }.abi_encode().into()
}

/// Encode ERC-20 `balanceOf`
pub fn balance_of(owner: Address) -> Bytes {
    IERC20::balanceOfCall { owner }.abi_encode().into()
}

/// Decode the `uint256` returned by `balanceOf`
pub fn decode_balance(data: &[u8]) -> Result<U256> {
    IERC20::balanceOfCall::abi_decode_returns(data)
        .map_err(|e| Error::Rpc(format!("Malformed balanceOf return data: {}", e)))
}

/// Parsed router and token ABIs, checked against the compiled bindings
#[derive(Debug, Clone)]
pub struct ContractAbis {
    pub router: JsonAbi,
    pub token: JsonAbi,
}

impl ContractAbis {
    /// Load both ABI files; fails if either is missing, malformed or lacks
    /// an entry point the swap cycle calls
    pub fn load(router_path: &Path, token_path: &Path) -> Result<Self> {
        let router = read_abi(router_path)?;
        let token = read_abi(token_path)?;
        let abis = Self { router, token };
        abis.validate()?;

        tracing::debug!(
            router_abi = %router_path.display(),
            token_abi = %token_path.display(),
            "Loaded contract ABIs"
        );
        Ok(abis)
    }

    fn validate(&self) -> Result<()> {
        require_function(
            &self.router,
            "router",
            "swapExactETHForTokens",
            ISwapRouter::swapExactETHForTokensCall::SELECTOR,
        )?;
        require_function(
            &self.router,
            "router",
            "swapExactTokensForETH",
            ISwapRouter::swapExactTokensForETHCall::SELECTOR,
        )?;
        require_function(
            &self.token,
            "token",
            "balanceOf",
            IERC20::balanceOfCall::SELECTOR,
        )?;
        require_function(&self.token, "token", "approve", IERC20::approveCall::SELECTOR)?;
        Ok(())
    }
}

fn read_abi(path: &Path) -> Result<JsonAbi> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Abi(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content).map_err(|e| Error::Abi(format!("{}: {}", path.display(), e)))
}

fn require_function(abi: &JsonAbi, contract: &str, name: &str, selector: [u8; 4]) -> Result<()> {
    let expected = FixedBytes::<4>::from(selector);
    let found = abi
        .function(name)
        .map(|overloads| overloads.iter().any(|f| f.selector() == expected))
        .unwrap_or(false);

    if !found {
        return Err(Error::Abi(format!(
            "{} ABI has no {}() matching selector {}",
            contract, name, expected
        )));
    }
    Ok(())
}
