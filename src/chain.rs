//! Chain client capability
//!
//! The swap executor only needs a handful of RPC operations. They sit behind
//! [`ChainClient`] so the cycle logic can run against an in-memory stub in
//! tests; [`AlloyChainClient`] is the production implementation, one per
//! wallet, with its HTTP transport bound to that wallet's proxy.

use crate::contracts;
use crate::proxy::ProxyDescriptor;
use crate::{Error, Result};
use alloy::consensus::TxLegacy;
use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::TransactionRequest;
use alloy::transports::http::{reqwest, Http};
use async_trait::async_trait;

/// Narrow RPC surface used by the swap cycle
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current transaction count of `address`
    async fn get_nonce(&self, address: Address) -> Result<u64>;

    /// Current network gas price in wei
    async fn get_gas_price(&self) -> Result<u128>;

    /// Chain id used for EIP-155 signing
    async fn chain_id(&self) -> Result<u64>;

    /// ERC-20 `balanceOf(owner)` on `token`
    async fn read_balance(&self, token: Address, owner: Address) -> Result<U256>;

    /// Broadcast a signed raw transaction; returns its hash without waiting
    /// for inclusion
    async fn submit_signed(&self, raw: &Bytes) -> Result<B256>;

    /// Build an unsigned legacy transaction from `from`'s current nonce and
    /// the network gas price
    async fn build_call(
        &self,
        from: Address,
        to: Address,
        input: Bytes,
        value: U256,
        gas_limit: u64,
    ) -> Result<TxLegacy> {
        let chain_id = self.chain_id().await?;
        let gas_price = self.get_gas_price().await?;
        let nonce = self.get_nonce(from).await?;

        Ok(TxLegacy {
            chain_id: Some(chain_id),
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(to),
            value,
            input,
        })
    }
}

/// Creates a chain client for one (RPC endpoint, proxy) pair
pub trait ClientFactory: Send + Sync {
    type Client: ChainClient;

    fn connect(&self, rpc_url: &str, proxy: &ProxyDescriptor) -> Result<Self::Client>;
}

/// alloy-backed chain client
pub struct AlloyChainClient {
    provider: RootProvider<Ethereum>,
}

impl AlloyChainClient {
    /// Connect to `rpc_url` through `proxy`
    pub fn connect(rpc_url: &str, proxy: &ProxyDescriptor) -> Result<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .proxy(proxy.to_reqwest()?)
            .build()
            .map_err(|e| Error::Proxy(format!("{}: {}", proxy.endpoint(), e)))?;

        let transport = Http::with_client(http_client, url);
        let provider = RootProvider::new(RpcClient::new(transport, false));

        Ok(Self { provider })
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn get_nonce(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| Error::Rpc(format!("Failed to fetch nonce: {}", e)))
    }

    async fn get_gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to fetch gas price: {}", e)))
    }

    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to fetch chain id: {}", e)))
    }

    async fn read_balance(&self, token: Address, owner: Address) -> Result<U256> {
        let tx = TransactionRequest::default()
            .to(token)
            .input(contracts::balance_of(owner).into());

        let result = self
            .provider
            .call(tx)
            .await
            .map_err(|e| Error::Rpc(format!("Failed to read token balance: {}", e)))?;

        contracts::decode_balance(&result)
    }

    async fn submit_signed(&self, raw: &Bytes) -> Result<B256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| Error::Rpc(format!("Failed to submit transaction: {}", e)))?;

        Ok(*pending.tx_hash())
    }
}

/// Factory producing one [`AlloyChainClient`] per wallet
#[derive(Debug, Default, Clone, Copy)]
pub struct AlloyClientFactory;

impl ClientFactory for AlloyClientFactory {
    type Client = AlloyChainClient;

    fn connect(&self, rpc_url: &str, proxy: &ProxyDescriptor) -> Result<Self::Client> {
        AlloyChainClient::connect(rpc_url, proxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_rejects_invalid_rpc_url() {
        let proxy: ProxyDescriptor = "127.0.0.1:8080:alice:secret".parse().unwrap();
        let err = AlloyChainClient::connect("not a url", &proxy)
            .err()
            .expect("invalid url should fail");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn factory_builds_client_for_valid_pair() {
        let proxy: ProxyDescriptor = "127.0.0.1:8080:alice:secret".parse().unwrap();
        assert!(AlloyClientFactory
            .connect("https://rpc.zkfair.io", &proxy)
            .is_ok());
    }
}
