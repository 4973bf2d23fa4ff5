//! Secure wallet implementation
//!
//! SECURITY: This is the ONLY place where private keys exist.
//! - Keys are held in alloy's PrivateKeySigner which handles crypto securely
//! - Keys are never serialized
//! - Keys are never logged

use crate::{Error, Result};
use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, B256};
use alloy::signers::local::PrivateKeySigner;
use std::path::Path;

/// A signed transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// EIP-2718 encoded envelope
    pub raw: Bytes,
    /// Transaction hash
    pub hash: B256,
}

/// Secure wallet that protects private keys
///
/// The private key is:
/// - Stored in alloy's PrivateKeySigner (handles crypto securely)
/// - Never serialized (no Serialize impl)
/// - Only accessible via signing operations
pub struct SecureWallet {
    /// The signer
    signer: PrivateKeySigner,
    /// Public address (safe to expose)
    address: Address,
}

impl SecureWallet {
    /// Create a wallet from a hex-encoded private key
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key_hex = key_hex.trim();
        // Remove 0x prefix if present
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Wallet(format!("Invalid private key: {}", e)))?;

        let address = signer.address();

        Ok(Self { signer, address })
    }

    /// Get the public address (safe to share)
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a legacy (EIP-155) transaction
    ///
    /// The chain id must already be set on `tx` for replay protection.
    pub fn sign_transaction(&self, mut tx: TxLegacy) -> Result<SignedTransaction> {
        if tx.chain_id.is_none() {
            return Err(Error::Wallet(
                "Refusing to sign transaction without chain id".to_string(),
            ));
        }

        let signature = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| Error::Wallet(format!("Signing failed: {}", e)))?;
        let envelope: TxEnvelope = tx.into_signed(signature).into();

        Ok(SignedTransaction {
            raw: Bytes::from(envelope.encoded_2718()),
            hash: *envelope.tx_hash(),
        })
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for SecureWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureWallet")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}

/// Parse one wallet per non-blank line
pub fn parse_wallets(content: &str) -> Result<Vec<SecureWallet>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            SecureWallet::from_hex(line).map_err(|e| match e {
                // Never echo the offending line; it is a secret
                Error::Wallet(reason) => Error::Wallet(format!("line {}: {}", idx + 1, reason)),
                other => other,
            })
        })
        .collect()
}

/// Load the wallet secret file
pub fn load_wallets(path: &Path) -> Result<Vec<SecureWallet>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    let wallets = parse_wallets(&content)?;
    tracing::info!(count = wallets.len(), path = %path.display(), "Loaded wallets");
    Ok(wallets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::consensus::Transaction;
    use alloy::eips::eip2718::Decodable2718;
    use alloy::primitives::{TxKind, U256};

    // Anvil's first dev account (DO NOT use in production!)
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn legacy_tx(chain_id: Option<u64>) -> TxLegacy {
        TxLegacy {
            chain_id,
            nonce: 7,
            gas_price: 1_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(Address::ZERO),
            value: U256::from(1u64),
            input: Bytes::new(),
        }
    }

    #[test]
    fn test_wallet_from_hex() {
        let wallet = SecureWallet::from_hex(TEST_KEY).unwrap();
        assert_eq!(format!("{:?}", wallet.address()).to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_debug_redacts_key() {
        let wallet = SecureWallet::from_hex(TEST_KEY).unwrap();
        let debug_str = format!("{:?}", wallet);

        assert!(!debug_str.contains("ac0974bec"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn signed_transaction_round_trips_through_envelope() {
        let wallet = SecureWallet::from_hex(TEST_KEY).unwrap();
        let signed = wallet.sign_transaction(legacy_tx(Some(42766))).unwrap();

        let envelope = TxEnvelope::decode_2718(&mut signed.raw.as_ref()).unwrap();
        assert_eq!(*envelope.tx_hash(), signed.hash);
        assert_eq!(envelope.nonce(), 7);
        assert_eq!(envelope.chain_id(), Some(42766));
    }

    #[test]
    fn refuses_to_sign_without_chain_id() {
        let wallet = SecureWallet::from_hex(TEST_KEY).unwrap();
        let err = wallet.sign_transaction(legacy_tx(None)).unwrap_err();
        assert!(matches!(err, Error::Wallet(_)));
    }

    #[test]
    fn parse_wallets_skips_blank_lines() {
        let content = format!("{}\n\n  {}  \n", TEST_KEY, TEST_KEY.trim_start_matches("0x"));
        let wallets = parse_wallets(&content).unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[0].address(), wallets[1].address());
    }

    #[test]
    fn parse_wallets_reports_line_without_leaking_key() {
        let err = parse_wallets(&format!("{}\nnot-a-key\n", TEST_KEY)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 2"));
        assert!(!message.contains("not-a-key"));
    }

    #[test]
    fn load_wallets_missing_file_is_config_error() {
        let err = load_wallets(Path::new("/nonexistent/wallets.txt")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
