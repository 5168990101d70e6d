use async_trait::async_trait;
use ethers::types::Address;
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};

pub mod erc20;
pub mod resolver;

/// Resolved metadata for a token contract. Built whole from a fetch (or a
/// decoded cache entry) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, thiserror::Error)]
#[error("malformed token record: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

impl Token {
    /// Canonical cache key for an address: its EIP-55 checksummed form.
    pub fn cache_key(address: Address) -> String {
        to_checksum(&address, None)
    }

    pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Token, DecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Read-only remote source for token metadata. Implementations go over the
/// wire; either call may fail with a transport- or contract-level error.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn symbol(&self, address: Address) -> anyhow::Result<String>;

    async fn decimals(&self, address: Address) -> anyhow::Result<u8>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let token = Token {
            address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
                .parse()
                .unwrap(),
            symbol: "USDC".to_string(),
            decimals: 6,
        };

        let encoded = token.encode().unwrap();
        let decoded = Token::decode(&encoded).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn test_empty_symbol_round_trips() {
        let token = Token {
            address: Address::zero(),
            symbol: String::new(),
            decimals: 0,
        };

        let decoded = Token::decode(&token.encode().unwrap()).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Token::decode(b"not a token").is_err());
        assert!(Token::decode(b"").is_err());
        assert!(Token::decode(br#"{"symbol":"USDC"}"#).is_err());
    }

    #[test]
    fn test_cache_key_is_checksummed() {
        // EIP-55 test vector
        let address: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
            .parse()
            .unwrap();
        assert_eq!(
            Token::cache_key(address),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }
}
