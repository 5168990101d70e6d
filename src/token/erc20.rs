use std::sync::Arc;

use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::providers::Middleware;
use ethers::types::Address;

use super::TokenSource;

abigen!(
    Erc20,
    r#"[
        function symbol() external view returns (string)
        function decimals() external view returns (uint8)
    ]"#
);

/// Read-only ERC-20 metadata calls over a shared ethers client. The client
/// handle is injected once and reused for every call.
pub struct Erc20Source<M> {
    client: Arc<M>,
}

impl<M: Middleware> Erc20Source<M> {
    pub fn new(client: Arc<M>) -> Self {
        Erc20Source { client }
    }
}

#[async_trait]
impl<M: Middleware + 'static> TokenSource for Erc20Source<M> {
    async fn symbol(&self, address: Address) -> anyhow::Result<String> {
        let contract = Erc20::new(address, Arc::clone(&self.client));
        Ok(contract.symbol().call().await?)
    }

    async fn decimals(&self, address: Address) -> anyhow::Result<u8> {
        let contract = Erc20::new(address, Arc::clone(&self.client));
        Ok(contract.decimals().call().await?)
    }
}
