use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ethers::types::Address;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Token, TokenSource};
use crate::cache::{Cache, DiskCache, MemoryCache};

const DEFAULT_CACHE_SIZE: usize = 2048;

/// Which remote read failed during a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    Symbol,
    Decimals,
}

impl std::fmt::Display for TokenField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenField::Symbol => write!(f, "symbol"),
            TokenField::Decimals => write!(f, "decimals"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("not connected to a chain")]
    NotConnected,
    #[error("fetching token {field}: {source}")]
    FetchFailed {
        field: TokenField,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Construction-time wiring for the resolver's cache backend.
pub struct ResolverOpts {
    pub persistent: bool,
    /// Capacity hint for the in-memory backend; 0 picks the default.
    pub cache_size: usize,
    pub data_dir: PathBuf,
}

impl Default for ResolverOpts {
    fn default() -> Self {
        ResolverOpts {
            persistent: false,
            cache_size: DEFAULT_CACHE_SIZE,
            data_dir: PathBuf::from("."),
        }
    }
}

/// Resolves token metadata from the cache first, falling back to the remote
/// source and writing the result through. Holds no state of its own, so one
/// instance can serve any number of concurrent callers. Concurrent misses for
/// the same address are not deduplicated; both fetch and both write.
pub struct TokenResolver {
    source: Option<Arc<dyn TokenSource>>,
    cache: Arc<dyn Cache>,
    call_timeout: Option<Duration>,
}

impl TokenResolver {
    /// Wires a cache backend from `opts`: in-memory by default, a `kv` store
    /// under `data_dir/token_cache` when persistent.
    pub fn new(source: Option<Arc<dyn TokenSource>>, opts: ResolverOpts) -> anyhow::Result<Self> {
        let size = if opts.cache_size == 0 {
            DEFAULT_CACHE_SIZE
        } else {
            opts.cache_size
        };

        let cache: Arc<dyn Cache> = if opts.persistent {
            Arc::new(DiskCache::open(&opts.data_dir.join("token_cache"))?)
        } else {
            Arc::new(MemoryCache::new(size))
        };

        Ok(TokenResolver {
            source,
            cache,
            call_timeout: None,
        })
    }

    /// Wires an explicit cache backend. The resolver only ever talks to the
    /// `Cache` capability, so any implementation slots in here.
    pub fn with_cache(source: Option<Arc<dyn TokenSource>>, cache: Arc<dyn Cache>) -> Self {
        TokenResolver {
            source,
            cache,
            call_timeout: None,
        }
    }

    /// Bounds each remote call; an exhausted budget surfaces as `FetchFailed`.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Looks up `address` in the cache, fetching from the remote source and
    /// writing through on a miss. Cache faults never fail the call: an entry
    /// that won't decode is treated as absent, and a rejected write still
    /// returns the freshly fetched token.
    pub async fn resolve(&self, address: Address) -> Result<Token, ResolveError> {
        let key = Token::cache_key(address);

        if let Some(bytes) = self.cache.get(&key).await {
            match Token::decode(&bytes) {
                Ok(token) => {
                    debug!(%key, "token cache hit");
                    return Ok(token);
                }
                Err(err) => debug!(%key, %err, "discarding undecodable cache entry"),
            }
        }

        let source = self.source.as_ref().ok_or(ResolveError::NotConnected)?;

        let symbol = self
            .fetch(TokenField::Symbol, source.symbol(address))
            .await?;
        let decimals = self
            .fetch(TokenField::Decimals, source.decimals(address))
            .await?;

        let token = Token {
            address,
            symbol,
            decimals,
        };

        match token.encode() {
            Ok(encoded) => {
                if let Err(err) = self.cache.put(&key, encoded).await {
                    warn!(%key, %err, "token cache write failed");
                }
            }
            Err(err) => warn!(%key, %err, "token encode failed"),
        }

        Ok(token)
    }

    async fn fetch<T>(
        &self,
        field: TokenField,
        call: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, ResolveError> {
        let result = match self.call_timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .unwrap_or_else(|_| Err(anyhow::anyhow!("remote call timed out"))),
            None => call.await,
        };

        result.map_err(|err| ResolveError::FetchFailed {
            field,
            source: err.into(),
        })
    }
}
