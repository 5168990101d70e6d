use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ethers::providers::{Http, Provider};
use ethers::types::Address;

use token_resolver::{Erc20Source, ResolverOpts, TokenResolver};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Token contract address to resolve
    #[arg(short, long)]
    address: String,

    /// HTTP JSON-RPC endpoint
    #[arg(short, long)]
    rpc_url: String,

    /// Keep the cache on disk instead of in memory
    #[arg(long)]
    persistent: bool,

    /// Storage location for the persistent cache
    #[arg(long, default_value = "./cache")]
    data_dir: PathBuf,

    /// Cache capacity hint (0 = default)
    #[arg(long, default_value_t = 0)]
    cache_size: usize,

    /// Per-call timeout for the remote reads, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let address: Address = args.address.parse()?;

    let provider = Provider::<Http>::try_from(args.rpc_url.as_str())?;
    let source = Arc::new(Erc20Source::new(Arc::new(provider)));

    let mut resolver = TokenResolver::new(
        Some(source),
        ResolverOpts {
            persistent: args.persistent,
            cache_size: args.cache_size,
            data_dir: args.data_dir,
        },
    )?;
    if let Some(ms) = args.timeout_ms {
        resolver = resolver.call_timeout(Duration::from_millis(ms));
    }

    let token = resolver.resolve(address).await?;
    println!("{}", serde_json::to_string_pretty(&token)?);
    Ok(())
}
