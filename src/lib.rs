pub mod cache;
pub mod token;

pub use cache::{Cache, DiskCache, MemoryCache};
pub use token::erc20::Erc20Source;
pub use token::resolver::{ResolveError, ResolverOpts, TokenField, TokenResolver};
pub use token::{DecodeError, Token, TokenSource};
