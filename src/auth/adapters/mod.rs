//! Identity provider adapters.

mod static_tokens;

pub use static_tokens::{StaticTokenProvider, TokenFileError};
