use openssl::error::ErrorStack;
use thiserror::Error;

/// Why a cleaned secret could not be decoded as RFC 4648 Base32.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
    #[error("incorrect padding")]
    InvalidPadding,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("empty secret")]
    EmptySecret,
    #[error("invalid base32 secret ({0})")]
    InvalidSecret(#[from] DecodeError),
    #[error("HMAC computation failed: {0}")]
    Crypto(#[from] ErrorStack),
}

pub type Result<T> = std::result::Result<T, Error>;
