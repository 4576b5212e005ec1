use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PayloadCacheError {
    #[error("IO: {0}")]
    IO(#[from] std::io::Error),

    #[error("corrupt cache entry: {0}")]
    Corrupt(String),

    #[error("cache configuration: {0}")]
    Configuration(String),
}

impl PayloadCacheError {
    pub fn corrupt<T: ToString>(value: T) -> PayloadCacheError {
        PayloadCacheError::Corrupt(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PayloadCacheError>;
