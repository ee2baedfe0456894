use thiserror::Error;

/// User-facing errors.
#[derive(Error, Debug)]
pub enum SqlRiverError {
    #[error("sqlriver river underflow: statement closes more parentheses than it opens")]
    RiverUnderflow,

    #[error("sqlriver equivalence error: {0}")]
    Equivalence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SqlRiverError>;
