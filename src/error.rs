use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// An n-gram window of zero tokens was requested.
    #[error("max n-gram size must be at least 1")]
    ZeroNgramSize,

    /// `Config::chunk_size` was zero.
    #[error("arena chunk size must be at least 1 node")]
    InvalidChunkSize,

    /// I/O error while opening or mapping a dictionary file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
