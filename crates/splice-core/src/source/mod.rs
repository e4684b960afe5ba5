//! File access for SPLICE decoding.
//!
//! Opening and buffering files happens here so the format parsers stay
//! free of I/O concerns.

mod file;

pub use file::decode_file;

use thiserror::Error;

use crate::SpliceError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SPLICE decode error: {0}")]
    Decode(#[from] SpliceError),
}
