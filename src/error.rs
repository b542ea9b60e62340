//! Error types for conversion operations.

use thiserror::Error;

/// Errors that can occur while reading input or streaming output.
///
/// Formatting itself cannot fail: every branch of the conversion engine has
/// a defined fallback, so a valid tree always converts.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
