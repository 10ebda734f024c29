//! Errors for the fallible edges of the crate (parameter parsing, settings).
//!
//! The simulation itself never fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("non-finite value for `{field}`")]
    NonFinite { field: &'static str },

    #[error("`{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },

    #[error("external source unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
