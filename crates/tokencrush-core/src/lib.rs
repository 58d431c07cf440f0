//! Core types for talking to the TokenCrush prompt compression service

mod config;
mod error;
mod tokens;
mod types;

pub use config::{
    ClientConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TIMEOUT_ENV,
};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use tokens::fallback_token_estimate;
pub use types::{CrushRequest, CrushResponse};
