//! HTTP client for the TokenCrush prompt compression service

mod client;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
mod response;
mod service;

pub use client::{CrushClient, CRUSH_PATH};
pub use service::CrushService;

/// Tracing target for client events.
pub const TRACING_TARGET: &str = "tokencrush_client";
