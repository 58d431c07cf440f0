//! In-memory [`CrushService`] and network helpers for tests.
//!
//! Only compiled with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! tokencrush-client = { path = "...", features = ["test-utils"] }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokencrush_core::{CrushRequest, CrushResponse, Error, ErrorKind, Result};

use crate::CrushService;

type Reply = Box<dyn Fn(&str) -> Result<CrushResponse> + Send + Sync>;

/// Service that answers every call with `reply` and records the prompts it
/// was asked to crush.
pub struct MockService {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockService {
    pub fn new(reply: impl Fn(&str) -> Result<CrushResponse> + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Deterministic "compressor": keeps every other word.
    pub fn healthy() -> Self {
        Self::new(|prompt| {
            let words: Vec<&str> = prompt.split_whitespace().collect();
            let kept: Vec<&str> = words.iter().step_by(2).copied().collect();
            let input_tokens = words.len() as u64;
            let output_tokens = kept.len() as u64;
            let percentage_reduction = if input_tokens == 0 {
                0.0
            } else {
                100.0 * (input_tokens - output_tokens) as f64 / input_tokens as f64
            };
            Ok(CrushResponse {
                optimized_prompt: kept.join(" "),
                input_tokens,
                output_tokens,
                percentage_reduction,
            })
        })
    }

    /// Fails every call with a connection error.
    pub fn down() -> Self {
        Self::failing(ErrorKind::Transport)
    }

    /// Fails every call with a representative error of `kind`.
    pub fn failing(kind: ErrorKind) -> Self {
        Self::new(move |_| {
            Err(match kind {
                ErrorKind::InvalidInput => Error::invalid_input("rejected by service"),
                ErrorKind::Configuration => Error::configuration("API key is required"),
                ErrorKind::Transport => Error::transport("connection failed: connection refused"),
                ErrorKind::Service => Error::service(Some(503), "Service Unavailable"),
                ErrorKind::Validation => Error::validation("missing field `optimized_prompt`"),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CrushService for MockService {
    async fn crush(&self, request: &CrushRequest) -> Result<CrushResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt().to_string());
        }
        (self.reply)(request.prompt())
    }
}

/// A base URL on the loopback interface with nothing listening behind it.
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{addr}")
}
