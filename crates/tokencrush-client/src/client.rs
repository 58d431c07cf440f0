use std::sync::Arc;
use std::time::Instant;

use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use tokencrush_core::{ClientConfig, CrushRequest, CrushResponse, Error, Result};

use crate::response::interpret_response;
use crate::TRACING_TARGET;

/// Path of the crush endpoint, relative to the base URL.
pub const CRUSH_PATH: &str = "/v1/crush";

const USER_AGENT: &str = concat!("tokencrush-rs/", env!("CARGO_PKG_VERSION"));

struct CrushClientInner {
    http: Client,
    config: ClientConfig,
    endpoint: Url,
}

/// Client for the crush endpoint.
///
/// One call to [`CrushClient::crush`] is exactly one POST: no retries, no
/// caching. Cloning is cheap and clones share the connection pool.
///
/// ```rust,ignore
/// let client = CrushClient::new(ClientConfig::new(api_key))?;
/// let request = CrushRequest::new("Summarize this text in plain English.")?;
/// let response = client.crush(&request).await?;
/// println!("{}", response.optimized_prompt);
/// ```
#[derive(Clone)]
pub struct CrushClient {
    inner: Arc<CrushClientInner>,
}

impl std::fmt::Debug for CrushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrushClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl CrushClient {
    /// Build a client. Fails with a configuration error, before any network
    /// activity, when the key is blank or the base URL is unusable.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config.effective_base_url();
        let endpoint = Url::parse(&format!("{base_url}{CRUSH_PATH}")).map_err(|e| {
            Error::configuration(format!("invalid base URL {base_url:?}: {e}"))
        })?;

        let timeout = config.effective_timeout();
        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %endpoint,
            timeout_ms = timeout.as_millis() as u64,
            "Created crush client"
        );

        Ok(Self {
            inner: Arc::new(CrushClientInner {
                http,
                config,
                endpoint,
            }),
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        self.inner.endpoint.as_str()
    }

    /// Send `request` to the service and return the validated result.
    ///
    /// Errors are classified as transport (request never completed), service
    /// (failure status or error payload) or validation (success status but a
    /// body that is not a crush result).
    pub async fn crush(&self, request: &CrushRequest) -> Result<CrushResponse> {
        let started = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %self.inner.endpoint,
            prompt_chars = request.prompt().chars().count(),
            "Sending crush request"
        );

        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .bearer_auth(&self.inner.config.api_key)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        let result = interpret_response(status, &body);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(crushed) => tracing::debug!(
                target: TRACING_TARGET,
                status,
                elapsed_ms,
                input_tokens = crushed.input_tokens,
                output_tokens = crushed.output_tokens,
                percentage_reduction = crushed.percentage_reduction,
                "Crush request completed"
            ),
            Err(err) => tracing::debug!(
                target: TRACING_TARGET,
                status,
                elapsed_ms,
                kind = %err.kind(),
                error = %err,
                "Crush request rejected"
            ),
        }

        result
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout(format!("request timed out: {err}")).with_source(err)
    } else if err.is_connect() {
        Error::transport(format!("connection failed: {err}")).with_source(err)
    } else {
        Error::transport(err.to_string()).with_source(err)
    }
}
