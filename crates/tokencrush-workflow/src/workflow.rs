//! START -> crush -> DONE, with the fallback policy applied on the way out

use tokencrush_client::{CrushClient, CrushService};
use tokencrush_core::{ClientConfig, CrushRequest, CrushResponse, Error, Result};

use crate::{CrushOutcome, WorkflowState, TRACING_TARGET};

/// One-node workflow around a [`CrushService`].
///
/// With `fallback_to_input` enabled, transport, service and validation
/// failures are turned into an unoptimized result plus an error string.
/// Invalid input is always returned as an error.
#[derive(Debug, Clone)]
pub struct CrushWorkflow<S = CrushClient> {
    service: S,
    fallback_to_input: bool,
}

impl CrushWorkflow<CrushClient> {
    pub fn from_config(config: ClientConfig, fallback_to_input: bool) -> Result<Self> {
        Ok(Self::new(CrushClient::new(config)?, fallback_to_input))
    }
}

impl<S: CrushService> CrushWorkflow<S> {
    pub fn new(service: S, fallback_to_input: bool) -> Self {
        Self {
            service,
            fallback_to_input,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn fallback_to_input(&self) -> bool {
        self.fallback_to_input
    }

    /// Crush `prompt` and apply the fallback policy.
    pub async fn run(&self, prompt: &str) -> Result<CrushOutcome> {
        let request = CrushRequest::new(prompt)?;

        match self.service.crush(&request).await {
            Ok(response) => Ok(CrushOutcome::Optimized(response)),
            Err(err) if self.fallback_to_input && err.is_fallback_eligible() => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    kind = %err.kind(),
                    error = %err,
                    "Crush failed, falling back to the original prompt"
                );
                Ok(CrushOutcome::Fallback {
                    response: CrushResponse::unoptimized(request.into_prompt()),
                    error: err.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Run the workflow over `state` and return the updated state.
    ///
    /// The input state is consumed; on error no state is produced.
    pub async fn invoke(&self, state: WorkflowState) -> Result<WorkflowState> {
        let prompt = state.prompt.ok_or_else(|| {
            Error::invalid_input("prompt is required and must be a non-empty string")
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            node = "crush",
            fallback = self.fallback_to_input,
            "Running workflow"
        );

        let outcome = self.run(&prompt).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            node = "crush",
            fallback_used = outcome.is_fallback(),
            output_tokens = outcome.response().output_tokens,
            "Workflow done"
        );

        Ok(outcome.into_state(prompt))
    }
}

/// Build a ready-to-invoke workflow backed by [`CrushClient`].
///
/// `base_url` of `None` targets the production endpoint.
pub fn build_crush_workflow(
    api_key: impl Into<String>,
    base_url: Option<&str>,
    fallback_to_input: bool,
) -> Result<CrushWorkflow<CrushClient>> {
    let mut config = ClientConfig::new(api_key);
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    CrushWorkflow::from_config(config, fallback_to_input)
}

/// Build a workflow and invoke it once with `prompt`.
pub async fn crush(
    api_key: impl Into<String>,
    prompt: impl Into<String>,
    base_url: Option<&str>,
    fallback_to_input: bool,
) -> Result<WorkflowState> {
    build_crush_workflow(api_key, base_url, fallback_to_input)?
        .invoke(WorkflowState::from_prompt(prompt))
        .await
}
