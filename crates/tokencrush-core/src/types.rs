use serde::{Deserialize, Serialize};

use crate::tokens::trim_prompt;
use crate::{fallback_token_estimate, Error, Result};

/// Outbound payload: `{"prompt": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrushRequest {
    prompt: String,
}

impl CrushRequest {
    /// Build a request, rejecting prompts that are blank after trimming.
    ///
    /// The prompt is kept as given; trimming only decides validity.
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        let prompt = prompt.into();
        Self::check_prompt(&prompt)?;
        Ok(Self { prompt })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn into_prompt(self) -> String {
        self.prompt
    }

    fn check_prompt(prompt: &str) -> Result<()> {
        if trim_prompt(prompt).is_empty() {
            return Err(Error::invalid_input(
                "prompt is required and must be a non-empty string",
            ));
        }
        Ok(())
    }
}

/// Result of a successful crush, as computed by the service.
///
/// Token counts come from the service and are not recomputed locally, so
/// `output_tokens <= input_tokens` is expected but not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrushResponse {
    pub optimized_prompt: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub percentage_reduction: f64,
}

impl CrushResponse {
    /// Synthetic result for a prompt the service never optimized: the prompt
    /// is returned as-is, both token counts are the local estimate and the
    /// reduction is zero.
    pub fn unoptimized(prompt: impl Into<String>) -> Self {
        let optimized_prompt = prompt.into();
        let tokens = fallback_token_estimate(&optimized_prompt);
        Self {
            optimized_prompt,
            input_tokens: tokens,
            output_tokens: tokens,
            percentage_reduction: 0.0,
        }
    }

    pub fn tokens_saved(&self) -> u64 {
        self.input_tokens.saturating_sub(self.output_tokens)
    }

    /// Parse a response body. Every field must be present and well-typed;
    /// anything else is a validation error, never a partial result.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
