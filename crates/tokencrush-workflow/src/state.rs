//! Workflow state and the typed outcome it is built from

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokencrush_core::{CrushResponse, Error, Result};

/// What one workflow run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CrushOutcome {
    /// The service optimized the prompt.
    Optimized(CrushResponse),
    /// The service call failed and the prompt was passed through unchanged.
    Fallback {
        response: CrushResponse,
        error: String,
    },
}

impl CrushOutcome {
    pub fn response(&self) -> &CrushResponse {
        match self {
            CrushOutcome::Optimized(response) | CrushOutcome::Fallback { response, .. } => {
                response
            }
        }
    }

    /// The failure that triggered the fallback, if one did.
    pub fn error(&self) -> Option<&str> {
        match self {
            CrushOutcome::Optimized(_) => None,
            CrushOutcome::Fallback { error, .. } => Some(error),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, CrushOutcome::Fallback { .. })
    }

    /// Output state for the prompt this outcome was computed from.
    pub fn into_state(self, prompt: impl Into<String>) -> WorkflowState {
        let (crush, error) = match self {
            CrushOutcome::Optimized(response) => (response, None),
            CrushOutcome::Fallback { response, error } => (response, Some(error)),
        };
        WorkflowState {
            prompt: Some(prompt.into()),
            crush: Some(crush),
            error,
        }
    }
}

/// State threaded through the workflow: `{"prompt", "crush"?, "error"?}`.
///
/// Absent fields are omitted when serialized. `crush` is present on both the
/// success and the fallback path; `error` only on the fallback path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crush: Option<CrushResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowState {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    /// Typed view of a finished state; `None` if nothing was crushed yet.
    pub fn outcome(&self) -> Option<CrushOutcome> {
        self.clone().into_outcome()
    }

    pub fn into_outcome(self) -> Option<CrushOutcome> {
        let response = self.crush?;
        Some(match self.error {
            Some(error) => CrushOutcome::Fallback { response, error },
            None => CrushOutcome::Optimized(response),
        })
    }
}

impl TryFrom<Value> for WorkflowState {
    type Error = Error;

    /// Accept a loosely typed JSON mapping; anything that is not an object,
    /// or whose `prompt` is not a string, is invalid input.
    fn try_from(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::invalid_input("workflow state must be a JSON object"));
        }
        serde_json::from_value(value)
            .map_err(|e| Error::invalid_input(format!("malformed workflow state: {e}")))
    }
}
