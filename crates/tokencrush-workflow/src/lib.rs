//! Single-step crush workflow with an optional local fallback

mod state;
mod workflow;

pub use state::{CrushOutcome, WorkflowState};
pub use workflow::{build_crush_workflow, crush, CrushWorkflow};

pub use tokencrush_client::{CrushClient, CrushService};
pub use tokencrush_core::{ClientConfig, CrushRequest, CrushResponse, Error, ErrorKind, Result};

/// Tracing target for workflow events.
pub const TRACING_TARGET: &str = "tokencrush_workflow";
