use std::io::Read;

use anyhow::Context;
use tokencrush_workflow::{CrushWorkflow, WorkflowState};

use crate::cli::InvokeArgs;

pub async fn run(args: InvokeArgs) -> anyhow::Result<()> {
    let config = args.service.client_config()?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read state from stdin")?;
    let state = parse_state(&input)?;

    let workflow = CrushWorkflow::from_config(config, args.fallback)?;
    let output = workflow.invoke(state).await?;

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn parse_state(input: &str) -> anyhow::Result<WorkflowState> {
    let value: serde_json::Value =
        serde_json::from_str(input).context("state on stdin is not valid JSON")?;
    Ok(WorkflowState::try_from(value)?)
}
