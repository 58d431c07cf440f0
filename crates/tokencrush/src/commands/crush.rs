use std::io::Read;
use std::path::Path;

use anyhow::Context;
use tokencrush_workflow::{CrushWorkflow, WorkflowState};

use crate::cli::CrushArgs;

pub async fn run(args: CrushArgs) -> anyhow::Result<()> {
    let config = args.service.client_config()?;
    let prompt = read_prompt(args.prompt.as_deref(), args.file.as_deref())?;

    let workflow = CrushWorkflow::from_config(config, args.fallback)?;
    let state = workflow.invoke(WorkflowState::from_prompt(prompt)).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render_report(&state, args.preview));
    }
    Ok(())
}

fn read_prompt(prompt: Option<&str>, file: Option<&Path>) -> anyhow::Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt from {}", path.display()));
    }
    if let Some(prompt) = prompt {
        return Ok(prompt.to_string());
    }

    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read prompt from stdin")?;
    Ok(buf)
}

fn render_report(state: &WorkflowState, preview: usize) -> String {
    let original = state.prompt.as_deref().unwrap_or_default();
    let Some(crush) = &state.crush else {
        return "No result produced.\n".to_string();
    };
    let optimized = &crush.optimized_prompt;

    let mut out = String::new();
    out.push_str("--- TokenCrush Result ---\n");
    out.push_str(&format!(
        "Original length:  {} chars\n",
        original.chars().count()
    ));
    out.push_str(&format!(
        "Optimized length: {} chars\n",
        optimized.chars().count()
    ));
    out.push_str(&format!(
        "Tokens:           {} -> {}\n",
        crush.input_tokens, crush.output_tokens
    ));
    out.push_str(&format!(
        "Reported reduction: ~{}%\n",
        crush.percentage_reduction
    ));
    if let Some(error) = &state.error {
        out.push_str(&format!("Fallback used:    {}\n", error));
    }

    let shown: String = optimized.chars().take(preview).collect();
    let ellipsis = if optimized.chars().count() > preview {
        "..."
    } else {
        ""
    };
    out.push_str(&format!(
        "\nPreview (first {} chars):\n\n{}{}\n",
        preview, shown, ellipsis
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokencrush_workflow::{CrushOutcome, CrushResponse};

    #[test]
    fn test_read_prompt_from_argument() {
        let prompt = read_prompt(Some("inline prompt"), None).unwrap();
        assert_eq!(prompt, "inline prompt");
    }

    #[test]
    fn test_read_prompt_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "prompt from a file\nwith two lines").unwrap();

        let prompt = read_prompt(None, Some(file.path())).unwrap();
        assert_eq!(prompt, "prompt from a file\nwith two lines");
    }

    #[test]
    fn test_read_prompt_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_prompt(None, Some(&dir.path().join("nope.txt"))).unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn test_report_for_optimized_prompt() {
        let state = CrushOutcome::Optimized(CrushResponse {
            optimized_prompt: "Summarize plainly.".to_string(),
            input_tokens: 9,
            output_tokens: 4,
            percentage_reduction: 55.6,
        })
        .into_state("Summarize this text in plain English.");

        let report = render_report(&state, 600);
        assert!(report.contains("Original length:  37 chars"));
        assert!(report.contains("Optimized length: 18 chars"));
        assert!(report.contains("9 -> 4"));
        assert!(report.contains("~55.6%"));
        assert!(!report.contains("Fallback"));
        assert!(report.ends_with("Summarize plainly.\n"));
    }

    #[test]
    fn test_report_for_fallback() {
        let prompt = "Explain transformers to a high-school student.";
        let state = CrushOutcome::Fallback {
            response: CrushResponse::unoptimized(prompt),
            error: "transport error: connection failed".to_string(),
        }
        .into_state(prompt);

        let report = render_report(&state, 7);
        assert!(report.contains("12 -> 12"));
        assert!(report.contains("Fallback used:    transport error: connection failed"));
        assert!(report.contains("Explain...\n"));
    }

    #[test]
    fn test_report_without_result() {
        let report = render_report(&WorkflowState::from_prompt("hi"), 10);
        assert_eq!(report, "No result produced.\n");
    }
}
