use mockito::Server;
use tokencrush_client::mock::refused_base_url;
use tokencrush_client::CRUSH_PATH;
use tokencrush_workflow::{
    build_crush_workflow, crush, ClientConfig, CrushWorkflow, ErrorKind, WorkflowState,
};

const OK_BODY: &str = r#"{"optimized_prompt":"Summarize in plain English.","input_tokens":9,"output_tokens":7,"percentage_reduction":22.22}"#;

fn workflow_for(base_url: &str, fallback: bool) -> CrushWorkflow {
    let config = ClientConfig::new("test-key")
        .with_base_url(base_url)
        .with_system_proxy(false);
    CrushWorkflow::from_config(config, fallback).unwrap()
}

async fn serve(server: &mut Server, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("POST", CRUSH_PATH)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn test_healthy_remote() {
    let mut server = Server::new_async().await;
    let crush_mock = serve(&mut server, 200, OK_BODY).await;
    let workflow = workflow_for(&server.url(), false);

    let prompt = "Summarize this text in plain English.";
    let state = workflow
        .invoke(WorkflowState::from_prompt(prompt))
        .await
        .unwrap();

    crush_mock.assert_async().await;
    assert!(state.error.is_none());
    let crush = state.crush.unwrap();
    assert!(crush.optimized_prompt.len() <= prompt.len());
    assert!(crush.percentage_reduction >= 0.0);
}

#[tokio::test]
async fn test_remote_down_with_fallback() {
    let workflow = workflow_for(&refused_base_url(), true);

    let prompt = "Explain transformers to a high-school student.";
    let state = workflow
        .invoke(WorkflowState::from_prompt(prompt))
        .await
        .unwrap();

    let crush = state.crush.unwrap();
    assert_eq!(crush.input_tokens, 12);
    assert_eq!(crush.output_tokens, 12);
    assert_eq!(crush.percentage_reduction, 0.0);
    assert_eq!(crush.optimized_prompt, prompt);
    assert!(state.error.is_some_and(|e| e.starts_with("transport error")));
}

#[tokio::test]
async fn test_remote_down_without_fallback() {
    let workflow = workflow_for(&refused_base_url(), false);

    let err = workflow
        .invoke(WorkflowState::from_prompt("Explain transformers."))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_remote_error_status_with_fallback() {
    let mut server = Server::new_async().await;
    let crush_mock = serve(&mut server, 500, r#"{"detail":"internal error"}"#).await;
    let workflow = workflow_for(&server.url(), true);

    let outcome = workflow.run("Explain transformers.").await.unwrap();

    crush_mock.assert_async().await;
    assert!(outcome.is_fallback());
    assert!(outcome.error().unwrap().contains("HTTP 500"));
}

#[tokio::test]
async fn test_remote_garbage_with_fallback() {
    let mut server = Server::new_async().await;
    let crush_mock = serve(&mut server, 200, r#"{"optimized_prompt":"half a result"}"#).await;
    let workflow = workflow_for(&server.url(), true);

    let outcome = workflow.run("Explain transformers.").await.unwrap();

    crush_mock.assert_async().await;
    assert!(outcome.is_fallback());
    assert!(outcome.error().unwrap().starts_with("validation error"));
}

#[tokio::test]
async fn test_one_shot_rejects_empty_prompt() {
    let err = crush("test-key", "", Some(&refused_base_url()), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_one_shot_requires_api_key() {
    let err = crush("   ", "hello", None, true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_factory_defaults_to_production_endpoint() {
    let workflow = build_crush_workflow("test-key", None, true).unwrap();
    assert!(workflow
        .service()
        .endpoint()
        .starts_with(tokencrush_core::DEFAULT_BASE_URL));
    assert!(workflow.fallback_to_input());
}
