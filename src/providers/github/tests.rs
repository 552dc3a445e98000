use mockito::Matcher;
use std::collections::HashMap;

use crate::auth::Token;
use crate::error::DebugError;
use crate::model::{Conclusion, RunStatus};
use crate::providers::RunProvider;

use super::GitHubProvider;

fn provider_for(server: &mockito::ServerGuard) -> GitHubProvider {
    GitHubProvider::new(&server.url(), "octo/widgets", Some(Token::from("test-token"))).unwrap()
}

#[test]
fn test_provider_requires_owner_repo_path() {
    let result = GitHubProvider::new("https://api.github.com", "not-a-path", None);
    assert!(matches!(result, Err(DebugError::Config(_))));

    let result = GitHubProvider::new("https://api.github.com", "owner/repo/extra", None);
    assert!(result.is_err());

    let result = GitHubProvider::new("https://api.github.com", "owner/", None);
    assert!(result.is_err());
}

#[test]
fn test_provider_parses_owner_and_repo() {
    let provider = GitHubProvider::new("https://api.github.com", "octo/widgets", None).unwrap();
    assert_eq!(provider.owner, "octo");
    assert_eq!(provider.repo, "widgets");
}

#[tokio::test]
async fn test_trigger_dispatches_and_resolves_run_id() {
    let mut server = mockito::Server::new_async().await;

    let dispatch = server
        .mock("POST", "/repos/octo/widgets/actions/workflows/ci.yml/dispatches")
        .match_body(Matcher::PartialJsonString(
            r#"{"ref": "main", "inputs": {"debug": "true"}}"#.to_string(),
        ))
        .with_status(204)
        .create_async()
        .await;

    let runs = server
        .mock("GET", "/repos/octo/widgets/actions/workflows/ci.yml/runs")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"workflow_runs": [{
                "id": 9001,
                "run_number": 12,
                "status": "queued",
                "conclusion": null,
                "html_url": "https://github.com/octo/widgets/actions/runs/9001",
                "created_at": "2099-01-01T00:00:00Z",
                "updated_at": "2099-01-01T00:00:00Z"
            }]}"#,
        )
        .create_async()
        .await;

    let provider = provider_for(&server);
    let inputs = HashMap::from([("debug".to_string(), "true".to_string())]);
    let triggered = provider.trigger("ci.yml", "main", &inputs).await.unwrap();

    assert_eq!(triggered.run_id, 9001);
    assert!(triggered.run_url.ends_with("/runs/9001"));
    dispatch.assert_async().await;
    runs.assert_async().await;
}

#[tokio::test]
async fn test_trigger_rejection_is_a_trigger_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/repos/octo/widgets/actions/workflows/ci.yml/dispatches")
        .with_status(422)
        .with_body("No ref found")
        .create_async()
        .await;

    let provider = provider_for(&server);
    let result = provider.trigger("ci.yml", "main", &HashMap::new()).await;

    match result {
        Err(DebugError::Trigger(message)) => assert!(message.contains("422")),
        other => panic!("expected trigger error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_run_assembles_jobs_and_steps() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/repos/octo/widgets/actions/runs/42")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": 42,
                "run_number": 3,
                "status": "completed",
                "conclusion": "failure",
                "html_url": "https://github.com/octo/widgets/actions/runs/42",
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:04:00Z"
            }"#,
        )
        .create_async()
        .await;

    server
        .mock("GET", "/repos/octo/widgets/actions/runs/42/jobs")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"jobs": [{
                "id": 7,
                "name": "build",
                "status": "completed",
                "conclusion": "failure",
                "started_at": "2024-05-01T10:00:30Z",
                "completed_at": "2024-05-01T10:03:30Z",
                "steps": [
                    {"name": "Checkout", "number": 1, "status": "completed",
                     "conclusion": "success", "started_at": null, "completed_at": null},
                    {"name": "Test", "number": 2, "status": "completed",
                     "conclusion": "failure", "started_at": null, "completed_at": null}
                ]
            }]}"#,
        )
        .create_async()
        .await;

    let provider = provider_for(&server);
    let run = provider.fetch_run(42).await.unwrap();

    assert_eq!(run.id, 42);
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.conclusion, Some(Conclusion::Failure));
    assert_eq!(run.jobs.len(), 1);
    assert_eq!(run.jobs[0].steps.len(), 2);
    assert_eq!(run.jobs[0].steps[1].number, 2);
    assert!(run.jobs[0].steps[1].is_failed());
    assert!(run.jobs[0].steps[1].log.is_none());
}

#[tokio::test]
async fn test_in_progress_run_has_no_conclusion() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/repos/octo/widgets/actions/runs/42")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": 42,
                "run_number": 3,
                "status": "in_progress",
                "conclusion": null,
                "html_url": "https://github.com/octo/widgets/actions/runs/42",
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:01:00Z"
            }"#,
        )
        .create_async()
        .await;

    server
        .mock("GET", "/repos/octo/widgets/actions/runs/42/jobs")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jobs": []}"#)
        .create_async()
        .await;

    let provider = provider_for(&server);
    let run = provider.fetch_run(42).await.unwrap();

    assert_eq!(run.status, RunStatus::InProgress);
    assert_eq!(run.conclusion, None);
}

#[tokio::test]
async fn test_fetch_failed_step_logs_returns_job_log_text() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/repos/octo/widgets/actions/jobs/7/logs")
        .with_body("setup ok\nError: Cannot find module 'left-pad'\n")
        .create_async()
        .await;

    let provider = provider_for(&server);
    let log = provider.fetch_failed_step_logs(42, 7, 2).await.unwrap();

    assert!(log.contains("Cannot find module 'left-pad'"));
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/repos/octo/widgets/actions/runs/42")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let provider = provider_for(&server);
    let result = provider.fetch_run(42).await;

    assert!(matches!(result, Err(DebugError::Api(_))));
}

#[tokio::test]
async fn test_list_workflows() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/repos/octo/widgets/actions/workflows")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"workflows": [
                {"id": 1, "name": "CI", "path": ".github/workflows/ci.yml"},
                {"id": 2, "name": "Release", "path": ".github/workflows/release.yml"}
            ]}"#,
        )
        .create_async()
        .await;

    let provider = provider_for(&server);
    let workflows = provider.list_workflows().await.unwrap();

    assert_eq!(workflows.len(), 2);
    assert_eq!(workflows[0].name, "CI");
    assert_eq!(workflows[1].path, ".github/workflows/release.yml");
}
