use std::collections::HashSet;

use mockito::Matcher;
use ggufscout::analyzer::analyze;
use ggufscout::config::HubConfig;
use ggufscout::hardware::HardwareProfile;
use ggufscout::hub::{HubClient, HubError, RemoteFile};

fn client_for(endpoint: String) -> HubClient {
    HubClient::new(&HubConfig {
        endpoint,
        token: None,
        page_size: 10,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn model_files_reads_siblings_with_sizes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/models/TheBloke/Llama-2-7B-GGUF")
        .match_query(Matcher::UrlEncoded("blobs".into(), "true".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "id": "TheBloke/Llama-2-7B-GGUF",
            "siblings": [
                {"rfilename": "README.md", "size": 1024},
                {"rfilename": "llama-2-7b.Q4_K_M.gguf", "size": 4081004224},
                {"rfilename": "llama-2-7b.Q8_0.gguf"}
            ]
        }"#,
        )
        .create_async()
        .await;

    let client = client_for(server.url());
    let files = client.model_files("TheBloke/Llama-2-7B-GGUF").await.unwrap();

    mock.assert_async().await;
    assert_eq!(
        files,
        vec![
            RemoteFile::new("README.md", 1024),
            RemoteFile::new("llama-2-7b.Q4_K_M.gguf", 4081004224),
            RemoteFile::new("llama-2-7b.Q8_0.gguf", 0),
        ]
    );
}

#[tokio::test]
async fn model_files_without_siblings_is_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models/owner/empty")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": "owner/empty"}"#)
        .create_async()
        .await;

    let files = client_for(server.url()).model_files("owner/empty").await.unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn missing_repository_surfaces_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models/owner/missing")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"error":"Repository not found"}"#)
        .create_async()
        .await;

    let err = client_for(server.url()).model_files("owner/missing").await.unwrap_err();
    match &err {
        HubError::Status { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("Repository not found"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models/owner/odd")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(server.url()).model_files("owner/odd").await.unwrap_err();
    assert!(matches!(err, HubError::Decode(_)));
}

#[tokio::test]
async fn search_sends_filters_and_keeps_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/models")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("filter".into(), "gguf".into()),
            Matcher::UrlEncoded("search".into(), "coder".into()),
            Matcher::UrlEncoded("sort".into(), "trendingScore".into()),
            Matcher::UrlEncoded("direction".into(), "-1".into()),
            Matcher::UrlEncoded("limit".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
            {"id": "Qwen/Qwen2.5-Coder-7B-Instruct-GGUF", "modelId": "Qwen/Qwen2.5-Coder-7B-Instruct-GGUF"},
            {"id": "bartowski/deepseek-coder-GGUF"}
        ]"#,
        )
        .create_async()
        .await;

    let ids = client_for(server.url()).search_models("coder", 20).await.unwrap();

    mock.assert_async().await;
    assert_eq!(ids, vec!["Qwen/Qwen2.5-Coder-7B-Instruct-GGUF", "bartowski/deepseek-coder-GGUF"]);
}

#[tokio::test]
async fn search_with_no_hits_is_empty_not_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let ids = client_for(server.url()).search_models("nothing-matches-this", 10).await.unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn search_failure_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let err = client_for(server.url()).search_models("coder", 10).await.unwrap_err();
    assert!(matches!(err, HubError::Status { .. }));
}

#[tokio::test]
async fn unreachable_registry_is_an_http_error() {
    // Nothing listens on port 9 (discard) in test environments
    let err = client_for("http://127.0.0.1:9".to_string()).search_models("x", 1).await.unwrap_err();
    assert!(matches!(err, HubError::Http(_)));
}

#[test]
fn model_url_joins_endpoint_and_id() {
    let client = client_for("https://huggingface.co/".to_string());
    assert_eq!(client.model_url("a/b"), "https://huggingface.co/a/b");
}

#[tokio::test]
async fn analyze_builds_report_from_listing() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models/owner/model")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{
            "id": "owner/model",
            "siblings": [
                {"rfilename": "model-00001-of-00002.gguf", "size": 3221225472},
                {"rfilename": "model-00002-of-00002.gguf", "size": 3221225472},
                {"rfilename": "imatrix.gguf", "size": 1000}
            ]
        }"#,
        )
        .create_async()
        .await;

    let cached: HashSet<String> = ["model-00001-of-00002.gguf".to_string()].into_iter().collect();
    let report = analyze(&client_for(server.url()), "owner/model", &HardwareProfile::new(32.0, 8.0), &cached)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].variant.display_name, "model.gguf (Split)");
    assert!(!report.rows[0].local);
    assert_eq!(report.recommendation, Some(0));
}

#[tokio::test]
async fn analyze_without_model_files_is_none() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models/owner/weights")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": "owner/weights", "siblings": [{"rfilename": "model.safetensors", "size": 10}]}"#)
        .create_async()
        .await;

    let outcome = analyze(&client_for(server.url()), "owner/weights", &HardwareProfile::new(32.0, 8.0), &HashSet::new())
        .await
        .unwrap();
    assert!(outcome.is_none());
}
