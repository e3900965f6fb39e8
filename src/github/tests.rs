//! HTTP mock tests for the GitHub ref client.
//!
//! Uses wiremock to simulate the hosting API.

use super::{HttpRefClient, RefClient, TagProbe};
use crate::context::RepoId;
use crate::credential::Credential;
use crate::error::BarcError;
use serde_json::json;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpRefClient {
    client_with_timeout(server, Duration::from_secs(5))
}

fn client_with_timeout(server: &MockServer, timeout: Duration) -> HttpRefClient {
    HttpRefClient::new(
        Url::parse(&server.uri()).unwrap(),
        Credential::new("test-token").unwrap(),
        timeout,
    )
    .unwrap()
}

fn repo() -> RepoId {
    RepoId::new("octo", "widgets").unwrap()
}

fn ref_body(full_ref: &str, sha: &str) -> serde_json::Value {
    json!({ "ref": full_ref, "object": { "sha": sha, "type": "commit" } })
}

// =============================================================================
// read_branch_ref
// =============================================================================

#[tokio::test]
async fn test_read_branch_ref_returns_sha_and_sends_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/heads/feature-x"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ref_body("refs/heads/feature-x", "abc123")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sha = client_for(&server)
        .read_branch_ref(&repo(), "feature-x")
        .await
        .unwrap();
    assert_eq!(sha, "abc123");
}

#[tokio::test]
async fn test_read_branch_ref_keeps_slashes_as_path_separators() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/heads/release/2.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ref_body("refs/heads/release/2.0", "def456")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sha = client_for(&server)
        .read_branch_ref(&repo(), "release/2.0")
        .await
        .unwrap();
    assert_eq!(sha, "def456");
}

#[tokio::test]
async fn test_read_branch_ref_404_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/heads/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .read_branch_ref(&repo(), "gone")
        .await
        .unwrap_err();
    assert!(matches!(err, BarcError::NotFound(_)));
    assert_eq!(err.to_string(), "Branch not found: gone");
}

#[tokio::test]
async fn test_read_branch_ref_prefix_match_is_not_found() {
    let server = MockServer::start().await;

    // Only `feature/x` exists; GitHub answers the `feature` lookup with an array.
    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/heads/feature"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([ref_body("refs/heads/feature/x", "abc")])),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .read_branch_ref(&repo(), "feature")
        .await
        .unwrap_err();
    assert!(matches!(err, BarcError::NotFound(_)));
}

#[tokio::test]
async fn test_read_branch_ref_server_error_is_external_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/heads/main"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .read_branch_ref(&repo(), "main")
        .await
        .unwrap_err();
    match err {
        BarcError::ExternalApi { status, message } => {
            assert_eq!(status, Some(502));
            assert!(message.contains("Bad Gateway"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/heads/main"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .read_branch_ref(&repo(), "main")
        .await
        .unwrap_err();
    assert!(matches!(err, BarcError::Auth(_)));
    assert!(err.to_string().contains("Bad credentials"));
}

// =============================================================================
// probe_tag_ref
// =============================================================================

#[tokio::test]
async fn test_probe_tag_ref_exists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/tags/archive/feature-x"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ref_body("refs/tags/archive/feature-x", "abc")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client
            .probe_tag_ref(&repo(), "archive/feature-x")
            .await
            .unwrap(),
        TagProbe::Exists
    );
    assert!(
        client
            .tag_ref_exists(&repo(), "archive/feature-x")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_probe_tag_ref_404_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/tags/archive/feature-x"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert_eq!(
        client_for(&server)
            .probe_tag_ref(&repo(), "archive/feature-x")
            .await
            .unwrap(),
        TagProbe::Absent
    );
}

#[tokio::test]
async fn test_probe_tag_ref_prefix_match_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/tags/archive/feat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([ref_body("refs/tags/archive/feature", "abc")])),
        )
        .mount(&server)
        .await;

    assert_eq!(
        client_for(&server)
            .probe_tag_ref(&repo(), "archive/feat")
            .await
            .unwrap(),
        TagProbe::Absent
    );
}

#[tokio::test]
async fn test_probe_tag_ref_server_error_is_not_treated_as_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/tags/archive/feature-x"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .probe_tag_ref(&repo(), "archive/feature-x")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BarcError::ExternalApi {
            status: Some(500),
            ..
        }
    ));
}

#[tokio::test]
async fn test_timeout_is_external_api_error_without_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/git/refs/tags/archive/slow"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client_with_timeout(&server, Duration::from_millis(100))
        .probe_tag_ref(&repo(), "archive/slow")
        .await
        .unwrap_err();
    match err {
        BarcError::ExternalApi { status, message } => {
            assert_eq!(status, None);
            assert!(message.contains("timed out"), "message: {}", message);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// =============================================================================
// create_tag_ref / delete_branch_ref
// =============================================================================

#[tokio::test]
async fn test_create_tag_ref_posts_ref_and_sha() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/git/refs"))
        .and(body_json(json!({
            "ref": "refs/tags/archive/release-2.0",
            "sha": "def456"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(ref_body("refs/tags/archive/release-2.0", "def456")),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .create_tag_ref(&repo(), "archive/release-2.0", "def456")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_tag_ref_conflict_carries_upstream_reason() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/git/refs"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"message": "Reference already exists"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_tag_ref(&repo(), "archive/x", "abc")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "HTTP 422: Reference already exists");
}

#[tokio::test]
async fn test_delete_branch_ref_success() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/repos/octo/widgets/git/refs/heads/feature/old"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_branch_ref(&repo(), "feature/old")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_branch_ref_failure_uses_status_reason_when_body_empty() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/repos/octo/widgets/git/refs/heads/locked"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .delete_branch_ref(&repo(), "locked")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "HTTP 403: Forbidden");
}

// =============================================================================
// get_default_branch / list_branches
// =============================================================================

#[tokio::test]
async fn test_get_default_branch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "widgets", "default_branch": "trunk"})),
        )
        .mount(&server)
        .await;

    assert_eq!(
        client_for(&server)
            .get_default_branch(&repo())
            .await
            .unwrap(),
        "trunk"
    );
}

#[tokio::test]
async fn test_get_default_branch_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_default_branch(&repo())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BarcError::ExternalApi {
            status: Some(404),
            ..
        }
    ));
}

#[tokio::test]
async fn test_list_branches_follows_pages() {
    let server = MockServer::start().await;

    let first_page: Vec<_> = (0..100)
        .map(|i| {
            json!({
                "name": format!("b{:03}", i),
                "commit": { "sha": format!("s{}", i), "url": "https://example" },
                "protected": i == 0
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/branches"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(first_page)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/branches"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "last", "commit": { "sha": "s-last" } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let branches = client_for(&server).list_branches(&repo()).await.unwrap();
    assert_eq!(branches.len(), 101);
    assert!(branches[0].protected);
    assert!(!branches[1].protected);
    assert_eq!(branches[100].name, "last");
    assert_eq!(branches[100].sha, "s-last");
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/repos/octo/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"default_branch": "main"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpRefClient::new(
        Url::parse(&format!("{}/api/v3", server.uri())).unwrap(),
        Credential::new("t").unwrap(),
        Duration::from_secs(5),
    )
    .unwrap();
    assert_eq!(client.get_default_branch(&repo()).await.unwrap(), "main");
}
