//! Unit tests for the github_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(mock_server: &MockServer) -> GitHubClient {
    let octocrab = octocrab::Octocrab::builder()
        .base_uri(mock_server.uri())
        .unwrap()
        .personal_token("test-token".to_string())
        .build()
        .unwrap();
    GitHubClient::new(octocrab)
}

fn repository_body(owner: &str, repo: &str, default_branch: &str) -> serde_json::Value {
    json!({
        "id": 123456,
        "name": repo,
        "full_name": format!("{owner}/{repo}"),
        "node_id": "MDEwOlJlcG9zaXRvcnkx",
        "private": true,
        "default_branch": default_branch,
        "url": format!("https://api.github.com/repos/{owner}/{repo}")
    })
}

#[tokio::test]
async fn test_get_repository_success() {
    let mock_server = MockServer::start().await;
    let owner = "test-owner";
    let repo = "test-repo";

    Mock::given(method("GET"))
        .and(path(format!("/repos/{owner}/{repo}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(repository_body(owner, repo, "main")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.get_repository(owner, repo).await;

    let repository = result.expect("expected repository metadata");
    assert_eq!(repository.name(), repo);
    assert_eq!(repository.full_name(), "test-owner/test-repo");
    assert_eq!(repository.default_branch(), Some("main"));
    assert!(repository.is_private());
}

#[tokio::test]
async fn test_get_repository_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-owner/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.get_repository("test-owner", "missing").await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_get_repository_bad_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-owner/test-repo"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.get_repository("test-owner", "test-repo").await;

    match result {
        Err(Error::AuthError(message)) => assert!(message.contains("Bad credentials")),
        other => panic!("expected AuthError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_repository_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-owner/test-repo"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "API rate limit exceeded for 127.0.0.1.",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.get_repository("test-owner", "test-repo").await;

    assert!(matches!(result, Err(Error::RateLimitExceeded { .. })));
}

#[tokio::test]
async fn test_create_user_repository_disables_auto_init() {
    let mock_server = MockServer::start().await;
    let payload = RepositoryCreatePayload {
        name: "liberated-app".to_string(),
        description: Some("Liberated copy".to_string()),
        private: Some(true),
        auto_init: false,
    };

    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .and(body_partial_json(json!({
            "name": "liberated-app",
            "private": true,
            "auto_init": false
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(repository_body("test-owner", "liberated-app", "main")),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.create_user_repository(&payload).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_get_branch_ref_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-owner/test-repo/git/ref/heads/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/main",
            "node_id": "REF_kwDOLm",
            "url": "https://api.github.com/repos/test-owner/test-repo/git/refs/heads/main",
            "object": {
                "sha": "aa218f56b14c9653891f9e74264a383fa43fefbd",
                "type": "commit",
                "url": "https://api.github.com/repos/test-owner/test-repo/git/commits/aa218f56"
            }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let git_ref = client
        .get_branch_ref("test-owner", "test-repo", "main")
        .await
        .expect("expected branch ref");

    assert_eq!(git_ref.ref_name, "refs/heads/main");
    assert_eq!(git_ref.object.sha, "aa218f56b14c9653891f9e74264a383fa43fefbd");
    assert_eq!(git_ref.object.object_type, "commit");
}

#[tokio::test]
async fn test_get_branch_ref_missing_branch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/test-owner/test-repo/git/ref/heads/main"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.get_branch_ref("test-owner", "test-repo", "main").await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_get_commit_returns_tree_sha() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/repos/test-owner/test-repo/git/commits/aa218f56b14c9653891f9e74264a383fa43fefbd",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "aa218f56b14c9653891f9e74264a383fa43fefbd",
            "message": "Initial commit",
            "tree": {
                "sha": "691272480426f78a0138979dd3ce63b77f706feb",
                "url": "https://api.github.com/repos/test-owner/test-repo/git/trees/69127248"
            }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let commit = client
        .get_commit(
            "test-owner",
            "test-repo",
            "aa218f56b14c9653891f9e74264a383fa43fefbd",
        )
        .await
        .expect("expected commit");

    assert_eq!(commit.tree.sha, "691272480426f78a0138979dd3ce63b77f706feb");
}

#[tokio::test]
async fn test_create_blob_returns_sha() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/test-owner/test-repo/git/blobs"))
        .and(body_partial_json(json!({ "encoding": "base64" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sha": "3a0f86fb8db8eea7ccbb9a95f325ddbedfb25e15",
            "url": "https://api.github.com/repos/test-owner/test-repo/git/blobs/3a0f86fb"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let payload = CreateBlobPayload::from_bytes(b"large file body");
    let sha = client
        .create_blob("test-owner", "test-repo", &payload)
        .await
        .expect("expected blob sha");

    assert_eq!(sha, "3a0f86fb8db8eea7ccbb9a95f325ddbedfb25e15");
}

#[tokio::test]
async fn test_create_tree_sends_base_tree() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/test-owner/test-repo/git/trees"))
        .and(body_partial_json(json!({
            "base_tree": "691272480426f78a0138979dd3ce63b77f706feb"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sha": "cd8274d15fa3ae2ab983129fb037999f264ba9a7",
            "tree": []
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let payload = CreateTreePayload {
        base_tree: Some("691272480426f78a0138979dd3ce63b77f706feb".to_string()),
        tree: vec![TreeEntry::inline("README.md", "# hello")],
    };
    let sha = client
        .create_tree("test-owner", "test-repo", &payload)
        .await
        .expect("expected tree sha");

    assert_eq!(sha, "cd8274d15fa3ae2ab983129fb037999f264ba9a7");
}

#[tokio::test]
async fn test_create_commit_returns_sha() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/test-owner/test-repo/git/commits"))
        .and(body_partial_json(json!({
            "message": "Liberate project",
            "tree": "cd8274d15fa3ae2ab983129fb037999f264ba9a7"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sha": "7638417db6d59f3c431d3e1f261cc637155684cd",
            "tree": { "sha": "cd8274d15fa3ae2ab983129fb037999f264ba9a7" }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let payload = CreateCommitPayload {
        message: "Liberate project".to_string(),
        tree: "cd8274d15fa3ae2ab983129fb037999f264ba9a7".to_string(),
        parents: vec!["aa218f56b14c9653891f9e74264a383fa43fefbd".to_string()],
    };
    let sha = client
        .create_commit("test-owner", "test-repo", &payload)
        .await
        .expect("expected commit sha");

    assert_eq!(sha, "7638417db6d59f3c431d3e1f261cc637155684cd");
}

#[tokio::test]
async fn test_create_ref_reports_existing_ref() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/test-owner/test-repo/git/refs"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Reference already exists",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let payload = CreateRefPayload::for_branch("main", "7638417db6d59f3c431d3e1f261cc637155684cd");
    let result = client.create_ref("test-owner", "test-repo", &payload).await;

    match result {
        Err(error) => assert!(error.is_already_exists()),
        Ok(()) => panic!("expected an already-exists rejection"),
    }
}

#[tokio::test]
async fn test_update_ref_rejected_when_not_fast_forward() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/repos/test-owner/test-repo/git/refs/heads/main"))
        .and(body_partial_json(json!({ "force": false })))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Update is not a fast forward",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let payload = UpdateRefPayload {
        sha: "7638417db6d59f3c431d3e1f261cc637155684cd".to_string(),
        force: false,
    };
    let result = client
        .update_ref("test-owner", "test-repo", "main", &payload)
        .await;

    match result {
        Err(error @ Error::Validation(_)) => assert!(!error.is_already_exists()),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_ref_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/repos/test-owner/test-repo/git/refs/heads/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/main",
            "object": {
                "sha": "7638417db6d59f3c431d3e1f261cc637155684cd",
                "type": "commit"
            }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let payload = UpdateRefPayload {
        sha: "7638417db6d59f3c431d3e1f261cc637155684cd".to_string(),
        force: true,
    };
    let result = client
        .update_ref("test-owner", "test-repo", "main", &payload)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_file_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repos/test-owner/test-repo/contents/README.md"))
        .and(body_partial_json(json!({ "branch": "main" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "content": { "name": "README.md", "path": "README.md" },
            "commit": { "sha": "aa218f56b14c9653891f9e74264a383fa43fefbd" }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let payload = CreateFilePayload::new("Initial commit", b"# repo\n", Some("main".to_string()));
    let result = client
        .create_file("test-owner", "test-repo", "README.md", &payload)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_file_conflict_counts_as_already_exists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/repos/test-owner/test-repo/contents/README.md"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Invalid request.\n\n\"sha\" wasn't supplied.",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let payload = CreateFilePayload::new("Initial commit", b"# repo\n", Some("main".to_string()));
    let result = client
        .create_file("test-owner", "test-repo", "README.md", &payload)
        .await;

    match result {
        Err(error) => assert!(error.is_already_exists()),
        Ok(()) => panic!("expected an already-exists rejection"),
    }
}
