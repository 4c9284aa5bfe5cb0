// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Integration tests for the access policy in front of the WebDAV engine
//!
//! These tests verify, through the full axum router:
//! 1. Basic authentication (challenge, mismatch, success, disabled)
//! 2. Silent denial of DELETE under --no-delete
//! 3. The read-only method whitelist
//! 4. The single-file GET override

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use memdav_core::application::pipeline::RequestPipeline;
use memdav_core::domain::credentials::Credential;
use memdav_core::domain::engine::ProtocolEngine;
use memdav_core::domain::policy::AccessPolicy;
use memdav_core::presentation::http::router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

// Engine fake that only counts invocations
#[derive(Default)]
struct CountingEngine {
    calls: AtomicUsize,
}

impl CountingEngine {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProtocolEngine for CountingEngine {
    async fn serve(&self, _request: Request) -> Response {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (StatusCode::MULTI_STATUS, "engine").into_response()
    }
}

fn app(policy: AccessPolicy) -> (axum::Router, Arc<CountingEngine>) {
    let engine = Arc::new(CountingEngine::default());
    let pipeline = Arc::new(RequestPipeline::new(policy, engine.clone()));
    (router(pipeline), engine)
}

fn request(method: &str, uri: &str) -> Request {
    Request::builder()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn with_basic(mut request: Request, user: &str, pass: &str) -> Request {
    let value = format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass)));
    request
        .headers_mut()
        .insert(AUTHORIZATION, value.parse().unwrap());
    request
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn alice() -> AccessPolicy {
    AccessPolicy {
        credential: Credential::new("alice", "secret"),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_missing_credentials_get_challenge() {
    let (app, engine) = app(alice());

    let response = app.oneshot(request("GET", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let challenge = response.headers()[WWW_AUTHENTICATE].to_str().unwrap();
    assert!(challenge.starts_with("Basic"));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_wrong_password_gets_challenge() {
    let (app, engine) = app(alice());

    let response = app
        .oneshot(with_basic(request("PROPFIND", "/"), "alice", "wrong"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(WWW_AUTHENTICATE));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_empty_credentials_get_challenge() {
    let (app, engine) = app(alice());

    let response = app
        .oneshot(with_basic(request("GET", "/"), "", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_correct_credentials_reach_engine() {
    let (app, engine) = app(alice());

    let response = app
        .oneshot(with_basic(request("GET", "/"), "alice", "secret"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    assert_eq!(body_bytes(response).await, b"engine");
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn test_no_credentials_configured_skips_authentication() {
    let (app, engine) = app(AccessPolicy::default());

    let response = app.oneshot(request("GET", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::MULTI_STATUS);
    assert!(!response.headers().contains_key(WWW_AUTHENTICATE));
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn test_no_delete_drops_delete_silently() {
    let (app, engine) = app(AccessPolicy {
        no_delete: true,
        ..Default::default()
    });

    for uri in ["/file.txt", "/dir/", "/"] {
        let response = app.clone().oneshot(request("DELETE", uri)).await.unwrap();
        assert!(body_bytes(response).await.is_empty());
    }

    assert_eq!(engine.calls(), 0);

    // Other methods are untouched
    app.oneshot(request("PUT", "/file.txt")).await.unwrap();
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn test_read_only_blocks_mutating_methods() {
    let (app, engine) = app(AccessPolicy {
        read_only: true,
        ..Default::default()
    });

    for method in ["PUT", "DELETE", "MKCOL", "PROPPATCH", "COPY", "MOVE", "LOCK", "UNLOCK", "POST"] {
        let response = app.clone().oneshot(request(method, "/x")).await.unwrap();
        assert!(body_bytes(response).await.is_empty(), "{} wrote a body", method);
    }
    assert_eq!(engine.calls(), 0);

    for method in ["OPTIONS", "GET", "HEAD", "PROPFIND"] {
        let response = app.clone().oneshot(request(method, "/x")).await.unwrap();
        assert_eq!(response.status(), StatusCode::MULTI_STATUS, "{} was blocked", method);
    }
    assert_eq!(engine.calls(), 4);
}

#[tokio::test]
async fn test_serve_file_answers_every_get() {
    let dir = tempfile::TempDir::new().unwrap();
    let motd = dir.path().join("motd.txt");
    std::fs::write(&motd, b"Welcome to the server\n").unwrap();

    let (app, engine) = app(AccessPolicy {
        serve_file: Some(motd),
        ..Default::default()
    });

    for uri in ["/", "/motd.txt", "/some/other/path.bin", "/../../etc/passwd"] {
        let response = app.clone().oneshot(request("GET", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        assert_eq!(body_bytes(response).await, b"Welcome to the server\n");
    }
    assert_eq!(engine.calls(), 0);

    // Only GET is overridden
    app.oneshot(request("PROPFIND", "/")).await.unwrap();
    assert_eq!(engine.calls(), 1);
}

#[tokio::test]
async fn test_serve_file_requires_authentication() {
    let dir = tempfile::TempDir::new().unwrap();
    let motd = dir.path().join("motd.txt");
    std::fs::write(&motd, b"hi").unwrap();

    let (app, _engine) = app(AccessPolicy {
        serve_file: Some(motd),
        ..alice()
    });

    let response = app.clone().oneshot(request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(with_basic(request("GET", "/"), "alice", "secret"))
        .await
        .unwrap();
    assert_eq!(body_bytes(response).await, b"hi");
}

#[tokio::test]
async fn test_missing_serve_file_is_not_found() {
    let dir = tempfile::TempDir::new().unwrap();

    let (app, engine) = app(AccessPolicy {
        serve_file: Some(dir.path().join("absent.txt")),
        ..Default::default()
    });

    let response = app.oneshot(request("GET", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(engine.calls(), 0);
}
