// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Request Pipeline
//!
//! Puts the [`AccessPolicy`] in front of the WebDAV engine:
//!
//! ```text
//! request
//!   └─ AccessPolicy::evaluate(method, headers)
//!         ├─ Unauthorized  → 401 + Basic challenge
//!         ├─ Deny(reason)  → nothing written, engine untouched
//!         ├─ ServeFile     → fixed file from the host filesystem
//!         └─ Delegate      → ProtocolEngine::serve(request)
//! ```
//!
//! One pipeline is shared by every listener. It holds no mutable state.

use crate::domain::credentials::BASIC_CHALLENGE;
use crate::domain::engine::ProtocolEngine;
use crate::domain::policy::{AccessPolicy, Decision};
use axum::body::Body;
use axum::extract::Request;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{info, warn};

pub struct RequestPipeline {
    policy: AccessPolicy,
    engine: Arc<dyn ProtocolEngine>,
}

impl RequestPipeline {
    pub fn new(policy: AccessPolicy, engine: Arc<dyn ProtocolEngine>) -> Self {
        Self { policy, engine }
    }

    pub async fn handle(&self, request: Request) -> Response {
        match self.policy.evaluate(request.method(), request.headers()) {
            Decision::Unauthorized => {
                warn!(method = %request.method(), uri = %request.uri(), "Rejected unauthenticated request");
                unauthorized()
            }
            Decision::Deny(reason) => {
                info!(method = %request.method(), uri = %request.uri(), %reason, "Dropped request");
                silent()
            }
            Decision::ServeFile(path) => serve_file(&path, request).await,
            Decision::Delegate => self.engine.serve(request).await,
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE))],
        "Unauthorized\n",
    )
        .into_response()
}

// What the HTTP layer sends for a handler that writes nothing.
fn silent() -> Response {
    Response::new(Body::empty())
}

async fn serve_file(path: &Path, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
