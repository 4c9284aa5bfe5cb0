// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP surface
//!
//! Every method on every path lands in one fallback handler, which logs the
//! request and hands it to the shared [`RequestPipeline`].

use crate::application::pipeline::RequestPipeline;
use axum::extract::{ConnectInfo, Request, State};
use axum::response::Response;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub fn router(pipeline: Arc<RequestPipeline>) -> Router {
    Router::new().fallback(dispatch).with_state(pipeline)
}

async fn dispatch(State(pipeline): State<Arc<RequestPipeline>>, request: Request) -> Response {
    // Unix socket peers have no SocketAddr
    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "local".to_string());
    info!("[{}] {} {}", remote, request.method(), request.uri());

    pipeline.handle(request).await
}
