// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Protocol engine seam
//!
//! The request pipeline only ever talks to the WebDAV engine through this
//! trait, so the engine can be swapped for a recording fake in tests.

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;

#[async_trait]
pub trait ProtocolEngine: Send + Sync {
    /// Serve a request that has already passed the access policy.
    async fn serve(&self, request: Request) -> Response;
}
