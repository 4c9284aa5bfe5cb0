// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! WebDAV engine adapter
//!
//! Binds a `dav_server::DavHandler` (filesystem plus in-memory lock table)
//! to the [`ProtocolEngine`] seam used by the request pipeline.

use crate::domain::engine::ProtocolEngine;
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use dav_server::fs::DavFileSystem;
use dav_server::memls::MemLs;
use dav_server::DavHandler;

pub struct DavEngine {
    handler: DavHandler,
}

impl DavEngine {
    /// Build an engine over `filesystem` with a fresh in-memory lock table.
    pub fn new(filesystem: Box<dyn DavFileSystem>) -> Self {
        let handler = DavHandler::builder()
            .filesystem(filesystem)
            .locksystem(MemLs::new())
            .build_handler();
        Self { handler }
    }
}

#[async_trait]
impl ProtocolEngine for DavEngine {
    async fn serve(&self, request: Request) -> Response {
        self.handler.handle(request).await.map(Body::new)
    }
}
