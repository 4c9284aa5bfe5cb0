// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! MemDAV Core
//!
//! Policy and transport layer in front of the `dav-server` WebDAV engine.
//!
//! # Architecture
//!
//! - **Domain:** credentials, access policy decisions, listener and server configuration
//! - **Application:** request pipeline and listener supervision
//! - **Infrastructure:** storage selection, write-suppressing decorator, engine adapter, TLS
//! - **Presentation:** axum router that funnels every request into the pipeline

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
