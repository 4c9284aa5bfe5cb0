// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Access Policy
//!
//! Pure, per-request decision made before the WebDAV engine is consulted.
//! The policy is built once at startup and shared read-only by every
//! request task.
//!
//! ## Decision Order
//! | Step | Condition | Outcome |
//! |------|-----------|---------|
//! | 1 | credential configured, missing or wrong credential presented | [`Decision::Unauthorized`] |
//! | 2 | `DELETE` with `no_delete` | [`Decision::Deny`] ([`Denial::NoDelete`]) |
//! | 2 | `GET` with `serve_file` | [`Decision::ServeFile`] |
//! | 3 | `read_only` and method outside [`READ_ONLY_METHODS`] | [`Decision::Deny`] ([`Denial::ReadOnly`]) |
//! | 4 | otherwise | [`Decision::Delegate`] |
//!
//! A denial is silent: nothing is written and the engine is never invoked.
//! Clients see the HTTP layer's default for an unwritten response.

use crate::domain::credentials::Credential;
use axum::http::{HeaderMap, Method};
use std::fmt;
use std::path::PathBuf;

/// Methods permitted while `read_only` is set.
pub const READ_ONLY_METHODS: [&str; 4] = ["OPTIONS", "GET", "HEAD", "PROPFIND"];

/// Why a request was silently dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// `DELETE` while deletes are suppressed
    NoDelete,
    /// Method outside the read-only whitelist
    ReadOnly,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::NoDelete => write!(f, "deletes are disabled"),
            Denial::ReadOnly => write!(f, "server is read-only"),
        }
    }
}

/// Outcome of evaluating a request against the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Answer 401 with a Basic challenge
    Unauthorized,
    /// Drop the request without writing a response
    Deny(Denial),
    /// Answer every GET with this single file from the host filesystem
    ServeFile(PathBuf),
    /// Hand the request to the WebDAV engine unchanged
    Delegate,
}

/// Immutable per-process access policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Basic credential; empty disables authentication
    pub credential: Credential,
    /// Silently ignore DELETE
    pub no_delete: bool,
    /// Only allow [`READ_ONLY_METHODS`]
    pub read_only: bool,
    /// Serve this file for every GET, whatever the requested path
    pub serve_file: Option<PathBuf>,
}

impl AccessPolicy {
    pub fn requires_auth(&self) -> bool {
        !self.credential.is_empty()
    }

    /// Check the presented credential. Always true when authentication is off.
    pub fn authenticate(&self, headers: &HeaderMap) -> bool {
        if !self.requires_auth() {
            return true;
        }

        match Credential::from_basic_header(headers) {
            Some(presented) if !presented.is_empty() => self.credential.matches(&presented),
            _ => false,
        }
    }

    pub fn evaluate(&self, method: &Method, headers: &HeaderMap) -> Decision {
        if !self.authenticate(headers) {
            return Decision::Unauthorized;
        }

        if self.no_delete && *method == Method::DELETE {
            return Decision::Deny(Denial::NoDelete);
        }

        if *method == Method::GET {
            if let Some(path) = &self.serve_file {
                return Decision::ServeFile(path.clone());
            }
        }

        if self.read_only && !is_read_only_method(method) {
            return Decision::Deny(Denial::ReadOnly);
        }

        Decision::Delegate
    }
}

pub fn is_read_only_method(method: &Method) -> bool {
    READ_ONLY_METHODS.contains(&method.as_str())
}
