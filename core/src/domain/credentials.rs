// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP Basic credentials
//!
//! A configured [`Credential`] with both fields empty disables authentication
//! entirely. Presented credentials are parsed from the `Authorization` header
//! and compared in constant time.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;
use subtle::ConstantTimeEq;

macro_rules! realm {
    () => {
        "MemDAV"
    };
}

/// Realm advertised in every Basic challenge.
pub const REALM: &str = realm!();

/// `WWW-Authenticate` value sent with every 401.
pub const BASIC_CHALLENGE: &str = concat!("Basic realm=\"", realm!(), "\"");

/// Username and password pair
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// True when neither a username nor a password is set.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    /// Parse `Authorization: Basic <base64(user:pass)>`.
    ///
    /// Returns `None` for a missing header, another scheme, bad base64,
    /// non-UTF-8 content or a payload without a `:` separator.
    pub fn from_basic_header(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Self::new(username, password))
    }

    /// Exact match of both fields without short-circuiting on the first difference.
    pub fn matches(&self, presented: &Credential) -> bool {
        let username = self.username.as_bytes().ct_eq(presented.username.as_bytes());
        let password = self.password.as_bytes().ct_eq(presented.password.as_bytes());
        (username & password).into()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
