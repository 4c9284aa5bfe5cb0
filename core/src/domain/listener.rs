// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Listener specifications: which transport to serve on, and where.

use std::fmt;
use std::path::PathBuf;

/// Transport a listener serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Plaintext HTTP over TCP
    Http,
    /// HTTP over TLS over TCP
    Https,
    /// Plaintext HTTP over a Unix domain socket
    Unix,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Http => write!(f, "HTTP"),
            Transport::Https => write!(f, "HTTPS"),
            Transport::Unix => write!(f, "Unix socket"),
        }
    }
}

/// PEM certificate chain and private key paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsMaterial {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// One configured listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerSpec {
    pub transport: Transport,
    /// `host:port` for TCP transports, a filesystem path for Unix sockets
    pub address: String,
    /// Required for [`Transport::Https`], ignored otherwise
    pub tls: Option<TlsMaterial>,
}

impl ListenerSpec {
    pub fn http(address: impl Into<String>) -> Self {
        Self {
            transport: Transport::Http,
            address: address.into(),
            tls: None,
        }
    }

    pub fn https(address: impl Into<String>, tls: TlsMaterial) -> Self {
        Self {
            transport: Transport::Https,
            address: address.into(),
            tls: Some(tls),
        }
    }

    pub fn unix(path: impl Into<String>) -> Self {
        Self {
            transport: Transport::Unix,
            address: path.into(),
            tls: None,
        }
    }
}
