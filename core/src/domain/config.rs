// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Server Configuration
//!
//! Built once from the command line and never mutated afterwards. The
//! listener list, store selection and access policy are handed by value to
//! the components that need them.

use crate::domain::listener::{ListenerSpec, Transport};
use crate::domain::policy::AccessPolicy;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No listen address configured (use --listen-http, --listen-https or --listen-unix)")]
    NoListeners,

    #[error("HTTPS listener on {address} requires both --cert and --key")]
    MissingTlsMaterial { address: String },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Backing store for the WebDAV tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreKind {
    /// Volatile, process-local store
    #[default]
    Memory,
    /// Persistent store rooted at a host directory (created if missing)
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Wrap the store so written content is replaced by zeros
    pub no_save: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listeners: Vec<ListenerSpec>,
    pub store: StoreConfig,
    pub policy: AccessPolicy,
}

impl ServerConfig {
    pub fn new(
        listeners: Vec<ListenerSpec>,
        store: StoreConfig,
        policy: AccessPolicy,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            listeners,
            store,
            policy,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listeners.is_empty() {
            return Err(ConfigError::NoListeners);
        }

        if let Some(spec) = self
            .listeners
            .iter()
            .find(|spec| spec.transport == Transport::Https && spec.tls.is_none())
        {
            return Err(ConfigError::MissingTlsMaterial {
                address: spec.address.clone(),
            });
        }

        Ok(())
    }
}
