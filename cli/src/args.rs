// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command-line arguments
//!
//! Every flag can also be supplied through a `MEMDAV_*` environment
//! variable. [`Cli::into_config`] turns the parsed flags into the immutable
//! [`ServerConfig`] the server runs with.

use clap::Parser;
use memdav_core::domain::config::{ConfigError, ServerConfig, StoreConfig, StoreKind};
use memdav_core::domain::credentials::Credential;
use memdav_core::domain::listener::{ListenerSpec, TlsMaterial};
use memdav_core::domain::policy::AccessPolicy;
use std::path::PathBuf;

/// Serves WebDAV from memory, not touching the disk.
///
/// With --no-delete, requests to DELETE files will not actually delete the
/// files. With --no-save, files are stored as zeros of the written length.
#[derive(Debug, Parser)]
#[command(name = "memdav")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Plaintext HTTP listen address
    #[arg(long, env = "MEMDAV_LISTEN_HTTP", value_name = "ADDRESS")]
    pub listen_http: Option<String>,

    /// HTTPS listen address (requires --cert and --key)
    #[arg(long, env = "MEMDAV_LISTEN_HTTPS", value_name = "ADDRESS")]
    pub listen_https: Option<String>,

    /// Unix domain socket path
    #[arg(long, env = "MEMDAV_LISTEN_UNIX", value_name = "PATH")]
    pub listen_unix: Option<String>,

    /// TLS certificate chain (PEM)
    #[arg(long, env = "MEMDAV_CERT", value_name = "FILE")]
    pub cert: Option<PathBuf>,

    /// TLS private key (PEM)
    #[arg(long, env = "MEMDAV_KEY", value_name = "FILE")]
    pub key: Option<PathBuf>,

    /// Do not actually DELETE files
    #[arg(long, env = "MEMDAV_NO_DELETE")]
    pub no_delete: bool,

    /// Serve from this directory instead of memory (created if missing)
    #[arg(long, env = "MEMDAV_DIR", value_name = "DIRECTORY")]
    pub dir: Option<PathBuf>,

    /// Answer every GET with this file, whatever the requested path
    #[arg(long, env = "MEMDAV_SERVE_FILE", value_name = "PATH")]
    pub serve_file: Option<PathBuf>,

    /// Store zeros instead of the written content
    #[arg(long, env = "MEMDAV_NO_SAVE")]
    pub no_save: bool,

    /// Only allow OPTIONS, GET, HEAD and PROPFIND
    #[arg(long, env = "MEMDAV_READ_ONLY")]
    pub read_only: bool,

    /// Basic authentication username
    #[arg(long, env = "MEMDAV_USERNAME", default_value = "")]
    pub username: String,

    /// Basic authentication password
    #[arg(long, env = "MEMDAV_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MEMDAV_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let tls = match (self.cert, self.key) {
            (Some(cert), Some(key)) => Some(TlsMaterial { cert, key }),
            _ => None,
        };

        let mut listeners = Vec::new();
        if let Some(address) = self.listen_http {
            listeners.push(ListenerSpec::http(address));
        }
        if let Some(address) = self.listen_https {
            match tls {
                Some(tls) => listeners.push(ListenerSpec::https(address, tls)),
                None => return Err(ConfigError::MissingTlsMaterial { address }),
            }
        }
        if let Some(path) = self.listen_unix {
            listeners.push(ListenerSpec::unix(path));
        }

        let store = StoreConfig {
            kind: self.dir.map(StoreKind::Directory).unwrap_or_default(),
            no_save: self.no_save,
        };

        let policy = AccessPolicy {
            credential: Credential::new(self.username, self.password),
            no_delete: self.no_delete,
            read_only: self.read_only,
            serve_file: self.serve_file,
        };

        ServerConfig::new(listeners, store, policy)
    }
}
