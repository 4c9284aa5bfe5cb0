// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! TLS Transport
//!
//! Loads PEM certificate chains and private keys into a rustls
//! `ServerConfig` and provides [`TlsListener`], an `axum::serve::Listener`
//! that terminates TLS before handing streams to axum.
//!
//! Handshakes run on a `JoinSet` next to the accept loop so one slow or
//! hostile client cannot stall other connections. A handshake that fails or
//! exceeds [`HANDSHAKE_TIMEOUT`] drops only that connection.

use crate::domain::listener::TlsMaterial;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use std::fs::File;
use std::io::{self, BufReader};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_rustls::server::TlsStream;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, warn};

pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after a failed `accept` (e.g. out of file descriptors).
const ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No certificates found in {0}")]
    NoCertificates(PathBuf),

    #[error("No private key found in {0}")]
    NoPrivateKey(PathBuf),

    #[error("Invalid TLS configuration: {0}")]
    Config(#[from] rustls::Error),
}

/// Build a rustls server configuration from the certificate chain and key.
pub fn load_server_config(material: &TlsMaterial) -> Result<Arc<ServerConfig>, TlsError> {
    let certs = load_certs(&material.cert)?;
    let key = load_private_key(&material.key)?;

    let mut config = ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()?
    .with_no_client_auth()
    .with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

fn open(path: &Path) -> Result<BufReader<File>, TlsError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| TlsError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let mut reader = open(path)?;
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| TlsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if certs.is_empty() {
        return Err(TlsError::NoCertificates(path.to_path_buf()));
    }
    Ok(certs)
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    let mut reader = open(path)?;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|source| TlsError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| TlsError::NoPrivateKey(path.to_path_buf()))
}

type Handshake = (SocketAddr, io::Result<TlsStream<TcpStream>>);

/// TCP listener that yields TLS streams once their handshake completes
pub struct TlsListener {
    tcp: TcpListener,
    acceptor: TlsAcceptor,
    handshakes: JoinSet<Handshake>,
}

impl TlsListener {
    pub fn new(tcp: TcpListener, config: Arc<ServerConfig>) -> Self {
        Self {
            tcp,
            acceptor: TlsAcceptor::from(config),
            handshakes: JoinSet::new(),
        }
    }

    fn start_handshake(&mut self, stream: TcpStream, remote: SocketAddr) {
        let acceptor = self.acceptor.clone();
        self.handshakes.spawn(async move {
            let result = match tokio::time::timeout(HANDSHAKE_TIMEOUT, acceptor.accept(stream)).await {
                Ok(result) => result,
                Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "TLS handshake timed out")),
            };
            (remote, result)
        });
    }
}

impl axum::serve::Listener for TlsListener {
    type Io = TlsStream<TcpStream>;
    type Addr = SocketAddr;

    async fn accept(&mut self) -> (Self::Io, Self::Addr) {
        loop {
            tokio::select! {
                accepted = self.tcp.accept() => match accepted {
                    Ok((stream, remote)) => self.start_handshake(stream, remote),
                    Err(e) => {
                        warn!(error = %e, "TLS listener accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
                Some(joined) = self.handshakes.join_next() => match joined {
                    Ok((remote, Ok(stream))) => return (stream, remote),
                    Ok((remote, Err(e))) => debug!(%remote, error = %e, "TLS handshake failed"),
                    Err(e) => warn!(error = %e, "TLS handshake task failed"),
                },
            }
        }
    }

    fn local_addr(&self) -> io::Result<Self::Addr> {
        self.tcp.local_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_self_signed(dir: &TempDir) -> TlsMaterial {
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert_path = dir.path().join("cert.pem");
        let key_path = dir.path().join("key.pem");
        std::fs::write(&cert_path, cert.serialize_pem().unwrap()).unwrap();
        std::fs::write(&key_path, cert.serialize_private_key_pem()).unwrap();
        TlsMaterial {
            cert: cert_path,
            key: key_path,
        }
    }

    #[test]
    fn test_loads_self_signed_material() {
        let dir = TempDir::new().unwrap();
        let material = write_self_signed(&dir);

        let config = load_server_config(&material).unwrap();

        assert_eq!(config.alpn_protocols, vec![b"http/1.1".to_vec()]);
    }

    #[test]
    fn test_missing_certificate_file() {
        let dir = TempDir::new().unwrap();
        let material = TlsMaterial {
            cert: dir.path().join("absent.pem"),
            key: dir.path().join("absent.key"),
        };

        assert!(matches!(load_server_config(&material), Err(TlsError::Read { .. })));
    }

    #[test]
    fn test_empty_certificate_file() {
        let dir = TempDir::new().unwrap();
        let mut material = write_self_signed(&dir);
        let empty = dir.path().join("empty.pem");
        std::fs::write(&empty, b"").unwrap();
        material.cert = empty;

        assert!(matches!(load_server_config(&material), Err(TlsError::NoCertificates(_))));
    }

    #[test]
    fn test_key_file_without_key() {
        let dir = TempDir::new().unwrap();
        let mut material = write_self_signed(&dir);
        material.key = material.cert.clone();

        assert!(matches!(load_server_config(&material), Err(TlsError::NoPrivateKey(_))));
    }
}
