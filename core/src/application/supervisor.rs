// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Listener Supervisor
//!
//! Runs one task per configured listener. All tasks share a single
//! [`RequestPipeline`] and a single failure channel.
//!
//! A listener never terminates successfully: a bind error, a TLS material
//! error, or the serve loop returning for any reason is reported once as a
//! [`ListenerFailure`]. [`ListenerSupervisor::run`] resolves with the first
//! failure; the caller exits the process and sibling listeners are abandoned
//! rather than drained.

use crate::application::pipeline::RequestPipeline;
use crate::domain::config::ConfigError;
use crate::domain::listener::{ListenerSpec, Transport};
use crate::infrastructure::tls::{self, TlsError, TlsListener};
use crate::presentation::http::router;
use axum::serve::ListenerExt;
use axum::Router;
use std::convert::Infallible;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind: {0}")]
    Bind(#[source] io::Error),

    #[error("failed to load TLS material: {0}")]
    Tls(#[from] TlsError),

    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    #[error("server stopped serving")]
    Stopped,

    #[error("listener task aborted: {0}")]
    Aborted(String),

    #[error("{0} listeners are not supported on this platform")]
    Unsupported(Transport),
}

/// Terminal report from one listener task
#[derive(Debug)]
pub struct ListenerFailure {
    pub transport: Transport,
    pub address: String,
    pub error: ListenerError,
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error on {}: {}", self.transport, self.address, self.error)
    }
}

impl std::error::Error for ListenerFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

pub struct ListenerSupervisor {
    listeners: Vec<ListenerSpec>,
    pipeline: Arc<RequestPipeline>,
}

impl ListenerSupervisor {
    /// Fails before anything is spawned when no listener is configured.
    pub fn new(
        listeners: Vec<ListenerSpec>,
        pipeline: Arc<RequestPipeline>,
    ) -> Result<Self, ConfigError> {
        if listeners.is_empty() {
            return Err(ConfigError::NoListeners);
        }
        Ok(Self {
            listeners,
            pipeline,
        })
    }

    /// Start every listener and wait for the first failure.
    pub async fn run(self) -> ListenerFailure {
        let (failures, mut first) = mpsc::channel(self.listeners.len());
        let fallback = self.listeners[0].clone();

        for spec in self.listeners {
            let failures = failures.clone();
            let app = router(self.pipeline.clone());

            tokio::spawn(async move {
                let transport = spec.transport;
                let address = spec.address.clone();

                // Inner task so a panic is still reported exactly once
                let error = match tokio::spawn(serve(spec, app)).await {
                    Ok(Err(error)) => error,
                    Ok(Ok(never)) => match never {},
                    Err(join_error) => ListenerError::Aborted(join_error.to_string()),
                };

                // Closed receiver means the supervisor already has its answer
                let _ = failures
                    .send(ListenerFailure {
                        transport,
                        address,
                        error,
                    })
                    .await;
            });
        }
        drop(failures);

        first_failure(first.recv().await, &fallback)
    }
}

// A closed channel with nothing in it means every task vanished silently.
fn first_failure(received: Option<ListenerFailure>, fallback: &ListenerSpec) -> ListenerFailure {
    received.unwrap_or_else(|| ListenerFailure {
        transport: fallback.transport,
        address: fallback.address.clone(),
        error: ListenerError::Aborted("listener tasks ended without reporting".to_string()),
    })
}

async fn serve(spec: ListenerSpec, app: Router) -> Result<Infallible, ListenerError> {
    match spec.transport {
        Transport::Http => serve_http(&spec.address, app).await,
        Transport::Https => serve_https(&spec, app).await,
        Transport::Unix => serve_unix(&spec.address, app).await,
    }
}

async fn serve_http(address: &str, app: Router) -> Result<Infallible, ListenerError> {
    let listener = TcpListener::bind(address).await.map_err(ListenerError::Bind)?;
    log_bound(Transport::Http, listener.local_addr());

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(ListenerError::Serve)?;

    Err(ListenerError::Stopped)
}

async fn serve_https(spec: &ListenerSpec, app: Router) -> Result<Infallible, ListenerError> {
    let material = spec.tls.as_ref().ok_or_else(|| {
        ListenerError::Bind(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no certificate and key configured",
        ))
    })?;
    let config = tls::load_server_config(material)?;

    let tcp = TcpListener::bind(&spec.address).await.map_err(ListenerError::Bind)?;
    log_bound(Transport::Https, tcp.local_addr());

    // TapIo carries the peer SocketAddr through to ConnectInfo
    let listener = TlsListener::new(tcp, config).tap_io(|_| ());
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(ListenerError::Serve)?;

    Err(ListenerError::Stopped)
}

#[cfg(unix)]
async fn serve_unix(path: &str, app: Router) -> Result<Infallible, ListenerError> {
    let listener = tokio::net::UnixListener::bind(path).map_err(ListenerError::Bind)?;
    info!(transport = %Transport::Unix, address = %path, "Serving");

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ListenerError::Serve)?;

    Err(ListenerError::Stopped)
}

#[cfg(not(unix))]
async fn serve_unix(_path: &str, _app: Router) -> Result<Infallible, ListenerError> {
    Err(ListenerError::Unsupported(Transport::Unix))
}

fn log_bound(transport: Transport, local: io::Result<SocketAddr>) {
    match local {
        Ok(addr) => info!(%transport, address = %addr, "Serving"),
        Err(e) => info!(%transport, error = %e, "Serving (local address unavailable)"),
    }
}
