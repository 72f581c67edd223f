//! HTTP server implementation.
//!
//! Binds the configured address, accepts connections until shutdown, and
//! serves each over HTTP/1.1. Request bodies are collected to memory before
//! dispatch so the pipeline's validation stage can parse them.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http::Request;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;

use marquee_core::{RequestParts, Response, ResponseExt};

use crate::app::App;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Server startup and I/O errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address could not be bound.
    #[error("failed to bind {addr}: {detail}")]
    Bind {
        /// The address that was requested.
        addr: String,
        /// The underlying failure.
        detail: String,
    },
}

/// The Marquee HTTP server.
pub struct Server {
    addr: String,
    app: Arc<App>,
    shutdown_timeout: Duration,
}

impl Server {
    /// Creates a server for the given bind address and route table.
    #[must_use]
    pub fn new(addr: impl Into<String>, app: App) -> Self {
        Self {
            addr: addr.into(),
            app: Arc::new(app),
            shutdown_timeout: Duration::from_secs(30),
        }
    }

    /// Sets how long shutdown waits for in-flight connections.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Runs the server until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Runs the server with a caller-controlled shutdown signal.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr: SocketAddr = self.addr.parse().map_err(|e| ServerError::Bind {
            addr: self.addr.clone(),
            detail: format!("invalid address: {e}"),
        })?;

        let listener = TcpListener::bind(addr).await.map_err(|e| ServerError::Bind {
            addr: self.addr.clone(),
            detail: e.to_string(),
        })?;

        tracing::info!(addr = %addr, "server listening");

        let app = Arc::clone(&self.app);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, remote_addr)) => {
                            let app = Arc::clone(&app);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) =
                                    serve_connection(stream, app, shutdown).await
                                {
                                    tracing::debug!(remote = %remote_addr, error = %e, "connection ended with error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping accept loop");
                    break;
                }
            }
        }

        tracing::info!(
            active = tracker.active_connections(),
            timeout_secs = self.shutdown_timeout.as_secs(),
            "waiting for in-flight connections"
        );

        tokio::select! {
            () = tracker.wait_for_idle() => {
                tracing::info!("all connections closed");
            }
            () = tokio::time::sleep(self.shutdown_timeout) => {
                tracing::warn!(
                    active = tracker.active_connections(),
                    "shutdown timeout reached with connections still active"
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn serve_connection(
    stream: tokio::net::TcpStream,
    app: Arc<App>,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);

    let service = service_fn(move |req: Request<Incoming>| {
        let app = Arc::clone(&app);
        async move { handle_request(app, req).await }
    });

    let conn = http1::Builder::new().serve_connection(io, service);

    tokio::select! {
        result = conn => result,
        () = shutdown.recv() => Ok(()),
    }
}

async fn handle_request(
    app: Arc<App>,
    req: Request<Incoming>,
) -> Result<Response, Infallible> {
    let (head, body) = req.into_parts();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::error!(error = %e, "failed to read request body");
            return Ok(Response::json_error(
                http::StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ));
        }
    };

    let parts = RequestParts::new(head.method, head.uri, head.headers, body);
    Ok(app.dispatch(parts).await)
}
