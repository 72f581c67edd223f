//! # Marquee Server
//!
//! The HTTP shell around the request pipeline: a Hyper/Tokio accept loop,
//! request-body buffering, dispatch to per-route pipelines, and graceful
//! shutdown.
//!
//! The server knows nothing about validation, identity, or handlers: it
//! buffers the request, asks the [`App`] route table for the matching
//! pipeline, and writes back whatever response the pipeline produced.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app;
pub mod server;
pub mod shutdown;

pub use app::App;
pub use server::{Server, ServerError};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
