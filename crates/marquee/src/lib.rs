//! # Marquee
//!
//! A small movie service: search and detail backed by a third-party
//! metadata API, favorites and comments stored locally, and anonymous
//! guest identities held together by the request pipeline.
//!
//! Every route is a pipeline of validation and identity steps in front of
//! a handler; see the `marquee-middleware` crate for the pipeline itself.
//! This crate wires the route table and implements the handlers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::build_app;
pub use state::AppState;
