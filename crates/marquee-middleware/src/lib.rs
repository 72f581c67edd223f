//! # Marquee Middleware
//!
//! The request-processing pipeline: every route is a [`Pipeline`] of
//! [`Step`]s in declared order followed by a handler.
//!
//! ```text
//! Request → Validate → Identify → Handler
//!               │          │         │
//!               └──────────┴─────────┴──→ error translation → Response
//! ```
//!
//! ## Semantics
//!
//! - Steps run strictly in order. A step may **short-circuit** by producing
//!   a response; later steps and the handler are skipped.
//! - A step or handler failure stops the pipeline and is translated into a
//!   response by one shared path: client-facing statuses surface their
//!   message verbatim, anything 500 and above becomes a generic body with
//!   the detail logged server-side.
//! - Each request gets a fresh [`RequestContext`]; nothing is shared across
//!   requests.
//!
//! ## Stages
//!
//! Two steps cover every route in the application:
//!
//! - [`stages::Validate`] - declarative payload validation of query, body,
//!   and path parameters; sources without a declared schema must be empty.
//! - [`stages::Identify`] - resolves a bearer credential (cookie or header)
//!   to a guest identity, optionally auto-provisioning one.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod pipeline;
pub mod schema;
pub mod stages;
pub mod step;

pub use context::{RequestContext, ResolvedGuest, ValidatedPayloads};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use schema::{FieldSpec, Schema, Violation};
pub use step::{BoxFuture, Handler, Step, StepOutcome};
