//! # Marquee Core
//!
//! Core types shared by every Marquee crate: the pipeline error union,
//! the guest identity record, and the buffered HTTP request/response
//! types that flow through the request pipeline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod identity;
pub mod types;

pub use error::{MarqueeError, MarqueeResult};
pub use identity::GuestIdentity;
pub use types::{RequestParts, Response, ResponseExt};
