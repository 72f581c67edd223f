//! The pipeline stages used by every route.
//!
//! - [`Validate`] - payload validation against declared schemas.
//! - [`Identify`] - guest resolution from the bearer credential.

pub mod identify;
pub mod validate;

pub use identify::{Identify, ACCESS_TOKEN_COOKIE};
pub use validate::{Validate, ValidationSpec};
