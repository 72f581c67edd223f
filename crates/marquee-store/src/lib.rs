//! # Marquee Store
//!
//! Persistence for user-generated state: guest identities, comments, and
//! favorites. The [`Store`] trait is the capability the pipeline and the
//! handlers program against; [`SqliteStore`] backs production and
//! [`MemoryStore`] backs the test suites with identical semantics.
//!
//! The store is a shared, lazily-initialized resource: [`SharedStore`]
//! guards initialization with a single-flight cell so the first request
//! triggers it and every later request reuses the same handle for the
//! process lifetime.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credential;
pub mod error;
pub mod memory;
pub mod records;
pub mod shared;
pub mod sqlite;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use records::{Comment, CommentWithAuthor, Favorite};
pub use shared::SharedStore;
pub use sqlite::SqliteStore;
pub use store::Store;
