//! Shared types for the commission engine
//!
//! Domain models, error codes and response structures used by the
//! commission server and its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
