//! Data models
//!
//! Shared between commission-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are Unix millis.

pub mod calculation;
pub mod commission;
pub mod commission_config;
pub mod personal_settings;
pub mod statistics;

// Re-exports
pub use calculation::*;
pub use commission::*;
pub use commission_config::*;
pub use personal_settings::*;
pub use statistics::*;
