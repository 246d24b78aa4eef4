//! Commission engine
//!
//! - [`calculation`]: pure arithmetic (commission, breakdown, simulate)
//! - [`config_store`]: the company's active commission configuration
//! - [`settings_store`]: per-broker personal settings with company-owned rates merged in
//! - [`lifecycle`]: PENDING → APPROVED/REJECTED → PAID state machine
//! - [`statistics`]: aggregates over the visible commission set

pub mod calculation;
pub mod config_store;
pub mod lifecycle;
pub mod settings_store;
pub mod statistics;

pub use config_store::{CompanyRatesSource, ConfigStore};
pub use lifecycle::{Action, CommissionLifecycle};
pub use settings_store::PersonalSettingsStore;
pub use statistics::StatisticsAggregator;
