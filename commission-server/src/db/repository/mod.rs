//! Repository Module
//!
//! Persistence contract of the commission engine plus its SQLite adapter.
//! Services depend on the traits only; row shapes are normalized into the
//! canonical `shared::models` types here.

pub mod commission;
pub mod commission_config;
pub mod personal_settings;

pub use commission::SqliteCommissionRepository;
pub use commission_config::SqliteCommissionConfigRepository;
pub use personal_settings::SqlitePersonalSettingsRepository;

use async_trait::async_trait;
use shared::models::{
    CalculationResult, Commission, CommissionConfig, CommissionConfigCreate,
    CommissionConfigUpdate, CommissionFilter, CommissionStatus, CommissionType,
    CommissionUpdate, PersonalCommissionSettings,
};
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// A conditional update found the row in another status
    #[error("Commission {id} is {actual}")]
    StatusMismatch { id: i64, actual: CommissionStatus },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error()
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::StatusMismatch { id, actual } => AppError::invalid_transition(format!(
                "Commission {id} is {actual}"
            ))
            .with_detail("id", id)
            .with_detail("status", actual.as_str()),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Persistence failure");
                AppError::database(msg)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Values of a commission row written on insert
#[derive(Debug, Clone)]
pub struct NewCommission {
    pub company_id: i64,
    pub title: String,
    pub commission_type: CommissionType,
    pub user_id: i64,
    pub property_id: String,
    pub expected_payment_date: Option<String>,
    pub notes: Option<String>,
    /// Inputs and derived values, frozen until recalculated
    pub values: CalculationResult,
}

/// Payment details recorded by the PAID transition
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub payment_date: String,
    pub payment_method: String,
    pub transaction_id: String,
}

/// Company configuration persistence
#[async_trait]
pub trait CommissionConfigRepository: Send + Sync {
    /// The active configuration of a company, if any
    async fn find_active(&self, company_id: i64) -> RepoResult<Option<CommissionConfig>>;

    /// Insert a new active configuration; `Duplicate` if one is already active
    async fn insert(
        &self,
        company_id: i64,
        data: &CommissionConfigCreate,
    ) -> RepoResult<CommissionConfig>;

    /// Replace the four percentages of the active configuration
    async fn replace_percentages(
        &self,
        company_id: i64,
        data: &CommissionConfigUpdate,
    ) -> RepoResult<CommissionConfig>;

    /// Soft-deactivate the active configuration
    async fn deactivate(&self, company_id: i64) -> RepoResult<CommissionConfig>;
}

/// Commission persistence
///
/// Every mutation is conditional on the status the caller observed
/// (`WHERE id = ? AND status = ?`). Zero affected rows yields `NotFound`
/// when the row is gone, `StatusMismatch` otherwise.
#[async_trait]
pub trait CommissionRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Commission>>;

    async fn insert(&self, data: NewCommission) -> RepoResult<Commission>;

    /// Company commissions matching `filter`, newest first
    async fn query(&self, company_id: i64, filter: &CommissionFilter) -> RepoResult<Vec<Commission>>;

    /// Patch editable fields; derived values are left as they are
    async fn update_pending(
        &self,
        id: i64,
        expected: CommissionStatus,
        data: &CommissionUpdate,
    ) -> RepoResult<Commission>;

    /// Overwrite the derived values
    async fn recalculate(
        &self,
        id: i64,
        expected: CommissionStatus,
        values: &CalculationResult,
    ) -> RepoResult<Commission>;

    async fn approve(
        &self,
        id: i64,
        expected: CommissionStatus,
        approver_id: i64,
        at: i64,
    ) -> RepoResult<Commission>;

    async fn reject(
        &self,
        id: i64,
        expected: CommissionStatus,
        approver_id: i64,
        at: i64,
        reason: &str,
    ) -> RepoResult<Commission>;

    async fn pay(
        &self,
        id: i64,
        expected: CommissionStatus,
        payer_id: i64,
        at: i64,
        payment: &PaymentRecord,
    ) -> RepoResult<Commission>;

    async fn delete(&self, id: i64, expected: CommissionStatus) -> RepoResult<()>;
}

/// Local snapshots of personal settings, keyed by broker
#[async_trait]
pub trait PersonalSettingsRepository: Send + Sync {
    async fn load(&self, user_id: i64) -> RepoResult<Option<PersonalCommissionSettings>>;

    async fn save(&self, user_id: i64, settings: &PersonalCommissionSettings) -> RepoResult<()>;

    async fn clear(&self, user_id: i64) -> RepoResult<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::DbService;
    use sqlx::SqlitePool;

    /// In-memory SQLite pool with the production schema
    pub async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }
}
