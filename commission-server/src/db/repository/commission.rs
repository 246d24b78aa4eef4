//! Commission Repository

use async_trait::async_trait;
use shared::models::{
    CalculationResult, Commission, CommissionFilter, CommissionStatus, CommissionUpdate,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{CommissionRepository, NewCommission, PaymentRecord, RepoError, RepoResult};

const COLUMNS: &str = "id, company_id, title, commission_type, status, base_value, percentage, tax_percentage, commission_value, tax_value, net_value, user_id, property_id, expected_payment_date, notes, rejection_reason, payment_date, payment_method, transaction_id, approved_by, approved_at, rejected_by, rejected_at, paid_by, paid_at, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteCommissionRepository {
    pool: SqlitePool,
}

impl SqliteCommissionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Re-read a row after a conditional write
    ///
    /// With `rows_affected == 0` the guard failed: report why.
    async fn after_write(&self, id: i64, rows_affected: u64) -> RepoResult<Commission> {
        let current = self.find_by_id(id).await?;
        match current {
            None => Err(RepoError::NotFound(format!("Commission {id}"))),
            Some(c) if rows_affected == 0 => Err(RepoError::StatusMismatch {
                id,
                actual: c.status,
            }),
            Some(c) => Ok(c),
        }
    }
}

/// Append the filter predicates as `AND ...` clauses
///
/// Free-text search is not pushed down: SQLite `lower()` only folds ASCII,
/// so it is matched in Rust with [`CommissionFilter::matches`].
fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &CommissionFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(commission_type) = filter.commission_type {
        qb.push(" AND commission_type = ").push_bind(commission_type);
    }
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(from) = filter.created_from {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
        qb.push(" AND created_at < ").push_bind(to);
    }
    if let Some(min) = filter.min_value {
        qb.push(" AND commission_value >= ").push_bind(min);
    }
    if let Some(max) = filter.max_value {
        qb.push(" AND commission_value <= ").push_bind(max);
    }
}

#[async_trait]
impl CommissionRepository for SqliteCommissionRepository {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Commission>> {
        let commission = sqlx::query_as::<_, Commission>(&format!(
            "SELECT {COLUMNS} FROM commission WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(commission)
    }

    async fn insert(&self, data: NewCommission) -> RepoResult<Commission> {
        let id = shared::util::snowflake_id();
        let now = shared::util::now_millis();
        let v = &data.values;

        sqlx::query(
            "INSERT INTO commission (id, company_id, title, commission_type, status, base_value, percentage, tax_percentage, commission_value, tax_value, net_value, user_id, property_id, expected_payment_date, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 'PENDING', ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15)",
        )
        .bind(id)
        .bind(data.company_id)
        .bind(&data.title)
        .bind(data.commission_type)
        .bind(v.base_value)
        .bind(v.percentage)
        .bind(v.tax_percentage)
        .bind(v.commission_value)
        .bind(v.tax_value)
        .bind(v.net_value)
        .bind(data.user_id)
        .bind(&data.property_id)
        .bind(&data.expected_payment_date)
        .bind(&data.notes)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create commission".into()))
    }

    async fn query(&self, company_id: i64, filter: &CommissionFilter) -> RepoResult<Vec<Commission>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {COLUMNS} FROM commission WHERE company_id = "
        ));
        qb.push_bind(company_id);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC");

        let mut rows = qb
            .build_query_as::<Commission>()
            .fetch_all(&self.pool)
            .await?;
        if filter.search_term().is_some() {
            rows.retain(|c| filter.matches(c));
        }
        Ok(rows)
    }

    async fn update_pending(
        &self,
        id: i64,
        expected: CommissionStatus,
        data: &CommissionUpdate,
    ) -> RepoResult<Commission> {
        let now = shared::util::now_millis();
        let rows = sqlx::query(
            "UPDATE commission SET title = COALESCE(?1, title), base_value = COALESCE(?2, base_value), percentage = COALESCE(?3, percentage), tax_percentage = COALESCE(?4, tax_percentage), expected_payment_date = COALESCE(?5, expected_payment_date), notes = COALESCE(?6, notes), updated_at = ?7 WHERE id = ?8 AND status = ?9",
        )
        .bind(&data.title)
        .bind(data.base_value)
        .bind(data.percentage)
        .bind(data.tax_percentage)
        .bind(&data.expected_payment_date)
        .bind(&data.notes)
        .bind(now)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        self.after_write(id, rows.rows_affected()).await
    }

    async fn recalculate(
        &self,
        id: i64,
        expected: CommissionStatus,
        values: &CalculationResult,
    ) -> RepoResult<Commission> {
        let now = shared::util::now_millis();
        // Inputs are part of the guard: a concurrent edit invalidates these values
        let rows = sqlx::query(
            "UPDATE commission SET commission_value = ?1, tax_value = ?2, net_value = ?3, updated_at = ?4 WHERE id = ?5 AND status = ?6 AND base_value = ?7 AND percentage = ?8 AND tax_percentage = ?9",
        )
        .bind(values.commission_value)
        .bind(values.tax_value)
        .bind(values.net_value)
        .bind(now)
        .bind(id)
        .bind(expected)
        .bind(values.base_value)
        .bind(values.percentage)
        .bind(values.tax_percentage)
        .execute(&self.pool)
        .await?;

        self.after_write(id, rows.rows_affected()).await
    }

    async fn approve(
        &self,
        id: i64,
        expected: CommissionStatus,
        approver_id: i64,
        at: i64,
    ) -> RepoResult<Commission> {
        let rows = sqlx::query(
            "UPDATE commission SET status = 'APPROVED', approved_by = ?1, approved_at = ?2, updated_at = ?2 WHERE id = ?3 AND status = ?4",
        )
        .bind(approver_id)
        .bind(at)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        self.after_write(id, rows.rows_affected()).await
    }

    async fn reject(
        &self,
        id: i64,
        expected: CommissionStatus,
        approver_id: i64,
        at: i64,
        reason: &str,
    ) -> RepoResult<Commission> {
        let rows = sqlx::query(
            "UPDATE commission SET status = 'REJECTED', rejection_reason = ?1, rejected_by = ?2, rejected_at = ?3, updated_at = ?3 WHERE id = ?4 AND status = ?5",
        )
        .bind(reason)
        .bind(approver_id)
        .bind(at)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        self.after_write(id, rows.rows_affected()).await
    }

    async fn pay(
        &self,
        id: i64,
        expected: CommissionStatus,
        payer_id: i64,
        at: i64,
        payment: &PaymentRecord,
    ) -> RepoResult<Commission> {
        let rows = sqlx::query(
            "UPDATE commission SET status = 'PAID', payment_date = ?1, payment_method = ?2, transaction_id = ?3, paid_by = ?4, paid_at = ?5, updated_at = ?5 WHERE id = ?6 AND status = ?7",
        )
        .bind(&payment.payment_date)
        .bind(&payment.payment_method)
        .bind(&payment.transaction_id)
        .bind(payer_id)
        .bind(at)
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        self.after_write(id, rows.rows_affected()).await
    }

    async fn delete(&self, id: i64, expected: CommissionStatus) -> RepoResult<()> {
        let rows = sqlx::query("DELETE FROM commission WHERE id = ? AND status = ?")
            .bind(id)
            .bind(expected)
            .execute(&self.pool)
            .await?;

        if rows.rows_affected() == 0 {
            self.after_write(id, 0).await?;
        }
        Ok(())
    }
}
