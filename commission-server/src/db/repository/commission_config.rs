//! Commission Config Repository

use async_trait::async_trait;
use shared::models::{CommissionConfig, CommissionConfigCreate, CommissionConfigUpdate};
use sqlx::SqlitePool;

use super::{CommissionConfigRepository, RepoError, RepoResult};

const COLUMNS: &str = "id, company_id, sale_commission_percentage, rental_commission_percentage, company_profit_percentage, company_rental_profit_percentage, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteCommissionConfigRepository {
    pool: SqlitePool,
}

impl SqliteCommissionConfigRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<CommissionConfig>> {
        let config = sqlx::query_as::<_, CommissionConfig>(&format!(
            "SELECT {COLUMNS} FROM commission_config WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(config)
    }

    fn no_active(company_id: i64) -> RepoError {
        RepoError::NotFound(format!(
            "Active commission config for company {company_id}"
        ))
    }
}

#[async_trait]
impl CommissionConfigRepository for SqliteCommissionConfigRepository {
    async fn find_active(&self, company_id: i64) -> RepoResult<Option<CommissionConfig>> {
        let config = sqlx::query_as::<_, CommissionConfig>(&format!(
            "SELECT {COLUMNS} FROM commission_config WHERE company_id = ? AND is_active = 1"
        ))
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(config)
    }

    async fn insert(
        &self,
        company_id: i64,
        data: &CommissionConfigCreate,
    ) -> RepoResult<CommissionConfig> {
        let id = shared::util::snowflake_id();
        let now = shared::util::now_millis();

        // The partial unique index rejects a second active row atomically
        sqlx::query(
            "INSERT INTO commission_config (id, company_id, sale_commission_percentage, rental_commission_percentage, company_profit_percentage, company_rental_profit_percentage, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
        )
        .bind(id)
        .bind(company_id)
        .bind(data.sale_commission_percentage)
        .bind(data.rental_commission_percentage)
        .bind(data.company_profit_percentage)
        .bind(data.company_rental_profit_percentage)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => RepoError::Duplicate(format!(
                "Company {company_id} already has an active commission config"
            )),
            other => other,
        })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create commission config".into()))
    }

    async fn replace_percentages(
        &self,
        company_id: i64,
        data: &CommissionConfigUpdate,
    ) -> RepoResult<CommissionConfig> {
        let now = shared::util::now_millis();
        let rows = sqlx::query(
            "UPDATE commission_config SET sale_commission_percentage = ?1, rental_commission_percentage = ?2, company_profit_percentage = ?3, company_rental_profit_percentage = ?4, updated_at = ?5 WHERE company_id = ?6 AND is_active = 1",
        )
        .bind(data.sale_commission_percentage)
        .bind(data.rental_commission_percentage)
        .bind(data.company_profit_percentage)
        .bind(data.company_rental_profit_percentage)
        .bind(now)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        if rows.rows_affected() == 0 {
            return Err(Self::no_active(company_id));
        }
        self.find_active(company_id)
            .await?
            .ok_or_else(|| Self::no_active(company_id))
    }

    async fn deactivate(&self, company_id: i64) -> RepoResult<CommissionConfig> {
        let now = shared::util::now_millis();
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE commission_config SET is_active = 0, updated_at = ?1 WHERE company_id = ?2 AND is_active = 1 RETURNING id",
        )
        .bind(now)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        let (id,) = row.ok_or_else(|| Self::no_active(company_id))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::Database("Deactivated config vanished".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn create_dto() -> CommissionConfigCreate {
        CommissionConfigCreate {
            sale_commission_percentage: 6.0,
            rental_commission_percentage: 10.0,
            company_profit_percentage: 40.0,
            company_rental_profit_percentage: 30.0,
        }
    }

    #[tokio::test]
    async fn second_active_config_is_duplicate() {
        let repo = SqliteCommissionConfigRepository::new(test_pool().await);

        let first = repo.insert(1, &create_dto()).await.unwrap();
        assert!(first.is_active);

        let err = repo.insert(1, &create_dto()).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        // Other companies are independent
        assert!(repo.insert(2, &create_dto()).await.is_ok());
    }

    #[tokio::test]
    async fn deactivate_frees_the_slot_and_keeps_the_row() {
        let repo = SqliteCommissionConfigRepository::new(test_pool().await);
        let first = repo.insert(1, &create_dto()).await.unwrap();

        let old = repo.deactivate(1).await.unwrap();
        assert_eq!(old.id, first.id);
        assert!(!old.is_active);
        assert!(repo.find_active(1).await.unwrap().is_none());
        assert!(repo.find_by_id(first.id).await.unwrap().is_some());

        assert!(matches!(
            repo.deactivate(1).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
        assert!(repo.insert(1, &create_dto()).await.is_ok());
    }

    #[tokio::test]
    async fn replace_percentages_requires_active_config() {
        let repo = SqliteCommissionConfigRepository::new(test_pool().await);
        let update = CommissionConfigUpdate {
            sale_commission_percentage: 5.0,
            rental_commission_percentage: 8.0,
            company_profit_percentage: 50.0,
            company_rental_profit_percentage: 20.0,
        };
        assert!(matches!(
            repo.replace_percentages(1, &update).await.unwrap_err(),
            RepoError::NotFound(_)
        ));

        repo.insert(1, &create_dto()).await.unwrap();
        let updated = repo.replace_percentages(1, &update).await.unwrap();
        assert_eq!(updated.sale_commission_percentage, 5.0);
        assert_eq!(updated.company_rental_profit_percentage, 20.0);
    }
}
