//! Personal Settings Repository
//!
//! Stores the locally owned settings snapshot as a JSON document per broker.

use async_trait::async_trait;
use shared::models::PersonalCommissionSettings;
use sqlx::SqlitePool;

use super::{PersonalSettingsRepository, RepoError, RepoResult};

#[derive(Clone)]
pub struct SqlitePersonalSettingsRepository {
    pool: SqlitePool,
}

impl SqlitePersonalSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonalSettingsRepository for SqlitePersonalSettingsRepository {
    async fn load(&self, user_id: i64) -> RepoResult<Option<PersonalCommissionSettings>> {
        let payload: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM personal_settings WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        payload
            .map(|(json,)| {
                serde_json::from_str(&json).map_err(|e| {
                    RepoError::Database(format!("Corrupt settings snapshot for user {user_id}: {e}"))
                })
            })
            .transpose()
    }

    async fn save(&self, user_id: i64, settings: &PersonalCommissionSettings) -> RepoResult<()> {
        let payload = serde_json::to_string(settings)
            .map_err(|e| RepoError::Validation(format!("Unserializable settings: {e}")))?;
        let now = shared::util::now_millis();

        sqlx::query(
            "INSERT INTO personal_settings (user_id, payload, updated_at) VALUES (?1, ?2, ?3) ON CONFLICT(user_id) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear(&self, user_id: i64) -> RepoResult<()> {
        sqlx::query("DELETE FROM personal_settings WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn save_replaces_wholesale_and_clear_removes() {
        let repo = SqlitePersonalSettingsRepository::new(test_pool().await);
        assert!(repo.load(5).await.unwrap().is_none());

        let mut settings = PersonalCommissionSettings::default();
        settings.monthly_goal = 25_000.0;
        repo.save(5, &settings).await.unwrap();

        settings.operational_costs.transport_cost = 0.0;
        repo.save(5, &settings).await.unwrap();
        assert_eq!(repo.load(5).await.unwrap(), Some(settings));

        repo.clear(5).await.unwrap();
        assert!(repo.load(5).await.unwrap().is_none());
    }
}
