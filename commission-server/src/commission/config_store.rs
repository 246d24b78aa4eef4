//! Company commission configuration
//!
//! One active configuration per company. Updates replace the four
//! percentages wholesale; deletion is a soft deactivation.

use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{
    CommissionConfig, CommissionConfigCreate, CommissionConfigUpdate, CommissionType, CompanyRates,
};

use crate::auth::permissions::CONFIG_MANAGE;
use crate::auth::{Authorizer, CurrentUser, ensure_allowed};
use crate::db::repository::{CommissionConfigRepository, RepoError};
use crate::utils::validation::validate_percentage;
use crate::utils::{AppError, AppResult};

/// Source of the company-owned commission rates
///
/// Consumed by the personal settings store; the rates are read-only from
/// its point of view.
#[async_trait]
pub trait CompanyRatesSource: Send + Sync {
    /// `Ok(None)` when the company has no active configuration
    async fn fetch_rates(&self, company_id: i64) -> AppResult<Option<CompanyRates>>;
}

fn validate_percentages(sale: f64, rental: f64, profit: f64, rental_profit: f64) -> AppResult<()> {
    validate_percentage(sale, "sale_commission_percentage")?;
    validate_percentage(rental, "rental_commission_percentage")?;
    validate_percentage(profit, "company_profit_percentage")?;
    validate_percentage(rental_profit, "company_rental_profit_percentage")?;
    Ok(())
}

pub struct ConfigStore {
    repo: Arc<dyn CommissionConfigRepository>,
    authorizer: Arc<dyn Authorizer>,
}

impl ConfigStore {
    pub fn new(repo: Arc<dyn CommissionConfigRepository>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { repo, authorizer }
    }

    /// The active configuration, `ConfigNotFound` if there is none
    pub async fn get_config(&self, company_id: i64) -> AppResult<CommissionConfig> {
        self.repo
            .find_active(company_id)
            .await?
            .ok_or_else(|| AppError::config_not_found(company_id))
    }

    /// Commission percentage for a new commission of `commission_type`
    ///
    /// Zero while no configuration is active.
    pub async fn default_percentage(
        &self,
        company_id: i64,
        commission_type: CommissionType,
    ) -> AppResult<f64> {
        Ok(self
            .repo
            .find_active(company_id)
            .await?
            .map(|c| c.percentage_for(commission_type))
            .unwrap_or(0.0))
    }

    pub async fn create_config(
        &self,
        user: &CurrentUser,
        data: CommissionConfigCreate,
    ) -> AppResult<CommissionConfig> {
        ensure_allowed(self.authorizer.as_ref(), user, CONFIG_MANAGE)?;
        validate_percentages(
            data.sale_commission_percentage,
            data.rental_commission_percentage,
            data.company_profit_percentage,
            data.company_rental_profit_percentage,
        )?;

        let config = self
            .repo
            .insert(user.company_id, &data)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(msg) => {
                    tracing::warn!(company_id = user.company_id, "Active commission config already exists");
                    AppError::conflict(msg).with_detail("company_id", user.company_id)
                }
                other => other.into(),
            })?;

        tracing::info!(
            company_id = config.company_id,
            config_id = config.id,
            actor = user.id,
            "Commission config created"
        );
        Ok(config)
    }

    pub async fn update_config(
        &self,
        user: &CurrentUser,
        data: CommissionConfigUpdate,
    ) -> AppResult<CommissionConfig> {
        ensure_allowed(self.authorizer.as_ref(), user, CONFIG_MANAGE)?;
        validate_percentages(
            data.sale_commission_percentage,
            data.rental_commission_percentage,
            data.company_profit_percentage,
            data.company_rental_profit_percentage,
        )?;

        let config = self
            .repo
            .replace_percentages(user.company_id, &data)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => AppError::config_not_found(user.company_id),
                other => other.into(),
            })?;

        tracing::info!(
            company_id = config.company_id,
            config_id = config.id,
            actor = user.id,
            "Commission config updated"
        );
        Ok(config)
    }

    /// Soft-deactivate; new commissions fall back to a 0% rate afterwards
    pub async fn deactivate_config(&self, user: &CurrentUser) -> AppResult<CommissionConfig> {
        ensure_allowed(self.authorizer.as_ref(), user, CONFIG_MANAGE)?;

        let config = self
            .repo
            .deactivate(user.company_id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => AppError::config_not_found(user.company_id),
                other => other.into(),
            })?;

        tracing::info!(
            company_id = config.company_id,
            config_id = config.id,
            actor = user.id,
            "Commission config deactivated"
        );
        Ok(config)
    }
}

#[async_trait]
impl CompanyRatesSource for ConfigStore {
    async fn fetch_rates(&self, company_id: i64) -> AppResult<Option<CompanyRates>> {
        Ok(self
            .repo
            .find_active(company_id)
            .await?
            .map(|c| CompanyRates {
                sale: c.sale_commission_percentage,
                rental: c.rental_commission_percentage,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::RoleAuthorizer;
    use crate::db::repository::SqliteCommissionConfigRepository;
    use crate::db::repository::test_support::test_pool;
    use crate::utils::ErrorCode;

    fn admin() -> CurrentUser {
        CurrentUser {
            id: 1,
            company_id: 10,
            username: "admin".into(),
            role: "admin".into(),
            permissions: vec![],
        }
    }

    fn broker() -> CurrentUser {
        CurrentUser {
            id: 2,
            company_id: 10,
            username: "broker".into(),
            role: "broker".into(),
            permissions: vec!["commissions:view_all".into()],
        }
    }

    fn dto(sale: f64) -> CommissionConfigCreate {
        CommissionConfigCreate {
            sale_commission_percentage: sale,
            rental_commission_percentage: 10.0,
            company_profit_percentage: 40.0,
            company_rental_profit_percentage: 30.0,
        }
    }

    async fn store() -> ConfigStore {
        let repo = Arc::new(SqliteCommissionConfigRepository::new(test_pool().await));
        ConfigStore::new(repo, Arc::new(RoleAuthorizer))
    }

    #[tokio::test]
    async fn conflict_then_deactivate_then_create() {
        let store = store().await;
        assert_eq!(
            store.get_config(10).await.unwrap_err().code,
            ErrorCode::ConfigNotFound
        );

        store.create_config(&admin(), dto(6.0)).await.unwrap();
        let err = store.create_config(&admin(), dto(7.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigAlreadyActive);

        store.deactivate_config(&admin()).await.unwrap();
        assert_eq!(
            store
                .default_percentage(10, CommissionType::Sale)
                .await
                .unwrap(),
            0.0
        );

        let fresh = store.create_config(&admin(), dto(7.0)).await.unwrap();
        assert_eq!(store.get_config(10).await.unwrap(), fresh);
        assert_eq!(
            store
                .default_percentage(10, CommissionType::Sale)
                .await
                .unwrap(),
            7.0
        );
    }

    #[tokio::test]
    async fn management_requires_permission() {
        let store = store().await;
        for err in [
            store.create_config(&broker(), dto(6.0)).await.unwrap_err(),
            store
                .update_config(&broker(), dto(6.0).into())
                .await
                .unwrap_err(),
            store.deactivate_config(&broker()).await.unwrap_err(),
        ] {
            assert_eq!(err.code, ErrorCode::PermissionDenied);
        }
    }

    #[tokio::test]
    async fn update_validates_and_requires_active() {
        let store = store().await;
        assert_eq!(
            store
                .update_config(&admin(), dto(6.0).into())
                .await
                .unwrap_err()
                .code,
            ErrorCode::ConfigNotFound
        );

        store.create_config(&admin(), dto(6.0)).await.unwrap();
        assert_eq!(
            store
                .update_config(&admin(), dto(101.0).into())
                .await
                .unwrap_err()
                .code,
            ErrorCode::ValueOutOfRange
        );

        let updated = store.update_config(&admin(), dto(4.5).into()).await.unwrap();
        assert_eq!(updated.sale_commission_percentage, 4.5);
        let rates = store.fetch_rates(10).await.unwrap().unwrap();
        assert_eq!(rates.sale, 4.5);
        assert_eq!(rates.rental, 10.0);
    }
}
