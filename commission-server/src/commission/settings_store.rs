//! Personal commission settings
//!
//! A broker's settings mix two owners: the company configuration owns the
//! sale and rental rates, the broker owns everything else. Ownership is an
//! explicit table and [`merge`] only copies fields the remote side owns.

use std::sync::Arc;

use dashmap::DashMap;
use shared::models::{
    CompanyRates, LoadedSettings, PersonalCommissionSettings, SettingsSource,
};

use crate::auth::CurrentUser;
use crate::commission::calculation::validate_settings;
use crate::commission::config_store::CompanyRatesSource;
use crate::db::repository::PersonalSettingsRepository;
use crate::utils::AppResult;

/// Addressable fields of [`PersonalCommissionSettings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    SaleRate,
    RentalRate,
    ManagementRate,
    AdvertisingCost,
    TransportCost,
    OfficeExpenses,
    IncomeTax,
    SocialSecurity,
    OtherTaxes,
    CompanyBonus,
    ReferralBonusEnabled,
    ReferralBonusValue,
    MonthlyGoal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOwner {
    /// Company configuration; overwritten on every load
    Remote,
    /// Broker; persisted locally
    Local,
}

/// Who owns each settings field
pub const FIELD_OWNERSHIP: &[(SettingsField, FieldOwner)] = &[
    (SettingsField::SaleRate, FieldOwner::Remote),
    (SettingsField::RentalRate, FieldOwner::Remote),
    (SettingsField::ManagementRate, FieldOwner::Local),
    (SettingsField::AdvertisingCost, FieldOwner::Local),
    (SettingsField::TransportCost, FieldOwner::Local),
    (SettingsField::OfficeExpenses, FieldOwner::Local),
    (SettingsField::IncomeTax, FieldOwner::Local),
    (SettingsField::SocialSecurity, FieldOwner::Local),
    (SettingsField::OtherTaxes, FieldOwner::Local),
    (SettingsField::CompanyBonus, FieldOwner::Local),
    (SettingsField::ReferralBonusEnabled, FieldOwner::Local),
    (SettingsField::ReferralBonusValue, FieldOwner::Local),
    (SettingsField::MonthlyGoal, FieldOwner::Local),
];

pub fn owner_of(field: SettingsField) -> FieldOwner {
    FIELD_OWNERSHIP
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, owner)| *owner)
        .unwrap_or(FieldOwner::Local)
}

/// Copy one remote-owned field into `settings`
///
/// Returns false for fields the remote side does not carry.
fn apply_remote_field(
    settings: &mut PersonalCommissionSettings,
    field: SettingsField,
    remote: &CompanyRates,
) -> bool {
    match field {
        SettingsField::SaleRate => settings.commission_rates.sale = remote.sale,
        SettingsField::RentalRate => settings.commission_rates.rental = remote.rental,
        _ => return false,
    }
    true
}

/// Local snapshot with every remote-owned field taken from `remote`
pub fn merge(local: &PersonalCommissionSettings, remote: &CompanyRates) -> PersonalCommissionSettings {
    let mut merged = local.clone();
    for (field, owner) in FIELD_OWNERSHIP {
        if *owner == FieldOwner::Remote && !apply_remote_field(&mut merged, *field, remote) {
            tracing::error!(?field, "Remote-owned settings field has no remote value");
        }
    }
    merged
}

/// Personal settings store
///
/// Snapshots are cached per broker in front of the local repository.
pub struct PersonalSettingsStore {
    remote: Arc<dyn CompanyRatesSource>,
    local: Arc<dyn PersonalSettingsRepository>,
    cache: DashMap<i64, PersonalCommissionSettings>,
}

impl PersonalSettingsStore {
    pub fn new(
        remote: Arc<dyn CompanyRatesSource>,
        local: Arc<dyn PersonalSettingsRepository>,
    ) -> Self {
        Self {
            remote,
            local,
            cache: DashMap::new(),
        }
    }

    /// Last local snapshot, or built-in defaults
    async fn snapshot(&self, user_id: i64) -> AppResult<PersonalCommissionSettings> {
        if let Some(cached) = self.cache.get(&user_id) {
            return Ok(cached.clone());
        }
        let settings = self.local.load(user_id).await?.unwrap_or_default();
        self.cache.insert(user_id, settings.clone());
        Ok(settings)
    }

    /// Monthly goal from the cached or saved snapshot
    ///
    /// Read-only: neither the remote rates nor the cache are touched.
    pub async fn monthly_goal(&self, user: &CurrentUser) -> AppResult<f64> {
        if let Some(cached) = self.cache.get(&user.id) {
            return Ok(cached.monthly_goal);
        }
        Ok(self
            .local
            .load(user.id)
            .await?
            .unwrap_or_default()
            .monthly_goal)
    }

    /// Load settings, refreshing the company-owned rates
    ///
    /// When the company rates cannot be fetched (or no configuration is
    /// active) the cached snapshot is returned unchanged.
    pub async fn load_settings(&self, user: &CurrentUser) -> AppResult<LoadedSettings> {
        let cached = self.snapshot(user.id).await?;

        match self.remote.fetch_rates(user.company_id).await {
            Ok(Some(rates)) => {
                let merged = merge(&cached, &rates);
                self.cache.insert(user.id, merged.clone());
                Ok(LoadedSettings {
                    settings: merged,
                    source: SettingsSource::Merged,
                })
            }
            Ok(None) => {
                tracing::debug!(company_id = user.company_id, "No active config, using cached settings");
                Ok(LoadedSettings {
                    settings: cached,
                    source: SettingsSource::Cached,
                })
            }
            Err(e) => {
                tracing::warn!(
                    company_id = user.company_id,
                    user_id = user.id,
                    error = %e,
                    "Company rates unavailable, using cached settings"
                );
                Ok(LoadedSettings {
                    settings: cached,
                    source: SettingsSource::Cached,
                })
            }
        }
    }

    /// Persist the full settings object locally
    ///
    /// Company-owned rates are stored as given but never written back to the
    /// company configuration; the next load overwrites them.
    pub async fn save_settings(
        &self,
        user: &CurrentUser,
        settings: PersonalCommissionSettings,
    ) -> AppResult<PersonalCommissionSettings> {
        validate_settings(&settings)?;
        self.local.save(user.id, &settings).await?;
        self.cache.insert(user.id, settings.clone());
        tracing::info!(user_id = user.id, "Personal settings saved");
        Ok(settings)
    }

    /// Restore built-in defaults and drop the local snapshot
    pub async fn reset_settings(&self, user: &CurrentUser) -> AppResult<PersonalCommissionSettings> {
        self.local.clear(user.id).await?;
        self.cache.remove(&user.id);
        tracing::info!(user_id = user.id, "Personal settings reset to defaults");
        Ok(PersonalCommissionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::SqlitePersonalSettingsRepository;
    use crate::db::repository::test_support::test_pool;
    use crate::utils::{AppError, ErrorCode};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Company rates that can be switched to failing
    struct FakeRemote {
        rates: Mutex<Result<Option<CompanyRates>, ()>>,
    }

    impl FakeRemote {
        fn with(rates: Option<CompanyRates>) -> Arc<Self> {
            Arc::new(Self {
                rates: Mutex::new(Ok(rates)),
            })
        }

        fn fail(&self) {
            *self.rates.lock().unwrap() = Err(());
        }
    }

    #[async_trait]
    impl CompanyRatesSource for FakeRemote {
        async fn fetch_rates(&self, _company_id: i64) -> AppResult<Option<CompanyRates>> {
            (*self.rates.lock().unwrap())
                .map_err(|_| AppError::new(ErrorCode::SettingsRemoteUnavailable))
        }
    }

    fn user() -> CurrentUser {
        CurrentUser {
            id: 7,
            company_id: 1,
            username: "ana".into(),
            role: "broker".into(),
            permissions: vec![],
        }
    }

    async fn store(remote: Arc<FakeRemote>) -> PersonalSettingsStore {
        let local = Arc::new(SqlitePersonalSettingsRepository::new(test_pool().await));
        PersonalSettingsStore::new(remote, local)
    }

    #[test]
    fn merge_only_touches_remote_owned_fields() {
        let local = PersonalCommissionSettings::default();
        let merged = merge(&local, &CompanyRates { sale: 4.0, rental: 12.0 });

        assert_eq!(merged.commission_rates.sale, 4.0);
        assert_eq!(merged.commission_rates.rental, 12.0);

        let mut expected = local.clone();
        expected.commission_rates.sale = 4.0;
        expected.commission_rates.rental = 12.0;
        assert_eq!(merged, expected);
    }

    #[test]
    fn every_remote_field_is_mergeable() {
        let rates = CompanyRates { sale: 1.0, rental: 2.0 };
        for (field, owner) in FIELD_OWNERSHIP {
            let mut s = PersonalCommissionSettings::default();
            assert_eq!(
                apply_remote_field(&mut s, *field, &rates),
                *owner == FieldOwner::Remote,
                "{field:?}"
            );
        }
        assert_eq!(owner_of(SettingsField::SaleRate), FieldOwner::Remote);
        assert_eq!(owner_of(SettingsField::MonthlyGoal), FieldOwner::Local);
    }

    #[tokio::test]
    async fn load_merges_company_rates_over_saved_snapshot() {
        let remote = FakeRemote::with(Some(CompanyRates { sale: 5.0, rental: 9.0 }));
        let store = store(remote).await;

        let mut mine = PersonalCommissionSettings::default();
        mine.commission_rates.sale = 50.0;
        mine.monthly_goal = 42_000.0;
        store.save_settings(&user(), mine).await.unwrap();

        let loaded = store.load_settings(&user()).await.unwrap();
        assert_eq!(loaded.source, SettingsSource::Merged);
        assert_eq!(loaded.settings.commission_rates.sale, 5.0);
        assert_eq!(loaded.settings.commission_rates.rental, 9.0);
        assert_eq!(loaded.settings.monthly_goal, 42_000.0);
    }

    #[tokio::test]
    async fn remote_failure_returns_cached_snapshot_unchanged() {
        let remote = FakeRemote::with(Some(CompanyRates { sale: 5.0, rental: 9.0 }));
        let store = store(remote.clone()).await;
        let first = store.load_settings(&user()).await.unwrap();

        remote.fail();
        let second = store.load_settings(&user()).await.unwrap();
        assert_eq!(second.source, SettingsSource::Cached);
        assert_eq!(second.settings, first.settings);
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let store = store(FakeRemote::with(None)).await;
        let mut mine = PersonalCommissionSettings::default();
        mine.monthly_goal = 1.0;
        store.save_settings(&user(), mine).await.unwrap();

        let reset = store.reset_settings(&user()).await.unwrap();
        assert_eq!(reset, PersonalCommissionSettings::default());

        let loaded = store.load_settings(&user()).await.unwrap();
        assert_eq!(loaded.source, SettingsSource::Cached);
        assert_eq!(loaded.settings, PersonalCommissionSettings::default());
    }

    #[tokio::test]
    async fn monthly_goal_reads_without_caching() {
        let remote = FakeRemote::with(Some(CompanyRates { sale: 5.0, rental: 9.0 }));
        remote.fail();
        let store = store(remote).await;

        assert_eq!(store.monthly_goal(&user()).await.unwrap(), 10_000.0);
        assert!(store.cache.is_empty());

        let mut mine = PersonalCommissionSettings::default();
        mine.monthly_goal = 25_000.0;
        store.save_settings(&user(), mine).await.unwrap();
        store.cache.clear();
        assert_eq!(store.monthly_goal(&user()).await.unwrap(), 25_000.0);
        assert!(store.cache.is_empty());
    }

    #[tokio::test]
    async fn save_rejects_invalid_values() {
        let store = store(FakeRemote::with(None)).await;
        let mut bad = PersonalCommissionSettings::default();
        bad.taxes.income_tax_percentage = 150.0;
        assert_eq!(
            store.save_settings(&user(), bad).await.unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }
}
