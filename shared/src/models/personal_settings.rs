//! Personal Commission Settings Model (经纪人个人佣金设置)

use serde::{Deserialize, Serialize};

/// Commission rate per transaction type (percentages)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRates {
    /// Owned by the company configuration, overwritten on load
    pub sale: f64,
    /// Owned by the company configuration, overwritten on load
    pub rental: f64,
    pub management: f64,
}

/// Operational costs deducted from a commission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalCosts {
    /// Flat amount
    pub advertising_cost: f64,
    /// Flat amount
    pub transport_cost: f64,
    /// Percentage of the commission
    pub office_expenses: f64,
}

/// Tax rates applied to a commission (percentages)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    pub income_tax_percentage: f64,
    pub social_security_percentage: f64,
    pub other_taxes_percentage: f64,
}

/// Bonus rules added to a commission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusRules {
    /// Percentage of the commission
    pub company_bonus_percentage: f64,
    pub referral_bonus_enabled: bool,
    /// Flat amount, only counted when enabled
    pub referral_bonus_value: f64,
}

/// A broker's own commission parameters (one per broker)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalCommissionSettings {
    pub commission_rates: CommissionRates,
    pub operational_costs: OperationalCosts,
    pub taxes: TaxRates,
    pub bonus_rules: BonusRules,
    pub monthly_goal: f64,
}

impl Default for PersonalCommissionSettings {
    fn default() -> Self {
        Self {
            commission_rates: CommissionRates {
                sale: 6.0,
                rental: 10.0,
                management: 8.0,
            },
            operational_costs: OperationalCosts {
                advertising_cost: 500.0,
                transport_cost: 300.0,
                office_expenses: 5.0,
            },
            taxes: TaxRates {
                income_tax_percentage: 15.0,
                social_security_percentage: 11.0,
                other_taxes_percentage: 0.0,
            },
            bonus_rules: BonusRules {
                company_bonus_percentage: 0.0,
                referral_bonus_enabled: false,
                referral_bonus_value: 0.0,
            },
            monthly_goal: 10_000.0,
        }
    }
}

/// Company-owned rates fetched from the active configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompanyRates {
    pub sale: f64,
    pub rental: f64,
}

/// Where the returned settings came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettingsSource {
    /// Local snapshot merged with fresh company rates
    Merged,
    /// Company rates unavailable; cached snapshot returned unchanged
    Cached,
}

/// Result of loading personal settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedSettings {
    pub settings: PersonalCommissionSettings,
    pub source: SettingsSource,
}
