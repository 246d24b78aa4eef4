//! Calculation Models (佣金计算)
//!
//! Ephemeral results; never persisted.

use serde::{Deserialize, Serialize};

use super::commission::CommissionType;
use super::personal_settings::PersonalCommissionSettings;

/// Itemized breakdown of a commission against personal settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    pub gross_commission: f64,
    pub company_bonus: f64,
    pub referral_bonus: f64,
    pub income_tax: f64,
    pub social_security: f64,
    pub other_taxes: f64,
    pub advertising_cost: f64,
    pub transport_cost: f64,
    pub office_expenses: f64,
    /// Not clamped; may be negative
    pub net_final: f64,
    pub is_negative: bool,
}

/// Result of a commission computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub base_value: f64,
    pub percentage: f64,
    pub tax_percentage: f64,
    pub commission_value: f64,
    pub tax_value: f64,
    pub net_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CommissionBreakdown>,
}

/// Compute commission request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionCalcRequest {
    pub base_value: f64,
    pub percentage: f64,
    #[serde(default)]
    pub tax_percentage: f64,
}

/// Compute breakdown request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRequest {
    pub commission_value: f64,
    /// Omitted: the caller's loaded personal settings
    pub settings: Option<PersonalCommissionSettings>,
}

/// Simulate request (commission + breakdown with personal settings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateRequest {
    pub base_value: f64,
    #[serde(rename = "type")]
    pub commission_type: CommissionType,
    /// Omitted: the personal rate for the transaction type
    pub percentage: Option<f64>,
    #[serde(default)]
    pub tax_percentage: f64,
}
