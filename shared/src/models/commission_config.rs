//! Commission Config Model (公司佣金配置)

use serde::{Deserialize, Serialize};

use super::commission::CommissionType;

/// Company-wide commission configuration
///
/// At most one row per company has `is_active = true`. Deactivation is soft:
/// rows are never physically removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CommissionConfig {
    pub id: i64,
    pub company_id: i64,
    /// Broker commission on sales (0-100)
    pub sale_commission_percentage: f64,
    /// Broker commission on rentals (0-100)
    pub rental_commission_percentage: f64,
    /// Company share on sales (0-100)
    pub company_profit_percentage: f64,
    /// Company share on rentals (0-100)
    pub company_rental_profit_percentage: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CommissionConfig {
    /// Commission percentage applied to a new commission of the given type
    pub fn percentage_for(&self, commission_type: CommissionType) -> f64 {
        match commission_type {
            CommissionType::Sale => self.sale_commission_percentage,
            CommissionType::Rental => self.rental_commission_percentage,
        }
    }
}

/// Create config payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionConfigCreate {
    pub sale_commission_percentage: f64,
    pub rental_commission_percentage: f64,
    pub company_profit_percentage: f64,
    pub company_rental_profit_percentage: f64,
}

/// Update config payload (full replacement of the four percentages)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionConfigUpdate {
    pub sale_commission_percentage: f64,
    pub rental_commission_percentage: f64,
    pub company_profit_percentage: f64,
    pub company_rental_profit_percentage: f64,
}

impl From<CommissionConfigCreate> for CommissionConfigUpdate {
    fn from(c: CommissionConfigCreate) -> Self {
        Self {
            sale_commission_percentage: c.sale_commission_percentage,
            rental_commission_percentage: c.rental_commission_percentage,
            company_profit_percentage: c.company_profit_percentage,
            company_rental_profit_percentage: c.company_rental_profit_percentage,
        }
    }
}
