//! Commission Statistics Model

use serde::{Deserialize, Serialize};

/// Count and summed net value of a group of commissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusBucket {
    pub count: u64,
    pub value: f64,
}

/// Aggregates over a visible set of commissions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommissionStatistics {
    pub pending: StatusBucket,
    pub approved: StatusBucket,
    pub paid: StatusBucket,
    pub rejected: StatusBucket,
    pub total: StatusBucket,
    pub sale: StatusBucket,
    pub rental: StatusBucket,
    /// Net value of commissions created in the current calendar month
    pub current_month_value: f64,
    pub monthly_goal: f64,
    /// Percentage of the monthly goal reached (0 when the goal is 0)
    pub goal_progress: f64,
}
