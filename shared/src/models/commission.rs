//! Commission Model (佣金记录)

use serde::{Deserialize, Serialize};

/// Transaction type that produced the commission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CommissionType {
    Sale,
    Rental,
}

impl CommissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "SALE",
            Self::Rental => "RENTAL",
        }
    }
}

/// Commission lifecycle status
///
/// `PENDING -> APPROVED | REJECTED`, `APPROVED -> PAID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CommissionStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl Default for CommissionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl CommissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Paid => "PAID",
        }
    }

    /// No approve/reject/pay is accepted from a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Paid)
    }
}

impl std::fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commission entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Commission {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub commission_type: CommissionType,
    pub status: CommissionStatus,
    /// Transaction value the commission is computed from
    pub base_value: f64,
    /// Commission percentage (0-100)
    pub percentage: f64,
    /// Tax percentage applied to the commission (0-100)
    pub tax_percentage: f64,
    /// base_value * percentage / 100, frozen until recalculated
    pub commission_value: f64,
    pub tax_value: f64,
    pub net_value: f64,
    /// Owning broker
    pub user_id: i64,
    pub property_id: String,
    /// Expected payment date (YYYY-MM-DD)
    pub expected_payment_date: Option<String>,
    pub notes: Option<String>,
    /// Set iff status is REJECTED
    pub rejection_reason: Option<String>,
    /// Payment date (YYYY-MM-DD), set iff status is PAID
    pub payment_date: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    pub rejected_by: Option<i64>,
    pub rejected_at: Option<i64>,
    pub paid_by: Option<i64>,
    pub paid_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create commission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionCreate {
    pub title: String,
    #[serde(rename = "type")]
    pub commission_type: CommissionType,
    pub base_value: f64,
    /// Omitted: taken from the active company config (0 without one)
    pub percentage: Option<f64>,
    /// Omitted: 0
    pub tax_percentage: Option<f64>,
    /// Omitted: the acting broker
    pub user_id: Option<i64>,
    pub property_id: String,
    pub expected_payment_date: Option<String>,
    pub notes: Option<String>,
}

/// Update commission payload (PENDING only)
///
/// Derived values are left untouched; call recalculate to re-derive them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommissionUpdate {
    pub title: Option<String>,
    pub base_value: Option<f64>,
    pub percentage: Option<f64>,
    pub tax_percentage: Option<f64>,
    pub expected_payment_date: Option<String>,
    pub notes: Option<String>,
}

/// Reject commission payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommissionReject {
    pub reason: Option<String>,
}

/// Pay commission payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommissionPay {
    /// YYYY-MM-DD
    pub payment_date: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

/// Commission list / statistics filter
///
/// All predicates are conjunctive; `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommissionFilter {
    pub status: Option<CommissionStatus>,
    #[serde(rename = "type")]
    pub commission_type: Option<CommissionType>,
    pub user_id: Option<i64>,
    /// Inclusive lower bound on `created_at` (Unix millis)
    pub created_from: Option<i64>,
    /// Exclusive upper bound on `created_at` (Unix millis)
    pub created_to: Option<i64>,
    /// Inclusive lower bound on `commission_value`
    pub min_value: Option<f64>,
    /// Inclusive upper bound on `commission_value`
    pub max_value: Option<f64>,
    /// Case-insensitive substring of title, notes or property id
    pub search: Option<String>,
}

impl CommissionFilter {
    /// Whether a record passes every predicate of this filter
    pub fn matches(&self, c: &Commission) -> bool {
        if self.status.is_some_and(|s| s != c.status) {
            return false;
        }
        if self.commission_type.is_some_and(|t| t != c.commission_type) {
            return false;
        }
        if self.user_id.is_some_and(|u| u != c.user_id) {
            return false;
        }
        if self.created_from.is_some_and(|from| c.created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| c.created_at >= to) {
            return false;
        }
        if self.min_value.is_some_and(|min| c.commission_value < min) {
            return false;
        }
        if self.max_value.is_some_and(|max| c.commission_value > max) {
            return false;
        }
        match self.search_term() {
            Some(term) => {
                c.title.to_lowercase().contains(&term)
                    || c.property_id.to_lowercase().contains(&term)
                    || c
                        .notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&term))
            }
            None => true,
        }
    }

    /// Normalized search term (trimmed, lowercased), `None` when blank
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Commission {
        Commission {
            id: 1,
            company_id: 1,
            title: "Apartamento Centro".into(),
            commission_type: CommissionType::Sale,
            status: CommissionStatus::Pending,
            base_value: 100_000.0,
            percentage: 6.0,
            tax_percentage: 15.0,
            commission_value: 6000.0,
            tax_value: 900.0,
            net_value: 5100.0,
            user_id: 42,
            property_id: "PROP-77".into(),
            expected_payment_date: None,
            notes: Some("Cliente indicado".into()),
            rejection_reason: None,
            payment_date: None,
            payment_method: None,
            transaction_id: None,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            paid_by: None,
            paid_at: None,
            created_at: 1_000,
            updated_at: 1_000,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(CommissionFilter::default().matches(&sample()));
    }

    #[test]
    fn value_range_is_inclusive() {
        let c = sample();
        let f = CommissionFilter {
            min_value: Some(6000.0),
            max_value: Some(6000.0),
            ..Default::default()
        };
        assert!(f.matches(&c));

        let f = CommissionFilter {
            min_value: Some(6000.01),
            ..Default::default()
        };
        assert!(!f.matches(&c));
    }

    #[test]
    fn date_range_upper_bound_is_exclusive() {
        let c = sample();
        let f = CommissionFilter {
            created_from: Some(1_000),
            created_to: Some(1_001),
            ..Default::default()
        };
        assert!(f.matches(&c));

        let f = CommissionFilter {
            created_to: Some(1_000),
            ..Default::default()
        };
        assert!(!f.matches(&c));
    }

    #[test]
    fn search_covers_title_notes_and_property() {
        let c = sample();
        for term in ["centro", "INDICADO", "prop-77", "  apartamento  "] {
            let f = CommissionFilter {
                search: Some(term.into()),
                ..Default::default()
            };
            assert!(f.matches(&c), "term {term:?} should match");
        }
        let f = CommissionFilter {
            search: Some("casa".into()),
            ..Default::default()
        };
        assert!(!f.matches(&c));
    }

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&CommissionStatus::Approved).unwrap();
        assert_eq!(json, "\"APPROVED\"");
        assert!(CommissionStatus::Paid.is_terminal());
        assert!(!CommissionStatus::Approved.is_terminal());
    }
}
