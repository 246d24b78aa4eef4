//! Statistics aggregation
//!
//! A pure fold over the visible commission set, recomputed on every query.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{
    Commission, CommissionFilter, CommissionStatistics, CommissionStatus, CommissionType,
    StatusBucket,
};

use crate::auth::CurrentUser;
use crate::commission::calculation::{round_money, to_decimal, to_f64};
use crate::commission::lifecycle::CommissionLifecycle;
use crate::commission::settings_store::PersonalSettingsStore;
use crate::utils::AppResult;
use crate::utils::time::month_bounds_millis;

#[derive(Default)]
struct Bucket {
    count: u64,
    value: Decimal,
}

impl Bucket {
    fn add(&mut self, net: Decimal) {
        self.count += 1;
        self.value += net;
    }

    fn finish(&self) -> StatusBucket {
        StatusBucket {
            count: self.count,
            value: to_f64(round_money(self.value)),
        }
    }
}

/// Fold `records` into aggregates
///
/// `filter` is applied first; `current_month` is the `[start, end)` window in
/// Unix millis used for `current_month_value`.
pub fn aggregate(
    records: &[Commission],
    filter: &CommissionFilter,
    current_month: (i64, i64),
    monthly_goal: f64,
) -> CommissionStatistics {
    let (month_start, month_end) = current_month;

    let mut pending = Bucket::default();
    let mut approved = Bucket::default();
    let mut paid = Bucket::default();
    let mut rejected = Bucket::default();
    let mut total = Bucket::default();
    let mut sale = Bucket::default();
    let mut rental = Bucket::default();
    let mut month = Decimal::ZERO;

    for c in records.iter().filter(|c| filter.matches(c)) {
        let net = to_decimal(c.net_value);
        match c.status {
            CommissionStatus::Pending => pending.add(net),
            CommissionStatus::Approved => approved.add(net),
            CommissionStatus::Paid => paid.add(net),
            CommissionStatus::Rejected => rejected.add(net),
        }
        match c.commission_type {
            CommissionType::Sale => sale.add(net),
            CommissionType::Rental => rental.add(net),
        }
        total.add(net);
        if c.created_at >= month_start && c.created_at < month_end {
            month += net;
        }
    }

    let current_month_value = to_f64(round_money(month));
    let goal_progress = if monthly_goal > 0.0 {
        to_f64(round_money(month * Decimal::ONE_HUNDRED / to_decimal(monthly_goal)))
    } else {
        0.0
    };

    CommissionStatistics {
        pending: pending.finish(),
        approved: approved.finish(),
        paid: paid.finish(),
        rejected: rejected.finish(),
        total: total.finish(),
        sale: sale.finish(),
        rental: rental.finish(),
        current_month_value,
        monthly_goal,
        goal_progress,
    }
}

pub struct StatisticsAggregator {
    lifecycle: Arc<CommissionLifecycle>,
    settings: Arc<PersonalSettingsStore>,
    tz: Tz,
}

impl StatisticsAggregator {
    pub fn new(
        lifecycle: Arc<CommissionLifecycle>,
        settings: Arc<PersonalSettingsStore>,
        tz: Tz,
    ) -> Self {
        Self {
            lifecycle,
            settings,
            tz,
        }
    }

    /// Aggregates over every commission the principal may see, after `filter`
    pub async fn get_statistics(
        &self,
        user: &CurrentUser,
        filter: &CommissionFilter,
    ) -> AppResult<CommissionStatistics> {
        let goal = self.settings.monthly_goal(user).await?;
        let month = month_bounds_millis(Utc::now().with_timezone(&self.tz));

        let Some(scoped) = self.lifecycle.scope(user, filter) else {
            return Ok(aggregate(&[], &CommissionFilter::default(), month, goal));
        };
        let records = self.lifecycle.visible_commissions(user).await?;
        Ok(aggregate(&records, &scoped, month, goal))
    }
}
