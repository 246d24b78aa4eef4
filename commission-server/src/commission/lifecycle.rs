//! Commission lifecycle (佣金状态机)
//!
//! ```text
//! PENDING ──approve──▶ APPROVED ──pay──▶ PAID
//!    └─────reject────▶ REJECTED
//! ```
//!
//! Every write is a conditional update on the status observed when the
//! record was loaded; a concurrent winner turns the loser's write into
//! `InvalidStateTransition`.

use std::sync::Arc;

use shared::models::{
    Commission, CommissionCreate, CommissionFilter, CommissionPay, CommissionReject,
    CommissionStatus, CommissionUpdate,
};

use crate::auth::permissions::{COMMISSIONS_APPROVE, COMMISSIONS_PAY, COMMISSIONS_VIEW_ALL};
use crate::auth::{Authorizer, CurrentUser, ensure_allowed};
use crate::commission::calculation::compute_commission;
use crate::commission::config_store::ConfigStore;
use crate::db::repository::{CommissionRepository, NewCommission, PaymentRecord, RepoError};
use crate::utils::time::{parse_date, validate_optional_date};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, require_text, validate_optional_text,
    validate_percentage, validate_positive, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Operations that touch a persisted commission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Approve,
    Reject,
    Pay,
    Recalculate,
    Update,
    Delete,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Pay => "pay",
            Self::Recalculate => "recalculate",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Statuses from which this action may start
    pub fn allowed_from(&self) -> &'static [CommissionStatus] {
        use CommissionStatus::*;
        match self {
            Self::Approve | Self::Reject | Self::Recalculate | Self::Update => &[Pending],
            Self::Pay => &[Approved],
            Self::Delete => &[Pending, Approved, Rejected, Paid],
        }
    }
}

/// Fail with `InvalidStateTransition` unless `action` may start from `status`
pub fn check_transition(id: i64, status: CommissionStatus, action: Action) -> AppResult<()> {
    if action.allowed_from().contains(&status) {
        return Ok(());
    }
    tracing::warn!(
        commission_id = id,
        status = %status,
        action = action.name(),
        "Rejected commission transition"
    );
    Err(AppError::invalid_transition(format!(
        "Cannot {} commission {} in status {}",
        action.name(),
        id,
        status
    ))
    .with_detail("id", id)
    .with_detail("status", status.as_str())
    .with_detail("action", action.name()))
}

/// Map a failed conditional write
fn write_error(id: i64, action: Action) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound(_) => AppError::commission_not_found(id),
        RepoError::StatusMismatch { actual, .. } => {
            tracing::warn!(
                commission_id = id,
                status = %actual,
                action = action.name(),
                "Lost commission transition race"
            );
            AppError::invalid_transition(format!(
                "Cannot {} commission {}: status changed to {}",
                action.name(),
                id,
                actual
            ))
            .with_detail("id", id)
            .with_detail("status", actual.as_str())
            .with_detail("action", action.name())
        }
        other => other.into(),
    }
}

pub struct CommissionLifecycle {
    repo: Arc<dyn CommissionRepository>,
    config: Arc<ConfigStore>,
    authorizer: Arc<dyn Authorizer>,
}

impl CommissionLifecycle {
    pub fn new(
        repo: Arc<dyn CommissionRepository>,
        config: Arc<ConfigStore>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            repo,
            config,
            authorizer,
        }
    }

    fn sees_all(&self, user: &CurrentUser) -> bool {
        self.authorizer.is_allowed(user, COMMISSIONS_VIEW_ALL)
    }

    /// Restrict a filter to what the principal may see
    ///
    /// Without view_all an unset `user_id` narrows to the principal's own
    /// records; naming another broker yields `None` (nothing visible).
    pub fn scope(&self, user: &CurrentUser, filter: &CommissionFilter) -> Option<CommissionFilter> {
        if self.sees_all(user) {
            return Some(filter.clone());
        }
        match filter.user_id {
            Some(id) if id != user.id => None,
            _ => Some(CommissionFilter {
                user_id: Some(user.id),
                ..filter.clone()
            }),
        }
    }

    /// Load a commission of the principal's company
    async fn load(&self, user: &CurrentUser, id: i64) -> AppResult<Commission> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|c| c.company_id == user.company_id)
            .ok_or_else(|| AppError::commission_not_found(id))
    }

    /// Load a commission the principal owns (or may see through view_all)
    async fn load_visible(&self, user: &CurrentUser, id: i64) -> AppResult<Commission> {
        let c = self.load(user, id).await?;
        if c.user_id != user.id && !self.sees_all(user) {
            return Err(AppError::commission_not_found(id));
        }
        Ok(c)
    }

    pub async fn get_commission(&self, user: &CurrentUser, id: i64) -> AppResult<Commission> {
        self.load_visible(user, id).await
    }

    pub async fn list_commissions(
        &self,
        user: &CurrentUser,
        filter: &CommissionFilter,
    ) -> AppResult<Vec<Commission>> {
        match self.scope(user, filter) {
            Some(scoped) => Ok(self.repo.query(user.company_id, &scoped).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Every commission the principal may see, unfiltered
    pub async fn visible_commissions(&self, user: &CurrentUser) -> AppResult<Vec<Commission>> {
        self.list_commissions(user, &CommissionFilter::default())
            .await
    }

    pub async fn create_commission(
        &self,
        user: &CurrentUser,
        data: CommissionCreate,
    ) -> AppResult<Commission> {
        validate_required_text(&data.title, "title", MAX_NAME_LEN)?;
        validate_required_text(&data.property_id, "property_id", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;
        validate_optional_date(&data.expected_payment_date)?;
        validate_positive(data.base_value, "base_value")?;

        let user_id = data.user_id.unwrap_or(user.id);
        if user_id <= 0 {
            return Err(AppError::validation(format!("Invalid user_id: {user_id}"))
                .with_detail("field", "user_id"));
        }
        if user_id != user.id {
            ensure_allowed(self.authorizer.as_ref(), user, COMMISSIONS_VIEW_ALL)?;
        }

        let percentage = match data.percentage {
            Some(p) => p,
            None => {
                self.config
                    .default_percentage(user.company_id, data.commission_type)
                    .await?
            }
        };
        validate_percentage(percentage, "percentage")?;
        let values = compute_commission(
            data.base_value,
            percentage,
            data.tax_percentage.unwrap_or(0.0),
        )?;

        let commission = self
            .repo
            .insert(NewCommission {
                company_id: user.company_id,
                title: data.title.trim().to_string(),
                commission_type: data.commission_type,
                user_id,
                property_id: data.property_id.trim().to_string(),
                expected_payment_date: data.expected_payment_date,
                notes: data.notes,
                values,
            })
            .await?;

        tracing::info!(
            commission_id = commission.id,
            status = %commission.status,
            actor = user.id,
            commission_value = commission.commission_value,
            "Commission created"
        );
        Ok(commission)
    }

    /// Edit a PENDING commission; derived values stay frozen until recalculated
    pub async fn update_commission(
        &self,
        user: &CurrentUser,
        id: i64,
        data: CommissionUpdate,
    ) -> AppResult<Commission> {
        if let Some(title) = &data.title {
            validate_required_text(title, "title", MAX_NAME_LEN)?;
        }
        if let Some(base_value) = data.base_value {
            validate_positive(base_value, "base_value")?;
        }
        if let Some(p) = data.percentage {
            validate_percentage(p, "percentage")?;
        }
        if let Some(t) = data.tax_percentage {
            validate_percentage(t, "tax_percentage")?;
        }
        validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;
        validate_optional_date(&data.expected_payment_date)?;

        let current = self.load_visible(user, id).await?;
        check_transition(id, current.status, Action::Update)?;

        let commission = self
            .repo
            .update_pending(id, current.status, &data)
            .await
            .map_err(write_error(id, Action::Update))?;

        tracing::info!(commission_id = id, actor = user.id, "Commission updated");
        Ok(commission)
    }

    /// Re-derive commission/tax/net from the current inputs (PENDING only)
    pub async fn recalculate_commission(&self, user: &CurrentUser, id: i64) -> AppResult<Commission> {
        let current = self.load_visible(user, id).await?;
        check_transition(id, current.status, Action::Recalculate)?;

        let values = compute_commission(
            current.base_value,
            current.percentage,
            current.tax_percentage,
        )?;
        let commission = self
            .repo
            .recalculate(id, current.status, &values)
            .await
            .map_err(write_error(id, Action::Recalculate))?;

        tracing::info!(
            commission_id = id,
            actor = user.id,
            previous_value = current.commission_value,
            commission_value = commission.commission_value,
            "Commission recalculated"
        );
        Ok(commission)
    }

    pub async fn approve_commission(&self, user: &CurrentUser, id: i64) -> AppResult<Commission> {
        ensure_allowed(self.authorizer.as_ref(), user, COMMISSIONS_APPROVE)?;

        let current = self.load(user, id).await?;
        check_transition(id, current.status, Action::Approve)?;

        let commission = self
            .repo
            .approve(id, current.status, user.id, shared::util::now_millis())
            .await
            .map_err(write_error(id, Action::Approve))?;

        tracing::info!(
            commission_id = id,
            status = %commission.status,
            actor = user.id,
            "Commission approved"
        );
        Ok(commission)
    }

    pub async fn reject_commission(
        &self,
        user: &CurrentUser,
        id: i64,
        data: CommissionReject,
    ) -> AppResult<Commission> {
        ensure_allowed(self.authorizer.as_ref(), user, COMMISSIONS_APPROVE)?;
        let reason = require_text(&data.reason, "reason", MAX_NOTE_LEN)?;

        let current = self.load(user, id).await?;
        check_transition(id, current.status, Action::Reject)?;

        let commission = self
            .repo
            .reject(id, current.status, user.id, shared::util::now_millis(), reason)
            .await
            .map_err(write_error(id, Action::Reject))?;

        tracing::info!(
            commission_id = id,
            status = %commission.status,
            actor = user.id,
            "Commission rejected"
        );
        Ok(commission)
    }

    pub async fn pay_commission(
        &self,
        user: &CurrentUser,
        id: i64,
        data: CommissionPay,
    ) -> AppResult<Commission> {
        ensure_allowed(self.authorizer.as_ref(), user, COMMISSIONS_PAY)?;
        let payment_date = require_text(&data.payment_date, "payment_date", MAX_SHORT_TEXT_LEN)?;
        parse_date(payment_date)?;
        let payment = PaymentRecord {
            payment_date: payment_date.to_string(),
            payment_method: require_text(&data.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?
                .to_string(),
            transaction_id: require_text(&data.transaction_id, "transaction_id", MAX_SHORT_TEXT_LEN)?
                .to_string(),
        };

        let current = self.load(user, id).await?;
        check_transition(id, current.status, Action::Pay)?;

        let commission = self
            .repo
            .pay(id, current.status, user.id, shared::util::now_millis(), &payment)
            .await
            .map_err(write_error(id, Action::Pay))?;

        tracing::info!(
            commission_id = id,
            status = %commission.status,
            actor = user.id,
            transaction_id = %payment.transaction_id,
            "Commission paid"
        );
        Ok(commission)
    }

    /// Delete from any status, conditional on the status observed at load
    pub async fn delete_commission(&self, user: &CurrentUser, id: i64) -> AppResult<()> {
        let current = self.load_visible(user, id).await?;
        check_transition(id, current.status, Action::Delete)?;

        self.repo
            .delete(id, current.status)
            .await
            .map_err(write_error(id, Action::Delete))?;

        if current.status == CommissionStatus::Pending {
            tracing::info!(commission_id = id, actor = user.id, "Commission deleted");
        } else {
            tracing::warn!(
                commission_id = id,
                status = %current.status,
                actor = user.id,
                "Commission deleted after leaving PENDING"
            );
        }
        Ok(())
    }
}
