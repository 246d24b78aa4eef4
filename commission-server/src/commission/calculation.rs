//! Commission arithmetic
//!
//! Pure functions. Every amount is computed with `Decimal` and rounded to the
//! currency's minor unit (2 places, half away from zero) before it leaves
//! this module as `f64`.

use rust_decimal::prelude::*;
use shared::models::{
    CalculationResult, CommissionBreakdown, CommissionType, PersonalCommissionSettings,
};

use crate::utils::AppResult;
use crate::utils::validation::{validate_non_negative, validate_percentage};

/// Minor-unit precision of monetary values
const DECIMAL_PLACES: u32 = 2;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Convert f64 to Decimal for calculation
///
/// Callers validate finiteness first; a non-finite value degrades to zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in commission calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round a Decimal to the minor unit
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_else(|| {
        tracing::error!(value = %value, "Decimal out of f64 range, defaulting to zero");
        0.0
    })
}

/// `value * pct / 100`, rounded
fn percent_of(value: Decimal, pct: f64) -> Decimal {
    round_money(value * to_decimal(pct) / HUNDRED)
}

/// Validate every numeric field of personal settings
pub fn validate_settings(s: &PersonalCommissionSettings) -> AppResult<()> {
    validate_percentage(s.commission_rates.sale, "commission_rates.sale")?;
    validate_percentage(s.commission_rates.rental, "commission_rates.rental")?;
    validate_percentage(s.commission_rates.management, "commission_rates.management")?;
    validate_non_negative(
        s.operational_costs.advertising_cost,
        "operational_costs.advertising_cost",
    )?;
    validate_non_negative(
        s.operational_costs.transport_cost,
        "operational_costs.transport_cost",
    )?;
    validate_percentage(
        s.operational_costs.office_expenses,
        "operational_costs.office_expenses",
    )?;
    validate_percentage(s.taxes.income_tax_percentage, "taxes.income_tax_percentage")?;
    validate_percentage(
        s.taxes.social_security_percentage,
        "taxes.social_security_percentage",
    )?;
    validate_percentage(s.taxes.other_taxes_percentage, "taxes.other_taxes_percentage")?;
    validate_percentage(
        s.bonus_rules.company_bonus_percentage,
        "bonus_rules.company_bonus_percentage",
    )?;
    validate_non_negative(
        s.bonus_rules.referral_bonus_value,
        "bonus_rules.referral_bonus_value",
    )?;
    validate_non_negative(s.monthly_goal, "monthly_goal")?;
    Ok(())
}

/// Commission, tax and net value of a transaction
///
/// ```text
/// commission = base * percentage / 100
/// tax        = commission * tax_percentage / 100
/// net        = commission - tax
/// ```
pub fn compute_commission(
    base_value: f64,
    percentage: f64,
    tax_percentage: f64,
) -> AppResult<CalculationResult> {
    validate_non_negative(base_value, "base_value")?;
    validate_percentage(percentage, "percentage")?;
    validate_percentage(tax_percentage, "tax_percentage")?;

    let commission = percent_of(to_decimal(base_value), percentage);
    let tax = percent_of(commission, tax_percentage);
    let net = commission - tax;

    Ok(CalculationResult {
        base_value,
        percentage,
        tax_percentage,
        commission_value: to_f64(commission),
        tax_value: to_f64(tax),
        net_value: to_f64(net),
        breakdown: None,
    })
}

/// Itemized breakdown of a commission against personal settings
///
/// `net_final` is not clamped; a negative result is reported as such.
pub fn compute_detailed_breakdown(
    commission_value: f64,
    settings: &PersonalCommissionSettings,
) -> AppResult<CommissionBreakdown> {
    validate_non_negative(commission_value, "commission_value")?;
    validate_settings(settings)?;

    let gross = round_money(to_decimal(commission_value));
    let company_bonus = percent_of(gross, settings.bonus_rules.company_bonus_percentage);
    let referral_bonus = if settings.bonus_rules.referral_bonus_enabled {
        round_money(to_decimal(settings.bonus_rules.referral_bonus_value))
    } else {
        Decimal::ZERO
    };
    let income_tax = percent_of(gross, settings.taxes.income_tax_percentage);
    let social_security = percent_of(gross, settings.taxes.social_security_percentage);
    let other_taxes = percent_of(gross, settings.taxes.other_taxes_percentage);
    let office_expenses = percent_of(gross, settings.operational_costs.office_expenses);
    let advertising_cost = round_money(to_decimal(settings.operational_costs.advertising_cost));
    let transport_cost = round_money(to_decimal(settings.operational_costs.transport_cost));

    let net_final = gross + company_bonus + referral_bonus
        - income_tax
        - social_security
        - other_taxes
        - advertising_cost
        - transport_cost
        - office_expenses;

    Ok(CommissionBreakdown {
        gross_commission: to_f64(gross),
        company_bonus: to_f64(company_bonus),
        referral_bonus: to_f64(referral_bonus),
        income_tax: to_f64(income_tax),
        social_security: to_f64(social_security),
        other_taxes: to_f64(other_taxes),
        advertising_cost: to_f64(advertising_cost),
        transport_cost: to_f64(transport_cost),
        office_expenses: to_f64(office_expenses),
        net_final: to_f64(net_final),
        is_negative: net_final.is_sign_negative() && !net_final.is_zero(),
    })
}

/// Commission plus breakdown for a prospective transaction
///
/// Without an explicit percentage the broker's own rate for the
/// transaction type is used.
pub fn simulate(
    base_value: f64,
    commission_type: CommissionType,
    percentage: Option<f64>,
    tax_percentage: f64,
    settings: &PersonalCommissionSettings,
) -> AppResult<CalculationResult> {
    let percentage = percentage.unwrap_or(match commission_type {
        CommissionType::Sale => settings.commission_rates.sale,
        CommissionType::Rental => settings.commission_rates.rental,
    });
    let mut result = compute_commission(base_value, percentage, tax_percentage)?;
    result.breakdown = Some(compute_detailed_breakdown(result.commission_value, settings)?);
    Ok(result)
}
