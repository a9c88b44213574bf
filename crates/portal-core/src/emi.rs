//! # EMI Calculator
//!
//! Equated monthly installment for a reducing-balance loan, with a first-year
//! amortization schedule. Figures are rounded to whole rupees for display,
//! matching the calculator page; the underlying arithmetic is `f64`.
//!
//! ```text
//! r   = annual_rate_percent / (12 × 100)
//! EMI = P · r · (1 + r)^n / ((1 + r)^n − 1)
//! ```

use serde::Serialize;

use crate::error::EmiError;

/// Months of schedule shown, at most.
pub const SCHEDULE_PREVIEW_MONTHS: u32 = 12;

/// Calculator input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmiInput {
    /// Loan principal in rupees.
    pub principal: f64,
    /// Annual interest rate in percent, e.g. `8.5`.
    pub annual_rate_percent: f64,
    /// Tenure in months.
    pub tenure_months: u32,
}

impl EmiInput {
    /// Checked in order: principal, rate, tenure.
    pub fn validate(&self) -> Result<(), EmiError> {
        if !(self.principal.is_finite() && self.principal > 0.0) {
            return Err(EmiError::InvalidPrincipal);
        }
        if !(self.annual_rate_percent.is_finite() && self.annual_rate_percent > 0.0) {
            return Err(EmiError::InvalidRate);
        }
        if self.tenure_months == 0 {
            return Err(EmiError::InvalidTenure);
        }
        Ok(())
    }
}

/// One month of the amortization preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub emi: i64,
    pub principal: i64,
    pub interest: i64,
    pub balance: i64,
}

/// Calculator result, rounded to whole rupees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmiBreakdown {
    pub emi: i64,
    pub total_amount: i64,
    pub total_interest: i64,
    pub schedule: Vec<ScheduleRow>,
}

pub fn calculate_emi(input: &EmiInput) -> Result<EmiBreakdown, EmiError> {
    input.validate()?;

    let principal = input.principal;
    let n = input.tenure_months;
    let r = input.annual_rate_percent / (12.0 * 100.0);
    // P·r / (1 − (1+r)^−n), equal to P·r·(1+r)^n / ((1+r)^n − 1) and finite
    // for every tenure.
    let discount = (1.0 + r).powf(-f64::from(n));
    let emi = principal * r / (1.0 - discount);

    let total_amount = emi * f64::from(n);
    let total_interest = total_amount - principal;

    let mut schedule = Vec::with_capacity(n.min(SCHEDULE_PREVIEW_MONTHS) as usize);
    let mut balance = principal;
    for month in 1..=n.min(SCHEDULE_PREVIEW_MONTHS) {
        let interest = balance * r;
        let principal_part = emi - interest;
        balance -= principal_part;
        schedule.push(ScheduleRow {
            month,
            emi: round(emi),
            principal: round(principal_part),
            interest: round(interest),
            balance: round(balance.max(0.0)),
        });
    }

    Ok(EmiBreakdown {
        emi: round(emi),
        total_amount: round(total_amount),
        total_interest: round(total_interest),
        schedule,
    })
}

fn round(v: f64) -> i64 {
    v.round() as i64
}
