//! # EMI Subcommand
//!
//! Prints the monthly installment, totals, and the first-year schedule for
//! a reducing-balance loan.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use portal_core::{calculate_emi, Amount, EmiInput};

use crate::{EXIT_FAILED, EXIT_OK};

/// Arguments for the `portal emi` subcommand.
#[derive(Args, Debug)]
pub struct EmiArgs {
    /// Loan amount in rupees.
    #[arg(long)]
    pub principal: f64,
    /// Annual interest rate in percent.
    #[arg(long)]
    pub rate: f64,
    /// Tenure in months.
    #[arg(long)]
    pub tenure: u32,
    /// Print the breakdown as JSON.
    #[arg(long)]
    pub json: bool,
}

fn inr(rupees: i64) -> String {
    Amount::from_rupees(rupees).to_inr()
}

pub fn run_emi<W: Write>(args: &EmiArgs, out: &mut W) -> Result<u8> {
    let input = EmiInput {
        principal: args.principal,
        annual_rate_percent: args.rate,
        tenure_months: args.tenure,
    };

    let breakdown = match calculate_emi(&input) {
        Ok(b) => b,
        Err(e) => {
            writeln!(out, "{e}")?;
            return Ok(EXIT_FAILED);
        }
    };
    tracing::debug!(emi = breakdown.emi, months = args.tenure, "EMI calculated");

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&breakdown)?)?;
        return Ok(EXIT_OK);
    }

    writeln!(out, "Monthly EMI:     {}", inr(breakdown.emi))?;
    writeln!(out, "Total Interest:  {}", inr(breakdown.total_interest))?;
    writeln!(out, "Total Amount:    {}", inr(breakdown.total_amount))?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>5}  {:>14}  {:>14}  {:>14}  {:>16}",
        "Month", "EMI", "Principal", "Interest", "Balance"
    )?;
    for row in &breakdown.schedule {
        writeln!(
            out,
            "{:>5}  {:>14}  {:>14}  {:>14}  {:>16}",
            row.month,
            inr(row.emi),
            inr(row.principal),
            inr(row.interest),
            inr(row.balance)
        )?;
    }
    Ok(EXIT_OK)
}
