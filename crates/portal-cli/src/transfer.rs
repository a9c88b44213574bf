//! # Transfer Subcommand
//!
//! Runs the transfer wizard on a line-oriented terminal:
//!
//! 1. recipient account, IFSC and amount (taken from flags when given);
//! 2. a numbered list of funding accounts to choose from;
//! 3. the transaction PIN, typed on one line.
//!
//! Each PIN line is fed to the PIN pad key by key followed by Enter, so the
//! sixth digit submits on its own and a shorter PIN submits on Enter.
//! Typing `c` at steps 2 or 3 cancels.

use std::io::{BufRead, Write};

use anyhow::Result;
use clap::Args;

use portal_core::IfscFeedback;
use portal_transfer::{
    AccountListing, FlowError, PinKey, Recovery, TransferBackend, TransferFlow,
    TransferResolution, NO_ACCOUNTS_MESSAGE,
};

use crate::{prompt, EXIT_FAILED, EXIT_OK};

/// Arguments for the `portal transfer` subcommand. Missing fields are
/// prompted for.
#[derive(Args, Debug, Default)]
pub struct TransferArgs {
    /// Recipient account number.
    #[arg(long)]
    pub account: Option<String>,
    /// Recipient IFSC code.
    #[arg(long)]
    pub ifsc: Option<String>,
    /// Amount in rupees.
    #[arg(long)]
    pub amount: Option<String>,
}

/// Where a step left the wizard.
enum Step {
    Continue,
    Finished(u8),
}

fn is_cancel(line: &str) -> bool {
    line.eq_ignore_ascii_case("c") || line.eq_ignore_ascii_case("cancel")
}

/// Drive one transfer from destination entry to a final outcome.
///
/// Returns [`EXIT_OK`] for a completed transfer and [`EXIT_FAILED`] when it
/// was cancelled, refused, or input ran out.
pub async fn run_transfer<B, R, W>(
    flow: &mut TransferFlow<B>,
    args: &TransferArgs,
    input: &mut R,
    out: &mut W,
) -> Result<u8>
where
    B: TransferBackend,
    R: BufRead,
    W: Write,
{
    if let Step::Finished(code) = destination_step(flow, args, input, out).await? {
        return Ok(code);
    }
    if let Step::Finished(code) = account_step(flow, input, out).await? {
        return Ok(code);
    }
    pin_step(flow, input, out).await
}

async fn destination_step<B, R, W>(
    flow: &mut TransferFlow<B>,
    args: &TransferArgs,
    input: &mut R,
    out: &mut W,
) -> Result<Step>
where
    B: TransferBackend,
    R: BufRead,
    W: Write,
{
    // Flag values apply to the first pass only.
    let mut prefill = Some(args);
    loop {
        let given = prefill.take();

        let flag = given.and_then(|a| a.account.as_deref());
        let account = match field(flag, flow.form().account_number(), "Recipient account number", input, out)? {
            Some(v) => v,
            None => return Ok(Step::Finished(EXIT_FAILED)),
        };
        flow.set_recipient_account(&account);

        let flag = given.and_then(|a| a.ifsc.as_deref());
        let ifsc = match field(flag, flow.form().ifsc(), "IFSC code", input, out)? {
            Some(v) => v,
            None => return Ok(Step::Finished(EXIT_FAILED)),
        };
        match flow.set_ifsc(&ifsc) {
            IfscFeedback::Supported(bank) => writeln!(out, "  ✓ {} (Supported)", bank.name())?,
            IfscFeedback::Unsupported => writeln!(out, "  ✗ Unsupported bank")?,
            IfscFeedback::Incomplete => {}
        }

        let flag = given.and_then(|a| a.amount.as_deref());
        let amount = match field(flag, flow.form().amount(), "Amount (₹)", input, out)? {
            Some(v) => v,
            None => return Ok(Step::Finished(EXIT_FAILED)),
        };
        flow.set_amount(&amount);

        match flow.begin_transfer().await {
            Ok(()) => return Ok(Step::Continue),
            Err(FlowError::Validation(e)) => writeln!(out, "❌ {e}")?,
            Err(e) => return Err(e.into()),
        }
    }
}

/// A flag value, or a prompt that keeps `current` when the line is empty.
fn field<R: BufRead, W: Write>(
    given: Option<&str>,
    current: &str,
    label: &str,
    input: &mut R,
    out: &mut W,
) -> Result<Option<String>> {
    if let Some(v) = given {
        return Ok(Some(v.to_string()));
    }
    let label = if current.is_empty() {
        format!("{label}: ")
    } else {
        format!("{label} [{current}]: ")
    };
    Ok(prompt(input, out, &label)?.map(|line| {
        if line.is_empty() {
            current.to_string()
        } else {
            line
        }
    }))
}

async fn account_step<B, R, W>(
    flow: &mut TransferFlow<B>,
    input: &mut R,
    out: &mut W,
) -> Result<Step>
where
    B: TransferBackend,
    R: BufRead,
    W: Write,
{
    if let Some(summary) = flow.transfer_summary() {
        writeln!(out)?;
        writeln!(out, "Recipient Account: {}", summary.recipient_account)?;
        writeln!(out, "IFSC Code:         {}", summary.ifsc)?;
        writeln!(out, "Destination Bank:  {}", summary.destination_bank)?;
        writeln!(out, "Transfer Amount:   {}", summary.amount.to_inr())?;
    }

    loop {
        writeln!(out)?;
        let line = match flow.account_listing() {
            AccountListing::Accounts(options) => {
                writeln!(out, "Choose account to transfer from:")?;
                for (i, option) in options.iter().enumerate() {
                    let warning = if option.selectable {
                        ""
                    } else {
                        "  ⚠️ Insufficient balance"
                    };
                    writeln!(
                        out,
                        "  {}. {}  A/C: {}  {}{}",
                        i + 1,
                        option.bank_name(),
                        option.account.account_number,
                        option.balance_display(),
                        warning
                    )?;
                }
                prompt(input, out, "Select account (or 'c' to cancel): ")?
            }
            AccountListing::NoAccounts => {
                writeln!(out, "❌ {NO_ACCOUNTS_MESSAGE}")?;
                flow.cancel()?;
                return Ok(Step::Finished(EXIT_FAILED));
            }
            listing => {
                writeln!(out, "❌ {}", listing.message().unwrap_or_default())?;
                prompt(input, out, "Press 'r' to reload or 'c' to cancel: ")?
            }
        };

        let Some(line) = line else {
            flow.cancel()?;
            return Ok(Step::Finished(EXIT_FAILED));
        };
        if is_cancel(&line) {
            flow.cancel()?;
            writeln!(out, "Transfer cancelled.")?;
            return Ok(Step::Finished(EXIT_FAILED));
        }
        if line.eq_ignore_ascii_case("r") {
            flow.reload_accounts().await?;
            continue;
        }

        let index = match line.parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => {
                writeln!(out, "❌ {}", FlowError::NoAccountSelected)?;
                continue;
            }
        };
        match flow.select_account(index) {
            Ok(()) => {
                flow.proceed_to_pin()?;
                return Ok(Step::Continue);
            }
            Err(e @ (FlowError::InsufficientBalance { .. } | FlowError::NoSuchAccount { .. })) => {
                writeln!(out, "❌ {e}")?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn pin_step<B, R, W>(flow: &mut TransferFlow<B>, input: &mut R, out: &mut W) -> Result<u8>
where
    B: TransferBackend,
    R: BufRead,
    W: Write,
{
    if let Some(summary) = flow.pin_summary() {
        writeln!(out)?;
        writeln!(out, "From:   {}", summary.from)?;
        writeln!(out, "To:     {}", summary.to)?;
        writeln!(out, "Amount: {}", summary.amount.to_inr())?;
    }

    loop {
        let label = "Transaction PIN (4-6 digits, or 'c' to cancel): ";
        let Some(line) = prompt(input, out, label)? else {
            flow.cancel()?;
            return Ok(EXIT_FAILED);
        };
        if is_cancel(&line) {
            flow.cancel()?;
            writeln!(out, "Transfer cancelled.")?;
            return Ok(EXIT_FAILED);
        }

        let mut resolution = None;
        for c in line.chars() {
            resolution = flow.handle_pin_key(PinKey::Char(c)).await?;
            if resolution.is_some() {
                break;
            }
        }
        if resolution.is_none() {
            resolution = flow.handle_pin_key(PinKey::Enter).await?;
        }

        let Some(resolution) = resolution else {
            writeln!(out, "❌ {}", FlowError::PinTooShort)?;
            flow.clear_pin()?;
            continue;
        };

        match resolution {
            TransferResolution::Completed(summary) => {
                writeln!(out)?;
                writeln!(out, "✅ Transfer Successful!")?;
                writeln!(
                    out,
                    "Transaction ID: {}",
                    summary.transaction_id.as_deref().unwrap_or("-")
                )?;
                writeln!(out, "Amount:         {}", summary.amount.to_inr())?;
                writeln!(out, "From:           {}", summary.from_account)?;
                writeln!(out, "To:             {}", summary.to_account)?;
                flow.dismiss_success()?;
                return Ok(EXIT_OK);
            }
            TransferResolution::Failed(failure) => {
                writeln!(out)?;
                if failure.title() == failure.message {
                    writeln!(out, "❌ {}", failure.message)?;
                } else {
                    writeln!(out, "❌ {}", failure.title())?;
                    writeln!(out, "{}", failure.message)?;
                }
                match failure.recovery() {
                    Recovery::RetryPin => {
                        writeln!(out, "Please try again with the correct PIN.")?;
                    }
                    Recovery::CloseWizard => return Ok(EXIT_FAILED),
                }
            }
        }
    }
}
