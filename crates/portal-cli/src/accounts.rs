//! # Accounts Subcommand
//!
//! Lists the user's funding accounts from the dashboard feed.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use portal_client::accounts::UNKNOWN_BANK;
use portal_transfer::{TransferBackend, ACCOUNTS_UNAVAILABLE_MESSAGE, NO_ACCOUNTS_MESSAGE};

use crate::{EXIT_FAILED, EXIT_OK};

/// Arguments for the `portal accounts` subcommand.
#[derive(Args, Debug)]
pub struct AccountsArgs {
    /// Print the accounts as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn run_accounts<B: TransferBackend, W: Write>(
    backend: &B,
    args: &AccountsArgs,
    out: &mut W,
) -> Result<u8> {
    let accounts = match backend.fetch_accounts().await {
        Ok(accounts) => accounts,
        Err(e) => {
            tracing::error!(error = %e, "account fetch failed");
            writeln!(out, "{ACCOUNTS_UNAVAILABLE_MESSAGE}")?;
            return Ok(EXIT_FAILED);
        }
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&accounts)?)?;
        return Ok(EXIT_OK);
    }

    if accounts.is_empty() {
        writeln!(out, "{NO_ACCOUNTS_MESSAGE}")?;
        return Ok(EXIT_OK);
    }

    let width = accounts
        .iter()
        .map(|a| a.display_bank_name().len())
        .max()
        .unwrap_or(UNKNOWN_BANK.len());
    for account in &accounts {
        writeln!(
            out,
            "{:<width$}  A/C: {:<20}  {:>16}",
            account.display_bank_name(),
            account.account_number,
            account.balance.to_inr(),
        )?;
    }
    Ok(EXIT_OK)
}
