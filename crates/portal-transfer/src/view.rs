//! # View Models
//!
//! Read-only snapshots of what each wizard step displays. They carry
//! display-ready text so every front end renders the same strings.

use portal_client::{FundingAccount, TransferReceipt};
use portal_core::{AccountNumber, Amount, BankCode, Ifsc};
use serde::Serialize;

use crate::validation::TransferRequest;

pub const NO_ACCOUNTS_MESSAGE: &str = "No bank accounts found. Please link your bank account first.";
pub const ACCOUNTS_UNAVAILABLE_MESSAGE: &str = "Failed to load your accounts. Please try again.";

/// State of the step-2 account list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccountListing {
    /// No list requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    Accounts(Vec<AccountOption>),
    /// The fetch succeeded with no accounts.
    NoAccounts,
    /// The fetch failed.
    Unavailable,
}

impl AccountListing {
    /// Rank funding accounts against the requested amount.
    pub fn from_accounts(accounts: Vec<FundingAccount>, amount: Amount) -> Self {
        if accounts.is_empty() {
            return Self::NoAccounts;
        }
        Self::Accounts(
            accounts
                .into_iter()
                .map(|account| AccountOption {
                    selectable: account.can_fund(amount),
                    account,
                })
                .collect(),
        )
    }

    /// Message rendered in place of the list, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::NoAccounts => Some(NO_ACCOUNTS_MESSAGE),
            Self::Unavailable => Some(ACCOUNTS_UNAVAILABLE_MESSAGE),
            _ => None,
        }
    }

    pub fn options(&self) -> &[AccountOption] {
        match self {
            Self::Accounts(options) => options,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// One row of the account list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountOption {
    pub account: FundingAccount,
    /// `false` when the balance is below the transfer amount.
    pub selectable: bool,
}

impl AccountOption {
    pub fn bank_name(&self) -> &str {
        self.account.display_bank_name()
    }

    pub fn balance_display(&self) -> String {
        self.account.balance.to_inr()
    }
}

/// Summary shown alongside the account list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    pub recipient_account: AccountNumber,
    pub ifsc: Ifsc,
    pub destination_bank: BankCode,
    pub amount: Amount,
}

impl From<&TransferRequest> for TransferSummary {
    fn from(req: &TransferRequest) -> Self {
        Self {
            recipient_account: req.recipient_account().clone(),
            ifsc: req.recipient_ifsc().clone(),
            destination_bank: req.destination_bank(),
            amount: req.amount(),
        }
    }
}

/// Summary shown on the PIN step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinSummary {
    /// `"{bank} - {account number}"`.
    pub from: String,
    /// `"{recipient} ({bank})"`.
    pub to: String,
    pub amount: Amount,
}

impl PinSummary {
    pub fn new(source: &FundingAccount, req: &TransferRequest) -> Self {
        Self {
            from: format!("{} - {}", source.display_bank_name(), source.account_number),
            to: format!("{} ({})", req.recipient_account(), req.destination_bank()),
            amount: req.amount(),
        }
    }
}

/// Summary shown after a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessSummary {
    pub transaction_id: Option<String>,
    pub amount: Amount,
    pub from_account: String,
    pub to_account: String,
    pub message: Option<String>,
}

impl SuccessSummary {
    /// Figures come from the submitted request; only the transaction id and
    /// message are taken from the receipt.
    pub fn new(receipt: TransferReceipt, source: &FundingAccount, req: &TransferRequest) -> Self {
        Self {
            transaction_id: receipt.transaction_id,
            amount: req.amount(),
            from_account: source.account_number.clone(),
            to_account: req.recipient_account().to_string(),
            message: receipt.message,
        }
    }
}
