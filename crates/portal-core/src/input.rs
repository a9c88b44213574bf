//! # Form-Field Sanitizers
//!
//! Keystroke filters for the account-number and IFSC fields. They run on
//! every edit, so the value a validator sees is already restricted to the
//! field's alphabet. The amount field has no filter: its text is validated
//! as entered.

use crate::identity::{BankCode, IFSC_BANK_PREFIX_LEN, IFSC_LEN};

/// Longest account number the form accepts.
pub const ACCOUNT_NUMBER_MAX_LEN: usize = 20;

/// Digits only, at most 20.
pub fn sanitize_account_number(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(ACCOUNT_NUMBER_MAX_LEN)
        .collect()
}

/// Upper-cased `A-Z0-9` only, at most 11.
pub fn sanitize_ifsc(raw: &str) -> String {
    raw.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .take(IFSC_LEN)
        .collect()
}

/// Live feedback for the IFSC field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfscFeedback {
    /// Fewer than 11 characters typed so far.
    Incomplete,
    /// Full length with an allow-listed prefix.
    Supported(BankCode),
    /// Full length, prefix not on the allow-list.
    Unsupported,
}

/// Feedback for a value already passed through [`sanitize_ifsc`].
pub fn ifsc_feedback(sanitized: &str) -> IfscFeedback {
    if sanitized.len() != IFSC_LEN {
        return IfscFeedback::Incomplete;
    }
    match sanitized
        .get(..IFSC_BANK_PREFIX_LEN)
        .and_then(BankCode::from_ifsc_prefix)
    {
        Some(bank) => IfscFeedback::Supported(bank),
        None => IfscFeedback::Unsupported,
    }
}
