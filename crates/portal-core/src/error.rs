//! # Error Types
//!
//! Validation errors in this crate are shown to the customer verbatim, so
//! their `Display` text is the portal's user-facing wording rather than a
//! diagnostic string.

use thiserror::Error;

/// A destination-entry rule that rejected the form.
///
/// Rules are evaluated in declaration order and the first failure wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Recipient account number is empty.
    #[error("Please enter a recipient account number")]
    MissingAccountNumber,

    /// IFSC code is empty.
    #[error("Please enter IFSC code")]
    MissingIfsc,

    /// IFSC code is not exactly 11 characters.
    #[error("IFSC code must be exactly 11 characters")]
    IfscLength {
        /// Number of characters actually supplied.
        len: usize,
    },

    /// IFSC prefix is not on the supported-bank allow-list.
    #[error("Unsupported bank. Please use SBI (SBIN), HDFC, or ICICI (ICIC) accounts.")]
    UnsupportedBank {
        /// The rejected four-character prefix.
        prefix: String,
    },

    /// Amount is missing, unparsable, or not positive.
    #[error("Please enter a valid amount")]
    InvalidAmount,
}

/// Failure to parse a decimal rupee amount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Input was empty after trimming.
    #[error("amount is empty")]
    Empty,

    /// Input is not a plain decimal number.
    #[error("amount {0:?} is not a decimal number")]
    Malformed(String),

    /// Value does not fit in the paise representation.
    #[error("amount {0:?} is out of range")]
    Overflow(String),
}

/// EMI calculator input rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmiError {
    #[error("Please enter a valid loan amount")]
    InvalidPrincipal,

    #[error("Please enter a valid interest rate")]
    InvalidRate,

    #[error("Please enter a valid tenure")]
    InvalidTenure,
}
