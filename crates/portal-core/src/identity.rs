//! # Account Identifiers
//!
//! Newtypes for the two identifiers a customer types into the transfer form:
//! the recipient account number and the recipient branch IFSC code.
//!
//! ## Supported Banks
//!
//! Only three destination banks are reachable from the portal. The bank is
//! identified by the first four characters of the IFSC:
//!
//! | IFSC prefix | Bank |
//! |-------------|------|
//! | `SBIN` | SBI |
//! | `HDFC` | HDFC |
//! | `ICIC` | ICICI |
//!
//! Any other prefix is rejected before a request is ever built.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of characters in an IFSC code.
pub const IFSC_LEN: usize = 11;

/// Number of leading IFSC characters that identify the bank.
pub const IFSC_BANK_PREFIX_LEN: usize = 4;

/// A destination bank reachable from the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankCode {
    Sbi,
    Hdfc,
    Icici,
}

/// The fixed allow-list, in display order.
pub const SUPPORTED_BANKS: [BankCode; 3] = [BankCode::Sbi, BankCode::Hdfc, BankCode::Icici];

impl BankCode {
    /// The bank's short display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sbi => "SBI",
            Self::Hdfc => "HDFC",
            Self::Icici => "ICICI",
        }
    }

    /// The IFSC prefix that routes to this bank.
    pub fn ifsc_prefix(&self) -> &'static str {
        match self {
            Self::Sbi => "SBIN",
            Self::Hdfc => "HDFC",
            Self::Icici => "ICIC",
        }
    }

    /// Resolve an (already upper-cased) IFSC prefix.
    pub fn from_ifsc_prefix(prefix: &str) -> Option<Self> {
        SUPPORTED_BANKS
            .into_iter()
            .find(|bank| bank.ifsc_prefix() == prefix)
    }
}

impl std::fmt::Display for BankCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Account Number ──────────────────────────────────────────────────

/// A recipient account number as typed into the destination form.
///
/// The form sanitizer restricts the field to digits; this type only
/// guarantees the trimmed value is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingAccountNumber);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── IFSC ────────────────────────────────────────────────────────────

/// A recipient IFSC code whose prefix names a supported bank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ifsc {
    code: String,
    bank: BankCode,
}

impl Ifsc {
    /// Trim, upper-case, and check length then prefix.
    ///
    /// Length is counted in characters, after upper-casing.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let code = raw.trim().to_uppercase();
        if code.is_empty() {
            return Err(ValidationError::MissingIfsc);
        }

        let len = code.chars().count();
        if len != IFSC_LEN {
            return Err(ValidationError::IfscLength { len });
        }

        let prefix: String = code.chars().take(IFSC_BANK_PREFIX_LEN).collect();
        match BankCode::from_ifsc_prefix(&prefix) {
            Some(bank) => Ok(Self { code, bank }),
            None => Err(ValidationError::UnsupportedBank { prefix }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// The destination bank encoded in the prefix.
    pub fn bank(&self) -> BankCode {
        self.bank
    }
}

impl Serialize for Ifsc {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code)
    }
}

impl std::fmt::Display for Ifsc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Acceptance is exactly: 11 chars and an allow-listed prefix.
        #[test]
        fn ifsc_accepted_iff_length_and_prefix(raw in "[A-Za-z0-9]{0,14}") {
            let upper = raw.to_uppercase();
            let expected = upper.chars().count() == IFSC_LEN
                && BankCode::from_ifsc_prefix(&upper[..IFSC_BANK_PREFIX_LEN]).is_some();
            prop_assert_eq!(Ifsc::parse(&raw).is_ok(), expected);
        }

        /// Every supported prefix with any 7-char branch suffix is accepted.
        #[test]
        fn supported_prefix_with_any_branch_passes(
            idx in 0usize..3,
            branch in "[A-Z0-9]{7}",
        ) {
            let bank = SUPPORTED_BANKS[idx];
            let code = format!("{}{}", bank.ifsc_prefix(), branch);
            let ifsc = Ifsc::parse(&code).unwrap();
            prop_assert_eq!(ifsc.bank(), bank);
        }
    }
}
