//! # Failure Classification
//!
//! Maps a failed transfer to a category and a recovery. Backend rejections
//! are classified by case-insensitive substring match on the reason text,
//! checked in this order:
//!
//! | Contains | Category | Recovery |
//! |----------|----------|----------|
//! | `pin` | [`FailureCategory::InvalidPin`] | retry PIN |
//! | `insufficient` | [`FailureCategory::InsufficientFunds`] | close wizard |
//! | `not found`, `don't own` | [`FailureCategory::AccountError`] | close wizard |
//! | anything else | [`FailureCategory::Other`] | close wizard |
//!
//! Transport failures and unparsable bodies are [`FailureCategory::Network`].
//!
//! Matching is on free text. A backend that rewords its errors changes the
//! classification.

use portal_client::{PortalApiError, TransferRejection};
use serde::Serialize;

/// Shown for every [`FailureCategory::Network`] failure.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureCategory {
    InvalidPin,
    InsufficientFunds,
    AccountError,
    Other,
    Network,
}

/// What the wizard does after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Recovery {
    /// Clear the PIN, focus the first box, keep the PIN step open.
    RetryPin,
    /// Close the wizard and return to destination entry.
    CloseWizard,
}

impl FailureCategory {
    pub fn title(&self) -> &'static str {
        match self {
            Self::InvalidPin => "Invalid Transaction PIN",
            Self::InsufficientFunds => "Insufficient Funds",
            Self::AccountError => "Account Error",
            Self::Other => "Transfer Failed",
            Self::Network => NETWORK_ERROR_MESSAGE,
        }
    }

    pub fn recovery(&self) -> Recovery {
        match self {
            Self::InvalidPin => Recovery::RetryPin,
            _ => Recovery::CloseWizard,
        }
    }
}

/// Classify backend reason text.
pub fn classify(reason: &str) -> FailureCategory {
    let reason = reason.to_lowercase();
    if reason.contains("pin") {
        FailureCategory::InvalidPin
    } else if reason.contains("insufficient") {
        FailureCategory::InsufficientFunds
    } else if reason.contains("not found") || reason.contains("don't own") {
        FailureCategory::AccountError
    } else {
        FailureCategory::Other
    }
}

/// A classified transfer failure, ready to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferFailure {
    pub category: FailureCategory,
    /// Text shown under the title. For network failures this equals the title.
    pub message: String,
}

impl TransferFailure {
    pub fn from_rejection(rejection: &TransferRejection) -> Self {
        Self {
            category: classify(&rejection.reason),
            message: rejection.reason.clone(),
        }
    }

    pub fn network(error: &PortalApiError) -> Self {
        tracing::warn!(error = %error, "transfer request failed in transport");
        Self {
            category: FailureCategory::Network,
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.category.title()
    }

    pub fn recovery(&self) -> Recovery {
        self.category.recovery()
    }
}

impl std::fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.category == FailureCategory::Network {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.title(), self.message)
        }
    }
}
