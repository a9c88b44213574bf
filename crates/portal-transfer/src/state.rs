//! # Wizard States
//!
//! ```text
//! DestinationEntry ──(valid input)──▶ AccountSelection ──(account chosen)──▶ PinEntry
//!        ▲                                  │                                  │
//!        │◀────────────(cancel)─────────────┘◀─────────(cancel)────────────────┤
//!        │                                                                 (submit)
//!        │                                                                     ▼
//!        │◀──(dismiss)── Success ◀──(ok)── Submitting ──(failure)──▶ Failed ──(PIN error)──▶ PinEntry
//!        │                                                             │
//!        └◀────────────────────(any other error)───────────────────────┘
//! ```
//!
//! `Failed` is transient: the controller resolves it in the same step that
//! entered it, so it only ever shows up in the transition log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The state of the transfer wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowState {
    /// Step 1: recipient account, IFSC and amount are being edited.
    DestinationEntry,
    /// Step 2: choosing the funding account.
    AccountSelection,
    /// Step 3: collecting the transaction PIN.
    PinEntry,
    /// The transfer request is in flight.
    Submitting,
    /// The backend confirmed the transfer.
    Success,
    /// The backend or transport rejected the transfer.
    Failed,
}

impl FlowState {
    /// States a user cancel returns from.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::AccountSelection | Self::PinEntry)
    }
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DestinationEntry => "DESTINATION_ENTRY",
            Self::AccountSelection => "ACCOUNT_SELECTION",
            Self::PinEntry => "PIN_ENTRY",
            Self::Submitting => "SUBMITTING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Record of a wizard state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowTransitionRecord {
    /// State before the transition.
    pub from_state: FlowState,
    /// State after the transition.
    pub to_state: FlowState,
    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
    /// Reason for the transition.
    pub reason: String,
}
