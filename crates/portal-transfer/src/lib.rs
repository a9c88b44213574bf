//! # portal-transfer -- Transfer wizard controller
//!
//! A headless, event-driven controller for the portal's three-step funds
//! transfer:
//!
//! 1. **Destination entry** (`validation.rs`): recipient account, IFSC and
//!    amount, checked client-side against the supported-bank allow-list.
//! 2. **Account selection** (`view.rs`): the user's funding accounts, each
//!    selectable only if its balance covers the amount.
//! 3. **PIN confirmation** (`pin_pad.rs`): six-box PIN entry with
//!    auto-submit on the sixth digit and Enter at four or more.
//!
//! Submission goes through the [`TransferBackend`] seam exactly once per
//! user action. Failures are classified (`classify.rs`) and routed to a
//! recovery: PIN errors return to step 3, everything else closes the
//! wizard.
//!
//! [`TransferFlow`] owns all of this state. Front ends drive it with user
//! actions and draw the view models it exposes; it performs no I/O beyond
//! the backend calls and never sleeps.

pub mod backend;
pub mod classify;
pub mod flow;
pub mod pin_pad;
pub mod state;
pub mod validation;
pub mod view;

pub use backend::TransferBackend;
pub use classify::{classify, FailureCategory, Recovery, TransferFailure, NETWORK_ERROR_MESSAGE};
pub use flow::{FlowError, TransferFlow, TransferResolution, SUCCESS_DISMISS_DELAY};
pub use pin_pad::{PinKey, PinPad, PinPadEvent, PIN_BOXES};
pub use state::{FlowState, FlowTransitionRecord};
pub use validation::{validate_destination, DestinationForm, TransferRequest};
pub use view::{
    AccountListing, AccountOption, PinSummary, SuccessSummary, TransferSummary,
    ACCOUNTS_UNAVAILABLE_MESSAGE, NO_ACCOUNTS_MESSAGE,
};
