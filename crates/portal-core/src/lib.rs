//! # portal-core -- Foundational Types for the Banking Portal
//!
//! Every other crate in the workspace depends on `portal-core`; it depends on
//! nothing internal. It holds the domain primitives the transfer flow is built
//! from, and the pure computations that need no network.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `AccountNumber` and `Ifsc` have
//!    validated constructors. The IFSC constructor is the only place the
//!    supported-bank allow-list is enforced.
//!
//! 2. **Fixed-point money.** `Amount` stores paise in an `i64`. Floats only
//!    appear at the JSON boundary, because the portal backend speaks numbers.
//!
//! 3. **Secrets never print.** `TransactionPin` lives in zeroizing storage and
//!    its `Debug` output is redacted.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `portal-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod emi;
pub mod error;
pub mod identity;
pub mod input;
pub mod pin;

pub use amount::Amount;
pub use emi::{calculate_emi, EmiBreakdown, EmiInput, ScheduleRow};
pub use error::{AmountError, EmiError, ValidationError};
pub use identity::{AccountNumber, BankCode, Ifsc, SUPPORTED_BANKS};
pub use input::{ifsc_feedback, sanitize_account_number, sanitize_ifsc, IfscFeedback};
pub use pin::TransactionPin;
