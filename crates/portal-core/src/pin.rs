//! # Transaction PIN
//!
//! The PIN authorizes a single transfer. It exists only while the PIN step is
//! open, is never persisted, and is wiped from memory when cleared or dropped.

use serde::{Serialize, Serializer};
use zeroize::Zeroizing;

/// A 0–6 digit transaction PIN under construction.
///
/// `Debug` is redacted so the PIN cannot leak through tracing or panic
/// messages. Serialization exposes the digits and is used only for the
/// transfer request body.
#[derive(Clone, Default)]
pub struct TransactionPin {
    digits: Zeroizing<String>,
}

impl TransactionPin {
    /// Shortest PIN the backend accepts.
    pub const MIN_LEN: usize = 4;
    /// Number of PIN boxes.
    pub const MAX_LEN: usize = 6;

    pub fn new() -> Self {
        Self::default()
    }

    /// Append one digit. Returns `false` (and changes nothing) for a
    /// non-digit or when all boxes are full.
    pub fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.is_full() {
            return false;
        }
        self.digits.push(c);
        true
    }

    /// Remove the last digit. Returns `false` if already empty.
    pub fn pop(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    pub fn clear(&mut self) {
        // Zeroizing only wipes on drop; replace so the old buffer is wiped now.
        self.digits = Zeroizing::new(String::with_capacity(Self::MAX_LEN));
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.len() >= Self::MAX_LEN
    }

    /// At least [`Self::MIN_LEN`] digits entered.
    pub fn is_submittable(&self) -> bool {
        self.digits.len() >= Self::MIN_LEN
    }

    /// The raw digits. Call sites should be limited to building the
    /// request body.
    pub fn expose(&self) -> &str {
        &self.digits
    }

    /// One bullet per entered digit, as the PIN boxes display it.
    pub fn masked(&self) -> String {
        "•".repeat(self.digits.len())
    }
}

impl std::fmt::Debug for TransactionPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionPin")
            .field("len", &self.digits.len())
            .field("digits", &"[REDACTED]")
            .finish()
    }
}

impl Serialize for TransactionPin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.digits)
    }
}
