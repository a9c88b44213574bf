//! # PIN Pad
//!
//! Six single-digit boxes filled left to right. The focused box is the next
//! empty one, or the last box once all six are filled.
//!
//! Backspace always removes the most recent digit. On an empty focused box
//! that means retreating to the previous box and clearing it; on the filled
//! sixth box it clears that box in place. Either way focus ends up on the
//! first empty box.

use portal_core::TransactionPin;

/// Number of PIN boxes.
pub const PIN_BOXES: usize = TransactionPin::MAX_LEN;

/// A key pressed on the PIN pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinKey {
    Char(char),
    Backspace,
    Enter,
}

/// What a key press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPadEvent {
    /// The PIN changed; nothing else to do.
    Edited,
    /// The sixth digit was entered.
    AutoSubmit,
    /// Enter was pressed with a submittable PIN.
    Submit,
    /// The key had no effect.
    Ignored,
}

impl PinPadEvent {
    /// Whether the event triggers a submission attempt.
    pub fn wants_submit(&self) -> bool {
        matches!(self, Self::AutoSubmit | Self::Submit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PinPad {
    pin: TransactionPin,
}

impl PinPad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: PinKey) -> PinPadEvent {
        match key {
            PinKey::Char(c) => self.digit(c),
            PinKey::Backspace => self.backspace(),
            PinKey::Enter if self.pin.is_submittable() => PinPadEvent::Submit,
            PinKey::Enter => PinPadEvent::Ignored,
        }
    }

    fn digit(&mut self, c: char) -> PinPadEvent {
        if !self.pin.push(c) {
            return PinPadEvent::Ignored;
        }
        if self.pin.is_full() {
            PinPadEvent::AutoSubmit
        } else {
            PinPadEvent::Edited
        }
    }

    fn backspace(&mut self) -> PinPadEvent {
        if self.pin.pop() {
            PinPadEvent::Edited
        } else {
            PinPadEvent::Ignored
        }
    }

    /// Index of the focused box.
    pub fn focus(&self) -> usize {
        self.pin.len().min(PIN_BOXES - 1)
    }

    /// Per-box fill state, left to right.
    pub fn boxes(&self) -> [bool; PIN_BOXES] {
        let filled = self.pin.len();
        std::array::from_fn(|i| i < filled)
    }

    pub fn pin(&self) -> &TransactionPin {
        &self.pin
    }

    pub fn len(&self) -> usize {
        self.pin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pin.is_empty()
    }

    /// Empty every box and focus the first.
    pub fn clear(&mut self) {
        self.pin.clear();
    }
}
