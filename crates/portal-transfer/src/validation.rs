//! # Destination Entry
//!
//! The step-1 form and its validator. Rules run in a fixed order and the
//! first failure is reported; no messages are aggregated across fields.
//!
//! 1. recipient account number present
//! 2. IFSC present
//! 3. IFSC exactly 11 characters
//! 4. IFSC prefix on the supported-bank allow-list
//! 5. amount parses and is greater than zero

use portal_core::{
    ifsc_feedback, sanitize_account_number, sanitize_ifsc, AccountNumber, Amount, BankCode, Ifsc,
    IfscFeedback, ValidationError,
};

/// A validated transfer destination. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    recipient_account: AccountNumber,
    recipient_ifsc: Ifsc,
    amount: Amount,
}

impl TransferRequest {
    pub fn recipient_account(&self) -> &AccountNumber {
        &self.recipient_account
    }

    pub fn recipient_ifsc(&self) -> &Ifsc {
        &self.recipient_ifsc
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Bank resolved from the IFSC prefix.
    pub fn destination_bank(&self) -> BankCode {
        self.recipient_ifsc.bank()
    }
}

/// Validate raw destination fields.
pub fn validate_destination(
    account_number: &str,
    ifsc: &str,
    amount: &str,
) -> Result<TransferRequest, ValidationError> {
    let recipient_account = AccountNumber::parse(account_number)?;
    let recipient_ifsc = Ifsc::parse(ifsc)?;
    let amount = Amount::parse(amount)
        .ok()
        .filter(Amount::is_positive)
        .ok_or(ValidationError::InvalidAmount)?;

    Ok(TransferRequest {
        recipient_account,
        recipient_ifsc,
        amount,
    })
}

/// The step-1 draft. The account and IFSC setters run the field's
/// sanitizer. The amount is kept as entered (trimmed), so a sign, letters or
/// an exponent reach the validator and fail there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationForm {
    account_number: String,
    ifsc: String,
    amount: String,
}

impl DestinationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_account_number(&mut self, raw: &str) {
        self.account_number = sanitize_account_number(raw);
    }

    /// Returns live feedback for the sanitized value.
    pub fn set_ifsc(&mut self, raw: &str) -> IfscFeedback {
        self.ifsc = sanitize_ifsc(raw);
        self.ifsc_feedback()
    }

    pub fn set_amount(&mut self, raw: &str) {
        self.amount = raw.trim().to_string();
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn ifsc(&self) -> &str {
        &self.ifsc
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn ifsc_feedback(&self) -> IfscFeedback {
        ifsc_feedback(&self.ifsc)
    }

    pub fn validate(&self) -> Result<TransferRequest, ValidationError> {
        validate_destination(&self.account_number, &self.ifsc, &self.amount)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_destination_resolves_bank() {
        let req = validate_destination("1234567890", "HDFC0000123", "500").unwrap();
        assert_eq!(req.recipient_account().as_str(), "1234567890");
        assert_eq!(req.destination_bank(), BankCode::Hdfc);
        assert_eq!(req.amount(), Amount::from_rupees(500));
    }

    #[test]
    fn first_failing_rule_wins() {
        assert_eq!(
            validate_destination("", "", "").unwrap_err(),
            ValidationError::MissingAccountNumber
        );
        assert_eq!(
            validate_destination("123", "  ", "abc").unwrap_err(),
            ValidationError::MissingIfsc
        );
        assert_eq!(
            validate_destination("123", "SBIN001", "abc").unwrap_err(),
            ValidationError::IfscLength { len: 7 }
        );
        assert!(matches!(
            validate_destination("123", "PUNB0001234", "abc").unwrap_err(),
            ValidationError::UnsupportedBank { .. }
        ));
    }

    #[test]
    fn ifsc_is_trimmed_and_uppercased() {
        let req = validate_destination(" 42 ", " icic0000001 ", "1").unwrap();
        assert_eq!(req.recipient_ifsc().as_str(), "ICIC0000001");
        assert_eq!(req.recipient_account().as_str(), "42");
    }

    #[test]
    fn non_positive_or_garbage_amounts_fail() {
        for amount in ["0", "-5", "", "abc", "0.00", "0.001"] {
            assert_eq!(
                validate_destination("123", "SBIN0001234", amount).unwrap_err(),
                ValidationError::InvalidAmount,
                "amount {amount:?}"
            );
        }
    }

    #[test]
    fn unsupported_bank_message() {
        let err = validate_destination("123", "PUNB0001234", "10").unwrap_err();
        assert!(err.to_string().starts_with("Unsupported bank"));
    }

    #[test]
    fn form_setters_sanitize() {
        let mut form = DestinationForm::new();
        form.set_account_number("12 34-56");
        assert_eq!(form.set_ifsc("hdfc0000123"), IfscFeedback::Supported(BankCode::Hdfc));
        form.set_amount(" 1500.755 ");

        assert_eq!(form.account_number(), "123456");
        assert_eq!(form.ifsc(), "HDFC0000123");
        assert_eq!(form.amount(), "1500.755");
        assert_eq!(form.validate().unwrap().amount(), Amount::from_paise(150_075));

        form.clear();
        assert_eq!(form, DestinationForm::default());
    }

    #[test]
    fn form_amount_is_validated_as_entered() {
        let mut form = DestinationForm::new();
        form.set_account_number("1234567890");
        form.set_ifsc("HDFC0000123");
        for raw in ["-5", "abc", "abc5", "1e3", "1,500", "₹500"] {
            form.set_amount(raw);
            assert_eq!(
                form.validate().unwrap_err(),
                ValidationError::InvalidAmount,
                "amount {raw:?}"
            );
        }
    }

    #[test]
    fn repeated_validation_is_stable() {
        let mut form = DestinationForm::new();
        form.set_account_number("1234567890");
        form.set_ifsc("HDFC0000123");
        form.set_amount("500");
        assert_eq!(form.validate(), form.validate());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The form accepts an amount iff it parses to a positive value.
        #[test]
        fn form_accepts_amount_iff_positive(raw in "[-+ 0-9.a-z,]{0,10}") {
            let mut form = DestinationForm::new();
            form.set_account_number("1234567890");
            form.set_ifsc("SBIN0001234");
            form.set_amount(&raw);
            let expected = Amount::parse(&raw).map(|a| a.is_positive()).unwrap_or(false);
            prop_assert_eq!(form.validate().is_ok(), expected);
        }
    }
}
