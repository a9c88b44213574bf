//! # Transfer Flow Controller
//!
//! Owns every piece of wizard state: the destination draft, the validated
//! request, the account listing and selection, the PIN pad, and the
//! outcome of the last submission. Front ends feed it user actions and
//! render its view models.
//!
//! ## Re-entrancy
//!
//! Each backend call takes `&mut self`, so one owner cannot overlap calls.
//! The controller also keeps explicit in-flight markers: the `Submitting`
//! state and [`AccountListing::Loading`]. If a caller drops a pending
//! future, the marker stays set and the triggering action stays disabled
//! until [`TransferFlow::cancel`] or [`TransferFlow::reset`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use portal_client::{FundingAccount, TransferOrder, TransferOutcome};
use portal_core::{IfscFeedback, ValidationError};
use thiserror::Error;

use crate::backend::TransferBackend;
use crate::classify::{Recovery, TransferFailure};
use crate::pin_pad::{PinKey, PinPad, PinPadEvent};
use crate::state::{FlowState, FlowTransitionRecord};
use crate::validation::{DestinationForm, TransferRequest};
use crate::view::{AccountListing, PinSummary, SuccessSummary, TransferSummary};

/// How long the success summary stays up before the wizard resets.
pub const SUCCESS_DISMISS_DELAY: Duration = Duration::from_secs(5);

/// A user action the current state does not allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Destination form rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Action not valid in the current state.
    #[error("cannot {action} in state {state}")]
    InvalidAction {
        state: FlowState,
        action: &'static str,
    },

    #[error("Please select an account")]
    NoAccountSelected,

    #[error("Insufficient balance in this account")]
    InsufficientBalance { index: usize },

    #[error("no account at position {index}")]
    NoSuchAccount { index: usize },

    #[error("Please enter your transaction PIN (minimum 4 digits)")]
    PinTooShort,

    #[error("a transfer submission is already in progress")]
    SubmissionInProgress,

    #[error("your accounts are still loading")]
    AccountsLoading,
}

/// How a submission resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferResolution {
    Completed(SuccessSummary),
    Failed(TransferFailure),
}

/// The transfer wizard.
#[derive(Debug)]
pub struct TransferFlow<B> {
    backend: B,
    state: FlowState,
    form: DestinationForm,
    request: Option<TransferRequest>,
    listing: AccountListing,
    selected: Option<usize>,
    pin_pad: PinPad,
    success: Option<SuccessSummary>,
    success_at: Option<DateTime<Utc>>,
    last_failure: Option<TransferFailure>,
    transitions: Vec<FlowTransitionRecord>,
}

impl<B: TransferBackend> TransferFlow<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: FlowState::DestinationEntry,
            form: DestinationForm::new(),
            request: None,
            listing: AccountListing::Idle,
            selected: None,
            pin_pad: PinPad::new(),
            success: None,
            success_at: None,
            last_failure: None,
            transitions: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Ordered log of all state transitions since the last reset.
    pub fn transitions(&self) -> &[FlowTransitionRecord] {
        &self.transitions
    }

    // ── Step 1: destination entry ────────────────────────────────────

    pub fn form(&self) -> &DestinationForm {
        &self.form
    }

    pub fn set_recipient_account(&mut self, raw: &str) {
        self.form.set_account_number(raw);
    }

    pub fn set_ifsc(&mut self, raw: &str) -> IfscFeedback {
        self.form.set_ifsc(raw)
    }

    pub fn set_amount(&mut self, raw: &str) {
        self.form.set_amount(raw);
    }

    /// The request being worked on, once step 1 has passed.
    pub fn request(&self) -> Option<&TransferRequest> {
        self.request.as_ref()
    }

    /// Validate the form and open account selection (DESTINATION_ENTRY →
    /// ACCOUNT_SELECTION), then load the funding accounts.
    ///
    /// A validation failure leaves the state unchanged and makes no
    /// network call.
    pub async fn begin_transfer(&mut self) -> Result<(), FlowError> {
        self.require_state(FlowState::DestinationEntry, "start a transfer")?;
        let request = self.form.validate()?;

        tracing::info!(
            recipient = %request.recipient_account(),
            bank = %request.destination_bank(),
            amount = %request.amount(),
            "destination validated"
        );
        self.request = Some(request);
        self.last_failure = None;
        self.do_transition(FlowState::AccountSelection, "destination validated");
        self.load_accounts().await;
        Ok(())
    }

    // ── Step 2: account selection ────────────────────────────────────

    pub fn account_listing(&self) -> &AccountListing {
        &self.listing
    }

    pub fn transfer_summary(&self) -> Option<TransferSummary> {
        self.request.as_ref().map(TransferSummary::from)
    }

    /// Re-issue the account fetch. The only retry path for a failed list.
    pub async fn reload_accounts(&mut self) -> Result<(), FlowError> {
        self.require_state(FlowState::AccountSelection, "reload accounts")?;
        if self.listing.is_loading() {
            return Err(FlowError::AccountsLoading);
        }
        self.load_accounts().await;
        Ok(())
    }

    async fn load_accounts(&mut self) {
        let amount = match &self.request {
            Some(req) => req.amount(),
            None => return,
        };
        self.selected = None;
        self.listing = AccountListing::Loading;

        self.listing = match self.backend.fetch_accounts().await {
            Ok(accounts) => {
                tracing::info!(count = accounts.len(), "funding accounts loaded");
                AccountListing::from_accounts(accounts, amount)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load funding accounts");
                AccountListing::Unavailable
            }
        };
    }

    /// Choose the funding account at `index` of the listing. May be called
    /// repeatedly; the last valid choice wins.
    pub fn select_account(&mut self, index: usize) -> Result<(), FlowError> {
        self.require_state(FlowState::AccountSelection, "select an account")?;
        if self.listing.is_loading() {
            return Err(FlowError::AccountsLoading);
        }
        let option = self
            .listing
            .options()
            .get(index)
            .ok_or(FlowError::NoSuchAccount { index })?;
        if !option.selectable {
            return Err(FlowError::InsufficientBalance { index });
        }
        tracing::debug!(index, account = %option.account.account_number, "funding account selected");
        self.selected = Some(index);
        Ok(())
    }

    pub fn selected_account(&self) -> Option<&FundingAccount> {
        self.selected
            .and_then(|i| self.listing.options().get(i))
            .map(|option| &option.account)
    }

    /// Whether the "Next: Enter PIN" control is enabled.
    pub fn can_proceed_to_pin(&self) -> bool {
        self.state == FlowState::AccountSelection && self.selected_account().is_some()
    }

    /// ACCOUNT_SELECTION → PIN_ENTRY with an empty PIN pad.
    pub fn proceed_to_pin(&mut self) -> Result<(), FlowError> {
        self.require_state(FlowState::AccountSelection, "proceed to PIN entry")?;
        if self.selected_account().is_none() {
            return Err(FlowError::NoAccountSelected);
        }
        self.pin_pad.clear();
        self.do_transition(FlowState::PinEntry, "funding account chosen");
        Ok(())
    }

    // ── Step 3: PIN entry ────────────────────────────────────────────

    pub fn pin_pad(&self) -> &PinPad {
        &self.pin_pad
    }

    pub fn pin_summary(&self) -> Option<PinSummary> {
        let source = self.selected_account()?;
        let req = self.request.as_ref()?;
        Some(PinSummary::new(source, req))
    }

    /// Whether the confirm control is enabled: at least four digits and no
    /// submission in flight.
    pub fn submit_enabled(&self) -> bool {
        self.state == FlowState::PinEntry && self.pin_pad.pin().is_submittable()
    }

    /// Apply one key to the PIN pad without submitting.
    pub fn press_pin_key(&mut self, key: PinKey) -> Result<PinPadEvent, FlowError> {
        match self.state {
            FlowState::PinEntry => Ok(self.pin_pad.press(key)),
            FlowState::Submitting => Err(FlowError::SubmissionInProgress),
            state => Err(FlowError::InvalidAction {
                state,
                action: "enter a PIN",
            }),
        }
    }

    /// Empty every PIN box and refocus the first.
    pub fn clear_pin(&mut self) -> Result<(), FlowError> {
        self.require_state(FlowState::PinEntry, "clear the PIN")?;
        self.pin_pad.clear();
        Ok(())
    }

    /// Apply one key and submit when the key asks for it (the sixth digit,
    /// or Enter with at least four) and the confirm control is enabled.
    pub async fn handle_pin_key(
        &mut self,
        key: PinKey,
    ) -> Result<Option<TransferResolution>, FlowError> {
        let event = self.press_pin_key(key)?;
        if event.wants_submit() && self.submit_enabled() {
            return self.submit().await.map(Some);
        }
        Ok(None)
    }

    /// Submit the transfer (PIN_ENTRY → SUBMITTING → SUCCESS | FAILED).
    ///
    /// Sends exactly one request. A failure is resolved before returning:
    /// PIN errors go back to PIN_ENTRY with an empty pad, every other
    /// failure closes the wizard.
    pub async fn submit(&mut self) -> Result<TransferResolution, FlowError> {
        if self.state == FlowState::Submitting {
            return Err(FlowError::SubmissionInProgress);
        }
        self.require_state(FlowState::PinEntry, "submit a transfer")?;

        let (order, source, request) = {
            let source = self
                .selected_account()
                .cloned()
                .ok_or(FlowError::NoAccountSelected)?;
            if !self.pin_pad.pin().is_submittable() {
                return Err(FlowError::PinTooShort);
            }
            let request = self
                .request
                .clone()
                .ok_or(FlowError::InvalidAction {
                    state: self.state,
                    action: "submit without a destination",
                })?;
            let order = TransferOrder {
                source_account: source.account_number.clone(),
                recipient_account: request.recipient_account().clone(),
                recipient_ifsc: request.recipient_ifsc().clone(),
                amount: request.amount(),
                transaction_pin: self.pin_pad.pin().clone(),
                description: TransferOrder::describe(request.recipient_account()),
            };
            (order, source, request)
        };

        self.do_transition(FlowState::Submitting, "PIN submitted");
        let result = self.backend.submit_transfer(&order).await;
        drop(order);

        let resolution = match result {
            Ok(TransferOutcome::Completed(receipt)) => {
                let summary = SuccessSummary::new(receipt, &source, &request);
                self.complete(summary.clone());
                TransferResolution::Completed(summary)
            }
            Ok(TransferOutcome::Rejected(rejection)) => {
                let failure = TransferFailure::from_rejection(&rejection);
                self.fail(failure.clone());
                TransferResolution::Failed(failure)
            }
            Err(e) => {
                let failure = TransferFailure::network(&e);
                self.fail(failure.clone());
                TransferResolution::Failed(failure)
            }
        };
        Ok(resolution)
    }

    fn complete(&mut self, summary: SuccessSummary) {
        tracing::info!(
            transaction_id = summary.transaction_id.as_deref().unwrap_or("-"),
            amount = %summary.amount,
            "transfer succeeded"
        );
        self.pin_pad.clear();
        self.form.clear();
        self.success = Some(summary);
        self.success_at = Some(Utc::now());
        self.do_transition(FlowState::Success, "transfer confirmed");
    }

    fn fail(&mut self, failure: TransferFailure) {
        tracing::warn!(
            category = ?failure.category,
            message = %failure.message,
            "transfer failed"
        );
        let reason = failure.title();
        self.do_transition(FlowState::Failed, reason);
        self.pin_pad.clear();

        match failure.recovery() {
            Recovery::RetryPin => self.do_transition(FlowState::PinEntry, "retry PIN"),
            Recovery::CloseWizard => {
                self.discard_wizard();
                self.do_transition(FlowState::DestinationEntry, "wizard closed after failure");
            }
        }
        self.last_failure = Some(failure);
    }

    /// The most recent failure, until the next transfer starts.
    pub fn last_failure(&self) -> Option<&TransferFailure> {
        self.last_failure.as_ref()
    }

    // ── Success ──────────────────────────────────────────────────────

    pub fn success(&self) -> Option<&SuccessSummary> {
        self.success.as_ref()
    }

    /// When the success summary dismisses itself.
    pub fn auto_dismiss_at(&self) -> Option<DateTime<Utc>> {
        let shown = self.success_at?;
        let delay = chrono::Duration::from_std(SUCCESS_DISMISS_DELAY).ok()?;
        shown.checked_add_signed(delay)
    }

    /// Dismiss the success summary and reset the wizard.
    pub fn dismiss_success(&mut self) -> Result<(), FlowError> {
        self.require_state(FlowState::Success, "dismiss the success summary")?;
        self.reset();
        Ok(())
    }

    /// Dismiss the success summary if the auto-dismiss delay has elapsed at
    /// `now`. Returns whether it did.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.auto_dismiss_at() {
            Some(due) if self.state == FlowState::Success && now >= due => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    // ── Cancel / reset ───────────────────────────────────────────────

    /// Close the wizard from ACCOUNT_SELECTION or PIN_ENTRY. The destination
    /// form keeps its contents; everything after step 1 is discarded.
    pub fn cancel(&mut self) -> Result<(), FlowError> {
        if !self.state.is_cancellable() {
            return Err(FlowError::InvalidAction {
                state: self.state,
                action: "cancel",
            });
        }
        self.discard_wizard();
        self.do_transition(FlowState::DestinationEntry, "cancelled by user");
        Ok(())
    }

    /// Return to a fresh DESTINATION_ENTRY with an empty form and an empty
    /// transition log.
    pub fn reset(&mut self) {
        self.discard_wizard();
        self.form.clear();
        self.success = None;
        self.success_at = None;
        self.last_failure = None;
        self.state = FlowState::DestinationEntry;
        self.transitions.clear();
        tracing::debug!("transfer flow reset");
    }

    fn discard_wizard(&mut self) {
        self.request = None;
        self.listing = AccountListing::Idle;
        self.selected = None;
        self.pin_pad.clear();
    }

    fn require_state(&self, expected: FlowState, action: &'static str) -> Result<(), FlowError> {
        if self.state == expected {
            return Ok(());
        }
        if self.state == FlowState::Submitting {
            return Err(FlowError::SubmissionInProgress);
        }
        Err(FlowError::InvalidAction {
            state: self.state,
            action,
        })
    }

    fn do_transition(&mut self, to: FlowState, reason: &str) {
        tracing::debug!(from = %self.state, to = %to, reason, "transfer flow transition");
        self.transitions.push(FlowTransitionRecord {
            from_state: self.state,
            to_state: to,
            timestamp: Utc::now(),
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_client::{PortalApiError, TransferRejection};
    use portal_core::Amount;

    /// Backend whose futures resolve immediately.
    struct Immediate {
        accounts: Vec<FundingAccount>,
        outcome: TransferOutcome,
    }

    impl TransferBackend for Immediate {
        async fn fetch_accounts(&self) -> Result<Vec<FundingAccount>, PortalApiError> {
            Ok(self.accounts.clone())
        }

        async fn submit_transfer(
            &self,
            _order: &TransferOrder,
        ) -> Result<TransferOutcome, PortalApiError> {
            Ok(self.outcome.clone())
        }
    }

    /// Backend whose submit never resolves.
    struct Hung;

    impl TransferBackend for Hung {
        async fn fetch_accounts(&self) -> Result<Vec<FundingAccount>, PortalApiError> {
            Ok(vec![FundingAccount {
                bank_name: Some("SBI".into()),
                account_number: "30001112223".into(),
                balance: Amount::from_rupees(1000),
                bank_code: None,
            }])
        }

        async fn submit_transfer(
            &self,
            _order: &TransferOrder,
        ) -> Result<TransferOutcome, PortalApiError> {
            std::future::pending().await
        }
    }

    fn rejected(reason: &str) -> TransferOutcome {
        TransferOutcome::Rejected(TransferRejection {
            http_status: 400,
            status: Some("error".into()),
            reason: reason.into(),
            message: None,
        })
    }

    fn backend(outcome: TransferOutcome) -> Immediate {
        Immediate {
            accounts: vec![FundingAccount {
                bank_name: Some("SBI".into()),
                account_number: "30001112223".into(),
                balance: Amount::from_rupees(1000),
                bank_code: None,
            }],
            outcome,
        }
    }

    async fn at_pin_entry<B: TransferBackend>(flow: &mut TransferFlow<B>) {
        flow.set_recipient_account("1234567890");
        flow.set_ifsc("HDFC0000123");
        flow.set_amount("500");
        flow.begin_transfer().await.unwrap();
        flow.select_account(0).unwrap();
        flow.proceed_to_pin().unwrap();
    }

    #[test]
    fn new_flow_starts_at_destination_entry() {
        let flow = TransferFlow::new(backend(rejected("x")));
        assert_eq!(flow.state(), FlowState::DestinationEntry);
        assert!(flow.transitions().is_empty());
        assert_eq!(flow.account_listing(), &AccountListing::Idle);
    }

    #[tokio::test]
    async fn invalid_destination_stays_put() {
        let mut flow = TransferFlow::new(backend(rejected("x")));
        flow.set_recipient_account("1234567890");
        flow.set_ifsc("PUNB0001234");
        flow.set_amount("500");
        let err = flow.begin_transfer().await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::UnsupportedBank { .. })
        ));
        assert_eq!(flow.state(), FlowState::DestinationEntry);
        assert!(flow.request().is_none());
    }

    #[tokio::test]
    async fn rewritable_amounts_never_open_account_selection() {
        let mut flow = TransferFlow::new(backend(rejected("x")));
        flow.set_recipient_account("1234567890");
        flow.set_ifsc("HDFC0000123");
        for raw in ["-5", "abc", "abc5", "1e3"] {
            flow.set_amount(raw);
            assert_eq!(
                flow.begin_transfer().await.unwrap_err(),
                FlowError::Validation(ValidationError::InvalidAmount),
                "amount {raw:?}"
            );
            assert_eq!(flow.state(), FlowState::DestinationEntry);
            assert!(flow.request().is_none());
            assert_eq!(flow.account_listing(), &AccountListing::Idle);
        }
        assert!(flow.transitions().is_empty());
    }

    #[tokio::test]
    async fn proceed_without_selection_is_rejected() {
        let mut flow = TransferFlow::new(backend(rejected("x")));
        flow.set_recipient_account("1");
        flow.set_ifsc("SBIN0001234");
        flow.set_amount("10");
        flow.begin_transfer().await.unwrap();
        assert!(!flow.can_proceed_to_pin());
        assert_eq!(flow.proceed_to_pin().unwrap_err(), FlowError::NoAccountSelected);
        assert_eq!(
            FlowError::NoAccountSelected.to_string(),
            "Please select an account"
        );
    }

    #[tokio::test]
    async fn short_pin_is_rejected_without_submitting() {
        let mut flow = TransferFlow::new(backend(rejected("x")));
        at_pin_entry(&mut flow).await;
        flow.press_pin_key(PinKey::Char('1')).unwrap();
        assert!(!flow.submit_enabled());
        assert_eq!(flow.submit().await.unwrap_err(), FlowError::PinTooShort);
        assert_eq!(flow.state(), FlowState::PinEntry);
    }

    #[tokio::test]
    async fn pin_failure_returns_to_pin_entry() {
        let mut flow = TransferFlow::new(backend(rejected("Invalid PIN")));
        at_pin_entry(&mut flow).await;
        for c in "1234".chars() {
            flow.press_pin_key(PinKey::Char(c)).unwrap();
        }
        let resolution = flow.submit().await.unwrap();
        assert!(matches!(resolution, TransferResolution::Failed(_)));
        assert_eq!(flow.state(), FlowState::PinEntry);
        assert!(flow.pin_pad().is_empty());
        assert_eq!(flow.pin_pad().focus(), 0);
        assert!(flow.selected_account().is_some());

        let tail: Vec<(FlowState, FlowState)> = flow
            .transitions()
            .iter()
            .rev()
            .take(3)
            .map(|t| (t.from_state, t.to_state))
            .collect();
        assert_eq!(
            tail,
            vec![
                (FlowState::Failed, FlowState::PinEntry),
                (FlowState::Submitting, FlowState::Failed),
                (FlowState::PinEntry, FlowState::Submitting),
            ]
        );
    }

    #[tokio::test]
    async fn other_failures_close_wizard_and_keep_form() {
        let mut flow = TransferFlow::new(backend(rejected("Insufficient funds")));
        at_pin_entry(&mut flow).await;
        for c in "1234".chars() {
            flow.press_pin_key(PinKey::Char(c)).unwrap();
        }
        flow.submit().await.unwrap();
        assert_eq!(flow.state(), FlowState::DestinationEntry);
        assert!(flow.request().is_none());
        assert_eq!(flow.form().account_number(), "1234567890");
        assert_eq!(
            flow.last_failure().map(|f| f.title()),
            Some("Insufficient Funds")
        );
    }

    #[tokio::test]
    async fn abandoned_submission_stays_in_flight_until_reset() {
        let mut flow = TransferFlow::new(Hung);
        at_pin_entry(&mut flow).await;
        for c in "1234".chars() {
            flow.press_pin_key(PinKey::Char(c)).unwrap();
        }

        let abandoned =
            tokio::time::timeout(std::time::Duration::from_millis(20), flow.submit()).await;
        assert!(abandoned.is_err());

        assert_eq!(flow.state(), FlowState::Submitting);
        assert!(!flow.submit_enabled());
        assert_eq!(
            flow.submit().await.unwrap_err(),
            FlowError::SubmissionInProgress
        );
        assert_eq!(
            flow.press_pin_key(PinKey::Enter).unwrap_err(),
            FlowError::SubmissionInProgress
        );
        assert!(flow.cancel().is_err());

        flow.reset();
        assert_eq!(flow.state(), FlowState::DestinationEntry);
        assert!(flow.transitions().is_empty());
    }

    #[tokio::test]
    async fn success_auto_dismisses_after_delay() {
        let outcome = TransferOutcome::Completed(portal_client::TransferReceipt {
            transaction_id: Some("TXN1".into()),
            message: None,
            amount: None,
            from_account: None,
            to_account: None,
        });
        let mut flow = TransferFlow::new(backend(outcome));
        at_pin_entry(&mut flow).await;
        for c in "1234".chars() {
            flow.press_pin_key(PinKey::Char(c)).unwrap();
        }
        flow.submit().await.unwrap();
        assert_eq!(flow.state(), FlowState::Success);
        assert_eq!(flow.form(), &DestinationForm::default());

        let due = flow.auto_dismiss_at().unwrap();
        assert!(!flow.tick(due - chrono::Duration::milliseconds(1)));
        assert_eq!(flow.state(), FlowState::Success);
        assert!(flow.tick(due));
        assert_eq!(flow.state(), FlowState::DestinationEntry);
        assert!(flow.success().is_none());
    }

    #[tokio::test]
    async fn cancel_is_only_valid_inside_the_wizard() {
        let mut flow = TransferFlow::new(backend(rejected("x")));
        assert!(matches!(
            flow.cancel().unwrap_err(),
            FlowError::InvalidAction {
                state: FlowState::DestinationEntry,
                ..
            }
        ));
        at_pin_entry(&mut flow).await;
        flow.cancel().unwrap();
        assert_eq!(flow.state(), FlowState::DestinationEntry);
        assert!(flow.pin_pad().is_empty());
        assert_eq!(flow.account_listing(), &AccountListing::Idle);
    }
}
