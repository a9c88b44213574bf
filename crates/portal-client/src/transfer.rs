//! Typed client for the portal transfer endpoint.
//!
//! ## Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/transfer` | PIN-authorized transfer between linked and external accounts |
//!
//! The endpoint answers business-rule failures (bad PIN, insufficient funds,
//! unknown account) with a JSON body on a non-2xx status. Those bodies are
//! parsed and returned as [`TransferOutcome::Rejected`], not as errors; only
//! transport failures and unparsable bodies surface as [`PortalApiError`].

use portal_core::{AccountNumber, Amount, Ifsc, TransactionPin};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PortalApiError;

/// Returned when a failure body names no reason.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Value of the `status` field on a completed transfer.
pub const STATUS_OK: &str = "ok";

/// Request body for `POST /api/transfer`.
#[derive(Debug, Clone, Serialize)]
pub struct TransferOrder {
    /// Account number of the chosen funding account.
    pub source_account: String,
    pub recipient_account: AccountNumber,
    pub recipient_ifsc: Ifsc,
    pub amount: Amount,
    pub transaction_pin: TransactionPin,
    pub description: String,
}

impl TransferOrder {
    /// The description the portal attaches to every transfer.
    pub fn describe(recipient: &AccountNumber) -> String {
        format!("Transfer to {recipient}")
    }

    /// The request body with the PIN replaced by `****`, for logging.
    pub fn masked(&self) -> Value {
        serde_json::json!({
            "source_account": self.source_account,
            "recipient_account": self.recipient_account.as_str(),
            "recipient_ifsc": self.recipient_ifsc.as_str(),
            "amount": self.amount.as_rupees_f64(),
            "transaction_pin": "****",
            "description": self.description,
        })
    }
}

/// Raw response body. Every field is optional; the backend omits most of
/// them on failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransferResponse {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub error: Value,
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub detail: Value,
    #[serde(default)]
    pub transaction_id: Value,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub from_account: Value,
    #[serde(default)]
    pub to_account: Value,
}

impl TransferResponse {
    /// The first present of `error`, `message`, `detail`.
    ///
    /// Empty strings, `null`, `false` and zero count as absent.
    pub fn failure_reason(&self) -> String {
        [&self.error, &self.message, &self.detail]
            .into_iter()
            .find_map(text)
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }

    fn is_ok(&self) -> bool {
        self.status.as_str() == Some(STATUS_OK)
    }

    /// Decide the outcome given the HTTP status it arrived with.
    pub fn into_outcome(self, http_status: u16) -> TransferOutcome {
        if (200..300).contains(&http_status) && self.is_ok() {
            TransferOutcome::Completed(TransferReceipt {
                transaction_id: text(&self.transaction_id),
                message: text(&self.message),
                amount: Amount::deserialize(&self.amount).ok(),
                from_account: text(&self.from_account),
                to_account: text(&self.to_account),
            })
        } else {
            TransferOutcome::Rejected(TransferRejection {
                http_status,
                status: text(&self.status),
                reason: self.failure_reason(),
                message: text(&self.message),
            })
        }
    }
}

/// Render a JSON scalar as text if it would read as truthy.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Echo of a completed transfer, used for the success summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub transaction_id: Option<String>,
    pub message: Option<String>,
    pub amount: Option<Amount>,
    pub from_account: Option<String>,
    pub to_account: Option<String>,
}

/// A transfer the backend declined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRejection {
    pub http_status: u16,
    /// The body's `status` field, usually `"error"`.
    pub status: Option<String>,
    /// Text the failure is classified on.
    pub reason: String,
    pub message: Option<String>,
}

/// Result of a transfer request that produced a parsable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed(TransferReceipt),
    Rejected(TransferRejection),
}

/// Client for the transfer endpoint.
#[derive(Debug, Clone)]
pub struct TransferClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl TransferClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Submit a transfer. Sent once; never retried.
    ///
    /// Calls `POST {base_url}api/transfer`.
    pub async fn submit(&self, order: &TransferOrder) -> Result<TransferOutcome, PortalApiError> {
        let endpoint = "POST /api/transfer";
        let url = format!("{}api/transfer", self.base_url);

        tracing::info!(payload = %order.masked(), "sending transfer request");

        let resp = self
            .http
            .post(&url)
            .json(order)
            .send()
            .await
            .map_err(|e| PortalApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let status = resp.status().as_u16();
        let body: TransferResponse =
            resp.json()
                .await
                .map_err(|e| PortalApiError::Deserialization {
                    endpoint: endpoint.into(),
                    source: e,
                })?;

        let outcome = body.into_outcome(status);
        match &outcome {
            TransferOutcome::Completed(receipt) => tracing::info!(
                transaction_id = receipt.transaction_id.as_deref().unwrap_or("-"),
                "transfer completed"
            ),
            TransferOutcome::Rejected(rejection) => tracing::warn!(
                http_status = rejection.http_status,
                reason = %rejection.reason,
                "transfer rejected"
            ),
        }
        Ok(outcome)
    }
}
