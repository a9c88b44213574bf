//! Typed client for the portal dashboard feed.
//!
//! ## Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/dashboard-data` | User profile and linked banking data |
//!
//! Only the `banking_data.accounts` slice is modelled; every other field of
//! the feed is ignored.

use portal_core::Amount;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PortalApiError;

/// Shown when an account carries no bank name.
pub const UNKNOWN_BANK: &str = "Unknown Bank";

/// Top-level dashboard response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub banking_data: Option<BankingData>,
}

/// The `banking_data` object of the dashboard response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BankingData {
    /// Missing and `null` both read as an empty list.
    #[serde(default, deserialize_with = "null_as_default")]
    pub accounts: Vec<FundingAccount>,
    /// Set by the backend when a bank server could not be reached.
    #[serde(default)]
    pub server_status: Option<String>,
}

/// A linked bank account that can fund a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingAccount {
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub account_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub balance: Amount,
    #[serde(default)]
    pub bank_code: Option<String>,
}

impl FundingAccount {
    /// Bank name for display, `Unknown Bank` when absent or blank.
    pub fn display_bank_name(&self) -> &str {
        self.bank_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_BANK)
    }

    /// Whether this account's balance covers `amount`.
    pub fn can_fund(&self, amount: Amount) -> bool {
        self.balance >= amount
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Some bank feeds send account numbers as JSON numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Client for the dashboard feed.
#[derive(Debug, Clone)]
pub struct AccountsClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl AccountsClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Fetch the raw dashboard feed.
    ///
    /// Calls `GET {base_url}api/dashboard-data`.
    pub async fn dashboard(&self) -> Result<DashboardData, PortalApiError> {
        let endpoint = "GET /api/dashboard-data";
        let url = format!("{}api/dashboard-data", self.base_url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PortalApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(PortalApiError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| PortalApiError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })
    }

    /// The user's funding accounts, fetched fresh on every call.
    ///
    /// A feed without a `banking_data` object is an error; an empty or
    /// missing account list is not.
    pub async fn list_funding_accounts(&self) -> Result<Vec<FundingAccount>, PortalApiError> {
        let data = self.dashboard().await?;
        let banking = data.banking_data.ok_or_else(|| PortalApiError::MissingField {
            endpoint: "GET /api/dashboard-data".into(),
            field: "banking_data",
        })?;

        if banking.server_status.as_deref() == Some("error") {
            tracing::warn!("dashboard feed reports bank servers unavailable");
        }
        tracing::debug!(count = banking.accounts.len(), "funding accounts fetched");
        Ok(banking.accounts)
    }
}
