//! # portal-client -- Typed Rust client for the banking portal backend
//!
//! Provides typed access to the two endpoints the transfer flow consumes:
//! - **Accounts** via `GET /api/dashboard-data` (funding accounts and balances)
//! - **Transfers** via `POST /api/transfer` (PIN-authorized fund transfer)
//!
//! ## Architecture
//!
//! Every request carries the portal session cookie, when configured. The
//! backend owns authentication, balances and transfer execution; this crate
//! maps its JSON to types and its failures to [`PortalApiError`].
//!
//! Requests are sent exactly once. There is no retry layer: every retry in
//! the portal is a new user action.

pub mod accounts;
pub mod config;
pub mod error;
pub mod transfer;

pub use accounts::{BankingData, DashboardData, FundingAccount};
pub use config::PortalApiConfig;
pub use error::PortalApiError;
pub use transfer::{TransferOrder, TransferOutcome, TransferReceipt, TransferRejection};

use std::time::Duration;

/// Top-level portal API client. Holds a sub-client per endpoint group.
#[derive(Debug, Clone)]
pub struct PortalClient {
    accounts: accounts::AccountsClient,
    transfers: transfer::TransferClient,
}

impl PortalClient {
    /// Create a new portal client from configuration.
    pub fn new(config: PortalApiConfig) -> Result<Self, PortalApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let mut value = reqwest::header::HeaderValue::from_str(cookie.as_str())
                .map_err(|_| config::ConfigError::InvalidCookie)?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::COOKIE, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| PortalApiError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;

        tracing::debug!(base_url = %config.base_url, "portal client initialised");

        Ok(Self {
            accounts: accounts::AccountsClient::new(http.clone(), config.base_url.clone()),
            transfers: transfer::TransferClient::new(http, config.base_url),
        })
    }

    /// Access the dashboard/accounts client.
    pub fn accounts(&self) -> &accounts::AccountsClient {
        &self.accounts
    }

    /// Access the transfer client.
    pub fn transfers(&self) -> &transfer::TransferClient {
        &self.transfers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::ConfigError;

    #[test]
    fn client_builds_from_local_mock() {
        let config = PortalApiConfig::local_mock(9000).unwrap();
        assert!(PortalClient::new(config).is_ok());
    }

    #[test]
    fn cookie_with_control_characters_is_rejected() {
        let config = PortalApiConfig::local_mock(9000)
            .unwrap()
            .with_session_cookie("session=abc\r\nX-Injected: 1");
        let err = PortalClient::new(config).unwrap_err();
        assert!(matches!(err, PortalApiError::Config(ConfigError::InvalidCookie)));
        assert!(!err.to_string().contains("abc"));
    }
}
