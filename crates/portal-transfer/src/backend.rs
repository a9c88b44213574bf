//! The seam between the wizard and the portal backend.

use portal_client::{FundingAccount, PortalApiError, PortalClient, TransferOrder, TransferOutcome};

/// Backend operations the transfer wizard needs.
///
/// Implemented for [`PortalClient`]; tests substitute a scripted backend.
/// Each call is issued at most once per user action.
#[allow(async_fn_in_trait)]
pub trait TransferBackend {
    /// The user's funding accounts, fetched fresh.
    async fn fetch_accounts(&self) -> Result<Vec<FundingAccount>, PortalApiError>;

    /// Submit a PIN-authorized transfer.
    async fn submit_transfer(&self, order: &TransferOrder)
        -> Result<TransferOutcome, PortalApiError>;
}

impl TransferBackend for PortalClient {
    async fn fetch_accounts(&self) -> Result<Vec<FundingAccount>, PortalApiError> {
        self.accounts().list_funding_accounts().await
    }

    async fn submit_transfer(
        &self,
        order: &TransferOrder,
    ) -> Result<TransferOutcome, PortalApiError> {
        self.transfers().submit(order).await
    }
}

impl<T: TransferBackend> TransferBackend for &T {
    async fn fetch_accounts(&self) -> Result<Vec<FundingAccount>, PortalApiError> {
        (**self).fetch_accounts().await
    }

    async fn submit_transfer(
        &self,
        order: &TransferOrder,
    ) -> Result<TransferOutcome, PortalApiError> {
        (**self).submit_transfer(order).await
    }
}
