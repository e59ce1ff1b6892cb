//! Platform API consumed by the setup flow
//!
//! The engine never performs I/O itself; sessions, the unlock check, the
//! auth-code step and the poller reach the platform through this trait.

use crate::error::FetchError;
use crate::types::{AuthCodeCheck, ConnectionSnapshot, DomainSetupInfo, SiteId, TransferState};
use async_trait::async_trait;

/// Collaborator endpoints the flow depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainApi: Send + Sync {
    /// Fresh DNS observation for `domain`
    async fn fetch_connection_snapshot(&self, domain: &str) -> Result<ConnectionSnapshot, FetchError>;

    /// Registrar lock and registry status; an unknown lock is a valid answer
    async fn fetch_transfer_state(&self, domain: &str) -> Result<TransferState, FetchError>;

    /// Ask the losing registrar whether `code` is valid
    async fn check_auth_code(&self, domain: &str, code: &str) -> Result<AuthCodeCheck, FetchError>;

    /// Start the inbound transfer with an accepted code
    async fn start_inbound_transfer(&self, site_id: SiteId, domain: &str, code: &str) -> Result<(), FetchError>;

    /// Name servers, IPs and Domain Connect support for `domain`
    async fn fetch_setup_info(&self, domain: &str) -> Result<DomainSetupInfo, FetchError>;
}
