use crate::api::DomainApi;
use crate::error::AuthCodeError;
use crate::types::SiteId;

/// Trim the entered code; blank input never reaches the registrar
pub fn validate_auth_code(code: &str) -> Result<&str, AuthCodeError> {
    let code = code.trim();
    if code.is_empty() {
        Err(AuthCodeError::EmptyCode)
    } else {
        Ok(code)
    }
}

/// Final step of a transfer: check the code, then request the transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCodeStep {
    pub site_id: SiteId,
    pub domain: String,
}

impl AuthCodeStep {
    #[must_use]
    pub fn new(site_id: SiteId, domain: impl Into<String>) -> Self {
        Self {
            site_id,
            domain: domain.into(),
        }
    }

    /// Submit `code`; every failure is meant to be shown next to the input
    pub async fn submit<A>(&self, api: &A, code: &str) -> Result<(), AuthCodeError>
    where
        A: DomainApi + ?Sized,
    {
        let code = validate_auth_code(code)?;

        let check = api
            .check_auth_code(&self.domain, code)
            .await
            .map_err(AuthCodeError::CheckFailed)?;
        if !check.success {
            tracing::info!(domain = %self.domain, "authorization code rejected");
            return Err(AuthCodeError::Rejected);
        }

        api.start_inbound_transfer(self.site_id, &self.domain, code)
            .await
            .map_err(AuthCodeError::TransferNotStarted)?;
        tracing::info!(domain = %self.domain, site = %self.site_id, "inbound transfer started");
        Ok(())
    }
}
