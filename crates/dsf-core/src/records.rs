//! DNS records the user is asked to create

use crate::types::{DnsRecord, DnsRecordType, DomainSetupInfo};
use dsf_kernel::Mode;

/// Domain whose records are being listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTarget {
    /// Fully qualified name the site will be served from
    pub domain: String,
    /// Label relative to the zone apex, `None` for a root domain
    pub host_label: Option<String>,
}

impl RecordTarget {
    #[must_use]
    pub fn root(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            host_label: None,
        }
    }

    #[must_use]
    pub fn subdomain(domain: impl Into<String>, host_label: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            host_label: Some(host_label.into()),
        }
    }

    /// Record name for the domain itself
    #[must_use]
    pub fn host(&self) -> &str {
        self.host_label.as_deref().unwrap_or("@")
    }

    /// Record name for the `www` alias
    #[must_use]
    pub fn www_host(&self) -> String {
        match &self.host_label {
            Some(label) => format!("www.{label}"),
            None => "www".to_string(),
        }
    }
}

/// Records to display on the update step of `mode`
///
/// Suggested mode delegates the zone by NS records; Advanced mode points A
/// records at the platform and aliases `www`. Other modes ask the user to
/// enter nothing.
#[must_use]
pub fn resolve_dns_records_for(mode: Mode, target: &RecordTarget, info: &DomainSetupInfo) -> Vec<DnsRecord> {
    match mode {
        Mode::Suggested => info
            .wpcom_name_servers
            .iter()
            .map(|ns| DnsRecord::new(DnsRecordType::Ns, target.host(), ns.as_str()))
            .collect(),
        Mode::Advanced => info
            .default_ip_addresses
            .iter()
            .map(|ip| DnsRecord::new(DnsRecordType::A, target.host(), ip.as_str()))
            .chain(std::iter::once(DnsRecord::new(
                DnsRecordType::Cname,
                target.www_host(),
                target.domain.as_str(),
            )))
            .collect(),
        Mode::DomainConnect | Mode::Transfer => Vec::new(),
    }
}
