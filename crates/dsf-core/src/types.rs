//! Core types for DSF
//!
//! Data observed from, or sent to, the platform API:
//! - DNS connection snapshots
//! - Registrar transfer state
//! - Domain setup info and the DNS records derived from it

use chrono::{DateTime, Utc};
use dsf_kernel::{EntrySignals, Mode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Site the domain is being attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time DNS observation for a domain
///
/// Fetched fresh for every verification attempt; never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSnapshot {
    pub has_wpcom_name_servers: bool,
    pub has_wpcom_ip_addresses: bool,
    pub has_cloudflare_ip_addresses: bool,
    pub resolves_to_wpcom: bool,
    /// Authoritative NS records currently observed
    pub name_servers: Vec<String>,
    /// A-record targets currently observed
    pub host_ip_addresses: Vec<String>,
}

/// Lock status reported by the losing registrar
///
/// Three-valued on purpose: many registrars never report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum LockStatus {
    Unlocked,
    Locked,
    #[default]
    Unknown,
}

impl From<Option<bool>> for LockStatus {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => LockStatus::Unlocked,
            Some(false) => LockStatus::Locked,
            None => LockStatus::Unknown,
        }
    }
}

impl From<LockStatus> for Option<bool> {
    fn from(value: LockStatus) -> Self {
        match value {
            LockStatus::Unlocked => Some(true),
            LockStatus::Locked => Some(false),
            LockStatus::Unknown => None,
        }
    }
}

/// Registrar-lock and registry status for an inbound transfer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferState {
    pub unlocked: LockStatus,
    pub in_redemption: bool,
    pub transfer_eligible_date: Option<DateTime<Utc>>,
}

impl TransferState {
    #[inline]
    #[must_use]
    pub fn new(unlocked: LockStatus) -> Self {
        Self {
            unlocked,
            ..Self::default()
        }
    }

    /// Not in redemption and no pending eligibility date
    #[inline]
    #[must_use]
    pub fn is_transferable(&self) -> bool {
        !self.in_redemption && self.transfer_eligible_date.is_none()
    }
}

/// Per-domain setup data supplied by the platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainSetupInfo {
    /// Mode recorded by a previous connection attempt
    pub connection_mode: Option<Mode>,
    pub supports_domain_connect: bool,
    /// Registrar URL that applies the hosting template
    pub domain_connect_apply_url: Option<String>,
    pub wpcom_name_servers: Vec<String>,
    pub default_ip_addresses: Vec<String>,
}

impl DomainSetupInfo {
    /// Entry signals for a session opened on this domain
    #[must_use]
    pub fn entry_signals(&self, is_subdomain: bool) -> EntrySignals {
        let signals = EntrySignals::new()
            .with_domain_connect(self.supports_domain_connect)
            .subdomain(is_subdomain);
        match self.connection_mode {
            Some(mode) => signals.with_current_mode(mode),
            None => signals,
        }
    }

    /// Template apply URL; `None` unless Domain Connect is supported
    #[must_use]
    pub fn domain_connect_url(&self) -> Option<&str> {
        if self.supports_domain_connect {
            self.domain_connect_apply_url.as_deref()
        } else {
            None
        }
    }
}

/// DNS record types the user may be asked to enter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    Cname,
    Ns,
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            DnsRecordType::A => "A",
            DnsRecordType::Cname => "CNAME",
            DnsRecordType::Ns => "NS",
        })
    }
}

/// A record the user must create at their DNS provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    pub name: String,
    pub value: String,
}

impl DnsRecord {
    #[inline]
    #[must_use]
    pub fn new(record_type: DnsRecordType, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            record_type,
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for DnsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6}{:<16}{}", self.record_type, self.name, self.value)
    }
}

/// Result of an auth-code check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCodeCheck {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_status_maps_null_to_unknown() {
        let state: TransferState =
            serde_json::from_str(r#"{"unlocked":null,"in_redemption":false}"#).unwrap();
        assert_eq!(state.unlocked, LockStatus::Unknown);

        let state: TransferState = serde_json::from_str(r#"{"unlocked":false}"#).unwrap();
        assert_eq!(state.unlocked, LockStatus::Locked);

        let state: TransferState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.unlocked, LockStatus::Unknown);
    }

    #[test]
    fn lock_status_serializes_as_nullable_bool() {
        let json = serde_json::to_string(&TransferState::new(LockStatus::Unlocked)).unwrap();
        assert!(json.contains(r#""unlocked":true"#));
    }

    #[test]
    fn transferability_requires_no_holds() {
        assert!(TransferState::default().is_transferable());

        let redemption = TransferState {
            in_redemption: true,
            ..TransferState::default()
        };
        assert!(!redemption.is_transferable());

        let held = TransferState {
            transfer_eligible_date: Some(Utc::now()),
            ..TransferState::default()
        };
        assert!(!held.is_transferable());
    }

    #[test]
    fn snapshot_tolerates_missing_fields() {
        let snapshot: ConnectionSnapshot =
            serde_json::from_str(r#"{"has_wpcom_name_servers":true}"#).unwrap();
        assert!(snapshot.has_wpcom_name_servers);
        assert!(snapshot.name_servers.is_empty());
    }

    #[test]
    fn setup_info_accepts_legacy_dc_mode() {
        let info: DomainSetupInfo =
            serde_json::from_str(r#"{"connection_mode":"dc","supports_domain_connect":true}"#).unwrap();
        assert_eq!(info.connection_mode, Some(Mode::DomainConnect));
    }

    #[test]
    fn setup_info_feeds_entry_signals() {
        let info = DomainSetupInfo {
            connection_mode: Some(Mode::Advanced),
            supports_domain_connect: true,
            domain_connect_apply_url: Some("https://registrar.example/apply".into()),
            ..DomainSetupInfo::default()
        };
        let signals = info.entry_signals(false);
        assert_eq!(signals.current_mode, Some(Mode::Advanced));
        assert!(signals.supports_domain_connect);
        assert!(!signals.is_subdomain);
        assert_eq!(info.domain_connect_url(), Some("https://registrar.example/apply"));
    }

    #[test]
    fn apply_url_ignored_without_domain_connect() {
        let info = DomainSetupInfo {
            domain_connect_apply_url: Some("https://registrar.example/apply".into()),
            ..DomainSetupInfo::default()
        };
        assert_eq!(info.domain_connect_url(), None);
        assert!(info.entry_signals(true).is_subdomain);
    }

    #[test]
    fn dns_record_uses_type_key() {
        let record = DnsRecord::new(DnsRecordType::Cname, "www", "example.com");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"type":"CNAME","name":"www","value":"example.com"}"#);
    }
}
