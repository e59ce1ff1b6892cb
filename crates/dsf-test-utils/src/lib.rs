//! Testing utilities for DSF workspace
//!
//! A scripted [`DomainApi`] and snapshot/transfer-state fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dsf_core::{
    AuthCodeCheck, ConnectionSnapshot, DomainApi, DomainSetupInfo, FetchError, LockStatus, SiteId,
    TransferState,
};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A request received by [`FakeDomainApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Snapshot { domain: String },
    TransferState { domain: String },
    CheckAuthCode { domain: String, code: String },
    StartTransfer { site_id: SiteId, domain: String, code: String },
    SetupInfo { domain: String },
}

/// Responses are served in order; the last one repeats once the script runs
/// out. An endpoint with nothing scripted answers `NotFound`.
#[derive(Default)]
pub struct FakeDomainApi {
    snapshots: Mutex<VecDeque<Result<ConnectionSnapshot, FetchError>>>,
    transfer_states: Mutex<VecDeque<Result<TransferState, FetchError>>>,
    auth_checks: Mutex<VecDeque<Result<AuthCodeCheck, FetchError>>>,
    transfers: Mutex<VecDeque<Result<(), FetchError>>>,
    setup_infos: Mutex<VecDeque<Result<DomainSetupInfo, FetchError>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeDomainApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(self, response: Result<ConnectionSnapshot, FetchError>) -> Self {
        self.snapshots.lock().push_back(response);
        self
    }

    pub fn with_transfer_state(self, response: Result<TransferState, FetchError>) -> Self {
        self.transfer_states.lock().push_back(response);
        self
    }

    pub fn with_auth_check(self, response: Result<AuthCodeCheck, FetchError>) -> Self {
        self.auth_checks.lock().push_back(response);
        self
    }

    pub fn with_transfer_start(self, response: Result<(), FetchError>) -> Self {
        self.transfers.lock().push_back(response);
        self
    }

    pub fn with_setup_info(self, response: Result<DomainSetupInfo, FetchError>) -> Self {
        self.setup_infos.lock().push_back(response);
        self
    }

    /// Every request received so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn snapshot_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Snapshot { .. }))
    }

    pub fn transfer_state_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::TransferState { .. }))
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

fn next<T: Clone>(queue: &Mutex<VecDeque<Result<T, FetchError>>>, domain: &str) -> Result<T, FetchError> {
    let mut queue = queue.lock();
    match queue.len() {
        0 => Err(FetchError::NotFound(domain.to_string())),
        1 => queue[0].clone(),
        _ => queue
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::NotFound(domain.to_string()))),
    }
}

#[async_trait]
impl DomainApi for FakeDomainApi {
    async fn fetch_connection_snapshot(&self, domain: &str) -> Result<ConnectionSnapshot, FetchError> {
        self.record(Call::Snapshot {
            domain: domain.to_string(),
        });
        next(&self.snapshots, domain)
    }

    async fn fetch_transfer_state(&self, domain: &str) -> Result<TransferState, FetchError> {
        self.record(Call::TransferState {
            domain: domain.to_string(),
        });
        next(&self.transfer_states, domain)
    }

    async fn check_auth_code(&self, domain: &str, code: &str) -> Result<AuthCodeCheck, FetchError> {
        self.record(Call::CheckAuthCode {
            domain: domain.to_string(),
            code: code.to_string(),
        });
        next(&self.auth_checks, domain)
    }

    async fn start_inbound_transfer(&self, site_id: SiteId, domain: &str, code: &str) -> Result<(), FetchError> {
        self.record(Call::StartTransfer {
            site_id,
            domain: domain.to_string(),
            code: code.to_string(),
        });
        next(&self.transfers, domain)
    }

    async fn fetch_setup_info(&self, domain: &str) -> Result<DomainSetupInfo, FetchError> {
        self.record(Call::SetupInfo {
            domain: domain.to_string(),
        });
        next(&self.setup_infos, domain)
    }
}

pub const WPCOM_NAME_SERVERS: [&str; 3] = ["ns1.wordpress.com", "ns2.wordpress.com", "ns3.wordpress.com"];
pub const WPCOM_IP_ADDRESSES: [&str; 2] = ["192.0.78.24", "192.0.78.25"];

/// Delegated to the platform's name servers
pub fn wpcom_ns_snapshot() -> ConnectionSnapshot {
    ConnectionSnapshot {
        has_wpcom_name_servers: true,
        resolves_to_wpcom: true,
        name_servers: WPCOM_NAME_SERVERS.iter().map(ToString::to_string).collect(),
        host_ip_addresses: WPCOM_IP_ADDRESSES.iter().map(ToString::to_string).collect(),
        ..ConnectionSnapshot::default()
    }
}

/// Still served by another provider
pub fn foreign_ns_snapshot() -> ConnectionSnapshot {
    ConnectionSnapshot {
        name_servers: vec!["ns1.example-registrar.net".into(), "ns2.example-registrar.net".into()],
        host_ip_addresses: vec!["203.0.113.10".into()],
        ..ConnectionSnapshot::default()
    }
}

/// Proxied by Cloudflare
pub fn cloudflare_snapshot(resolves_to_wpcom: bool) -> ConnectionSnapshot {
    ConnectionSnapshot {
        has_cloudflare_ip_addresses: true,
        resolves_to_wpcom,
        name_servers: vec!["ada.ns.cloudflare.com".into(), "bob.ns.cloudflare.com".into()],
        host_ip_addresses: vec!["104.21.0.1".into()],
        ..ConnectionSnapshot::default()
    }
}

pub fn transfer_state(lock: LockStatus) -> TransferState {
    TransferState::new(lock)
}

pub fn held_transfer_state(until: DateTime<Utc>) -> TransferState {
    TransferState {
        transfer_eligible_date: Some(until),
        ..TransferState::new(LockStatus::Locked)
    }
}

pub fn setup_info(supports_domain_connect: bool) -> DomainSetupInfo {
    DomainSetupInfo {
        supports_domain_connect,
        domain_connect_apply_url: supports_domain_connect
            .then(|| "https://domainconnect.example-registrar.net/v2/apply".to_string()),
        wpcom_name_servers: WPCOM_NAME_SERVERS.iter().map(ToString::to_string).collect(),
        default_ip_addresses: WPCOM_IP_ADDRESSES.iter().map(ToString::to_string).collect(),
        ..DomainSetupInfo::default()
    }
}
