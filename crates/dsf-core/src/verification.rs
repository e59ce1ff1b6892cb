//! DNS verification engine
//!
//! Decides whether a domain is connected from a single DNS snapshot. The
//! decision is a pure function of the mode and the snapshot; fetching the
//! snapshot, and polling, belong to the caller.
//!
//! Rules are evaluated top to bottom, first match wins:
//!
//! | Condition                                                  | Outcome                  |
//! |------------------------------------------------------------|--------------------------|
//! | Suggested, platform name servers                           | connected                |
//! | Advanced, platform IP addresses                            | connected                |
//! | Cloudflare IPs, resolves to platform                       | connected                |
//! | Suggested, no platform name servers, none observed         | `NoNameServersObserved`  |
//! | Suggested, no platform name servers, some observed         | `NameServersNotWpcom`    |
//! | Advanced, no platform IPs, none observed                   | `NoARecordsObserved`     |
//! | Advanced, no platform IPs, some observed                   | `ARecordsNotWpcom`       |
//! | Cloudflare IPs, does not resolve to platform               | `CloudflareNotResolving` |
//! | anything else                                              | `Generic`                |
//!
//! The Cloudflare rows sit where they do because a proxy hides the origin
//! records; the end-to-end resolution check overrides the mode-specific
//! failures.

use crate::types::ConnectionSnapshot;
use dsf_kernel::Mode;
use serde::{Deserialize, Serialize, Serializer};

/// Stable identifier of a verification failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    NoNameServersObserved,
    NameServersNotWpcom,
    NoARecordsObserved,
    ARecordsNotWpcom,
    CloudflareNotResolving,
    Generic,
}

/// Why verification failed, with the observed values needed for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NoNameServersObserved,
    NameServersNotWpcom { name_servers: Vec<String> },
    NoARecordsObserved,
    ARecordsNotWpcom { host_ip_addresses: Vec<String> },
    CloudflareNotResolving,
    Generic,
}

impl FailureReason {
    #[must_use]
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::NoNameServersObserved => ReasonCode::NoNameServersObserved,
            Self::NameServersNotWpcom { .. } => ReasonCode::NameServersNotWpcom,
            Self::NoARecordsObserved => ReasonCode::NoARecordsObserved,
            Self::ARecordsNotWpcom { .. } => ReasonCode::ARecordsNotWpcom,
            Self::CloudflareNotResolving => ReasonCode::CloudflareNotResolving,
            Self::Generic => ReasonCode::Generic,
        }
    }

    /// Observed name servers, when the failure carries them
    #[must_use]
    pub fn name_servers(&self) -> Option<&[String]> {
        match self {
            Self::NameServersNotWpcom { name_servers } => Some(name_servers),
            _ => None,
        }
    }

    /// Observed A-record targets, when the failure carries them
    #[must_use]
    pub fn host_ip_addresses(&self) -> Option<&[String]> {
        match self {
            Self::ARecordsNotWpcom { host_ip_addresses } => Some(host_ip_addresses),
            _ => None,
        }
    }

    /// Diagnostic shown under the retry button
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NoNameServersObserved => "We couldn't find any name servers for your domain. \
                 Make sure you've saved the new name servers at your domain provider."
                .to_string(),
            Self::NameServersNotWpcom { name_servers } => format!(
                "Your domain is still using these name servers: {}. \
                 Replace them with the name servers listed above.",
                name_servers.join(", ")
            ),
            Self::NoARecordsObserved => "We couldn't find any A records for your domain. \
                 Make sure you've added the A records listed above at your domain provider."
                .to_string(),
            Self::ARecordsNotWpcom { host_ip_addresses } => format!(
                "Your domain's A records point to {}. \
                 Replace them with the IP addresses listed above.",
                host_ip_addresses.join(", ")
            ),
            Self::CloudflareNotResolving => "Your domain is behind Cloudflare but doesn't reach your site yet. \
                 Check the records in your Cloudflare dashboard."
                .to_string(),
            Self::Generic => "We couldn't verify your domain's connection yet. \
                 DNS changes can take up to 72 hours to propagate, so try again later."
                .to_string(),
        }
    }
}

/// Result of one verification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Connected,
    Failed(FailureReason),
}

impl VerificationOutcome {
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Connected)
    }

    #[inline]
    #[must_use]
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Connected => None,
            Self::Failed(reason) => Some(reason),
        }
    }

    #[inline]
    #[must_use]
    pub fn reason_code(&self) -> Option<ReasonCode> {
        self.failure().map(FailureReason::reason_code)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutcomeReport<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason_code: Option<ReasonCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name_servers: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host_ip_addresses: Option<&'a [String]>,
}

impl Serialize for VerificationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let failure = self.failure();
        OutcomeReport {
            success: self.is_success(),
            reason_code: self.reason_code(),
            name_servers: failure.and_then(FailureReason::name_servers),
            host_ip_addresses: failure.and_then(FailureReason::host_ip_addresses),
        }
        .serialize(serializer)
    }
}

/// Decide connection success for `mode` from `snapshot`
#[must_use]
pub fn evaluate(mode: Mode, snapshot: &ConnectionSnapshot) -> VerificationOutcome {
    let outcome = decide(mode, snapshot);
    match &outcome {
        VerificationOutcome::Connected => tracing::debug!(%mode, "domain verified as connected"),
        VerificationOutcome::Failed(reason) => {
            tracing::debug!(%mode, reason = ?reason.reason_code(), "domain not connected");
        }
    }
    outcome
}

fn decide(mode: Mode, snapshot: &ConnectionSnapshot) -> VerificationOutcome {
    use FailureReason as F;
    use VerificationOutcome::{Connected, Failed};

    if mode == Mode::Suggested && snapshot.has_wpcom_name_servers {
        return Connected;
    }
    if mode == Mode::Advanced && snapshot.has_wpcom_ip_addresses {
        return Connected;
    }
    if snapshot.has_cloudflare_ip_addresses && snapshot.resolves_to_wpcom {
        return Connected;
    }

    match mode {
        Mode::Suggested if snapshot.name_servers.is_empty() => return Failed(F::NoNameServersObserved),
        Mode::Suggested => {
            return Failed(F::NameServersNotWpcom {
                name_servers: snapshot.name_servers.clone(),
            })
        }
        Mode::Advanced if snapshot.host_ip_addresses.is_empty() => return Failed(F::NoARecordsObserved),
        Mode::Advanced => {
            return Failed(F::ARecordsNotWpcom {
                host_ip_addresses: snapshot.host_ip_addresses.clone(),
            })
        }
        Mode::DomainConnect | Mode::Transfer => {}
    }

    if snapshot.has_cloudflare_ip_addresses {
        return Failed(F::CloudflareNotResolving);
    }
    Failed(F::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ConnectionSnapshot {
        ConnectionSnapshot::default()
    }

    #[test]
    fn suggested_with_wpcom_name_servers_connects() {
        let s = ConnectionSnapshot {
            has_wpcom_name_servers: true,
            ..snapshot()
        };
        assert!(evaluate(Mode::Suggested, &s).is_success());
    }

    #[test]
    fn suggested_without_name_servers() {
        let outcome = evaluate(Mode::Suggested, &snapshot());
        assert_eq!(outcome.reason_code(), Some(ReasonCode::NoNameServersObserved));
    }

    #[test]
    fn advanced_foreign_a_records_carry_observed_ips() {
        let s = ConnectionSnapshot {
            host_ip_addresses: vec!["203.0.113.5".into()],
            ..snapshot()
        };
        let outcome = evaluate(Mode::Advanced, &s);
        assert_eq!(
            outcome,
            VerificationOutcome::Failed(FailureReason::ARecordsNotWpcom {
                host_ip_addresses: vec!["203.0.113.5".into()],
            })
        );
    }

    #[test]
    fn cloudflare_override_beats_mode_failure() {
        let s = ConnectionSnapshot {
            has_cloudflare_ip_addresses: true,
            resolves_to_wpcom: true,
            ..snapshot()
        };
        assert!(evaluate(Mode::Advanced, &s).is_success());
        assert!(evaluate(Mode::Suggested, &s).is_success());
    }

    #[test]
    fn mode_failures_precede_cloudflare_not_resolving() {
        let s = ConnectionSnapshot {
            has_cloudflare_ip_addresses: true,
            ..snapshot()
        };
        assert_eq!(
            evaluate(Mode::Suggested, &s).reason_code(),
            Some(ReasonCode::NoNameServersObserved)
        );
        assert_eq!(
            evaluate(Mode::DomainConnect, &s).reason_code(),
            Some(ReasonCode::CloudflareNotResolving)
        );
    }

    #[test]
    fn other_modes_fall_back_to_generic() {
        let s = ConnectionSnapshot {
            has_wpcom_name_servers: true,
            has_wpcom_ip_addresses: true,
            ..snapshot()
        };
        assert_eq!(evaluate(Mode::Transfer, &s).reason_code(), Some(ReasonCode::Generic));
    }

    #[test]
    fn outcome_serializes_with_observed_values() {
        let outcome = VerificationOutcome::Failed(FailureReason::NameServersNotWpcom {
            name_servers: vec!["ns1.example.net".into()],
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "reasonCode": "NameServersNotWpcom",
                "nameServers": ["ns1.example.net"],
            })
        );

        let json = serde_json::to_value(VerificationOutcome::Connected).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true }));
    }

    #[test]
    fn messages_include_observed_values() {
        let reason = FailureReason::ARecordsNotWpcom {
            host_ip_addresses: vec!["198.51.100.1".into(), "198.51.100.2".into()],
        };
        assert!(reason.message().contains("198.51.100.1, 198.51.100.2"));
    }
}
