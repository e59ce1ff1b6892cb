//! Built-in step maps
//!
//! Four graphs ship with the engine: root-domain connection, subdomain
//! connection, and the locked/unlocked transfer variants. Each is validated
//! the first time it is requested. A malformed built-in map is a programming
//! error and panics; it can never surface while a user walks the flow.

use crate::construction::StepGraphBuilder;
use crate::graph::StepGraph;
use crate::types::{Mode, StepType};
use once_cell::sync::Lazy;

/// Stable step names
pub mod slugs {
    pub const SUGGESTED_START: &str = "suggested_start";
    pub const SUGGESTED_LOGIN: &str = "suggested_login";
    pub const SUGGESTED_UPDATE: &str = "suggested_update";
    pub const SUGGESTED_VERIFYING: &str = "suggested_verifying";
    pub const SUGGESTED_CONNECTED: &str = "suggested_connected";

    pub const ADVANCED_START: &str = "advanced_start";
    pub const ADVANCED_LOGIN: &str = "advanced_login";
    pub const ADVANCED_UPDATE: &str = "advanced_update";
    pub const ADVANCED_VERIFYING: &str = "advanced_verifying";
    pub const ADVANCED_CONNECTED: &str = "advanced_connected";

    pub const DC_START: &str = "dc_start";
    pub const DC_RETURN: &str = "dc_return";
    pub const DC_CONNECTED: &str = "dc_connected";

    pub const SUBDOMAIN_SUGGESTED_START: &str = "subdomain_suggested_start";
    pub const SUBDOMAIN_SUGGESTED_LOGIN: &str = "subdomain_suggested_login";
    pub const SUBDOMAIN_SUGGESTED_UPDATE: &str = "subdomain_suggested_update";
    pub const SUBDOMAIN_SUGGESTED_VERIFYING: &str = "subdomain_suggested_verifying";
    pub const SUBDOMAIN_SUGGESTED_CONNECTED: &str = "subdomain_suggested_connected";

    pub const SUBDOMAIN_ADVANCED_START: &str = "subdomain_advanced_start";
    pub const SUBDOMAIN_ADVANCED_LOGIN: &str = "subdomain_advanced_login";
    pub const SUBDOMAIN_ADVANCED_UPDATE: &str = "subdomain_advanced_update";
    pub const SUBDOMAIN_ADVANCED_VERIFYING: &str = "subdomain_advanced_verifying";
    pub const SUBDOMAIN_ADVANCED_CONNECTED: &str = "subdomain_advanced_connected";

    pub const TRANSFER_START: &str = "transfer_start";
    pub const TRANSFER_LOGIN: &str = "transfer_login";
    pub const TRANSFER_UNLOCK: &str = "transfer_unlock";
    pub const TRANSFER_AUTH_CODE: &str = "transfer_auth_code";
}

const START_SETUP: &str = "Start setup";
const LOG_IN: &str = "Log in to provider";

static CONNECT_DOMAIN: Lazy<StepGraph> = Lazy::new(|| {
    use slugs::*;
    built_in(
        "connect_domain",
        StepGraphBuilder::new()
            .chain(
                Mode::Suggested,
                [
                    (SUGGESTED_START, StepType::Start, Some(START_SETUP)),
                    (SUGGESTED_LOGIN, StepType::LogIntoProvider, Some(LOG_IN)),
                    (SUGGESTED_UPDATE, StepType::UpdateNameServers, Some("Update name servers")),
                    (SUGGESTED_VERIFYING, StepType::Verifying, None),
                    (SUGGESTED_CONNECTED, StepType::Connected, None),
                ],
            )
            .chain(
                Mode::Advanced,
                [
                    (ADVANCED_START, StepType::Start, Some(START_SETUP)),
                    (ADVANCED_LOGIN, StepType::LogIntoProvider, Some(LOG_IN)),
                    (
                        ADVANCED_UPDATE,
                        StepType::UpdateARecords,
                        Some("Update root A records & CNAME record"),
                    ),
                    (ADVANCED_VERIFYING, StepType::Verifying, None),
                    (ADVANCED_CONNECTED, StepType::Connected, None),
                ],
            )
            .chain(
                Mode::DomainConnect,
                [
                    (DC_START, StepType::Start, Some(START_SETUP)),
                    (DC_RETURN, StepType::Verifying, None),
                    (DC_CONNECTED, StepType::Connected, None),
                ],
            ),
    )
});

static CONNECT_SUBDOMAIN: Lazy<StepGraph> = Lazy::new(|| {
    use slugs::*;
    built_in(
        "connect_subdomain",
        StepGraphBuilder::new()
            .chain(
                Mode::Suggested,
                [
                    (SUBDOMAIN_SUGGESTED_START, StepType::Start, Some(START_SETUP)),
                    (SUBDOMAIN_SUGGESTED_LOGIN, StepType::LogIntoProvider, Some(LOG_IN)),
                    (SUBDOMAIN_SUGGESTED_UPDATE, StepType::UpdateNsRecords, Some("Update NS records")),
                    (SUBDOMAIN_SUGGESTED_VERIFYING, StepType::Verifying, None),
                    (SUBDOMAIN_SUGGESTED_CONNECTED, StepType::Connected, None),
                ],
            )
            .chain(
                Mode::Advanced,
                [
                    (SUBDOMAIN_ADVANCED_START, StepType::Start, Some(START_SETUP)),
                    (SUBDOMAIN_ADVANCED_LOGIN, StepType::LogIntoProvider, Some(LOG_IN)),
                    (
                        SUBDOMAIN_ADVANCED_UPDATE,
                        StepType::UpdateARecords,
                        Some("Update A records & CNAME record"),
                    ),
                    (SUBDOMAIN_ADVANCED_VERIFYING, StepType::Verifying, None),
                    (SUBDOMAIN_ADVANCED_CONNECTED, StepType::Connected, None),
                ],
            )
            .chain(
                Mode::DomainConnect,
                [
                    (DC_START, StepType::Start, Some(START_SETUP)),
                    (DC_RETURN, StepType::Verifying, None),
                    (DC_CONNECTED, StepType::Connected, None),
                ],
            ),
    )
});

static TRANSFER_LOCKED: Lazy<StepGraph> = Lazy::new(|| {
    use slugs::*;
    built_in(
        "transfer_locked",
        StepGraphBuilder::new().chain(
            Mode::Transfer,
            [
                (TRANSFER_START, StepType::Start, Some(START_SETUP)),
                (TRANSFER_LOGIN, StepType::LogIntoProvider, Some(LOG_IN)),
                (TRANSFER_UNLOCK, StepType::UnlockDomain, Some("Unlock domain")),
                (TRANSFER_AUTH_CODE, StepType::EnterAuthCode, Some("Enter authorization code")),
            ],
        ),
    )
});

static TRANSFER_UNLOCKED: Lazy<StepGraph> = Lazy::new(|| {
    use slugs::*;
    built_in(
        "transfer_unlocked",
        StepGraphBuilder::new().chain(
            Mode::Transfer,
            [
                (TRANSFER_START, StepType::Start, Some(START_SETUP)),
                (TRANSFER_LOGIN, StepType::LogIntoProvider, Some(LOG_IN)),
                (TRANSFER_AUTH_CODE, StepType::EnterAuthCode, Some("Enter authorization code")),
            ],
        ),
    )
});

fn built_in(label: &str, builder: StepGraphBuilder) -> StepGraph {
    match builder.build() {
        Ok(graph) => graph,
        Err(e) => panic!("built-in step map `{label}` is malformed: {e}"),
    }
}

/// Connection flow for a root domain
#[must_use]
pub fn connect_domain() -> &'static StepGraph {
    &CONNECT_DOMAIN
}

/// Connection flow for a subdomain; record steps target the subdomain label
#[must_use]
pub fn connect_subdomain() -> &'static StepGraph {
    &CONNECT_SUBDOMAIN
}

/// Connection flow for either kind of domain
#[must_use]
pub fn connection_graph(is_subdomain: bool) -> &'static StepGraph {
    if is_subdomain {
        connect_subdomain()
    } else {
        connect_domain()
    }
}

/// Transfer flow that includes the unlock step
#[must_use]
pub fn transfer_locked() -> &'static StepGraph {
    &TRANSFER_LOCKED
}

/// Transfer flow for a domain already unlocked at the losing registrar
#[must_use]
pub fn transfer_unlocked() -> &'static StepGraph {
    &TRANSFER_UNLOCKED
}

/// Suggested-mode START, the usual fallback entry step
#[must_use]
pub fn default_start_step(is_subdomain: bool) -> &'static str {
    if is_subdomain {
        slugs::SUBDOMAIN_SUGGESTED_START
    } else {
        slugs::SUGGESTED_START
    }
}

/// Every built-in graph with its label, for startup validation and tooling
#[must_use]
pub fn all() -> [(&'static str, &'static StepGraph); 4] {
    [
        ("connect_domain", connect_domain()),
        ("connect_subdomain", connect_subdomain()),
        ("transfer_locked", transfer_locked()),
        ("transfer_unlocked", transfer_unlocked()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_built_in_maps_validate() {
        for (label, graph) in all() {
            assert!(!graph.is_empty(), "{label} is empty");
        }
    }

    #[test]
    fn connection_graphs_cover_three_modes() {
        for graph in [connect_domain(), connect_subdomain()] {
            let modes: Vec<_> = graph.modes().collect();
            assert_eq!(modes, vec![Mode::Suggested, Mode::Advanced, Mode::DomainConnect]);
        }
    }

    #[test]
    fn subdomain_suggested_update_uses_ns_records() {
        let step = connect_subdomain().find(slugs::SUBDOMAIN_SUGGESTED_UPDATE).unwrap();
        assert_eq!(step.step_type(), StepType::UpdateNsRecords);

        let step = connect_domain().find(slugs::SUGGESTED_UPDATE).unwrap();
        assert_eq!(step.step_type(), StepType::UpdateNameServers);
    }

    #[test]
    fn transfer_variants_differ_only_by_unlock() {
        assert!(transfer_locked().contains(slugs::TRANSFER_UNLOCK));
        assert!(!transfer_unlocked().contains(slugs::TRANSFER_UNLOCK));
        assert_eq!(transfer_locked().len(), transfer_unlocked().len() + 1);
    }

    #[test]
    fn default_start_matches_graph_kind() {
        assert!(connect_domain().contains(default_start_step(false)));
        assert!(connect_subdomain().contains(default_start_step(true)));
    }
}
