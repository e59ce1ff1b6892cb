//! Entry step resolution
//!
//! Decides where a user lands when the connection flow opens. All inputs are
//! fetched by the caller beforehand; this module performs no I/O.

use crate::step_maps::{default_start_step, slugs};
use crate::types::{Mode, StepName};

/// Signals consulted when choosing the entry step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrySignals {
    /// Mode recorded by a previous connection attempt
    pub current_mode: Option<Mode>,
    /// The registrar advertises Domain Connect for this domain
    pub supports_domain_connect: bool,
    pub is_subdomain: bool,
    /// Explicit resume target, e.g. from a deep link
    pub forced_step: Option<StepName>,
}

impl EntrySignals {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_current_mode(mut self, mode: Mode) -> Self {
        self.current_mode = Some(mode);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_domain_connect(mut self, supported: bool) -> Self {
        self.supports_domain_connect = supported;
        self
    }

    #[inline]
    #[must_use]
    pub fn subdomain(mut self, is_subdomain: bool) -> Self {
        self.is_subdomain = is_subdomain;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_forced_step(mut self, step: impl Into<StepName>) -> Self {
        self.forced_step = Some(step.into());
        self
    }

    /// Resolve against the Suggested-mode START of the matching graph
    #[must_use]
    pub fn resolve(&self) -> StepName {
        let default_start = StepName::from(default_start_step(self.is_subdomain));
        resolve_entry_step(
            self.current_mode,
            self.supports_domain_connect,
            self.is_subdomain,
            self.forced_step.as_ref(),
            &default_start,
        )
    }
}

/// Record-update step a returning user resumes at for `mode`
///
/// Domain Connect has no manual update step; its START is the action.
/// Transfers have no record step at all.
#[must_use]
pub fn update_step_for(mode: Mode, is_subdomain: bool) -> Option<&'static str> {
    match (mode, is_subdomain) {
        (Mode::Suggested, false) => Some(slugs::SUGGESTED_UPDATE),
        (Mode::Suggested, true) => Some(slugs::SUBDOMAIN_SUGGESTED_UPDATE),
        (Mode::Advanced, false) => Some(slugs::ADVANCED_UPDATE),
        (Mode::Advanced, true) => Some(slugs::SUBDOMAIN_ADVANCED_UPDATE),
        (Mode::DomainConnect, _) => Some(slugs::DC_START),
        (Mode::Transfer, _) => None,
    }
}

/// Choose the entry step
///
/// Priority:
/// 1. `forced_step`, verbatim and unvalidated
/// 2. the update step of `current_mode`
/// 3. the Domain Connect START when supported
/// 4. `default_start_step`
#[must_use]
pub fn resolve_entry_step(
    current_mode: Option<Mode>,
    supports_domain_connect: bool,
    is_subdomain: bool,
    forced_step: Option<&StepName>,
    default_start_step: &StepName,
) -> StepName {
    if let Some(forced) = forced_step {
        tracing::debug!(step = %forced, "entry step forced");
        return forced.clone();
    }

    if let Some(step) = current_mode.and_then(|mode| update_step_for(mode, is_subdomain)) {
        tracing::debug!(step, mode = ?current_mode, "resuming at update step");
        return StepName::from(step);
    }

    if supports_domain_connect {
        tracing::debug!("domain connect supported, entering one-click flow");
        return StepName::from(slugs::DC_START);
    }

    default_start_step.clone()
}
