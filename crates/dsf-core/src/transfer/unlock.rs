//! Unlock-domain step
//!
//! The user unlocks the domain at their current registrar, then asks us to
//! confirm. The registrar may answer locked, unlocked, or nothing useful.

use crate::api::DomainApi;
use crate::config::TransferConfig;
use crate::error::{FetchError, UnlockTransitionError};
use crate::types::{LockStatus, TransferState};
use serde::{Deserialize, Serialize};

/// Where the unlock check currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockPhase {
    /// Waiting for the user to confirm
    Idle,
    /// Lock status request in flight
    Checking,
    /// Registrar still reports a lock
    StillLocked,
    /// Lock status could not be fetched
    StatusUnavailable,
    /// Step complete; the flow moves on
    Unlocked,
}

/// Phases reachable from `from`
///
/// `StillLocked -> Unlocked` is the skip path, legal only once skipping has
/// been unlocked by an earlier fetch failure.
#[must_use]
pub fn allowed_transitions(from: UnlockPhase) -> Vec<UnlockPhase> {
    use UnlockPhase::*;
    match from {
        Idle => vec![Checking],
        Checking => vec![Unlocked, StillLocked, StatusUnavailable],
        StillLocked => vec![Checking, Unlocked],
        StatusUnavailable => vec![Checking, Unlocked],
        Unlocked => vec![],
    }
}

pub fn validate_transition(from: UnlockPhase, to: UnlockPhase) -> Result<(), UnlockTransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(UnlockTransitionError { from, to })
    }
}

/// Inline notice under the confirm button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockNotice {
    StillLocked,
    StatusUnavailable,
}

impl UnlockNotice {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::StillLocked => {
                "Your domain is still locked. Unlock it at your current provider, then check again."
            }
            Self::StatusUnavailable => {
                "We can't get the lock status of your domain from your current provider. \
                 If you've already unlocked it, you can skip this check."
            }
        }
    }
}

/// What the primary button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    ConfirmUnlocked,
    SkipLockVerification,
}

impl PrimaryAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ConfirmUnlocked => "I've unlocked my domain",
            Self::SkipLockVerification => "Skip domain lock verification",
        }
    }
}

/// Whether the flow should leave the unlock step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockDecision {
    Advance,
    Stay,
}

/// State of the unlock step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockCheck {
    phase: UnlockPhase,
    allow_skip: bool,
    advance_on_unknown: bool,
}

impl Default for UnlockCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl UnlockCheck {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: UnlockPhase::Idle,
            allow_skip: false,
            advance_on_unknown: true,
        }
    }

    /// Idle check carrying the configured unknown-status policy
    #[must_use]
    pub fn from_config(config: &TransferConfig) -> Self {
        Self::new().with_policy(config.advance_on_unknown_lock_status)
    }

    /// Whether an unknown lock status counts as unlocked
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, advance_on_unknown: bool) -> Self {
        self.advance_on_unknown = advance_on_unknown;
        self
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> UnlockPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn checking(&self) -> bool {
        self.phase == UnlockPhase::Checking
    }

    /// Sticky once a lock status fetch has failed
    #[inline]
    #[must_use]
    pub fn allow_skip(&self) -> bool {
        self.allow_skip
    }

    #[must_use]
    pub fn notice(&self) -> Option<UnlockNotice> {
        match self.phase {
            UnlockPhase::StillLocked => Some(UnlockNotice::StillLocked),
            UnlockPhase::StatusUnavailable => Some(UnlockNotice::StatusUnavailable),
            _ => None,
        }
    }

    #[must_use]
    pub fn primary_action(&self) -> PrimaryAction {
        if self.allow_skip && self.phase != UnlockPhase::Checking {
            PrimaryAction::SkipLockVerification
        } else {
            PrimaryAction::ConfirmUnlocked
        }
    }

    /// User pressed confirm; a status request is about to go out
    pub fn begin_check(&mut self) -> Result<(), UnlockTransitionError> {
        self.transition(UnlockPhase::Checking)
    }

    /// Apply the registrar's answer to an in-flight check
    pub fn complete_check(
        &mut self,
        result: Result<TransferState, FetchError>,
    ) -> Result<UnlockDecision, UnlockTransitionError> {
        let next = match &result {
            Ok(state) => match state.unlocked {
                LockStatus::Unlocked => UnlockPhase::Unlocked,
                LockStatus::Unknown if self.advance_on_unknown => UnlockPhase::Unlocked,
                LockStatus::Unknown => UnlockPhase::StatusUnavailable,
                LockStatus::Locked => UnlockPhase::StillLocked,
            },
            Err(_) => UnlockPhase::StatusUnavailable,
        };
        self.transition(next)?;

        if next == UnlockPhase::StatusUnavailable {
            self.allow_skip = true;
        }
        match &result {
            Err(error) => tracing::warn!(%error, "lock status unavailable, offering skip"),
            Ok(state) => tracing::info!(lock = ?state.unlocked, phase = ?next, "lock status checked"),
        }
        Ok(self.decision())
    }

    /// User chose to continue without a confirmed unlock
    pub fn skip(&mut self) -> Result<UnlockDecision, UnlockTransitionError> {
        if !self.allow_skip || self.checking() {
            return Err(UnlockTransitionError {
                from: self.phase,
                to: UnlockPhase::Unlocked,
            });
        }
        self.transition(UnlockPhase::Unlocked)?;
        tracing::info!("lock verification skipped");
        Ok(UnlockDecision::Advance)
    }

    /// Run one full check against the platform
    pub async fn check_with<A>(&mut self, api: &A, domain: &str) -> Result<UnlockDecision, UnlockTransitionError>
    where
        A: DomainApi + ?Sized,
    {
        self.begin_check()?;
        let result = api.fetch_transfer_state(domain).await;
        self.complete_check(result)
    }

    fn decision(&self) -> UnlockDecision {
        if self.phase == UnlockPhase::Unlocked {
            UnlockDecision::Advance
        } else {
            UnlockDecision::Stay
        }
    }

    fn transition(&mut self, to: UnlockPhase) -> Result<(), UnlockTransitionError> {
        validate_transition(self.phase, to)?;
        self.phase = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked(check: &mut UnlockCheck, result: Result<TransferState, FetchError>) -> UnlockDecision {
        check.begin_check().unwrap();
        assert!(check.checking());
        check.complete_check(result).unwrap()
    }

    #[test]
    fn unlocked_advances() {
        let mut check = UnlockCheck::new();
        let decision = checked(&mut check, Ok(TransferState::new(LockStatus::Unlocked)));
        assert_eq!(decision, UnlockDecision::Advance);
        assert_eq!(check.phase(), UnlockPhase::Unlocked);
        assert!(!check.checking());
    }

    #[test]
    fn unknown_follows_policy() {
        let mut lenient = UnlockCheck::new();
        assert_eq!(
            checked(&mut lenient, Ok(TransferState::new(LockStatus::Unknown))),
            UnlockDecision::Advance
        );

        let mut strict = UnlockCheck::new().with_policy(false);
        assert_eq!(
            checked(&mut strict, Ok(TransferState::new(LockStatus::Unknown))),
            UnlockDecision::Stay
        );
        assert!(strict.allow_skip());
        assert_eq!(strict.notice(), Some(UnlockNotice::StatusUnavailable));
    }

    #[test]
    fn locked_stays_without_skip() {
        let mut check = UnlockCheck::new();
        let decision = checked(&mut check, Ok(TransferState::new(LockStatus::Locked)));
        assert_eq!(decision, UnlockDecision::Stay);
        assert_eq!(check.notice(), Some(UnlockNotice::StillLocked));
        assert_eq!(check.primary_action(), PrimaryAction::ConfirmUnlocked);
        assert!(check.skip().is_err());
    }

    #[test]
    fn fetch_error_enables_sticky_skip() {
        let mut check = UnlockCheck::new();
        checked(&mut check, Err(FetchError::Timeout));
        assert_eq!(check.primary_action(), PrimaryAction::SkipLockVerification);

        checked(&mut check, Ok(TransferState::new(LockStatus::Locked)));
        assert!(check.allow_skip());
        assert_eq!(check.skip().unwrap(), UnlockDecision::Advance);
        assert_eq!(check.phase(), UnlockPhase::Unlocked);
    }

    #[test]
    fn completing_without_begin_is_rejected() {
        let mut check = UnlockCheck::new();
        let err = check
            .complete_check(Ok(TransferState::new(LockStatus::Unlocked)))
            .unwrap_err();
        assert_eq!(err.from, UnlockPhase::Idle);
        assert_eq!(check.phase(), UnlockPhase::Idle);
    }

    #[test]
    fn unlocked_is_terminal() {
        assert!(allowed_transitions(UnlockPhase::Unlocked).is_empty());
        assert!(validate_transition(UnlockPhase::Idle, UnlockPhase::Unlocked).is_err());
        assert!(validate_transition(UnlockPhase::Checking, UnlockPhase::Checking).is_err());
    }
}
