//! Error types for DSF Core
//!
//! Provides error handling for:
//! - Collaborator (API) failures
//! - Auth-code input and submission failures
//! - Transfer eligibility holds
//! - Unlock-check state machine misuse
//! - Session navigation and configuration loading

use chrono::{DateTime, Utc};
use dsf_kernel::{GraphError, Mode, StepName};
use std::path::PathBuf;

use crate::transfer::UnlockPhase;

/// Main DSF error type
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Step graph failed validation
    #[error("invalid step graph: {0}")]
    Graph(#[from] GraphError),

    /// Collaborator request failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Auth-code step failed
    #[error("auth code: {0}")]
    AuthCode(#[from] AuthCodeError),

    /// Transfer cannot start yet
    #[error("transfer blocked: {0}")]
    TransferBlocked(#[from] TransferBlock),

    /// Unlock check driven out of order
    #[error("unlock check: {0}")]
    Unlock(#[from] UnlockTransitionError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Step name not present in the session's graph
    #[error("unknown step: {0}")]
    UnknownStep(StepName),

    /// Graph has no steps for the requested mode
    #[error("mode {0} is not available in this flow")]
    ModeUnavailable(Mode),

    /// Current step is terminal
    #[error("step {0} has no next step")]
    NoNextStep(StepName),

    /// Current step is a START
    #[error("step {0} has no previous step")]
    NoPreviousStep(StepName),
}

impl SetupError {
    /// Check if the user can simply try again
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_retryable(),
            Self::AuthCode(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Collaborator request failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Network or transport failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Request did not complete in time
    #[error("request timed out")]
    Timeout,

    /// Domain unknown to the API
    #[error("domain not found: {0}")]
    NotFound(String),

    /// Response could not be interpreted
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout)
    }
}

/// Auth-code step failures; all are rendered inline to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthCodeError {
    /// Blank input, rejected before any request
    #[error("authorization code is empty")]
    EmptyCode,

    /// Registrar says the code is wrong
    #[error("authorization code was rejected")]
    Rejected,

    /// The code check request failed
    #[error("could not check authorization code: {0}")]
    CheckFailed(FetchError),

    /// Code accepted but the transfer request failed
    #[error("could not start transfer: {0}")]
    TransferNotStarted(FetchError),
}

impl AuthCodeError {
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CheckFailed(_) | Self::TransferNotStarted(_))
    }

    /// Text shown next to the auth-code input
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyCode => "Please enter the authorization code from your current provider.",
            Self::Rejected => {
                "The authorization code is not valid. Check it with your current provider and try again."
            }
            Self::CheckFailed(_) => "We couldn't check your authorization code. Please try again.",
            Self::TransferNotStarted(_) => {
                "Your code is valid, but we couldn't start the transfer. Please try again."
            }
        }
    }
}

/// Registry-level holds that prevent starting a transfer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferBlock {
    /// Domain is in its post-expiration redemption period
    #[error("domain is in its redemption period")]
    InRedemption,

    /// Domain cannot be transferred before a date
    #[error("domain is not eligible for transfer until {until}")]
    EligibilityHold { until: DateTime<Utc> },
}

/// Unlock-check transition that the state table forbids
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal unlock transition {from:?} -> {to:?}")]
pub struct UnlockTransitionError {
    pub from: UnlockPhase,
    pub to: UnlockPhase,
}

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value: {0}")]
    Invalid(String),
}
