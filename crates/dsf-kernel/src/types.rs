//! Step graph types
//!
//! A step graph is an arena of [`Step`]s addressed by [`StepId`]. Steps are
//! named by a stable [`StepName`] and tagged with the connection [`Mode`] they
//! belong to and the [`StepType`] of work they represent.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Connection mode a step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Point the domain's name servers at the platform
    Suggested,
    /// Keep the current name servers, edit A/CNAME records
    Advanced,
    /// One-click setup through the registrar's Domain Connect template
    #[serde(alias = "dc")]
    DomainConnect,
    /// Registrar-to-registrar inbound transfer
    Transfer,
}

impl Mode {
    /// Every mode, in declaration order
    pub const ALL: [Mode; 4] = [
        Mode::Suggested,
        Mode::Advanced,
        Mode::DomainConnect,
        Mode::Transfer,
    ];

    /// Stable lowercase identifier
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Suggested => "suggested",
            Mode::Advanced => "advanced",
            Mode::DomainConnect => "domain_connect",
            Mode::Transfer => "transfer",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mode identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown connection mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suggested" => Ok(Mode::Suggested),
            "advanced" => Ok(Mode::Advanced),
            "domain_connect" | "domain-connect" | "dc" => Ok(Mode::DomainConnect),
            "transfer" => Ok(Mode::Transfer),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Kind of work a step asks of the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Start,
    LogIntoProvider,
    UpdateNameServers,
    UpdateARecords,
    UpdateNsRecords,
    UpdateCnameRecords,
    Verifying,
    Connected,
    EnterAuthCode,
    UnlockDomain,
    Finalize,
}

impl StepType {
    /// Whether the step asks the user to edit DNS at their provider
    #[inline]
    #[must_use]
    pub fn is_record_update(self) -> bool {
        matches!(
            self,
            StepType::UpdateNameServers
                | StepType::UpdateARecords
                | StepType::UpdateNsRecords
                | StepType::UpdateCnameRecords
        )
    }
}

/// Arena index of a step inside one [`crate::StepGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepId(pub(crate) u16);

impl StepId {
    /// Position in the graph's arena
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Stable step identifier, unique within a graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepName(String);

impl StepName {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StepName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for StepName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StepName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StepName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StepName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A node of a validated step graph
///
/// Steps only exist inside a [`crate::StepGraph`]; `next`/`prev` are arena
/// indices into that same graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub(crate) name: StepName,
    pub(crate) mode: Mode,
    pub(crate) step_type: StepType,
    pub(crate) display_name: Option<String>,
    pub(crate) next: Option<StepId>,
    pub(crate) prev: Option<StepId>,
}

impl Step {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &StepName {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn step_type(&self) -> StepType {
        self.step_type
    }

    /// Human label, absent for internal steps
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn next(&self) -> Option<StepId> {
        self.next
    }

    #[inline]
    #[must_use]
    pub fn prev(&self) -> Option<StepId> {
        self.prev
    }

    /// No `prev`: this is the START of its mode
    #[inline]
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.prev.is_none()
    }

    /// No `next`: the mode ends here
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }
}
