//! Construction-time graph errors
//!
//! These indicate a defect in static step-map data. They are reported by
//! [`crate::StepGraphBuilder::build`] and never produced while traversing a
//! built graph.

use crate::types::{Mode, StepName};
use std::fmt;

/// Which pointer of a step a reference was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Next,
    Prev,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Next => f.write_str("next"),
            EdgeKind::Prev => f.write_str("prev"),
        }
    }
}

/// Malformed step graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Two steps share a name
    #[error("duplicate step name: {0}")]
    DuplicateStep(StepName),

    /// A `next`/`prev` pointer names a step that does not exist
    #[error("step {step} has dangling {edge} reference to {target}")]
    DanglingReference {
        step: StepName,
        target: StepName,
        edge: EdgeKind,
    },

    /// Every step of the mode has a `prev`
    #[error("mode {0} has no start step")]
    NoStart(Mode),

    /// More than one step of the mode lacks a `prev`
    #[error("mode {mode} has multiple start steps: {steps:?}")]
    MultipleStarts { mode: Mode, steps: Vec<StepName> },

    /// Following `next` from this step eventually returns to it
    #[error("cycle detected through step {0}")]
    CycleDetected(StepName),

    /// Arena indices are 16 bits wide
    #[error("step graph too large: {0} steps")]
    TooManySteps(usize),
}

impl GraphError {
    /// Step the error was reported against, if any
    #[must_use]
    pub fn step(&self) -> Option<&StepName> {
        match self {
            GraphError::DuplicateStep(step)
            | GraphError::CycleDetected(step)
            | GraphError::DanglingReference { step, .. } => Some(step),
            GraphError::MultipleStarts { steps, .. } => steps.first(),
            GraphError::NoStart(_) | GraphError::TooManySteps(_) => None,
        }
    }
}
