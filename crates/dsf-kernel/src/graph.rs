//! Validated step graph
//!
//! `StepGraph` can only be obtained from [`crate::StepGraphBuilder::build`],
//! so every graph reaching traversal code has passed construction-time
//! validation: references resolve, each mode has a single START and `next`
//! chains are acyclic.

use crate::types::{Mode, Step, StepId, StepName, StepType};
use std::collections::{BTreeMap, HashMap};

/// Immutable arena of steps with index-based `next`/`prev` edges
#[derive(Debug, Clone)]
pub struct StepGraph {
    steps: Vec<Step>,
    index: HashMap<StepName, StepId>,
    starts: BTreeMap<Mode, StepId>,
}

impl StepGraph {
    pub(crate) fn from_parts(steps: Vec<Step>, index: HashMap<StepName, StepId>) -> Self {
        let starts = steps
            .iter()
            .zip(0u16..)
            .filter(|(step, _)| step.is_start())
            .map(|(step, id)| (step.mode, StepId(id)))
            .collect();

        Self {
            steps,
            index,
            starts,
        }
    }

    /// Number of steps across all modes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at an arena index
    #[inline]
    #[must_use]
    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.steps.get(id.index())
    }

    /// Arena index of a named step
    #[inline]
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<StepId> {
        self.index.get(name).copied()
    }

    /// Step by name
    #[inline]
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Step> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The step of `mode` that has no `prev`
    #[inline]
    #[must_use]
    pub fn start_of(&self, mode: Mode) -> Option<StepId> {
        self.starts.get(&mode).copied()
    }

    /// Successor of a step
    #[inline]
    #[must_use]
    pub fn next_of(&self, id: StepId) -> Option<StepId> {
        self.get(id).and_then(Step::next)
    }

    /// Predecessor of a step
    #[inline]
    #[must_use]
    pub fn prev_of(&self, id: StepId) -> Option<StepId> {
        self.get(id).and_then(Step::prev)
    }

    /// Modes that have at least one step, in `Mode` order
    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        self.starts.keys().copied()
    }

    /// Whether the graph has any step of `mode`
    #[inline]
    #[must_use]
    pub fn has_mode(&self, mode: Mode) -> bool {
        self.starts.contains_key(&mode)
    }

    /// All steps with their indices, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (StepId, &Step)> + '_ {
        self.steps.iter().zip(0u16..).map(|(step, id)| (StepId(id), step))
    }

    /// Steps of one mode, in declaration order
    pub fn steps_in_mode(&self, mode: Mode) -> impl Iterator<Item = (StepId, &Step)> + '_ {
        self.iter().filter(move |(_, step)| step.mode == mode)
    }

    /// Whether any step has this type
    #[must_use]
    pub fn contains_step_type(&self, step_type: StepType) -> bool {
        self.steps.iter().any(|step| step.step_type == step_type)
    }

    /// First step of `mode` with the given type, in declaration order
    #[must_use]
    pub fn first_of_type(&self, mode: Mode, step_type: StepType) -> Option<StepId> {
        self.steps_in_mode(mode)
            .find(|(_, step)| step.step_type == step_type)
            .map(|(id, _)| id)
    }

    /// Follow `next` pointers starting at (and including) `from`
    ///
    /// Bounded by the graph size, which acyclicity makes unreachable.
    pub fn walk_from(&self, from: StepId) -> impl Iterator<Item = (StepId, &Step)> + '_ {
        let mut cursor = Some(from);
        std::iter::from_fn(move || {
            let id = cursor?;
            let step = self.get(id)?;
            cursor = step.next;
            Some((id, step))
        })
        .take(self.steps.len())
    }
}
