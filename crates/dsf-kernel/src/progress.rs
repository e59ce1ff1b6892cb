//! Progress list projection
//!
//! Turns one mode of a step graph into the ordered list rendered by the host
//! as a step indicator.

use crate::graph::StepGraph;
use crate::types::{Mode, StepName, StepType};
use serde::Serialize;

/// One entry of a progress list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEntry {
    pub name: StepName,
    pub display_name: Option<String>,
}

/// Ordered progress list for one mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProgressList {
    entries: Vec<ProgressEntry>,
}

impl ProgressList {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    /// Step names in traversal order
    pub fn names(&self) -> impl Iterator<Item = &StepName> + '_ {
        self.entries.iter().map(|entry| &entry.name)
    }

    /// Entries that carry a display name; internal steps are skipped
    pub fn visible(&self) -> impl Iterator<Item = &ProgressEntry> + '_ {
        self.entries.iter().filter(|entry| entry.display_name.is_some())
    }

    /// Position of `name` among the visible entries
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.visible().position(|entry| entry.name == name)
    }
}

impl IntoIterator for ProgressList {
    type Item = ProgressEntry;
    type IntoIter = std::vec::IntoIter<ProgressEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build the progress list for `mode`
///
/// Finds the mode's `Start`-typed step and follows `next`. A mode without
/// such a step yields an empty list rather than an error. The walk ends at a
/// step with no `next`, and stops before a step whose `next` is not a step
/// of the same mode.
#[must_use]
pub fn build_progress_list(mode: Mode, graph: &StepGraph) -> ProgressList {
    let Some(start) = graph.first_of_type(mode, StepType::Start) else {
        return ProgressList::default();
    };

    let mode_size = graph.steps_in_mode(mode).count();
    let mut entries = Vec::with_capacity(mode_size);
    let mut cursor = Some(start);

    while let Some(id) = cursor {
        let Some(step) = graph.get(id) else { break };
        if step.mode() != mode || entries.len() == mode_size {
            break;
        }
        let next = step.next();
        let leaves_mode = next.is_some_and(|id| graph.get(id).map_or(true, |target| target.mode() != mode));
        if leaves_mode {
            break;
        }
        entries.push(ProgressEntry {
            name: step.name().clone(),
            display_name: step.display_name().map(str::to_string),
        });
        cursor = next;
    }

    ProgressList { entries }
}
