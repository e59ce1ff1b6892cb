//! Step Graph Builder
//!
//! The primary interface for declaring a step map. Steps reference each other
//! by name; `build` validates the declaration and produces a `StepGraph`.

use crate::construction::GraphValidator;
use crate::error::GraphError;
use crate::graph::StepGraph;
use crate::types::{Mode, Step, StepName, StepType};

/// Declaration of a single step, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    pub name: StepName,
    pub mode: Mode,
    pub step_type: StepType,
    pub display_name: Option<String>,
    pub next: Option<StepName>,
    pub prev: Option<StepName>,
}

impl StepSpec {
    /// Create an unlinked, unlabelled step
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<StepName>, mode: Mode, step_type: StepType) -> Self {
        Self {
            name: name.into(),
            mode,
            step_type,
            display_name: None,
            next: None,
            prev: None,
        }
    }

    /// With a human-facing label
    #[inline]
    #[must_use]
    pub fn labelled(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// With a `next` pointer
    #[inline]
    #[must_use]
    pub fn next(mut self, name: impl Into<StepName>) -> Self {
        self.next = Some(name.into());
        self
    }

    /// With a `prev` pointer
    #[inline]
    #[must_use]
    pub fn prev(mut self, name: impl Into<StepName>) -> Self {
        self.prev = Some(name.into());
        self
    }
}

/// Builder for validated step graphs
///
/// Usage:
/// ```rust
/// use dsf_kernel::{Mode, StepGraphBuilder, StepType};
///
/// let graph = StepGraphBuilder::new()
///     .chain(Mode::Suggested, [
///         ("start", StepType::Start, Some("Start setup")),
///         ("update", StepType::UpdateNameServers, Some("Update name servers")),
///         ("verifying", StepType::Verifying, None),
///     ])
///     .build()
///     .unwrap();
/// assert_eq!(graph.len(), 3);
/// ```
#[derive(Debug, Default, Clone)]
pub struct StepGraphBuilder {
    specs: Vec<StepSpec>,
}

impl StepGraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declared steps
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.specs.len()
    }

    /// Whether a step with this name has been declared
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.specs.iter().any(|spec| spec.name == name)
    }

    /// Declare one step
    pub fn add_step(&mut self, spec: StepSpec) -> &mut Self {
        self.specs.push(spec);
        self
    }

    /// Declare one step, by value
    #[must_use]
    pub fn step(mut self, spec: StepSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Declare a linear run of steps in one mode
    ///
    /// Each step's `next` points at the following entry and its `prev` at
    /// the preceding one; the first entry becomes the mode's START.
    #[must_use]
    pub fn chain<'a, I>(mut self, mode: Mode, links: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, StepType, Option<&'a str>)>,
    {
        let links: Vec<_> = links.into_iter().collect();
        for (i, (name, step_type, label)) in links.iter().enumerate() {
            let mut spec = StepSpec::new(*name, mode, *step_type);
            spec.display_name = label.map(str::to_string);
            if i > 0 {
                spec = spec.prev(links[i - 1].0);
            }
            if let Some(next) = links.get(i + 1) {
                spec = spec.next(next.0);
            }
            self.specs.push(spec);
        }
        self
    }

    /// Validate the declaration and produce a `StepGraph`
    ///
    /// Once built, the graph cannot be modified.
    pub fn build(self) -> Result<StepGraph, GraphError> {
        let resolved = GraphValidator::validate(&self.specs)?;

        let steps = self
            .specs
            .into_iter()
            .zip(resolved.links)
            .map(|(spec, (next, prev))| Step {
                name: spec.name,
                mode: spec.mode,
                step_type: spec.step_type,
                display_name: spec.display_name,
                next,
                prev,
            })
            .collect();

        let graph = StepGraph::from_parts(steps, resolved.index);
        tracing::debug!(
            steps = graph.len(),
            modes = graph.modes().count(),
            "step graph built"
        );
        Ok(graph)
    }
}
