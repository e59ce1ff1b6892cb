//! Construction Validator
//!
//! Performs every structural check on a step declaration. Nothing is checked
//! again once a graph is built.

use crate::construction::StepSpec;
use crate::error::{EdgeKind, GraphError};
use crate::types::{Mode, StepId, StepName};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use std::collections::{BTreeMap, HashMap};

/// Declaration resolved to arena indices
#[derive(Debug)]
pub(crate) struct ResolvedLinks {
    pub(crate) index: HashMap<StepName, StepId>,
    /// `(next, prev)` per declared step, in declaration order
    pub(crate) links: Vec<(Option<StepId>, Option<StepId>)>,
}

/// Construction-time structural validator
pub struct GraphValidator;

impl GraphValidator {
    /// Check a declaration without building it
    pub fn check(specs: &[StepSpec]) -> Result<(), GraphError> {
        Self::validate(specs).map(|_| ())
    }

    /// Validate a declaration
    ///
    /// Checks, in order:
    /// 1. Size fits the arena index
    /// 2. Step names are unique
    /// 3. Every `next`/`prev` reference resolves
    /// 4. Exactly one step per mode has no `prev`
    /// 5. Following `next` never revisits a step
    pub(crate) fn validate(specs: &[StepSpec]) -> Result<ResolvedLinks, GraphError> {
        let index = Self::index_names(specs)?;

        let links = specs
            .iter()
            .map(|spec| {
                let next = Self::resolve(&index, spec, spec.next.as_ref(), EdgeKind::Next)?;
                let prev = Self::resolve(&index, spec, spec.prev.as_ref(), EdgeKind::Prev)?;
                Ok((next, prev))
            })
            .collect::<Result<Vec<_>, GraphError>>()?;

        Self::validate_starts(specs)?;
        Self::validate_acyclic(specs, &links)?;

        Ok(ResolvedLinks { index, links })
    }

    fn index_names(specs: &[StepSpec]) -> Result<HashMap<StepName, StepId>, GraphError> {
        if specs.len() > usize::from(u16::MAX) {
            return Err(GraphError::TooManySteps(specs.len()));
        }

        let mut index = HashMap::with_capacity(specs.len());
        for (position, spec) in specs.iter().enumerate() {
            let id = u16::try_from(position)
                .map(StepId)
                .map_err(|_| GraphError::TooManySteps(specs.len()))?;
            if index.insert(spec.name.clone(), id).is_some() {
                return Err(GraphError::DuplicateStep(spec.name.clone()));
            }
        }
        Ok(index)
    }

    fn resolve(
        index: &HashMap<StepName, StepId>,
        spec: &StepSpec,
        target: Option<&StepName>,
        edge: EdgeKind,
    ) -> Result<Option<StepId>, GraphError> {
        let Some(target) = target else {
            return Ok(None);
        };
        index
            .get(target)
            .copied()
            .map(Some)
            .ok_or_else(|| GraphError::DanglingReference {
                step: spec.name.clone(),
                target: target.clone(),
                edge,
            })
    }

    fn validate_starts(specs: &[StepSpec]) -> Result<(), GraphError> {
        let mut starts: BTreeMap<Mode, Vec<StepName>> = BTreeMap::new();
        for spec in specs {
            let entry = starts.entry(spec.mode).or_default();
            if spec.prev.is_none() {
                entry.push(spec.name.clone());
            }
        }

        for (mode, steps) in starts {
            match steps.len() {
                0 => return Err(GraphError::NoStart(mode)),
                1 => {}
                _ => return Err(GraphError::MultipleStarts { mode, steps }),
            }
        }
        Ok(())
    }

    fn validate_acyclic(
        specs: &[StepSpec],
        links: &[(Option<StepId>, Option<StepId>)],
    ) -> Result<(), GraphError> {
        let mut graph: DiGraphMap<StepId, ()> = DiGraphMap::with_capacity(specs.len(), specs.len());

        for (position, (next, _)) in links.iter().enumerate() {
            let from = StepId(u16::try_from(position).map_err(|_| GraphError::TooManySteps(specs.len()))?);
            graph.add_node(from);
            if let Some(to) = *next {
                if to == from {
                    return Err(GraphError::CycleDetected(specs[position].name.clone()));
                }
                graph.add_edge(from, to, ());
            }
        }

        toposort(&graph, None)
            .map(|_| ())
            .map_err(|cycle| GraphError::CycleDetected(specs[cycle.node_id().index()].name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StepType;

    #[test]
    fn check_accepts_linear_declaration() {
        let specs = vec![
            StepSpec::new("start", Mode::Advanced, StepType::Start).next("login"),
            StepSpec::new("login", Mode::Advanced, StepType::LogIntoProvider).prev("start"),
        ];
        assert!(GraphValidator::check(&specs).is_ok());
    }

    #[test]
    fn dangling_prev_is_reported_with_edge_kind() {
        let specs = vec![StepSpec::new("login", Mode::Advanced, StepType::LogIntoProvider).prev("gone")];
        assert!(matches!(
            GraphValidator::check(&specs),
            Err(GraphError::DanglingReference { edge: EdgeKind::Prev, .. })
        ));
    }

    #[test]
    fn modes_are_checked_independently() {
        let specs = vec![
            StepSpec::new("s_start", Mode::Suggested, StepType::Start),
            StepSpec::new("a_start", Mode::Advanced, StepType::Start),
            StepSpec::new("t_start", Mode::Transfer, StepType::Start),
        ];
        assert!(GraphValidator::check(&specs).is_ok());
    }

    #[test]
    fn cross_mode_links_are_permitted() {
        let specs = vec![
            StepSpec::new("s_start", Mode::Suggested, StepType::Start).next("a_start"),
            StepSpec::new("a_start", Mode::Advanced, StepType::Start),
        ];
        assert!(GraphValidator::check(&specs).is_ok());
    }
}
