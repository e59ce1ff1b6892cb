use dsf_kernel::prelude::*;
use dsf_kernel::{build_progress_list, GraphError};
use proptest::prelude::*;

fn mode_strategy() -> impl Strategy<Value = Mode> {
    prop_oneof![
        Just(Mode::Suggested),
        Just(Mode::Advanced),
        Just(Mode::DomainConnect),
        Just(Mode::Transfer),
    ]
}

/// Manual `next` walk from the START, bounded by the mode size, stopping
/// before a step that hands off to another mode
fn manual_walk(graph: &StepGraph, mode: Mode) -> Option<Vec<String>> {
    let bound = graph.steps_in_mode(mode).count();
    let mut names = Vec::new();
    let mut cursor = graph.start_of(mode);
    while let Some(id) = cursor {
        let step = graph.get(id)?;
        if step.mode() != mode {
            break;
        }
        if let Some(next) = step.next() {
            if graph.get(next)?.mode() != mode {
                break;
            }
        }
        names.push(step.name().to_string());
        if names.len() > bound {
            return None;
        }
        cursor = step.next();
    }
    Some(names)
}

#[test]
fn built_in_maps_are_acyclic_within_mode_size() {
    for (label, graph) in step_maps::all() {
        for mode in graph.modes() {
            let walk = manual_walk(graph, mode);
            assert!(walk.is_some(), "{label}/{mode} did not terminate");
        }
    }
}

#[test]
fn built_in_maps_have_single_start_per_mode() {
    for (label, graph) in step_maps::all() {
        for mode in graph.modes() {
            let starts = graph
                .steps_in_mode(mode)
                .filter(|(_, step)| step.is_start())
                .count();
            assert_eq!(starts, 1, "{label}/{mode}");
        }
    }
}

#[test]
fn built_in_progress_matches_manual_walk() {
    for (label, graph) in step_maps::all() {
        for mode in graph.modes() {
            let projected: Vec<_> = build_progress_list(mode, graph)
                .names()
                .map(ToString::to_string)
                .collect();
            assert_eq!(Some(projected), manual_walk(graph, mode), "{label}/{mode}");
        }
    }
}

#[test]
fn step_names_are_unique_across_modes() {
    let graph = step_maps::connect_domain();
    let mut names: Vec<_> = graph.iter().map(|(_, step)| step.name().clone()).collect();
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), total);
}

proptest! {
    /// Any linear chain declaration builds, and its projection is the chain.
    #[test]
    fn prop_chain_projection_is_bounded_and_ordered(
        mode in mode_strategy(),
        len in 1..12usize,
    ) {
        let names: Vec<String> = (0..len).map(|i| format!("step_{i}")).collect();
        let links = names.iter().enumerate().map(|(i, name)| {
            let step_type = if i == 0 { StepType::Start } else { StepType::Verifying };
            (name.as_str(), step_type, Some("label"))
        });
        let graph = StepGraphBuilder::new().chain(mode, links).build().unwrap();

        let list = build_progress_list(mode, &graph);
        prop_assert!(list.len() <= graph.steps_in_mode(mode).count());
        let projected: Vec<_> = list.names().map(ToString::to_string).collect();
        prop_assert_eq!(projected, names);
    }

    /// Closing any chain back on itself is rejected at construction.
    #[test]
    fn prop_back_edge_is_rejected(
        len in 2..10usize,
        target in 0..10usize,
    ) {
        let target = target % len;
        let mut builder = StepGraphBuilder::new();
        for i in 0..len {
            let mut spec = StepSpec::new(format!("n{i}").as_str(), Mode::Advanced, StepType::Verifying);
            if i == 0 {
                spec.step_type = StepType::Start;
            } else {
                spec = spec.prev(format!("n{}", i - 1).as_str());
            }
            let next = if i + 1 < len { format!("n{}", i + 1) } else { format!("n{target}") };
            spec = spec.next(next.as_str());
            builder.add_step(spec);
        }

        let result = builder.build();
        prop_assert!(matches!(result, Err(GraphError::CycleDetected(_))));
    }

    /// A valid graph never yields a progress list longer than its mode.
    #[test]
    fn prop_progress_bounded_for_every_mode(mode in mode_strategy(), subdomain in any::<bool>()) {
        let graph = step_maps::connection_graph(subdomain);
        let list = build_progress_list(mode, graph);
        prop_assert!(list.len() <= graph.steps_in_mode(mode).count());
    }
}
