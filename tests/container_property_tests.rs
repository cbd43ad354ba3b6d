use chrono::NaiveDate;
use cpm_core::{CriticalPathCalculator, DependencyType, ProjectGraph, TaskRecord};
use proptest::prelude::*;

const CONTAINER: i32 = 100;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn kind(raw: u8) -> DependencyType {
    match raw % 3 {
        0 => DependencyType::EndStart,
        1 => DependencyType::StartStart,
        _ => DependencyType::EndEnd,
    }
}

/// Edges always point from a lower to a higher index, so the graph is acyclic.
fn forward_edges(n: usize, raw: &[(u8, u8, u8)]) -> Vec<(i32, i32, DependencyType)> {
    raw.iter()
        .filter_map(|&(a, b, k)| {
            let (a, b) = (a as usize % n, b as usize % n);
            if a == b {
                return None;
            }
            let (from, to) = (a.min(b), a.max(b));
            Some((from as i32, to as i32, kind(k)))
        })
        .collect()
}

/// Leaves `0..durations.len()`, the first `grouped` of them optionally put
/// under a container.
fn build(durations: &[i64], grouped: usize, with_container: bool) -> ProjectGraph {
    let start = d(2023, 9, 4);
    let mut graph = ProjectGraph::new();
    if with_container {
        graph
            .add_task(TaskRecord::with_duration(CONTAINER, "Group", start, 1))
            .unwrap();
    }
    for (i, &days) in durations.iter().enumerate() {
        let mut task = TaskRecord::with_duration(i as i32, format!("L{i}"), start, days);
        if with_container && i < grouped {
            task = task.child_of(CONTAINER);
        }
        graph.add_task(task).unwrap();
    }
    graph
}

proptest! {
    #[test]
    fn wrapping_leaves_in_a_container_changes_nothing(
        durations in prop::collection::vec(1i64..12, 2..8),
        raw_edges in prop::collection::vec((any::<u8>(), any::<u8>(), any::<u8>()), 0..12),
        grouped in 1usize..8,
    ) {
        let n = durations.len();
        let grouped = grouped.min(n);
        let edges = forward_edges(n, &raw_edges);

        let mut flat = build(&durations, grouped, false);
        let mut nested = build(&durations, grouped, true);
        for &(from, to, kind) in &edges {
            flat.add_dependency(from, to, kind).unwrap();
            nested.add_dependency(from, to, kind).unwrap();
        }

        let calculator = CriticalPathCalculator::default();
        let expected = calculator.analyze(&flat).unwrap();
        let actual = calculator.analyze(&nested).unwrap();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn container_dependency_equals_leaf_dependencies(
        durations in prop::collection::vec(1i64..12, 3..8),
        raw_edges in prop::collection::vec((any::<u8>(), any::<u8>(), any::<u8>()), 0..12),
        grouped in 1usize..7,
        raw_kind in any::<u8>(),
    ) {
        let n = durations.len();
        let last = (n - 1) as i32;
        let grouped = grouped.min(n - 1);
        let container_kind = kind(raw_kind);
        // Leave the last task to the container dependency
        let edges: Vec<_> = forward_edges(n - 1, &raw_edges);

        let mut flat = build(&durations, grouped, false);
        let mut nested = build(&durations, grouped, true);
        for &(from, to, kind) in &edges {
            flat.add_dependency(from, to, kind).unwrap();
            nested.add_dependency(from, to, kind).unwrap();
        }
        for leaf in 0..grouped as i32 {
            flat.add_dependency(leaf, last, container_kind).unwrap();
        }
        nested.add_dependency(CONTAINER, last, container_kind).unwrap();

        let calculator = CriticalPathCalculator::default();
        let expected = calculator.analyze(&flat).unwrap();
        let actual = calculator.analyze(&nested).unwrap();
        prop_assert_eq!(actual, expected);
    }
}
