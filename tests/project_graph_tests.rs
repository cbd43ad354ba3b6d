use chrono::NaiveDate;
use cpm_core::{
    Constraint, CriticalPathCalculator, CriticalPathConfig, DependencyType, ProjectGraph,
    ProjectGraphError, TaskGraphView, TaskRecord, calculate_critical_path,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn wbs() -> ProjectGraph {
    // 1 { 2, 3 { 4 } }, 5
    let start = d(2025, 2, 3);
    let mut graph = ProjectGraph::new();
    graph
        .add_task(TaskRecord::with_duration(1, "Phase", start, 6))
        .unwrap();
    graph
        .add_task(TaskRecord::with_duration(2, "Design", start, 2).child_of(1))
        .unwrap();
    graph
        .add_task(TaskRecord::with_duration(3, "Build", start, 4).child_of(1))
        .unwrap();
    graph
        .add_task(TaskRecord::with_duration(4, "Code", start, 4).child_of(3))
        .unwrap();
    graph
        .add_task(TaskRecord::with_duration(5, "Release", start, 1))
        .unwrap();
    graph
}

#[test]
fn duplicate_task_is_rejected() {
    let mut graph = wbs();
    let err = graph
        .add_task(TaskRecord::with_duration(2, "Again", d(2025, 2, 3), 1))
        .unwrap_err();
    assert!(matches!(err, ProjectGraphError::DuplicateTask(2)));
}

#[test]
fn unknown_parent_is_rejected() {
    let mut graph = ProjectGraph::new();
    let err = graph
        .add_task(TaskRecord::with_duration(2, "Orphan", d(2025, 2, 3), 1).child_of(9))
        .unwrap_err();
    assert!(matches!(
        err,
        ProjectGraphError::UnknownParent { task: 2, parent: 9 }
    ));
}

#[test]
fn end_before_start_is_rejected() {
    let mut graph = ProjectGraph::new();
    let err = graph
        .add_task(TaskRecord::new(1, "Backwards", d(2025, 2, 5), d(2025, 2, 3)))
        .unwrap_err();
    assert!(matches!(err, ProjectGraphError::EndBeforeStart { task: 1, .. }));
}

#[test]
fn dependency_validation() {
    let mut graph = wbs();
    assert!(matches!(
        graph.add_dependency(2, 2, DependencyType::EndStart),
        Err(ProjectGraphError::SelfDependency(2))
    ));
    assert!(matches!(
        graph.add_dependency(2, 42, DependencyType::EndStart),
        Err(ProjectGraphError::UnknownTask(42))
    ));
}

#[test]
fn re_adding_a_dependency_replaces_its_type() {
    let mut graph = wbs();
    graph.add_dependency(2, 4, DependencyType::EndStart).unwrap();
    graph.add_dependency(2, 4, DependencyType::StartStart).unwrap();

    assert_eq!(graph.dependencies().len(), 1);
    assert_eq!(graph.dependency_type(&2, &4), Some(DependencyType::StartStart));
    assert_eq!(graph.dependency_type(&4, &2), None);
}

#[test]
fn hierarchy_queries() {
    let graph = wbs();
    assert!(graph.is_container(&1));
    assert!(graph.is_container(&3));
    assert!(!graph.is_container(&4));
    assert_eq!(graph.children(&1), vec![2, 3]);
    assert!(graph.contains(&1, &4));
    assert!(graph.contains(&3, &4));
    assert!(!graph.contains(&4, &1));
    assert!(!graph.contains(&5, &4));
}

#[test]
fn initial_and_latest_tasks_are_unconnected_roots() {
    let mut graph = wbs();
    graph.add_dependency(1, 5, DependencyType::EndStart).unwrap();

    assert_eq!(graph.initial_tasks(), vec![1]);
    assert_eq!(graph.latest_tasks(), vec![5]);
    assert_eq!(graph.incoming_tasks(&5), vec![1]);
    assert_eq!(graph.outgoing_tasks(&1), vec![5]);
}

#[test]
fn loads_from_json() {
    let json = r#"{
        "tasks": [
            { "id": 1, "name": "A", "start": "2009-12-01", "end": "2009-12-03" },
            { "id": 2, "name": "B", "start": "2009-12-01", "end": "2009-12-04",
              "start_constraints": [ { "kind": "bigger_or_equal_than", "date": "2009-12-06" } ] }
        ],
        "dependencies": [ { "from": 1, "to": 2, "kind": "END_END" } ]
    }"#;
    let graph = ProjectGraph::from_json(json).unwrap();

    assert_eq!(graph.len(), 2);
    assert_eq!(graph.dependency_type(&1, &2), Some(DependencyType::EndEnd));
    assert_eq!(
        graph.start_constraints(&2),
        vec![Constraint::BiggerOrEqualThan(d(2009, 12, 6))]
    );
    assert_eq!(calculate_critical_path(&graph, false).unwrap(), vec![2]);
    let unconstrained = CriticalPathCalculator::new(CriticalPathConfig::new(true))
        .analyze(&graph)
        .unwrap();
    assert_eq!(unconstrained.project_finish, 3);
}

#[test]
fn missing_dependency_kind_defaults_to_end_start() {
    let json = r#"{
        "tasks": [
            { "id": 1, "start": "2009-12-01", "end": "2009-12-03" },
            { "id": 2, "start": "2009-12-01", "end": "2009-12-04" }
        ],
        "dependencies": [ { "from": 1, "to": 2 } ]
    }"#;
    let graph = ProjectGraph::from_json(json).unwrap();
    assert_eq!(graph.dependency_type(&1, &2), Some(DependencyType::EndStart));
}

#[test]
fn json_with_child_before_parent_is_rejected() {
    let json = r#"{
        "tasks": [
            { "id": 2, "start": "2009-12-01", "end": "2009-12-03", "parent_id": 1 },
            { "id": 1, "start": "2009-12-01", "end": "2009-12-04" }
        ]
    }"#;
    assert!(matches!(
        ProjectGraph::from_json(json),
        Err(ProjectGraphError::UnknownParent { task: 2, parent: 1 })
    ));
}

#[test]
fn malformed_json_is_a_serialization_error() {
    assert!(matches!(
        ProjectGraph::from_json("{ not json"),
        Err(ProjectGraphError::Serialization(_))
    ));
}

#[test]
fn json_survives_a_save_and_load() {
    let mut graph = wbs();
    graph.add_dependency(1, 5, DependencyType::EndStart).unwrap();
    graph.add_dependency(2, 4, DependencyType::StartStart).unwrap();

    let reloaded = ProjectGraph::from_json(&graph.to_json().unwrap()).unwrap();
    assert_eq!(reloaded.snapshot().tasks, graph.snapshot().tasks);
    assert_eq!(
        calculate_critical_path(&reloaded, false).unwrap(),
        calculate_critical_path(&graph, false).unwrap()
    );
}
