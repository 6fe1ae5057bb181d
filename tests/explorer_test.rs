//! Library-level tests for explorer sessions.
//!
//! These exercise focus changes against sources that count or hold back
//! the direct-problem lookup, which the CLI cannot observe.

use async_trait::async_trait;
use pipelens::Result;
use pipelens::explorer::builder::PROMPT_NODE_ID;
use pipelens::explorer::{Explorer, ExplorerConfig, FocusOutcome};
use pipelens::models::graph::Position;
use pipelens::models::{Cluster, Dataset, Entity, EntityKind, LinkedIds, Problem, Project, Solution};
use pipelens::source::{EntitySource, SnapshotSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

fn dataset() -> Dataset {
    Dataset {
        problems: vec![
            Problem::new("1", "P1").in_cluster("C1", "C1"),
            Problem::new("2", "P2"),
            Problem::new("5", "Unrelated"),
        ],
        clusters: vec![Cluster::new("C1", "C1")],
        solutions: vec![
            Solution::new("S", "S")
                .from_cluster("C1")
                .with_problem_ids(LinkedIds::from("{1,2}")),
            Solution::new("T", "T").with_problem_ids(LinkedIds::from("{5}")),
        ],
        projects: vec![Project::new("P", "Rollout").for_solution("S")],
    }
}

/// Delegates to a snapshot, counting direct-problem lookups and
/// optionally holding each one until the gate is opened.
struct InstrumentedSource {
    inner: SnapshotSource,
    lookups: AtomicUsize,
    gate: Option<Arc<Notify>>,
    delay: Duration,
}

impl InstrumentedSource {
    fn counting(dataset: Dataset) -> Self {
        Self {
            inner: SnapshotSource::from_dataset(dataset),
            lookups: AtomicUsize::new(0),
            gate: None,
            delay: Duration::from_millis(20),
        }
    }

    fn gated(dataset: Dataset, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            delay: Duration::ZERO,
            ..Self::counting(dataset)
        }
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntitySource for InstrumentedSource {
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        self.inner.fetch_all(kind).await
    }

    async fn fetch_problems_for_solution(&self, solution_id: &str) -> Result<Vec<Problem>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.fetch_problems_for_solution(solution_id).await
    }

    fn describe(&self) -> String {
        "instrumented".to_string()
    }
}

fn entity(dataset: &Dataset, node_id: &str) -> Entity {
    dataset.entity_by_node_id(node_id).unwrap()
}

#[tokio::test]
async fn test_solution_focus_end_to_end() {
    let data = Dataset {
        projects: Vec::new(),
        ..dataset()
    };
    let source = Arc::new(InstrumentedSource::counting(data.clone()));
    let explorer = Explorer::new(data, source, ExplorerConfig::default());

    let outcome = explorer.focus_node("solution-S").await;
    let graph = outcome.graph().unwrap();

    assert_eq!(
        graph.node_ids(),
        vec!["solution-S", "cluster-C1", "problem-1", "problem-2"]
    );
    assert_eq!(graph.node("solution-S").unwrap().position, Position::new(0.0, 0.0));
    assert_eq!(graph.node("cluster-C1").unwrap().position, Position::new(0.0, -140.0));
    assert_eq!(graph.node("problem-1").unwrap().position, Position::new(-120.0, 80.0));
    assert_eq!(graph.node("problem-2").unwrap().position, Position::new(120.0, 80.0));
    assert_eq!(&explorer.current(), graph);
}

#[tokio::test]
async fn test_concurrent_focus_coalesces_lookup() {
    let data = dataset();
    let source = Arc::new(InstrumentedSource::counting(data.clone()));
    let explorer = Explorer::new(data.clone(), source.clone(), ExplorerConfig::default());
    let solution = entity(&data, "solution-S");

    let (first, second) = tokio::join!(
        explorer.focus(Some(solution.clone())),
        explorer.focus(Some(solution.clone())),
    );

    assert_eq!(source.lookups(), 1);
    // Both builds saw the same problems, only the latest request commits
    assert!(matches!(first, FocusOutcome::Stale(_)));
    assert!(second.is_applied());
    assert_eq!(second.graph().unwrap().nodes.len(), 5);
}

#[tokio::test]
async fn test_refocus_hits_cache_until_invalidated() {
    let data = dataset();
    let source = Arc::new(InstrumentedSource::counting(data.clone()));
    let explorer = Explorer::new(data.clone(), source.clone(), ExplorerConfig::default());

    explorer.focus_node("solution-S").await;
    explorer.focus_node("problem-1").await;
    explorer.focus_node("solution-S").await;
    // Project focus reuses the solution's cached entry
    explorer.focus_node("project-P").await;
    assert_eq!(source.lookups(), 1);
    assert!(explorer.cache().contains("S"));

    explorer.invalidate_solution("S").await;
    explorer.refresh().await;
    assert_eq!(source.lookups(), 2);
}

#[tokio::test]
async fn test_last_selection_wins() {
    let data = dataset();
    let gate = Arc::new(Notify::new());
    let source = Arc::new(InstrumentedSource::gated(data.clone(), gate.clone()));
    let explorer = Explorer::new(data.clone(), source.clone(), ExplorerConfig::default());

    let slow = explorer.focus(Some(entity(&data, "solution-T")));
    let fast = async {
        // Let the solution build reach the gate first
        tokio::task::yield_now().await;
        let outcome = explorer.focus(Some(entity(&data, "problem-1"))).await;
        gate.notify_one();
        outcome
    };
    let (slow, fast) = tokio::join!(slow, fast);

    match slow {
        FocusOutcome::Stale(ticket) => assert_eq!(ticket.focal.as_deref(), Some("solution-T")),
        FocusOutcome::Applied(_) => panic!("late solution graph was committed"),
    }
    assert!(fast.is_applied());

    let current = explorer.current();
    assert_eq!(current.focal.as_deref(), Some("problem-1"));
    assert_eq!(current.node_ids(), vec!["problem-1", "cluster-C1", "solution-S"]);

    // The abandoned lookup still populated the cache
    assert_eq!(source.lookups(), 1);
    assert_eq!(explorer.cache().peek("T").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleted_focal_returns_to_idle() {
    let data = dataset();
    let source = Arc::new(InstrumentedSource::counting(data.clone()));
    let explorer = Explorer::new(data.clone(), source, ExplorerConfig::default());
    explorer.focus_node("solution-T").await;

    let mut next = data.clone();
    next.solutions.retain(|s| s.id != "T");
    assert!(explorer.replace_dataset(next));

    assert!(explorer.focal().is_none());
    let graph = explorer.current();
    assert!(graph.focal.is_none());
    assert_eq!(graph.node_ids(), vec![PROMPT_NODE_ID]);
    assert!(!explorer.catalog().contains("solution-T"));
}

#[tokio::test]
async fn test_pending_build_discarded_after_dataset_swap() {
    let data = dataset();
    let gate = Arc::new(Notify::new());
    let source = Arc::new(InstrumentedSource::gated(data.clone(), gate.clone()));
    let explorer = Explorer::new(data.clone(), source, ExplorerConfig::default());

    // Solution S survives the swap but its project is gone
    let mut next = data.clone();
    next.projects.clear();

    let pending = explorer.focus_node("solution-S");
    let swap = async {
        tokio::task::yield_now().await;
        let reset = explorer.replace_dataset(next);
        gate.notify_one();
        reset
    };
    let (pending, reset) = tokio::join!(pending, swap);

    assert!(!reset);
    assert!(matches!(pending, FocusOutcome::Stale(_)));
    assert!(explorer.current().node("project-P").is_none());

    let outcome = explorer.refresh().await;
    let graph = outcome.graph().unwrap();
    assert_eq!(graph.focal.as_deref(), Some("solution-S"));
    assert_eq!(
        graph.node_ids(),
        vec!["solution-S", "cluster-C1", "problem-1", "problem-2"]
    );
}

#[tokio::test]
async fn test_surviving_focal_keeps_graph() {
    let data = dataset();
    let source = Arc::new(InstrumentedSource::counting(data.clone()));
    let explorer = Explorer::new(data.clone(), source, ExplorerConfig::default());
    explorer.focus_node("cluster-C1").await;

    let mut next = data.clone();
    next.problems.push(Problem::new("9", "New member").in_cluster("C1", "C1"));
    assert!(!explorer.replace_dataset(next));

    let outcome = explorer.refresh().await;
    assert_eq!(
        outcome.graph().unwrap().node_ids(),
        vec!["cluster-C1", "problem-1", "problem-9", "solution-S"]
    );
}

#[tokio::test]
async fn test_excluded_node_focuses_idle() {
    let mut data = dataset();
    data.problems.push(Problem::new("6", "Loose end"));
    let source = Arc::new(InstrumentedSource::counting(data.clone()));
    let config = ExplorerConfig {
        include_orphaned: false,
        ..ExplorerConfig::default()
    };
    let explorer = Explorer::new(data, source, config);

    // Unclustered but linked by solution T, so still listed
    assert!(explorer.catalog().contains("problem-5"));

    let outcome = explorer.focus_node("problem-6").await;
    assert_eq!(outcome.graph().unwrap().node_ids(), vec![PROMPT_NODE_ID]);
}
