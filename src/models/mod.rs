//! Data models for pipeline entities.
//!
//! This module defines the four entity shapes tracked by the pipeline
//! (Problem → Cluster → Solution → Project):
//! - `Problem` - A pain point, optionally grouped into a cluster
//! - `Cluster` - A group of related problems
//! - `Solution` - A proposal generated from a cluster, directly linked to problems
//! - `Project` - An execution of a solution
//! - `Entity` - Tagged union over the four shapes
//!
//! Graph-model types (nodes, edges, relations) live in [`graph`]; the
//! many-to-many link field encoding lives in [`links`].

pub mod graph;
pub mod links;

pub use links::{LinkedIds, parse_encoded_ids};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four entity kinds in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Problem,
    Cluster,
    Solution,
    Project,
}

impl EntityKind {
    /// All kinds in pipeline order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Problem,
        EntityKind::Cluster,
        EntityKind::Solution,
        EntityKind::Project,
    ];

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Problem => "problem",
            EntityKind::Cluster => "cluster",
            EntityKind::Solution => "solution",
            EntityKind::Project => "project",
        }
    }

    /// Plural path segment used by the REST API.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Problem => "problems",
            EntityKind::Cluster => "clusters",
            EntityKind::Solution => "solutions",
            EntityKind::Project => "projects",
        }
    }

    /// Build the composite graph node id for an entity of this kind.
    ///
    /// Entity ids are only unique within a kind, so every graph node id
    /// carries the kind as a prefix.
    pub fn node_id(&self, id: &str) -> String {
        format!("{}-{}", self.as_str(), id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "problem" | "problems" => Ok(EntityKind::Problem),
            "cluster" | "clusters" => Ok(EntityKind::Cluster),
            "solution" | "solutions" => Ok(EntityKind::Solution),
            "project" | "projects" => Ok(EntityKind::Project),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown entity kind '{}' (expected problem, cluster, solution or project)",
                other
            ))),
        }
    }
}

/// Problem impact rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pain point scraped or entered into the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Identifier, unique among problems
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    /// Display title
    pub title: String,

    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Impact rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,

    /// Cluster this problem belongs to, if any
    #[serde(default, deserialize_with = "de_opt_id")]
    pub cluster_id: Option<String>,

    /// Label of the cluster this problem was grouped into.
    /// Survives deletion of the cluster itself.
    #[serde(default)]
    pub cluster_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_size: Option<String>,
}

impl Problem {
    /// Create a new problem with the given ID and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            impact: None,
            cluster_id: None,
            cluster_label: None,
            industry: None,
            business_size: None,
        }
    }

    /// Set the cluster membership.
    pub fn in_cluster(mut self, cluster_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.cluster_id = Some(cluster_id.into());
        self.cluster_label = Some(label.into());
        self
    }

    /// Set the impact rating.
    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = Some(impact);
        self
    }
}

/// A group of related problems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    /// Display label
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of problems grouped into this cluster
    #[serde(default)]
    pub problem_count: u32,

    /// Number of solutions generated from this cluster
    #[serde(default)]
    pub solution_count: u32,
}

impl Cluster {
    /// Create a new cluster with the given ID and label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            problem_count: 0,
            solution_count: 0,
        }
    }
}

/// A solution proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    /// Display title
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Overall viability score (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_viability: Option<f64>,

    /// Workflow status (free-form, e.g. "draft", "approved")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Cluster this solution was generated from
    #[serde(default, deserialize_with = "de_opt_id")]
    pub source_cluster_id: Option<String>,

    #[serde(default)]
    pub source_cluster_label: Option<String>,

    /// Problems this solution addresses directly, independent of clustering
    #[serde(default)]
    pub problem_ids: LinkedIds,
}

impl Solution {
    /// Create a new solution with the given ID and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            overall_viability: None,
            status: None,
            source_cluster_id: None,
            source_cluster_label: None,
            problem_ids: LinkedIds::Absent,
        }
    }

    /// Set the source cluster.
    pub fn from_cluster(mut self, cluster_id: impl Into<String>) -> Self {
        self.source_cluster_id = Some(cluster_id.into());
        self
    }

    /// Set the raw directly-addressed problem link field.
    pub fn with_problem_ids(mut self, ids: LinkedIds) -> Self {
        self.problem_ids = ids;
        self
    }

    /// Ids of directly-addressed problems.
    pub fn linked_problem_ids(&self) -> Vec<String> {
        self.problem_ids.ids()
    }

    /// Whether this solution directly addresses the given problem.
    pub fn addresses(&self, problem_id: &str) -> bool {
        self.linked_problem_ids().iter().any(|id| id == problem_id)
    }
}

/// Whether a project is being executed or only planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Planned,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Planned => "planned",
        }
    }
}

/// A project executing a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Solution this project executes
    #[serde(default, deserialize_with = "de_opt_id")]
    pub solution_id: Option<String>,

    /// Linked tracker project; present once work has started
    #[serde(default, deserialize_with = "de_opt_id")]
    pub linear_project_id: Option<String>,
}

impl Project {
    /// Create a new project with the given ID and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            solution_id: None,
            linear_project_id: None,
        }
    }

    /// Set the executed solution.
    pub fn for_solution(mut self, solution_id: impl Into<String>) -> Self {
        self.solution_id = Some(solution_id.into());
        self
    }

    pub fn status(&self) -> ProjectStatus {
        if self.linear_project_id.is_some() {
            ProjectStatus::Active
        } else {
            ProjectStatus::Planned
        }
    }
}

/// Any pipeline entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Problem(Problem),
    Cluster(Cluster),
    Solution(Solution),
    Project(Project),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Problem(_) => EntityKind::Problem,
            Entity::Cluster(_) => EntityKind::Cluster,
            Entity::Solution(_) => EntityKind::Solution,
            Entity::Project(_) => EntityKind::Project,
        }
    }

    /// Identifier within the entity's kind.
    pub fn id(&self) -> &str {
        match self {
            Entity::Problem(p) => &p.id,
            Entity::Cluster(c) => &c.id,
            Entity::Solution(s) => &s.id,
            Entity::Project(p) => &p.id,
        }
    }

    /// Composite graph node id (`"{kind}-{id}"`).
    pub fn node_id(&self) -> String {
        self.kind().node_id(self.id())
    }

    /// Display title.
    pub fn label(&self) -> &str {
        match self {
            Entity::Problem(p) => &p.title,
            Entity::Cluster(c) => &c.label,
            Entity::Solution(s) => &s.title,
            Entity::Project(p) => &p.name,
        }
    }

    /// Kind-specific secondary line shown under the label.
    pub fn subtitle(&self) -> Option<String> {
        match self {
            Entity::Problem(p) => p.impact.map(|i| format!("{} impact", i)),
            Entity::Cluster(c) => Some(match c.problem_count {
                1 => "1 problem".to_string(),
                n => format!("{} problems", n),
            }),
            Entity::Solution(s) => s
                .overall_viability
                .map(|v| format!("{:.0}% viable", v.clamp(0.0, 100.0))),
            Entity::Project(p) => Some(p.status().as_str().to_string()),
        }
    }

    /// Description-like text fields used for catalog search.
    pub fn description(&self) -> Option<&str> {
        match self {
            Entity::Problem(p) => p.description.as_deref(),
            Entity::Cluster(c) => c.description.as_deref(),
            Entity::Solution(s) => s.description.as_deref(),
            Entity::Project(p) => p.description.as_deref(),
        }
    }
}

impl From<Problem> for Entity {
    fn from(p: Problem) -> Self {
        Entity::Problem(p)
    }
}

impl From<Cluster> for Entity {
    fn from(c: Cluster) -> Self {
        Entity::Cluster(c)
    }
}

impl From<Solution> for Entity {
    fn from(s: Solution) -> Self {
        Entity::Solution(s)
    }
}

impl From<Project> for Entity {
    fn from(p: Project) -> Self {
        Entity::Project(p)
    }
}

/// The four entity collections as fetched from the API.
///
/// This is an immutable snapshot; every graph build reads from one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub problems: Vec<Problem>,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub solutions: Vec<Solution>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort a flat entity list into the four collections.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut dataset = Self::new();
        for entity in entities {
            dataset.push(entity);
        }
        dataset
    }

    /// Add an entity to the matching collection.
    pub fn push(&mut self, entity: Entity) {
        match entity {
            Entity::Problem(p) => self.problems.push(p),
            Entity::Cluster(c) => self.clusters.push(c),
            Entity::Solution(s) => self.solutions.push(s),
            Entity::Project(p) => self.projects.push(p),
        }
    }

    pub fn problem(&self, id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    pub fn solution(&self, id: &str) -> Option<&Solution> {
        self.solutions.iter().find(|s| s.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Look up an entity by kind and id.
    pub fn entity(&self, kind: EntityKind, id: &str) -> Option<Entity> {
        match kind {
            EntityKind::Problem => self.problem(id).cloned().map(Entity::Problem),
            EntityKind::Cluster => self.cluster(id).cloned().map(Entity::Cluster),
            EntityKind::Solution => self.solution(id).cloned().map(Entity::Solution),
            EntityKind::Project => self.project(id).cloned().map(Entity::Project),
        }
    }

    /// Look up an entity by its composite node id (`"{kind}-{id}"`).
    pub fn entity_by_node_id(&self, node_id: &str) -> Option<Entity> {
        let (kind, id) = node_id.split_once('-')?;
        let kind = kind.parse::<EntityKind>().ok()?;
        self.entity(kind, id)
    }

    /// Whether an entity with the same kind and id still exists.
    pub fn contains(&self, entity: &Entity) -> bool {
        self.entity(entity.kind(), entity.id()).is_some()
    }

    /// Total number of entities across all collections.
    pub fn len(&self) -> usize {
        self.problems.len() + self.clusters.len() + self.solutions.len() + self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Identifier as it may appear on the wire: a JSON string or an integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Str(String),
    Int(i64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Str(s) => s,
            WireId::Int(i) => i.to_string(),
        }
    }
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    WireId::deserialize(deserializer).map(String::from)
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<WireId>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_roundtrip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert_eq!("Solutions".parse::<EntityKind>().unwrap(), EntityKind::Solution);
        assert!("task".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_node_id_is_kind_prefixed() {
        let problem = Entity::from(Problem::new("7", "Slow invoicing"));
        let cluster = Entity::from(Cluster::new("7", "Billing"));
        assert_eq!(problem.node_id(), "problem-7");
        assert_eq!(cluster.node_id(), "cluster-7");
        assert_ne!(problem.node_id(), cluster.node_id());
    }

    #[test]
    fn test_problem_deserializes_numeric_ids() {
        let json = r#"{"id": 42, "title": "Manual reconciliation", "clusterId": 3, "clusterLabel": "Finance", "impact": "high"}"#;
        let problem: Problem = serde_json::from_str(json).unwrap();
        assert_eq!(problem.id, "42");
        assert_eq!(problem.cluster_id.as_deref(), Some("3"));
        assert_eq!(problem.cluster_label.as_deref(), Some("Finance"));
        assert_eq!(problem.impact, Some(Impact::High));
    }

    #[test]
    fn test_problem_null_cluster() {
        let json = r#"{"id": "p1", "title": "t", "clusterId": null, "clusterLabel": null}"#;
        let problem: Problem = serde_json::from_str(json).unwrap();
        assert!(problem.cluster_id.is_none());
        assert!(problem.cluster_label.is_none());
    }

    #[test]
    fn test_solution_problem_ids_encoded() {
        let json = r#"{"id": 5, "title": "Auto-reconcile", "problemIds": "{3, 7,19}", "overallViability": 81.6}"#;
        let solution: Solution = serde_json::from_str(json).unwrap();
        assert_eq!(solution.linked_problem_ids(), vec!["3", "7", "19"]);
        assert!(solution.addresses("7"));
        assert!(!solution.addresses("8"));
    }

    #[test]
    fn test_entity_tagged_serialization() {
        let entity = Entity::from(Cluster::new("c1", "Billing"));
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "cluster");
        assert_eq!(json["label"], "Billing");
        let back: Entity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_subtitles_per_kind() {
        let problem = Entity::from(Problem::new("1", "p").with_impact(Impact::Medium));
        assert_eq!(problem.subtitle().as_deref(), Some("medium impact"));

        let mut cluster = Cluster::new("1", "c");
        cluster.problem_count = 4;
        assert_eq!(Entity::from(cluster).subtitle().as_deref(), Some("4 problems"));

        let mut solution = Solution::new("1", "s");
        solution.overall_viability = Some(72.4);
        assert_eq!(Entity::from(solution).subtitle().as_deref(), Some("72% viable"));

        let mut project = Project::new("1", "pr");
        assert_eq!(
            Entity::from(project.clone()).subtitle().as_deref(),
            Some("planned")
        );
        project.linear_project_id = Some("LIN-1".to_string());
        assert_eq!(Entity::from(project).subtitle().as_deref(), Some("active"));
    }

    #[test]
    fn test_dataset_lookup_by_node_id() {
        let dataset = Dataset::from_entities([
            Entity::from(Problem::new("1", "p")),
            Entity::from(Cluster::new("1", "c")),
        ]);
        assert_eq!(dataset.len(), 2);
        assert!(matches!(
            dataset.entity_by_node_id("cluster-1"),
            Some(Entity::Cluster(_))
        ));
        assert!(dataset.entity_by_node_id("solution-1").is_none());
        assert!(dataset.entity_by_node_id("garbage").is_none());
    }

    #[test]
    fn test_dataset_node_id_with_dashed_entity_id() {
        let dataset = Dataset::from_entities([Entity::from(Project::new("alpha-2", "p"))]);
        assert!(dataset.entity_by_node_id("project-alpha-2").is_some());
    }
}
