//! Graph model for the relationship explorer.
//!
//! An ego-graph is a focal node plus the nodes directly (and in limited
//! cases, indirectly) related to it. Everything here is plain data: the
//! builder produces it, the layout engine fills in positions, and a
//! rendering surface consumes it.

use super::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position/vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another position
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Calculate the magnitude (length) of this vector
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Offset this position by another vector.
    pub fn offset(&self, by: Position) -> Position {
        Position::new(self.x + by.x, self.y + by.y)
    }
}

/// Relationship kinds between pipeline entities.
///
/// Each relation has a fixed direction: edges always point from the
/// relation's source kind to its target kind, whichever end is focal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Problem → Cluster, live membership
    ProblemInCluster,
    /// Problem → historical Cluster placeholder (cluster was deleted)
    ProblemHistoricallyInCluster,
    /// Cluster → Solution, provenance
    ClusterProducesSolution,
    /// Problem → Solution via the solution's `problemIds`
    ProblemDirectlyAddressesSolution,
    /// Solution → Project
    SolutionHasProject,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::ProblemInCluster => "problem_in_cluster",
            Relation::ProblemHistoricallyInCluster => "problem_historically_in_cluster",
            Relation::ClusterProducesSolution => "cluster_produces_solution",
            Relation::ProblemDirectlyAddressesSolution => "problem_directly_addresses_solution",
            Relation::SolutionHasProject => "solution_has_project",
        }
    }

    /// Entity kind at the tail of the edge.
    pub fn source_kind(&self) -> EntityKind {
        match self {
            Relation::ProblemInCluster
            | Relation::ProblemHistoricallyInCluster
            | Relation::ProblemDirectlyAddressesSolution => EntityKind::Problem,
            Relation::ClusterProducesSolution => EntityKind::Cluster,
            Relation::SolutionHasProject => EntityKind::Solution,
        }
    }

    /// Entity kind at the head of the edge.
    pub fn target_kind(&self) -> EntityKind {
        match self {
            Relation::ProblemInCluster | Relation::ProblemHistoricallyInCluster => {
                EntityKind::Cluster
            }
            Relation::ClusterProducesSolution | Relation::ProblemDirectlyAddressesSolution => {
                EntityKind::Solution
            }
            Relation::SolutionHasProject => EntityKind::Project,
        }
    }

    /// Whether the relation is backed by a live foreign key or membership.
    ///
    /// Structural relations draw solid; derived and historical ones draw dashed.
    pub fn is_structural(&self) -> bool {
        match self {
            Relation::ProblemInCluster
            | Relation::ClusterProducesSolution
            | Relation::SolutionHasProject => true,
            Relation::ProblemHistoricallyInCluster | Relation::ProblemDirectlyAddressesSolution => {
                false
            }
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a graph node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Problem,
    Cluster,
    /// Placeholder for a deleted cluster, known only by its label
    HistoricalCluster,
    Solution,
    Project,
    /// Idle-state prompt shown when nothing is focused
    Prompt,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Problem => "problem",
            NodeKind::Cluster => "cluster",
            NodeKind::HistoricalCluster => "historical_cluster",
            NodeKind::Solution => "solution",
            NodeKind::Project => "project",
            NodeKind::Prompt => "prompt",
        }
    }
}

impl From<EntityKind> for NodeKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Problem => NodeKind::Problem,
            EntityKind::Cluster => NodeKind::Cluster,
            EntityKind::Solution => NodeKind::Solution,
            EntityKind::Project => NodeKind::Project,
        }
    }
}

/// Node visual styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    /// Fill color
    pub color: String,
    /// Node radius
    pub radius: f64,
    /// Line width for borders
    pub border_width: f64,
    /// Dashed border (historical/placeholder nodes)
    pub dashed_border: bool,
}

/// Edge styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub color: String,
    pub line_width: f64,
    pub arrow_size: f64,
    pub dashed: bool,
}

/// A node in an ego-graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Composite id (`"{kind}-{id}"`)
    pub id: String,
    pub kind: NodeKind,
    /// Underlying entity id, absent for placeholder and prompt nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// The focal node sits at the center
    pub focal: bool,
    /// Reached through an intermediate node rather than the focal one
    pub indirect: bool,
    /// Whether clicking the node can refocus the graph
    pub interactive: bool,
    /// Position relative to the graph center (filled by layout)
    pub position: Position,
    pub style: NodeStyle,
}

/// A directed, styled edge in an ego-graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Deterministic id (`"edge-{source}-{target}"`)
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation: Relation,
    pub indirect: bool,
    pub style: EdgeStyle,
}

impl GraphEdge {
    /// Deterministic edge id for a source/target pair.
    pub fn edge_id(source: &str, target: &str) -> String {
        format!("edge-{}-{}", source, target)
    }
}

/// A complete ego-graph: focal node first, then related nodes in resolver order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EgoGraph {
    /// Node id of the focal entity, `None` in the idle state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal: Option<String>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl EgoGraph {
    /// Whether this is the idle (nothing focused) graph.
    pub fn is_idle(&self) -> bool {
        self.focal.is_none()
    }

    /// Get a node by ID
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get an edge by source and target node ids
    pub fn edge(&self, source: &str, target: &str) -> Option<&GraphEdge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    /// Node ids in output order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Check that every edge endpoint is present in the node list.
    pub fn dangling_edges(&self) -> Vec<&GraphEdge> {
        self.edges
            .iter()
            .filter(|e| self.node(&e.source).is_none() || self.node(&e.target).is_none())
            .collect()
    }
}
