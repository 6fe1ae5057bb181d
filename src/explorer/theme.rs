//! Theme constants for the relationship explorer
//!
//! Defines node and edge colors per entity kind and relation, plus the
//! style lookups the graph builder uses.

use crate::models::graph::{EdgeStyle, NodeKind, NodeStyle, Relation};

/// Node fill colors by kind
pub mod node {
    /// Problem nodes (red)
    pub const PROBLEM: &str = "#e07878";
    /// Cluster nodes (purple)
    pub const CLUSTER: &str = "#8b5fc9";
    /// Deleted-cluster placeholder (muted purple)
    pub const HISTORICAL_CLUSTER: &str = "#5c4a7a";
    /// Solution nodes (blue)
    pub const SOLUTION: &str = "#4a90e2";
    /// Project nodes (green)
    pub const PROJECT: &str = "#5cb85c";
    /// Idle prompt node
    pub const PROMPT: &str = "#3a4d66";
}

/// Edge colors by relation
pub mod edge {
    /// Cluster membership edges
    pub const MEMBERSHIP: &str = "#9b6ed8";
    /// Historical membership (deleted cluster)
    pub const HISTORICAL: &str = "#6b7a8a";
    /// Cluster → solution provenance
    pub const PROVENANCE: &str = "#4a90e2";
    /// Direct problem → solution links
    pub const DIRECT_LINK: &str = "#f0ad4e";
    /// Solution → project execution
    pub const EXECUTION: &str = "#5cb85c";
    /// Any edge reached through an intermediate node
    pub const INDIRECT: &str = "#7a8fa3";
}

/// Focal node highlight
pub mod focus {
    pub const BORDER: &str = "#f0ad4e";
}

/// Base node radius
pub const NODE_RADIUS: f64 = 30.0;

/// Focal node radius
pub const FOCAL_NODE_RADIUS: f64 = 40.0;

/// Get the fill color for a node kind
pub fn node_color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Problem => node::PROBLEM,
        NodeKind::Cluster => node::CLUSTER,
        NodeKind::HistoricalCluster => node::HISTORICAL_CLUSTER,
        NodeKind::Solution => node::SOLUTION,
        NodeKind::Project => node::PROJECT,
        NodeKind::Prompt => node::PROMPT,
    }
}

/// Get node style based on kind and focus
pub fn node_style(kind: NodeKind, focal: bool) -> NodeStyle {
    NodeStyle {
        color: node_color(kind).to_string(),
        radius: if focal { FOCAL_NODE_RADIUS } else { NODE_RADIUS },
        border_width: if focal { 4.0 } else { 2.0 },
        dashed_border: matches!(kind, NodeKind::HistoricalCluster | NodeKind::Prompt),
    }
}

/// Get edge style based on relation and whether the edge is indirect
///
/// Structural relations draw solid; derived, historical and indirect
/// relations draw dashed.
pub fn edge_style(relation: Relation, indirect: bool) -> EdgeStyle {
    if indirect {
        return EdgeStyle {
            color: edge::INDIRECT.to_string(),
            line_width: 1.5,
            arrow_size: 8.0,
            dashed: true,
        };
    }
    match relation {
        Relation::ProblemInCluster => EdgeStyle {
            color: edge::MEMBERSHIP.to_string(),
            line_width: 2.0,
            arrow_size: 10.0,
            dashed: false,
        },
        Relation::ProblemHistoricallyInCluster => EdgeStyle {
            color: edge::HISTORICAL.to_string(),
            line_width: 1.5,
            arrow_size: 8.0,
            dashed: true,
        },
        Relation::ClusterProducesSolution => EdgeStyle {
            color: edge::PROVENANCE.to_string(),
            line_width: 2.0,
            arrow_size: 10.0,
            dashed: false,
        },
        Relation::ProblemDirectlyAddressesSolution => EdgeStyle {
            color: edge::DIRECT_LINK.to_string(),
            line_width: 2.0,
            arrow_size: 10.0,
            dashed: true,
        },
        Relation::SolutionHasProject => EdgeStyle {
            color: edge::EXECUTION.to_string(),
            line_width: 3.0,
            arrow_size: 12.0,
            dashed: false,
        },
    }
}
