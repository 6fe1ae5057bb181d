//! Ego-graph construction from a resolved relationship set.
//!
//! Turns a [`RelatedSet`] into nodes and directed, styled edges. Positions
//! are left at the origin; [`super::layout::LayoutEngine::arrange`] fills
//! them in.

use super::resolver::{RelatedEntity, RelatedSet, RelatedTarget};
use super::theme;
use crate::models::Entity;
use crate::models::graph::{EgoGraph, GraphEdge, GraphNode, NodeKind, Position};
use std::collections::HashSet;

/// Node id of the idle-state prompt.
pub const PROMPT_NODE_ID: &str = "prompt";

/// Label shown on the idle-state prompt.
pub const PROMPT_LABEL: &str = "Select an entity to explore its relationships";

/// Build the graph for a focus, or the idle graph when nothing is focused.
pub fn build(set: Option<&RelatedSet>) -> EgoGraph {
    match set {
        Some(set) => build_focused(set),
        None => idle(),
    }
}

/// The idle graph: a single non-interactive prompt node.
pub fn idle() -> EgoGraph {
    EgoGraph {
        focal: None,
        nodes: vec![GraphNode {
            id: PROMPT_NODE_ID.to_string(),
            kind: NodeKind::Prompt,
            entity_id: None,
            label: PROMPT_LABEL.to_string(),
            subtitle: None,
            focal: false,
            indirect: false,
            interactive: false,
            position: Position::default(),
            style: theme::node_style(NodeKind::Prompt, false),
        }],
        edges: Vec::new(),
    }
}

fn build_focused(set: &RelatedSet) -> EgoGraph {
    let focal_id = set.focal.node_id();
    let mut graph = EgoGraph {
        focal: Some(focal_id.clone()),
        nodes: vec![entity_node(&set.focal, true, false)],
        edges: Vec::new(),
    };

    let mut seen_nodes: HashSet<String> = HashSet::from([focal_id]);
    let mut seen_edges: HashSet<String> = HashSet::new();

    for related in &set.related {
        let node = related_node(related);
        let node_id = node.id.clone();
        if seen_nodes.insert(node_id.clone()) {
            graph.nodes.push(node);
        }

        let edge = related_edge(related, &node_id);
        if seen_edges.insert(edge.id.clone()) {
            graph.edges.push(edge);
        }
    }

    graph
}

fn entity_node(entity: &Entity, focal: bool, indirect: bool) -> GraphNode {
    let kind = NodeKind::from(entity.kind());
    GraphNode {
        id: entity.node_id(),
        kind,
        entity_id: Some(entity.id().to_string()),
        label: entity.label().to_string(),
        subtitle: entity.subtitle(),
        focal,
        indirect,
        interactive: !focal,
        position: Position::default(),
        style: theme::node_style(kind, focal),
    }
}

fn related_node(related: &RelatedEntity) -> GraphNode {
    match &related.target {
        RelatedTarget::Entity { entity } => entity_node(entity, false, related.indirect),
        RelatedTarget::HistoricalCluster { label } => GraphNode {
            id: related.target.node_id(),
            kind: NodeKind::HistoricalCluster,
            entity_id: None,
            label: label.clone(),
            subtitle: Some("deleted cluster".to_string()),
            focal: false,
            indirect: related.indirect,
            interactive: false,
            position: Position::default(),
            style: theme::node_style(NodeKind::HistoricalCluster, false),
        },
    }
}

/// Orient the edge by the relation's fixed direction, whichever end is focal.
fn related_edge(related: &RelatedEntity, node_id: &str) -> GraphEdge {
    let (source, target) = if related.target.entity_kind() == related.relation.source_kind() {
        (node_id, related.anchor.as_str())
    } else {
        (related.anchor.as_str(), node_id)
    };
    GraphEdge {
        id: GraphEdge::edge_id(source, target),
        source: source.to_string(),
        target: target.to_string(),
        relation: related.relation,
        indirect: related.indirect,
        style: theme::edge_style(related.relation, related.indirect),
    }
}
