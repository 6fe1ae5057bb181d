//! Entity catalog for selection and search.
//!
//! Flattens the four entity collections into one searchable list of items,
//! each carrying derived status badges. Problems whose cluster is gone (or
//! never existed) can be excluded entirely unless a solution still links to
//! them directly.

use crate::models::{Dataset, Entity, EntityKind, Impact, Problem, ProjectStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A derived status badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "badge", content = "value", rename_all = "snake_case")]
pub enum Badge {
    /// Problem impact rating
    Impact(Impact),
    /// Problem belongs to a cluster that exists now
    Clustered,
    /// Problem's cluster was deleted, only its label survives
    Orphaned,
    /// Orphaned or unclustered, but kept visible by a direct solution link
    Preserved,
    /// Problem was never clustered
    Unclustered,
    /// Solution workflow status
    Status(String),
    /// Project with a linked tracker project
    Active,
    /// Project not yet started
    Planned,
}

impl Badge {
    /// Short label for human output.
    pub fn label(&self) -> String {
        match self {
            Badge::Impact(impact) => format!("{} impact", impact),
            Badge::Clustered => "clustered".to_string(),
            Badge::Orphaned => "orphaned".to_string(),
            Badge::Preserved => "preserved".to_string(),
            Badge::Unclustered => "unclustered".to_string(),
            Badge::Status(status) => status.clone(),
            Badge::Active => "active".to_string(),
            Badge::Planned => "planned".to_string(),
        }
    }
}

/// How a problem relates to the current cluster collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStanding {
    /// `clusterId` resolves to an existing cluster
    Clustered,
    /// No live cluster, but a historical cluster label survives
    Orphaned,
    /// No live cluster and no label
    Unclustered,
}

/// Classify a problem against the set of existing cluster ids.
///
/// The foreign key is re-checked: a `clusterId` pointing at a deleted
/// cluster counts as no cluster at all.
pub fn cluster_standing(problem: &Problem, cluster_ids: &HashSet<&str>) -> ClusterStanding {
    let live = problem
        .cluster_id
        .as_deref()
        .is_some_and(|id| cluster_ids.contains(id));
    if live {
        ClusterStanding::Clustered
    } else if problem.cluster_label.is_some() {
        ClusterStanding::Orphaned
    } else {
        ClusterStanding::Unclustered
    }
}

/// Ids of every problem referenced by some solution's `problemIds`.
pub fn preserved_problem_ids(dataset: &Dataset) -> HashSet<String> {
    dataset
        .solutions
        .iter()
        .flat_map(|s| s.linked_problem_ids())
        .collect()
}

/// Badges for a problem given its standing and whether it is preserved.
pub fn problem_badges(problem: &Problem, standing: ClusterStanding, preserved: bool) -> Vec<Badge> {
    let mut badges = Vec::new();
    if let Some(impact) = problem.impact {
        badges.push(Badge::Impact(impact));
    }
    match (standing, preserved) {
        (ClusterStanding::Clustered, _) => badges.push(Badge::Clustered),
        (ClusterStanding::Orphaned | ClusterStanding::Unclustered, true) => {
            badges.push(Badge::Preserved)
        }
        (ClusterStanding::Orphaned, false) => badges.push(Badge::Orphaned),
        (ClusterStanding::Unclustered, false) => badges.push(Badge::Unclustered),
    }
    badges
}

/// A single selectable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Composite node id (`"{kind}-{id}"`)
    pub id: String,
    pub kind: EntityKind,
    /// Id within the kind
    pub entity_id: String,
    pub label: String,
    /// Lowercased label and description-like fields
    pub search_text: String,
    pub badges: Vec<Badge>,
}

impl CatalogItem {
    fn new(entity: &Entity, badges: Vec<Badge>) -> Self {
        Self {
            id: entity.node_id(),
            kind: entity.kind(),
            entity_id: entity.id().to_string(),
            label: entity.label().to_string(),
            search_text: search_text(entity),
            badges,
        }
    }

    /// Case-insensitive substring match against the search text.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty() || self.search_text.contains(&query)
    }

    pub fn has_badge(&self, badge: &Badge) -> bool {
        self.badges.contains(badge)
    }
}

fn search_text(entity: &Entity) -> String {
    let mut parts: Vec<&str> = vec![entity.label()];
    if let Some(description) = entity.description() {
        parts.push(description);
    }
    match entity {
        Entity::Problem(p) => {
            parts.extend(p.cluster_label.as_deref());
            parts.extend(p.industry.as_deref());
            parts.extend(p.business_size.as_deref());
        }
        Entity::Cluster(_) => {}
        Entity::Solution(s) => {
            parts.extend(s.status.as_deref());
            parts.extend(s.source_cluster_label.as_deref());
        }
        Entity::Project(_) => {}
    }
    parts.join(" ").to_lowercase()
}

/// Flat, searchable index over all entity collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub items: Vec<CatalogItem>,
    /// Whether orphaned/unclustered problems were kept
    pub include_orphaned: bool,
}

impl Catalog {
    /// Build the catalog from the four collections.
    ///
    /// With `include_orphaned` false, problems that are orphaned or
    /// unclustered and not preserved are left out entirely.
    pub fn build(dataset: &Dataset, include_orphaned: bool) -> Self {
        let cluster_ids: HashSet<&str> = dataset.clusters.iter().map(|c| c.id.as_str()).collect();
        let preserved = preserved_problem_ids(dataset);

        let mut items = Vec::with_capacity(dataset.len());

        for problem in &dataset.problems {
            let standing = cluster_standing(problem, &cluster_ids);
            let is_preserved = preserved.contains(&problem.id);
            if !include_orphaned && standing != ClusterStanding::Clustered && !is_preserved {
                continue;
            }
            let badges = problem_badges(problem, standing, is_preserved);
            items.push(CatalogItem::new(&Entity::Problem(problem.clone()), badges));
        }

        for cluster in &dataset.clusters {
            items.push(CatalogItem::new(&Entity::Cluster(cluster.clone()), Vec::new()));
        }

        for solution in &dataset.solutions {
            let badges = solution
                .status
                .iter()
                .map(|s| Badge::Status(s.clone()))
                .collect();
            items.push(CatalogItem::new(&Entity::Solution(solution.clone()), badges));
        }

        for project in &dataset.projects {
            let badge = match project.status() {
                ProjectStatus::Active => Badge::Active,
                ProjectStatus::Planned => Badge::Planned,
            };
            items.push(CatalogItem::new(&Entity::Project(project.clone()), vec![badge]));
        }

        tracing::debug!(
            items = items.len(),
            include_orphaned,
            "built entity catalog"
        );

        Self {
            items,
            include_orphaned,
        }
    }

    /// Items whose search text contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.matches(query)).collect()
    }

    /// Items of a single kind.
    pub fn of_kind(&self, kind: EntityKind) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.kind == kind).collect()
    }

    /// Get an item by its node id.
    pub fn get(&self, node_id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == node_id)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.get(node_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
