//! Relationship resolution around a focal entity.
//!
//! Given a focal entity and the current dataset, computes the set of
//! directly related entities per relation rule:
//!
//! | Focal    | Related                                                         |
//! |----------|-----------------------------------------------------------------|
//! | Problem  | its cluster (or a historical placeholder), solutions linking it |
//! | Cluster  | up to `cluster_problem_cap` member problems, produced solutions |
//! | Solution | source cluster, projects, directly-addressed problems (cached)  |
//! | Project  | its solution; indirectly that solution's cluster and problems   |
//!
//! Directly-addressed problems of a solution are second-order data fetched
//! through the [`RelationshipCache`]; everything else is read synchronously
//! from the dataset snapshot.

use super::cache::RelationshipCache;
use crate::models::graph::{NodeKind, Relation};
use crate::models::{Dataset, Entity, EntityKind, Problem, Solution};
use serde::{Deserialize, Serialize};

/// How many member problems a cluster-focused graph shows at most.
pub const DEFAULT_CLUSTER_PROBLEM_CAP: usize = 12;

/// Tunables for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum number of member problems resolved for a focal cluster
    pub cluster_problem_cap: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            cluster_problem_cap: DEFAULT_CLUSTER_PROBLEM_CAP,
        }
    }
}

/// What a related node stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelatedTarget {
    /// A live entity
    Entity { entity: Entity },
    /// A deleted cluster, known only by the label kept on the problem
    HistoricalCluster { label: String },
}

impl RelatedTarget {
    /// Composite node id.
    pub fn node_id(&self) -> String {
        match self {
            RelatedTarget::Entity { entity } => entity.node_id(),
            RelatedTarget::HistoricalCluster { label } => historical_cluster_node_id(label),
        }
    }

    /// Entity kind this target plays in a relation.
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            RelatedTarget::Entity { entity } => entity.kind(),
            RelatedTarget::HistoricalCluster { .. } => EntityKind::Cluster,
        }
    }

    pub fn node_kind(&self) -> NodeKind {
        match self {
            RelatedTarget::Entity { entity } => entity.kind().into(),
            RelatedTarget::HistoricalCluster { .. } => NodeKind::HistoricalCluster,
        }
    }
}

/// Node id of the placeholder for a deleted cluster.
pub fn historical_cluster_node_id(label: &str) -> String {
    format!("cluster:historical:{}", label)
}

/// One related entity together with how it relates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub target: RelatedTarget,
    pub relation: Relation,
    /// Connected through an intermediate node rather than the focal one
    pub indirect: bool,
    /// Node id the edge attaches to (the focal node, or the intermediate)
    pub anchor: String,
}

/// The focal entity and everything resolved around it, in resolution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedSet {
    pub focal: Entity,
    pub related: Vec<RelatedEntity>,
}

impl RelatedSet {
    fn new(focal: &Entity) -> Self {
        Self {
            focal: focal.clone(),
            related: Vec::new(),
        }
    }

    /// Append unless the node is the focal one or already present.
    fn push(&mut self, target: RelatedTarget, relation: Relation, anchor: &str, indirect: bool) {
        let node_id = target.node_id();
        if node_id == self.focal.node_id() || self.related.iter().any(|r| r.target.node_id() == node_id)
        {
            return;
        }
        self.related.push(RelatedEntity {
            target,
            relation,
            indirect,
            anchor: anchor.to_string(),
        });
    }

    fn push_entity(&mut self, entity: Entity, relation: Relation, anchor: &str, indirect: bool) {
        self.push(RelatedTarget::Entity { entity }, relation, anchor, indirect);
    }

    /// Node ids of related entities in order.
    pub fn node_ids(&self) -> Vec<String> {
        self.related.iter().map(|r| r.target.node_id()).collect()
    }

    pub fn len(&self) -> usize {
        self.related.len()
    }

    pub fn is_empty(&self) -> bool {
        self.related.is_empty()
    }
}

/// Solution whose directly-addressed problems this focal entity needs.
///
/// Solutions need their own; projects need their solution's. Other kinds
/// need no second-order data.
pub fn deep_lookup_for(focal: &Entity, dataset: &Dataset) -> Option<String> {
    match focal {
        Entity::Solution(s) => Some(s.id.clone()),
        Entity::Project(p) => p
            .solution_id
            .as_deref()
            .and_then(|id| dataset.solution(id))
            .map(|s| s.id.clone()),
        Entity::Problem(_) | Entity::Cluster(_) => None,
    }
}

/// Resolve related entities synchronously.
///
/// `direct_problems` is the already-fetched list of problems directly
/// addressed by the solution named by [`deep_lookup_for`]; `None` means it
/// is not available and that branch is left out.
pub fn resolve_with(
    focal: &Entity,
    dataset: &Dataset,
    direct_problems: Option<&[Problem]>,
    options: &ResolveOptions,
) -> RelatedSet {
    let mut set = RelatedSet::new(focal);
    let anchor = focal.node_id();

    match focal {
        Entity::Problem(problem) => {
            let live_cluster = problem.cluster_id.as_deref().and_then(|id| dataset.cluster(id));
            if let Some(cluster) = live_cluster {
                set.push_entity(
                    Entity::Cluster(cluster.clone()),
                    Relation::ProblemInCluster,
                    &anchor,
                    false,
                );
            } else if let Some(label) = &problem.cluster_label {
                set.push(
                    RelatedTarget::HistoricalCluster {
                        label: label.clone(),
                    },
                    Relation::ProblemHistoricallyInCluster,
                    &anchor,
                    false,
                );
            }
            for solution in dataset.solutions.iter().filter(|s| s.addresses(&problem.id)) {
                set.push_entity(
                    Entity::Solution(solution.clone()),
                    Relation::ProblemDirectlyAddressesSolution,
                    &anchor,
                    false,
                );
            }
        }
        Entity::Cluster(cluster) => {
            let members = dataset
                .problems
                .iter()
                .filter(|p| p.cluster_id.as_deref() == Some(cluster.id.as_str()))
                .take(options.cluster_problem_cap);
            for problem in members {
                set.push_entity(
                    Entity::Problem(problem.clone()),
                    Relation::ProblemInCluster,
                    &anchor,
                    false,
                );
            }
            let produced = dataset
                .solutions
                .iter()
                .filter(|s| s.source_cluster_id.as_deref() == Some(cluster.id.as_str()));
            for solution in produced {
                set.push_entity(
                    Entity::Solution(solution.clone()),
                    Relation::ClusterProducesSolution,
                    &anchor,
                    false,
                );
            }
        }
        Entity::Solution(solution) => {
            push_source_cluster(&mut set, solution, dataset, &anchor, false);
            let projects = dataset
                .projects
                .iter()
                .filter(|p| p.solution_id.as_deref() == Some(solution.id.as_str()));
            for project in projects {
                set.push_entity(
                    Entity::Project(project.clone()),
                    Relation::SolutionHasProject,
                    &anchor,
                    false,
                );
            }
            push_direct_problems(&mut set, direct_problems, &anchor, false);
        }
        Entity::Project(project) => {
            let solution = project.solution_id.as_deref().and_then(|id| dataset.solution(id));
            if let Some(solution) = solution {
                let via = EntityKind::Solution.node_id(&solution.id);
                set.push_entity(
                    Entity::Solution(solution.clone()),
                    Relation::SolutionHasProject,
                    &anchor,
                    false,
                );
                push_source_cluster(&mut set, solution, dataset, &via, true);
                push_direct_problems(&mut set, direct_problems, &via, true);
            }
        }
    }

    tracing::debug!(
        focal = %anchor,
        related = set.len(),
        "resolved relationships"
    );
    set
}

fn push_source_cluster(
    set: &mut RelatedSet,
    solution: &Solution,
    dataset: &Dataset,
    anchor: &str,
    indirect: bool,
) {
    let cluster = solution
        .source_cluster_id
        .as_deref()
        .and_then(|id| dataset.cluster(id));
    if let Some(cluster) = cluster {
        set.push_entity(
            Entity::Cluster(cluster.clone()),
            Relation::ClusterProducesSolution,
            anchor,
            indirect,
        );
    }
}

fn push_direct_problems(
    set: &mut RelatedSet,
    direct_problems: Option<&[Problem]>,
    anchor: &str,
    indirect: bool,
) {
    for problem in direct_problems.unwrap_or_default() {
        set.push_entity(
            Entity::Problem(problem.clone()),
            Relation::ProblemDirectlyAddressesSolution,
            anchor,
            indirect,
        );
    }
}

/// Resolver backed by the relationship cache for second-order lookups.
#[derive(Debug, Clone)]
pub struct RelationshipResolver {
    cache: RelationshipCache,
    options: ResolveOptions,
}

impl RelationshipResolver {
    pub fn new(cache: RelationshipCache) -> Self {
        Self::with_options(cache, ResolveOptions::default())
    }

    pub fn with_options(cache: RelationshipCache, options: ResolveOptions) -> Self {
        Self { cache, options }
    }

    pub fn cache(&self) -> &RelationshipCache {
        &self.cache
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve related entities, fetching directly-addressed problems
    /// through the cache when the focal kind needs them.
    pub async fn resolve(&self, focal: &Entity, dataset: &Dataset) -> RelatedSet {
        let direct = match deep_lookup_for(focal, dataset) {
            Some(solution_id) => Some(self.cache.get(&solution_id).await),
            None => None,
        };
        resolve_with(focal, dataset, direct.as_deref().map(Vec::as_slice), &self.options)
    }
}
