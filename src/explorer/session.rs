//! Focus state for an exploring session.
//!
//! Every focus change bumps a generation counter and tags the request with
//! it and the focal node id. A build whose tag no longer matches when it
//! completes is discarded, so the last selection always wins. In-flight
//! fetches are not cancelled; their results still land in the cache.

use super::builder;
use super::cache::RelationshipCache;
use super::catalog::Catalog;
use super::layout::{LayoutConfig, LayoutEngine};
use super::resolver::{DEFAULT_CLUSTER_PROBLEM_CAP, RelationshipResolver, ResolveOptions};
use crate::models::Dataset;
use crate::models::Entity;
use crate::models::graph::EgoGraph;
use crate::source::EntitySource;
use crate::Result;
use std::sync::{Arc, Mutex, MutexGuard};

/// Knobs for an explorer session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorerConfig {
    pub layout: LayoutConfig,
    pub cluster_problem_cap: usize,
    /// Whether the catalog lists orphaned and unclustered problems
    pub include_orphaned: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            cluster_problem_cap: DEFAULT_CLUSTER_PROBLEM_CAP,
            include_orphaned: true,
        }
    }
}

/// Tag attached to a focus request when it is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTicket {
    pub generation: u64,
    /// Focal node id, `None` for the idle state
    pub focal: Option<String>,
}

/// Result of a focus request.
#[derive(Debug, Clone, PartialEq)]
pub enum FocusOutcome {
    /// The graph was committed as the current one
    Applied(EgoGraph),
    /// Focus moved on before the build finished; nothing was committed
    Stale(FocusTicket),
}

impl FocusOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FocusOutcome::Applied(_))
    }

    pub fn graph(&self) -> Option<&EgoGraph> {
        match self {
            FocusOutcome::Applied(graph) => Some(graph),
            FocusOutcome::Stale(_) => None,
        }
    }
}

struct State {
    dataset: Arc<Dataset>,
    catalog: Arc<Catalog>,
    generation: u64,
    focal: Option<Entity>,
    graph: EgoGraph,
}

impl State {
    fn ticket(&self) -> FocusTicket {
        FocusTicket {
            generation: self.generation,
            focal: self.focal.as_ref().map(Entity::node_id),
        }
    }
}

/// One exploring session over a dataset snapshot.
pub struct Explorer {
    state: Mutex<State>,
    resolver: RelationshipResolver,
    layout: LayoutEngine,
    config: ExplorerConfig,
}

impl Explorer {
    pub fn new(dataset: Dataset, source: Arc<dyn EntitySource>, config: ExplorerConfig) -> Self {
        let layout = LayoutEngine::with_config(config.layout);
        let resolver = RelationshipResolver::with_options(
            RelationshipCache::new(source),
            ResolveOptions {
                cluster_problem_cap: config.cluster_problem_cap,
            },
        );
        let catalog = Catalog::build(&dataset, config.include_orphaned);
        let graph = layout.arrange(builder::idle());
        Self {
            state: Mutex::new(State {
                dataset: Arc::new(dataset),
                catalog: Arc::new(catalog),
                generation: 0,
                focal: None,
                graph,
            }),
            resolver,
            layout,
            config,
        }
    }

    /// Fetch the dataset from `source` and start a session on it.
    pub async fn load(source: Arc<dyn EntitySource>, config: ExplorerConfig) -> Result<Self> {
        let dataset = Dataset::fetch(source.as_ref()).await?;
        Ok(Self::new(dataset, source, config))
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State is only replaced wholesale, so a poisoned lock still holds
        // a consistent value.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn cache(&self) -> &RelationshipCache {
        self.resolver.cache()
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        Arc::clone(&self.lock().dataset)
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.lock().catalog)
    }

    /// The focal entity of the latest request.
    pub fn focal(&self) -> Option<Entity> {
        self.lock().focal.clone()
    }

    /// The last committed graph.
    pub fn current(&self) -> EgoGraph {
        self.lock().graph.clone()
    }

    /// Focus an entity (or nothing) and build its graph.
    pub async fn focus(&self, focal: Option<Entity>) -> FocusOutcome {
        let (ticket, dataset) = {
            let mut state = self.lock();
            state.generation += 1;
            state.focal = focal.clone();
            (state.ticket(), Arc::clone(&state.dataset))
        };

        let graph = match &focal {
            Some(entity) => {
                let set = self.resolver.resolve(entity, &dataset).await;
                builder::build(Some(&set))
            }
            None => builder::idle(),
        };
        let graph = self.layout.arrange(graph);

        self.commit(ticket, graph)
    }

    /// Focus a catalog node by id; unknown or excluded ids go idle.
    pub async fn focus_node(&self, node_id: &str) -> FocusOutcome {
        let entity = {
            let state = self.lock();
            if state.catalog.contains(node_id) {
                state.dataset.entity_by_node_id(node_id)
            } else {
                None
            }
        };
        if entity.is_none() {
            tracing::debug!(node_id, "node not in catalog, showing idle graph");
        }
        self.focus(entity).await
    }

    fn commit(&self, ticket: FocusTicket, graph: EgoGraph) -> FocusOutcome {
        let mut state = self.lock();
        let current = state.ticket();
        if current != ticket {
            tracing::debug!(
                issued = ?ticket.focal,
                current = ?current.focal,
                "discarding stale graph"
            );
            return FocusOutcome::Stale(ticket);
        }
        state.graph = graph.clone();
        FocusOutcome::Applied(graph)
    }

    /// Swap in a freshly fetched dataset.
    ///
    /// Rebuilds the catalog and makes any pending build stale. If the focal
    /// entity no longer exists the session falls back to idle; otherwise the
    /// last committed graph stays until [`Explorer::refresh`] rebuilds it
    /// from the new snapshot. Returns whether focus was reset.
    pub fn replace_dataset(&self, dataset: Dataset) -> bool {
        let catalog = Catalog::build(&dataset, self.config.include_orphaned);
        let mut state = self.lock();

        let refreshed = state
            .focal
            .as_ref()
            .map(|focal| dataset.entity(focal.kind(), focal.id()));
        state.dataset = Arc::new(dataset);
        state.catalog = Arc::new(catalog);

        match refreshed {
            Some(None) => {
                tracing::info!(
                    focal = ?state.focal.as_ref().map(Entity::node_id),
                    "focal entity no longer exists, returning to idle"
                );
                state.generation += 1;
                state.focal = None;
                state.graph = self.layout.arrange(builder::idle());
                true
            }
            Some(Some(entity)) => {
                // A build started on the old snapshot must not commit
                state.generation += 1;
                state.focal = Some(entity);
                false
            }
            None => false,
        }
    }

    /// Rebuild the graph for the current focal entity.
    pub async fn refresh(&self) -> FocusOutcome {
        let focal = self.focal();
        self.focus(focal).await
    }

    /// Drop a solution's cached direct problems.
    pub async fn invalidate_solution(&self, solution_id: &str) {
        self.resolver.cache().invalidate(solution_id).await;
    }
}
