//! Entity sources.
//!
//! The explorer consumes an already-fetched [`Dataset`] plus one on-demand
//! lookup (a solution's directly-addressed problems). Both come from an
//! [`EntitySource`]: the pipeline's REST API ([`HttpSource`]) or a JSON
//! snapshot on disk ([`SnapshotSource`]).

mod http;
mod snapshot;

pub use http::{HttpSource, ListResponse};
pub use snapshot::SnapshotSource;

use crate::models::{Dataset, Entity, EntityKind, Problem};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Anything that can provide pipeline entities.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Fetch every entity of one kind.
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Entity>>;

    /// Fetch the problems a solution addresses directly, already resolved
    /// from its `problemIds` link field.
    async fn fetch_problems_for_solution(&self, solution_id: &str) -> Result<Vec<Problem>>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

impl Dataset {
    /// Fetch all four collections concurrently.
    pub async fn fetch(source: &dyn EntitySource) -> Result<Dataset> {
        let (problems, clusters, solutions, projects) = tokio::try_join!(
            source.fetch_all(EntityKind::Problem),
            source.fetch_all(EntityKind::Cluster),
            source.fetch_all(EntityKind::Solution),
            source.fetch_all(EntityKind::Project),
        )?;
        let dataset =
            Dataset::from_entities(problems.into_iter().chain(clusters).chain(solutions).chain(projects));
        tracing::info!(
            source = %source.describe(),
            problems = dataset.problems.len(),
            clusters = dataset.clusters.len(),
            solutions = dataset.solutions.len(),
            projects = dataset.projects.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }
}

/// Pick a source: a snapshot file wins over an API URL.
pub fn open(data: Option<&Path>, api_url: Option<&str>) -> Result<Arc<dyn EntitySource>> {
    if let Some(path) = data {
        return Ok(Arc::new(SnapshotSource::open(path)?));
    }
    if let Some(url) = api_url {
        return Ok(Arc::new(HttpSource::new(url)?));
    }
    Err(Error::NoSource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cluster, Solution};

    #[tokio::test]
    async fn test_dataset_fetch_collects_all_kinds() {
        let source = SnapshotSource::from_dataset(Dataset {
            problems: vec![Problem::new("1", "p")],
            clusters: vec![Cluster::new("c", "c")],
            solutions: vec![Solution::new("s", "s")],
            projects: Vec::new(),
        });
        let dataset = Dataset::fetch(&source).await.unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(dataset.cluster("c").is_some());
    }

    #[test]
    fn test_open_without_source() {
        assert!(matches!(open(None, None), Err(Error::NoSource)));
    }

    #[test]
    fn test_open_missing_snapshot_is_io_error() {
        let result = open(Some(Path::new("/nonexistent/plens.json")), Some("http://x"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
