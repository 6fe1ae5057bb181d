//! JSON snapshot source.
//!
//! A snapshot file holds up to four top-level arrays (`problems`,
//! `clusters`, `solutions`, `projects`), each optional and each either a
//! bare array or wrapped as `{ "data": [...] }`.

use super::{EntitySource, ListResponse};
use crate::models::{Cluster, Dataset, Entity, EntityKind, Problem, Project, Solution};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    problems: ListResponse<Problem>,
    #[serde(default)]
    clusters: ListResponse<Cluster>,
    #[serde(default)]
    solutions: ListResponse<Solution>,
    #[serde(default)]
    projects: ListResponse<Project>,
}

impl From<SnapshotFile> for Dataset {
    fn from(file: SnapshotFile) -> Self {
        Dataset {
            problems: file.problems.into_vec(),
            clusters: file.clusters.into_vec(),
            solutions: file.solutions.into_vec(),
            projects: file.projects.into_vec(),
        }
    }
}

/// Serves entities from an in-memory snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    dataset: Dataset,
    path: Option<PathBuf>,
}

impl SnapshotSource {
    /// Load a snapshot file.
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut source = Self::parse(&content)?;
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    /// Parse snapshot JSON.
    pub fn parse(json: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        Ok(Self::from_dataset(file.into()))
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            dataset,
            path: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[async_trait]
impl EntitySource for SnapshotSource {
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        let d = &self.dataset;
        Ok(match kind {
            EntityKind::Problem => d.problems.iter().cloned().map(Entity::Problem).collect(),
            EntityKind::Cluster => d.clusters.iter().cloned().map(Entity::Cluster).collect(),
            EntityKind::Solution => d.solutions.iter().cloned().map(Entity::Solution).collect(),
            EntityKind::Project => d.projects.iter().cloned().map(Entity::Project).collect(),
        })
    }

    async fn fetch_problems_for_solution(&self, solution_id: &str) -> Result<Vec<Problem>> {
        let solution = self
            .dataset
            .solution(solution_id)
            .ok_or_else(|| Error::NotFound(format!("solution {}", solution_id)))?;
        Ok(solution
            .linked_problem_ids()
            .iter()
            .filter_map(|id| self.dataset.problem(id).cloned())
            .collect())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "in-memory snapshot".to_string(),
        }
    }
}
