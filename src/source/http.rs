//! REST API source.

use super::EntitySource;
use crate::models::{Cluster, Entity, EntityKind, Problem, Project, Solution};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A list endpoint body: either a bare array or `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Bare(items) | ListResponse::Wrapped { data: items } => items,
        }
    }
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        ListResponse::Bare(Vec::new())
    }
}

/// Fetches entities from the pipeline API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        let base = Url::parse(base_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base())
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "API URL must start with http:// or https://, got '{}'",
                    base_url
                ))
            })?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Error::InvalidInput(format!("API URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of the collection endpoint for one kind.
    pub fn collection_url(&self, kind: EntityKind) -> Result<Url> {
        self.endpoint(&["api", kind.collection()])
    }

    /// URL of a solution's directly-addressed problems.
    pub fn solution_problems_url(&self, solution_id: &str) -> Result<Url> {
        self.endpoint(&["api", "solutions", solution_id, "problems"])
    }

    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body: ListResponse<T> = response.json().await?;
        Ok(body.into_vec())
    }
}

#[async_trait]
impl EntitySource for HttpSource {
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        let url = self.collection_url(kind)?;
        let entities = match kind {
            EntityKind::Problem => self
                .get_list::<Problem>(url)
                .await?
                .into_iter()
                .map(Entity::Problem)
                .collect(),
            EntityKind::Cluster => self
                .get_list::<Cluster>(url)
                .await?
                .into_iter()
                .map(Entity::Cluster)
                .collect(),
            EntityKind::Solution => self
                .get_list::<Solution>(url)
                .await?
                .into_iter()
                .map(Entity::Solution)
                .collect(),
            EntityKind::Project => self
                .get_list::<Project>(url)
                .await?
                .into_iter()
                .map(Entity::Project)
                .collect(),
        };
        Ok(entities)
    }

    async fn fetch_problems_for_solution(&self, solution_id: &str) -> Result<Vec<Problem>> {
        self.get_list(self.solution_problems_url(solution_id)?).await
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_shapes() {
        let bare: ListResponse<Cluster> =
            serde_json::from_str(r#"[{"id": 1, "label": "Billing"}]"#).unwrap();
        assert_eq!(bare.into_vec()[0].id, "1");

        let wrapped: ListResponse<Cluster> =
            serde_json::from_str(r#"{"data": [{"id": "c2", "label": "Ops"}], "total": 1}"#)
                .unwrap();
        assert_eq!(wrapped.into_vec()[0].label, "Ops");
    }

    #[test]
    fn test_urls() {
        let source = HttpSource::new("http://localhost:3000/").unwrap();
        assert_eq!(source.base_url(), "http://localhost:3000");
        assert_eq!(
            source.collection_url(EntityKind::Solution).unwrap().as_str(),
            "http://localhost:3000/api/solutions"
        );
        assert_eq!(
            source.solution_problems_url("5").unwrap().as_str(),
            "http://localhost:3000/api/solutions/5/problems"
        );
    }

    #[test]
    fn test_solution_id_is_percent_encoded() {
        let source = HttpSource::new("http://localhost:3000").unwrap();
        let url = source.solution_problems_url("a/b?c#d").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/solutions/a%2Fb%3Fc%23d/problems"
        );
        assert_eq!(url.path_segments().unwrap().count(), 4);
        assert!(url.query().is_none() && url.fragment().is_none());
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let source = HttpSource::new("https://example.com/pipeline/").unwrap();
        assert_eq!(
            source.collection_url(EntityKind::Problem).unwrap().as_str(),
            "https://example.com/pipeline/api/problems"
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(matches!(
            HttpSource::new("localhost:3000"),
            Err(Error::InvalidInput(_))
        ));
    }
}
