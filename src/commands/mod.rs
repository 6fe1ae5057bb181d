//! Command implementations for the Pipelens CLI.
//!
//! Each command returns a result type implementing [`Output`], which the
//! binary prints as JSON or human-readable text.
//! - `catalog` - List entities with badges
//! - `graph` - Laid-out ego-graph around one entity
//! - `layout` - Raw layout offsets
//! - `config_*` - Configuration management

use crate::config::{self, PipelensConfig, ResolvedConfig};
use crate::explorer::layout::{self, LayoutConfig};
use crate::explorer::{CatalogItem, Explorer, ExplorerConfig};
use crate::models::EntityKind;
use crate::models::graph::{EgoGraph, Position};
use crate::source::EntitySource;
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

// === Catalog ===

#[derive(Debug, Serialize)]
pub struct CatalogResult {
    pub count: usize,
    pub include_orphaned: bool,
    pub items: Vec<CatalogItem>,
}

impl Output for CatalogResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.items.is_empty() {
            return "No matching entities.".to_string();
        }
        let mut lines = vec![format!(
            "{} entit{}:",
            self.count,
            if self.count == 1 { "y" } else { "ies" }
        )];
        for item in &self.items {
            let badges: Vec<String> = item.badges.iter().map(|b| b.label()).collect();
            if badges.is_empty() {
                lines.push(format!("  {}  {}", item.id, item.label));
            } else {
                lines.push(format!("  {}  {} [{}]", item.id, item.label, badges.join(", ")));
            }
        }
        lines.join("\n")
    }
}

/// List catalog entities, optionally filtered by kind and search text.
pub async fn catalog(
    source: Arc<dyn EntitySource>,
    config: ExplorerConfig,
    kind: Option<EntityKind>,
    search: Option<&str>,
) -> Result<CatalogResult> {
    let explorer = Explorer::load(source, config).await?;
    let catalog = explorer.catalog();

    let items: Vec<CatalogItem> = catalog
        .search(search.unwrap_or(""))
        .into_iter()
        .filter(|item| kind.is_none_or(|k| item.kind == k))
        .cloned()
        .collect();

    Ok(CatalogResult {
        count: items.len(),
        include_orphaned: config.include_orphaned,
        items,
    })
}

// === Graph ===

#[derive(Debug, Serialize)]
pub struct GraphResult {
    #[serde(flatten)]
    pub graph: EgoGraph,
}

impl Output for GraphResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let graph = &self.graph;
        let mut lines = Vec::new();
        match graph.focal.as_deref().and_then(|id| graph.node(id)) {
            Some(focal) => lines.push(format!("Focal: {} ({})", focal.id, focal.label)),
            None => lines.push("No focal entity.".to_string()),
        }

        lines.push(format!("Nodes ({}):", graph.nodes.len()));
        for node in &graph.nodes {
            let mut line = format!(
                "  {:<28} {:<18} ({:>7.1}, {:>7.1})  {}",
                node.id,
                node.kind.as_str(),
                node.position.x,
                node.position.y,
                node.label
            );
            if let Some(subtitle) = &node.subtitle {
                line.push_str(&format!(" - {}", subtitle));
            }
            if node.indirect {
                line.push_str(" (indirect)");
            }
            lines.push(line);
        }

        if !graph.edges.is_empty() {
            lines.push(format!("Edges ({}):", graph.edges.len()));
            for edge in &graph.edges {
                lines.push(format!(
                    "  {} -> {}  {} ({})",
                    edge.source,
                    edge.target,
                    edge.relation,
                    if edge.style.dashed { "dashed" } else { "solid" }
                ));
            }
        }
        lines.join("\n")
    }
}

/// Focus one node and return its laid-out ego-graph.
pub async fn graph(
    source: Arc<dyn EntitySource>,
    config: ExplorerConfig,
    node_id: &str,
) -> Result<GraphResult> {
    check_radius(config.layout.base_radius)?;
    let explorer = Explorer::load(source, config).await?;
    if !explorer.catalog().contains(node_id) {
        return Err(Error::NotFound(node_id.to_string()));
    }
    explorer.focus_node(node_id).await;
    Ok(GraphResult {
        graph: explorer.current(),
    })
}

// === Layout ===

/// A zero, negative or NaN radius stacks every node on the focal one.
fn check_radius(radius: f64) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "radius must be positive, got {}",
            radius
        )))
    }
}

#[derive(Debug, Serialize)]
pub struct LayoutResult {
    pub count: usize,
    pub base_radius: f64,
    pub min_spacing: f64,
    /// Radius actually used by the ring (only differs for more than three nodes)
    pub ring_radius: f64,
    pub positions: Vec<Position>,
}

impl Output for LayoutResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} position(s), base radius {:.1}, ring radius {:.1}:",
            self.count, self.base_radius, self.ring_radius
        )];
        for (i, p) in self.positions.iter().enumerate() {
            lines.push(format!("  {:>3}: ({:>8.2}, {:>8.2})", i, p.x, p.y));
        }
        lines.join("\n")
    }
}

/// Layout offsets for `count` related nodes.
pub fn layout(count: usize, config: LayoutConfig) -> Result<LayoutResult> {
    check_radius(config.base_radius)?;
    Ok(LayoutResult {
        count,
        base_radius: config.base_radius,
        min_spacing: config.min_spacing,
        ring_radius: layout::ring_radius(count, config.base_radius, config.min_spacing),
        positions: layout::positions_with_spacing(count, config.base_radius, config.min_spacing),
    })
}

// === Config ===

#[derive(Debug, Serialize)]
pub struct ConfigShowResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub config: ResolvedConfig,
}

impl Output for ConfigShowResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let c = &self.config;
        let mut lines = Vec::new();
        if let Some(path) = &self.path {
            lines.push(format!("Config file: {}", path.display()));
        }
        match &c.api_url {
            Some(url) => lines.push(format!("  api-url: {} ({})", url.value, url.source)),
            None => lines.push("  api-url: (not set)".to_string()),
        }
        lines.push(format!(
            "  base-radius: {} ({})",
            c.base_radius.value, c.base_radius.source
        ));
        lines.push(format!(
            "  min-spacing: {} ({})",
            c.min_spacing.value, c.min_spacing.source
        ));
        lines.push(format!(
            "  cluster-problem-cap: {} ({})",
            c.cluster_problem_cap.value, c.cluster_problem_cap.source
        ));
        lines.push(format!(
            "  include-orphaned: {} ({})",
            c.include_orphaned.value, c.include_orphaned.source
        ));
        lines.push(format!(
            "  output-format: {} ({})",
            c.output_format.value, c.output_format.source
        ));
        lines.join("\n")
    }
}

pub fn config_show(resolved: ResolvedConfig, dir: Option<&Path>) -> ConfigShowResult {
    ConfigShowResult {
        path: dir.map(config::config_path),
        config: resolved,
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigSetResult {
    pub path: PathBuf,
    pub key: String,
    pub value: String,
}

impl Output for ConfigSetResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path.display())
    }
}

/// Set one key in config.kdl, keeping the other values.
pub fn config_set(dir: &Path, key: &str, value: &str) -> Result<ConfigSetResult> {
    let mut file = config::read_config(dir)?;
    let mut update = PipelensConfig::new();
    update.set(key, value).map_err(Error::InvalidInput)?;
    file.merge(&update);
    let path = config::write_config(dir, &file)?;
    Ok(ConfigSetResult {
        path,
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct ConfigPathResult {
    pub path: PathBuf,
    pub exists: bool,
}

impl Output for ConfigPathResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.exists {
            self.path.display().to_string()
        } else {
            format!("{} (not created yet)", self.path.display())
        }
    }
}

pub fn config_path(dir: &Path) -> ConfigPathResult {
    let path = config::config_path(dir);
    ConfigPathResult {
        exists: path.exists(),
        path,
    }
}
