//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The Rust struct representing the file
//! - Conversion to and from KDL
//! - Validation

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keys accepted in config.kdl.
pub const CONFIG_KEYS: [&str; 6] = [
    "api-url",
    "base-radius",
    "min-spacing",
    "cluster-problem-cap",
    "include-orphaned",
    "output-format",
];

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// api-url "http://localhost:3000"
/// base-radius 200.0
/// min-spacing 120.0
/// cluster-problem-cap 12
/// include-orphaned #true
/// output-format "human"  // or "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelensConfig {
    /// Base URL of the pipeline REST API
    pub api_url: Option<String>,

    /// Preferred distance from the focal node to related nodes
    pub base_radius: Option<f64>,

    /// Minimum distance between neighbouring related nodes
    pub min_spacing: Option<f64>,

    /// How many member problems a cluster-focused graph shows
    pub cluster_problem_cap: Option<usize>,

    /// Whether orphaned and unclustered problems appear in the catalog
    pub include_orphaned: Option<bool>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,
}

impl PipelensConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message for the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(radius) = self.base_radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(format!("base-radius must be positive, got {}", radius));
            }
        }
        if let Some(spacing) = self.min_spacing {
            if !(spacing.is_finite() && spacing > 0.0) {
                return Err(format!("min-spacing must be positive, got {}", spacing));
            }
        }
        if self.cluster_problem_cap == Some(0) {
            return Err("cluster-problem-cap must be at least 1".to_string());
        }
        if let Some(url) = &self.api_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!(
                    "api-url must start with http:// or https://, got '{}'",
                    url
                ));
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown keys and values of the wrong type or out of range are
    /// skipped with a warning.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        for node in doc.nodes() {
            let key = node.name().value();
            let value = node.entries().first().map(|e| e.value());
            let Some(value) = value else {
                tracing::warn!(key, "config key has no value, ignoring");
                continue;
            };
            if let Err(message) = config.apply(key, value) {
                tracing::warn!(key, "{}, ignoring", message);
            }
        }

        config
    }

    /// Set one key from a KDL value.
    fn apply(&mut self, key: &str, value: &KdlValue) -> Result<(), String> {
        let mut next = self.clone();
        match key {
            "api-url" => {
                let url = value.as_string().ok_or("api-url must be a string")?;
                next.api_url = Some(url.trim_end_matches('/').to_string());
            }
            "base-radius" => {
                next.base_radius = Some(as_number(value).ok_or("base-radius must be a number")?);
            }
            "min-spacing" => {
                next.min_spacing = Some(as_number(value).ok_or("min-spacing must be a number")?);
            }
            "cluster-problem-cap" => {
                let cap = value
                    .as_integer()
                    .and_then(|i| usize::try_from(i).ok())
                    .ok_or("cluster-problem-cap must be a non-negative integer")?;
                next.cluster_problem_cap = Some(cap);
            }
            "include-orphaned" => {
                let include = value
                    .as_bool()
                    .ok_or("include-orphaned must be #true or #false")?;
                next.include_orphaned = Some(include);
            }
            "output-format" => {
                let format = value
                    .as_string()
                    .and_then(OutputFormat::parse)
                    .ok_or("output-format must be \"json\" or \"human\"")?;
                next.output_format = Some(format);
            }
            other => return Err(format!("unknown config key '{}'", other)),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Set one key from command-line text.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), String> {
        let value = match key {
            "api-url" | "output-format" => KdlValue::String(raw.to_string()),
            "base-radius" | "min-spacing" => KdlValue::Float(
                raw.parse::<f64>()
                    .map_err(|_| format!("{} must be a number, got '{}'", key, raw))?,
            ),
            "cluster-problem-cap" => KdlValue::Integer(
                raw.parse::<i128>()
                    .map_err(|_| format!("{} must be an integer, got '{}'", key, raw))?,
            ),
            "include-orphaned" => KdlValue::Bool(match raw {
                "true" | "#true" => true,
                "false" | "#false" => false,
                _ => return Err(format!("{} must be true or false, got '{}'", key, raw)),
            }),
            other => {
                return Err(format!(
                    "unknown config key '{}' (expected one of: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                ));
            }
        };
        self.apply(key, &value)
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref url) = self.api_url {
            push_node(&mut doc, "api-url", KdlValue::String(url.clone()));
        }
        if let Some(radius) = self.base_radius {
            push_node(&mut doc, "base-radius", KdlValue::Float(radius));
        }
        if let Some(spacing) = self.min_spacing {
            push_node(&mut doc, "min-spacing", KdlValue::Float(spacing));
        }
        if let Some(cap) = self.cluster_problem_cap {
            push_node(&mut doc, "cluster-problem-cap", KdlValue::Integer(cap as i128));
        }
        if let Some(include) = self.include_orphaned {
            push_node(&mut doc, "include-orphaned", KdlValue::Bool(include));
        }
        if let Some(format) = self.output_format {
            push_node(
                &mut doc,
                "output-format",
                KdlValue::String(format.as_str().to_string()),
            );
        }

        doc
    }

    /// Render as config.kdl text.
    pub fn render(&self) -> String {
        let mut doc = self.to_kdl();
        doc.autoformat();
        doc.to_string()
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &PipelensConfig) {
        if other.api_url.is_some() {
            self.api_url = other.api_url.clone();
        }
        if other.base_radius.is_some() {
            self.base_radius = other.base_radius;
        }
        if other.min_spacing.is_some() {
            self.min_spacing = other.min_spacing;
        }
        if other.cluster_problem_cap.is_some() {
            self.cluster_problem_cap = other.cluster_problem_cap;
        }
        if other.include_orphaned.is_some() {
            self.include_orphaned = other.include_orphaned;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
    }
}

fn as_number(value: &KdlValue) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}

fn push_node(doc: &mut KdlDocument, name: &str, value: KdlValue) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(value));
    doc.nodes_mut().push(node);
}
