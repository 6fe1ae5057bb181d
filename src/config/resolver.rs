//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`PLENS_API_URL`)
//! 3. config.kdl (`$PLENS_CONFIG_DIR/config.kdl` or `~/.config/pipelens/config.kdl`)
//! 4. Built-in defaults

use crate::Result;
use crate::config::{OutputFormat, PipelensConfig};
use crate::explorer::layout::{DEFAULT_BASE_RADIUS, LayoutConfig, MIN_SPACING};
use crate::explorer::resolver::DEFAULT_CLUSTER_PROBLEM_CAP;
use crate::explorer::session::ExplorerConfig;
use kdl::KdlDocument;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the REST API base URL.
pub const API_URL_ENV: &str = "PLENS_API_URL";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "PLENS_CONFIG_DIR";

const CONFIG_FILE_NAME: &str = "config.kdl";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    ConfigFile,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<Resolved<String>>,
    pub base_radius: Resolved<f64>,
    pub min_spacing: Resolved<f64>,
    pub cluster_problem_cap: Resolved<usize>,
    pub include_orphaned: Resolved<bool>,
    pub output_format: Resolved<OutputFormat>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            base_radius: Resolved::new(DEFAULT_BASE_RADIUS, ValueSource::Default),
            min_spacing: Resolved::new(MIN_SPACING, ValueSource::Default),
            cluster_problem_cap: Resolved::new(DEFAULT_CLUSTER_PROBLEM_CAP, ValueSource::Default),
            include_orphaned: Resolved::new(true, ValueSource::Default),
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_ref().map(|r| r.value.as_str())
    }

    pub fn is_human(&self) -> bool {
        self.output_format.value == OutputFormat::Human
    }

    /// Session settings derived from the resolved values.
    pub fn explorer_config(&self) -> ExplorerConfig {
        ExplorerConfig {
            layout: LayoutConfig {
                base_radius: self.base_radius.value,
                min_spacing: self.min_spacing.value,
                ..LayoutConfig::default()
            },
            cluster_problem_cap: self.cluster_problem_cap.value,
            include_orphaned: self.include_orphaned.value,
        }
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub base_radius: Option<f64>,
    pub include_orphaned: Option<bool>,
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_base_radius(mut self, radius: f64) -> Self {
        self.base_radius = Some(radius);
        self
    }

    pub fn with_include_orphaned(mut self, include: bool) -> Self {
        self.include_orphaned = Some(include);
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Environment variables that take part in resolution.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub api_url: Option<String>,
}

impl Environment {
    /// Read from the process environment. Empty values count as unset.
    pub fn from_process() -> Self {
        Self {
            api_url: std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Directory holding config.kdl.
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|d| d.join("pipelens")),
    }
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Read config.kdl from `dir`; a missing file is an empty config.
pub fn read_config(dir: &Path) -> Result<PipelensConfig> {
    let path = config_path(dir);
    if !path.exists() {
        return Ok(PipelensConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let doc: KdlDocument = content.parse()?;
    Ok(PipelensConfig::from_kdl(&doc))
}

/// Write config.kdl into `dir`, creating the directory if needed.
pub fn write_config(dir: &Path, config: &PipelensConfig) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = config_path(dir);
    fs::write(&path, config.render())?;
    Ok(path)
}

/// Resolve configuration with full precedence chain.
pub fn resolve_config(
    file: &PipelensConfig,
    env: &Environment,
    overrides: &ConfigOverrides,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();

    if let Some(ref url) = overrides.api_url {
        result.api_url = Some(Resolved::new(url.clone(), ValueSource::CliFlag));
    } else if let Some(ref url) = env.api_url {
        result.api_url = Some(Resolved::new(
            url.clone(),
            ValueSource::EnvVar(API_URL_ENV.to_string()),
        ));
    } else if let Some(ref url) = file.api_url {
        result.api_url = Some(Resolved::new(url.clone(), ValueSource::ConfigFile));
    }

    if let Some(radius) = overrides.base_radius {
        result.base_radius = Resolved::new(radius, ValueSource::CliFlag);
    } else if let Some(radius) = file.base_radius {
        result.base_radius = Resolved::new(radius, ValueSource::ConfigFile);
    }

    if let Some(spacing) = file.min_spacing {
        result.min_spacing = Resolved::new(spacing, ValueSource::ConfigFile);
    }

    if let Some(cap) = file.cluster_problem_cap {
        result.cluster_problem_cap = Resolved::new(cap, ValueSource::ConfigFile);
    }

    if let Some(include) = overrides.include_orphaned {
        result.include_orphaned = Resolved::new(include, ValueSource::CliFlag);
    } else if let Some(include) = file.include_orphaned {
        result.include_orphaned = Resolved::new(include, ValueSource::ConfigFile);
    }

    if let Some(format) = overrides.output_format {
        result.output_format = Resolved::new(format, ValueSource::CliFlag);
    } else if let Some(format) = file.output_format {
        result.output_format = Resolved::new(format, ValueSource::ConfigFile);
    }

    result
}

/// Read config.kdl and the process environment, then resolve.
pub fn load_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let file = match config_dir() {
        Some(dir) => read_config(&dir)?,
        None => PipelensConfig::default(),
    };
    Ok(resolve_config(&file, &Environment::from_process(), overrides))
}
