//! Configuration for Pipelens.
//!
//! ## config.kdl - User preferences
//!
//! Located at `$PLENS_CONFIG_DIR/config.kdl`, or `~/.config/pipelens/config.kdl`
//! when the variable is unset.
//!
//! Contains:
//! - `api-url` - Base URL of the pipeline REST API
//! - `base-radius` - Preferred focal-to-related distance in the layout
//! - `min-spacing` - Minimum distance between neighbouring related nodes
//! - `cluster-problem-cap` - Member problems shown for a focal cluster
//! - `include-orphaned` - Whether the catalog lists orphaned/unclustered problems
//! - `output-format` - "json" or "human"
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config.kdl > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    API_URL_ENV, CONFIG_DIR_ENV, ConfigOverrides, Environment, Resolved, ResolvedConfig,
    ValueSource, config_dir, config_path, load_config, read_config, resolve_config, write_config,
};
pub use schema::{CONFIG_KEYS, OutputFormat, PipelensConfig};
