//! CLI argument definitions for Pipelens.

use crate::models::EntityKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pipelens - explore relationships between pipeline entities.
///
/// Start with `plens catalog` to list entities, then `plens graph <NODE_ID>`
/// to see everything related to one of them.
#[derive(Parser, Debug)]
#[command(name = "plens")]
#[command(author, version, about = "Explore relationships between problems, clusters, solutions and projects", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Read entities from a JSON snapshot file instead of the API.
    /// Takes precedence over --api.
    #[arg(long = "data", global = true, env = "PLENS_DATA")]
    pub data: Option<PathBuf>,

    /// Base URL of the pipeline REST API (e.g., http://localhost:3000).
    /// Can also be set via PLENS_API_URL or `api-url` in config.kdl.
    #[arg(long = "api", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List entities with their status badges
    Catalog {
        /// Only list entities of this kind (problem, cluster, solution, project)
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<EntityKind>,

        /// Case-insensitive substring filter over titles and descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Include orphaned and unclustered problems (overrides config)
        #[arg(long, overrides_with = "exclude_orphaned")]
        include_orphaned: bool,

        /// Exclude orphaned and unclustered problems (overrides config)
        #[arg(long)]
        exclude_orphaned: bool,
    },

    /// Build the laid-out relationship graph around one entity
    Graph {
        /// Node ID of the focal entity (e.g., solution-5, problem-12)
        node_id: String,

        /// Preferred distance from the focal node to related nodes
        #[arg(short, long)]
        radius: Option<f64>,

        /// Include orphaned and unclustered problems (overrides config)
        #[arg(long, overrides_with = "exclude_orphaned")]
        include_orphaned: bool,

        /// Exclude orphaned and unclustered problems (overrides config)
        #[arg(long)]
        exclude_orphaned: bool,
    },

    /// Print layout offsets for N related nodes
    Layout {
        /// Number of related nodes
        count: usize,

        /// Preferred distance from the focal node to related nodes
        #[arg(short, long)]
        radius: Option<f64>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration and where each value came from
    Show,

    /// Set a value in config.kdl
    Set {
        /// Config key (api-url, base-radius, min-spacing, cluster-problem-cap,
        /// include-orphaned, output-format)
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the path of config.kdl
    Path,
}

fn parse_kind(s: &str) -> Result<EntityKind, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

/// Tri-state from a pair of opposing flags.
pub fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
