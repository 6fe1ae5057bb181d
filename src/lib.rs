//! Pipelens - relationship graph explorer for the content pipeline.
//!
//! This library provides the core functionality for the `plens` CLI tool:
//! an entity catalog with derived status badges, ego-graph resolution around
//! a focal Problem, Cluster, Solution or Project, deterministic layout, and a
//! request-coalescing cache for second-order relationship lookups.

pub mod cli;
pub mod commands;
pub mod config;
pub mod explorer;
pub mod models;
pub mod source;

/// Library-level error type for Pipelens operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parse error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("No entity source configured: pass --data <file> or --api <url>")]
    NoSource,

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Pipelens operations.
pub type Result<T> = std::result::Result<T, Error>;
