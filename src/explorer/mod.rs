//! Relationship graph explorer.
//!
//! The flow for one focus change:
//!
//! ```text
//! select entity → resolver (cache for deep lookups) → builder → layout → EgoGraph
//! ```
//!
//! - [`catalog`] - flat, searchable entity list with status badges
//! - [`resolver`] - related entities per focal kind
//! - [`builder`] - nodes and directed, styled edges
//! - [`layout`] - deterministic placement around the focal node
//! - [`cache`] - coalescing cache for a solution's directly-addressed problems
//! - [`session`] - focus state with last-selection-wins semantics

pub mod builder;
pub mod cache;
pub mod catalog;
pub mod layout;
pub mod resolver;
pub mod session;
pub mod theme;

pub use cache::RelationshipCache;
pub use catalog::{Badge, Catalog, CatalogItem};
pub use layout::{LayoutConfig, LayoutEngine};
pub use resolver::{RelatedSet, RelationshipResolver, ResolveOptions};
pub use session::{Explorer, ExplorerConfig, FocusOutcome};
