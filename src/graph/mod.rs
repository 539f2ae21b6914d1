//! Dependency graph module — the structural backbone of the bundler.
//!
//! `types` defines the graph data model, `builder` the traversal that
//! fills it from an entry file.

pub mod builder;
pub mod types;

pub use builder::build_graph;
pub use types::{DependencyEdge, DependencyGraph, ModuleRecord};
