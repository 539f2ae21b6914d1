//! The dependency graph data model.
//!
//! A finished graph maps canonical module ids to their records and
//! satisfies two invariants: every edge target is itself a key in the
//! graph (closure), and each id was analyzed exactly once (dedup).

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One import edge: the specifier as written, and where it resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The literal module specifier from the import statement.
    pub specifier: String,
    /// Canonical id of the target module.
    pub target: String,
}

/// One module: its id, its outgoing edges, and its lowered code.
///
/// Created once when the builder first visits the id; immutable after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Canonical resolved path, unique across the graph.
    pub id: String,
    /// Outgoing edges in source order. Specifiers are unique per
    /// module; a repeated specifier is an idempotent insert.
    pub edges: Vec<DependencyEdge>,
    /// Executable source after ESM lowering.
    pub code: String,
}

impl ModuleRecord {
    pub fn new(id: String) -> Self {
        Self {
            id,
            edges: Vec::new(),
            code: String::new(),
        }
    }

    /// Record an edge unless the specifier is already mapped.
    pub fn add_edge(&mut self, specifier: String, target: String) {
        if self.edges.iter().any(|e| e.specifier == specifier) {
            return;
        }
        self.edges.push(DependencyEdge { specifier, target });
    }

    /// Look up the resolved target for a specifier.
    pub fn target_of(&self, specifier: &str) -> Option<&str> {
        self.edges
            .iter()
            .find(|e| e.specifier == specifier)
            .map(|e| e.target.as_str())
    }
}

/// The deduplicated module graph reachable from the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Canonical id of the entry module, the loader's first require.
    pub entry: String,
    /// All reachable modules, keyed by canonical id.
    pub modules: BTreeMap<String, ModuleRecord>,
}

impl DependencyGraph {
    pub fn new(entry: String) -> Self {
        Self {
            entry,
            modules: BTreeMap::new(),
        }
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn insert(&mut self, record: ModuleRecord) {
        self.modules.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<&ModuleRecord> {
        self.modules.get(id)
    }

    /// Circular import chains, as lists of module ids.
    ///
    /// The emitted loader tolerates cycles (exports are cached before a
    /// module body runs), but they usually indicate a design problem
    /// worth surfacing at build time.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut indices: BTreeMap<&str, NodeIndex> = BTreeMap::new();
        for id in self.modules.keys() {
            indices.insert(id.as_str(), graph.add_node(id.as_str()));
        }
        for (id, record) in &self.modules {
            for edge in &record.edges {
                if let (Some(&from), Some(&to)) =
                    (indices.get(id.as_str()), indices.get(edge.target.as_str()))
                {
                    graph.add_edge(from, to, ());
                }
            }
        }

        tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || scc.first().is_some_and(|&n| graph.find_edge(n, n).is_some())
            })
            .map(|scc| scc.iter().map(|&n| graph[n].to_string()).collect())
            .collect()
    }
}
