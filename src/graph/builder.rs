//! Graph builder — the traversal that turns an entry file into the
//! full, deduplicated module graph.
//!
//! Explicit worklist instead of recursion: the dedup guard runs before
//! any parse work is dispatched, which both collapses fan-in to one
//! record per module and guarantees termination on cyclic imports.

use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, info, warn};

use super::types::{DependencyGraph, ModuleRecord};
use crate::error::Result;
use crate::parser;
use crate::resolver;

/// Build the dependency graph reachable from `entry`.
///
/// Any parse, transform, or resolution failure aborts the whole build;
/// a partial graph is never returned, so the closure invariant holds
/// for every graph this function produces.
pub fn build_graph(entry: &Path) -> Result<DependencyGraph> {
    let entry_id = resolver::resolve_entry(entry)?;
    let mut graph = DependencyGraph::new(entry_id.clone());
    let mut worklist: VecDeque<String> = VecDeque::new();
    worklist.push_back(entry_id);

    while let Some(id) = worklist.pop_front() {
        // Dedup guard: an id already in the graph was fully analyzed.
        if graph.contains(&id) {
            continue;
        }

        let path = Path::new(&id);
        let module = parser::parse_file(path)?;
        let imports = parser::extract_imports(&module);
        debug!(module = %id, imports = imports.len(), "analyzing module");

        let mut record = ModuleRecord::new(id.clone());
        for import in imports {
            // Resolution is relative to this module, not the entry.
            let target = resolver::resolve(&import.specifier, path)?;
            worklist.push_back(target.clone());
            record.add_edge(import.specifier, target);
        }
        record.code = parser::to_executable(&module)?;
        graph.insert(record);
    }

    for cycle in graph.cycles() {
        warn!(chain = %cycle.join(" -> "), "circular import chain");
    }
    info!(modules = graph.module_count(), entry = %graph.entry, "graph built");

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundleError;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, source) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, source).unwrap();
        }
        dir
    }

    #[test]
    fn builds_two_module_graph_with_resolved_edge() {
        let dir = fixture(&[
            ("a.js", "import { x } from './b';\nconsole.log(x);\n"),
            ("b.js", "export const x = 1;\n"),
        ]);
        let graph = build_graph(&dir.path().join("a.js")).unwrap();

        assert_eq!(graph.module_count(), 2);
        let entry = graph.get(&graph.entry).unwrap();
        let target = entry.target_of("./b").unwrap();
        assert!(target.ends_with("b.js"));
        assert!(graph.contains(target));
        assert!(entry.code.contains("require(\"./b\")"));
        let b = graph.get(target).unwrap();
        assert!(b.code.contains("exports.x = x;"));
        assert!(b.edges.is_empty());
    }

    #[test]
    fn shared_dependency_is_analyzed_once() {
        let dir = fixture(&[
            ("a.js", "import './b';\nimport './c';\n"),
            ("b.js", "import { shared } from './c';\n"),
            ("c.js", "export const shared = 1;\n"),
        ]);
        let graph = build_graph(&dir.path().join("a.js")).unwrap();

        assert_eq!(graph.module_count(), 3);
        let from_a = graph.get(&graph.entry).unwrap().target_of("./c").unwrap();
        let b_id = graph.get(&graph.entry).unwrap().target_of("./b").unwrap();
        let from_b = graph.get(b_id).unwrap().target_of("./c").unwrap();
        assert_eq!(from_a, from_b);
    }

    #[test]
    fn cyclic_imports_terminate_with_two_records() {
        let dir = fixture(&[
            ("a.js", "import { b } from './b';\nexport const a = 1;\n"),
            ("b.js", "import { a } from './a';\nexport const b = 2;\n"),
        ]);
        let graph = build_graph(&dir.path().join("a.js")).unwrap();
        assert_eq!(graph.module_count(), 2);
        assert_eq!(graph.cycles().len(), 1);
    }

    #[test]
    fn every_edge_target_is_in_the_graph() {
        let dir = fixture(&[
            ("main.js", "import './lib/one';\n"),
            ("lib/one.js", "import '../lib/two';\n"),
            ("lib/two.js", "import './one';\n"),
        ]);
        let graph = build_graph(&dir.path().join("main.js")).unwrap();

        for record in graph.modules.values() {
            for edge in &record.edges {
                assert!(graph.contains(&edge.target), "dangling edge: {}", edge.target);
            }
        }
    }

    #[test]
    fn repeated_import_collapses_to_one_edge() {
        let dir = fixture(&[
            ("a.js", "import { x } from './b';\nimport { y } from './b';\n"),
            ("b.js", "export const x = 1;\nexport const y = 2;\n"),
        ]);
        let graph = build_graph(&dir.path().join("a.js")).unwrap();
        assert_eq!(graph.get(&graph.entry).unwrap().edges.len(), 1);
    }

    #[test]
    fn missing_dependency_aborts_the_build() {
        let dir = fixture(&[("a.js", "import { x } from './missing';\n")]);
        let err = build_graph(&dir.path().join("a.js")).unwrap_err();
        assert!(matches!(
            err,
            BundleError::UnresolvedModule { specifier, .. } if specifier == "./missing"
        ));
    }

    #[test]
    fn parse_error_in_a_dependency_aborts_the_build() {
        let dir = fixture(&[
            ("a.js", "import './broken';\n"),
            ("broken.js", "const = nope(;\n"),
        ]);
        let err = build_graph(&dir.path().join("a.js")).unwrap_err();
        assert!(matches!(err, BundleError::Parse { .. }));
    }
}
