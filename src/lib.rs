//! # skein
//!
//! Minimal JavaScript module bundler.
//!
//! Given one entry file written with static ESM `import` declarations,
//! skein produces a single self-contained output file that reproduces
//! the same module graph and execution order in an environment without
//! native module support.
//!
//! ## Pipeline
//!
//! - **parser**: tree-sitter parse, static import extraction, ESM →
//!   `require`/`exports` lowering
//! - **resolver**: specifier + importer path → canonical module id
//! - **graph**: worklist traversal into a deduplicated dependency graph
//! - **emit**: self-executing loader with the graph embedded as data
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skein::{build_graph, emit};
//! use std::path::Path;
//!
//! # fn main() -> skein::Result<()> {
//! let graph = build_graph(Path::new("src/main.js"))?;
//! let out = emit::write_bundle(&graph, Path::new("dist"), "bundle.js")?;
//! println!("wrote {}", out.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod parser;
pub mod resolver;

// Re-exports for convenience
pub use error::{BundleError, Result};

pub use config::{BundleConfig, OutputConfig};
pub use emit::{emit_bundle, write_bundle};
pub use graph::{build_graph, DependencyEdge, DependencyGraph, ModuleRecord};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, source) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, source).unwrap();
        }
        dir
    }

    #[test]
    fn end_to_end_two_module_bundle() {
        let dir = project(&[
            ("a.js", "import { x } from './b';\nconsole.log(x);\n"),
            ("b.js", "export const x = 1;\n"),
        ]);

        let graph = build_graph(&dir.path().join("a.js")).unwrap();
        assert_eq!(graph.module_count(), 2);

        let entry = graph.get(&graph.entry).unwrap();
        assert_eq!(entry.edges.len(), 1);
        assert_eq!(entry.edges[0].specifier, "./b");
        let b_id = entry.edges[0].target.clone();
        assert!(graph.contains(&b_id));
        assert!(entry.code.contains("const { x } = require(\"./b\");"));
        assert!(graph.get(&b_id).unwrap().code.contains("exports.x = x;"));

        let bundle = emit_bundle(&graph);
        // The loader wires x through exports/require with no leftover ESM.
        assert!(bundle.contains("exports.x = x;"));
        assert!(bundle.contains("require(\"./b\")"));
        assert!(!bundle.contains("import "));
        assert!(bundle.contains(&format!("load({});", serde_json::to_string(&graph.entry).unwrap())));
    }

    #[test]
    fn diamond_dependency_is_bundled_once() {
        let dir = project(&[
            (
                "main.js",
                "import { a } from './a';\nimport { b } from './b';\n",
            ),
            ("a.js", "import { c } from './c';\nexport const a = c;\n"),
            ("b.js", "import { c } from './c';\nexport const b = c;\n"),
            ("c.js", "export const c = 1;\n"),
        ]);

        let graph = build_graph(&dir.path().join("main.js")).unwrap();
        assert_eq!(graph.module_count(), 4);

        let bundle = emit_bundle(&graph);
        // c's lowered code is embedded exactly once.
        assert_eq!(bundle.matches("exports.c = c;").count(), 1);
    }

    #[test]
    fn circular_imports_build_and_bundle() {
        let dir = project(&[
            ("a.js", "import { b } from './b';\nexport const a = 'a';\n"),
            ("b.js", "import { a } from './a';\nexport const b = 'b';\n"),
        ]);

        let graph = build_graph(&dir.path().join("a.js")).unwrap();
        assert_eq!(graph.module_count(), 2);

        let bundle = emit_bundle(&graph);
        assert!(bundle.contains("cache[id] = module;"));
    }

    #[test]
    fn failed_build_writes_no_output() {
        let dir = project(&[("a.js", "import { x } from './missing';\n")]);
        let out_dir = dir.path().join("dist");

        let result = build_graph(&dir.path().join("a.js"));
        assert!(matches!(
            result,
            Err(BundleError::UnresolvedModule { .. })
        ));
        assert!(!out_dir.exists());
    }

    #[test]
    fn extensionless_and_explicit_specifiers_share_a_record() {
        let dir = project(&[
            ("a.js", "import { x } from './c';\nimport { y } from './b';\n"),
            ("b.js", "import { x } from './c.js';\nexport const y = 2;\n"),
            ("c.js", "export const x = 1;\n"),
        ]);

        let graph = build_graph(&dir.path().join("a.js")).unwrap();
        // ./c and ./c.js normalize to the same canonical id.
        assert_eq!(graph.module_count(), 3);
    }

    #[test]
    fn bundle_config_drives_output_location() {
        let dir = project(&[("main.js", "export const ok = true;\n")]);
        let config_path = dir.path().join("skein.toml");
        fs::write(
            &config_path,
            format!(
                "entry = {:?}\n\n[output]\ndir = {:?}\nfilename = \"app.js\"\n",
                dir.path().join("main.js"),
                dir.path().join("build"),
            ),
        )
        .unwrap();

        let config = BundleConfig::load(&config_path).unwrap();
        let graph = build_graph(config.entry.as_deref().unwrap()).unwrap();
        let out = write_bundle(&graph, &config.output.dir, &config.output.filename).unwrap();
        assert!(out.ends_with(Path::new("build/app.js")));
        assert!(out.is_file());
    }
}
