//! Source analysis — the tree-sitter boundary.
//!
//! Wraps the external parser behind two operations the graph builder
//! needs: parse a module into a syntax tree, and lower that tree to
//! code a loader can execute. Import extraction lives in [`imports`],
//! the ESM lowering in [`transform`].

pub mod imports;
pub mod transform;

use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

use crate::error::{BundleError, Result};

pub use imports::{extract_imports, RawImport};
pub use transform::to_executable;

/// A parsed module: the source text plus its syntax tree.
///
/// The tree is only needed between parsing and extraction/lowering;
/// the graph keeps just the edges and lowered code.
#[derive(Debug)]
pub struct ParsedModule {
    /// Path the source was read from (diagnostics only).
    pub path: PathBuf,
    /// Original UTF-8 source text.
    pub source: String,
    tree: Tree,
}

impl ParsedModule {
    /// Root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// Read and parse the module at `path`.
pub fn parse_file(path: &Path) -> Result<ParsedModule> {
    let source = fs::read_to_string(path).map_err(|source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_source(path, source)
}

/// Parse already-loaded source text as a module-scoped program.
pub fn parse_source(path: &Path, source: String) -> Result<ParsedModule> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|e| BundleError::Parse {
            path: path.to_path_buf(),
            message: format!("grammar load failed: {e}"),
        })?;

    let tree = parser
        .parse(&source, None)
        .ok_or_else(|| BundleError::Parse {
            path: path.to_path_buf(),
            message: "parser produced no tree".to_string(),
        })?;

    if tree.root_node().has_error() {
        let (line, column) = first_error_position(tree.root_node());
        return Err(BundleError::Parse {
            path: path.to_path_buf(),
            message: format!("syntax error at line {line}, column {column}"),
        });
    }

    Ok(ParsedModule {
        path: path.to_path_buf(),
        source,
        tree,
    })
}

/// Locate the first error or missing node (1-indexed line/column).
fn first_error_position(node: Node) -> (usize, usize) {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return (pos.row + 1, pos.column + 1);
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.has_error() {
                return first_error_position(child);
            }
        }
    }
    let pos = node.start_position();
    (pos.row + 1, pos.column + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parses_valid_module() {
        let path = PathBuf::from("a.js");
        let module = parse_source(&path, "import { x } from './b';\nconsole.log(x);\n".into())
            .expect("valid module should parse");
        assert_eq!(module.root().kind(), "program");
    }

    #[test]
    fn reports_syntax_error_with_position() {
        let path = PathBuf::from("bad.js");
        let err = parse_source(&path, "const = ;\n".into()).unwrap_err();
        match err {
            BundleError::Parse { path, message } => {
                assert_eq!(path, PathBuf::from("bad.js"));
                assert!(message.contains("line"), "message was: {message}");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_file(Path::new("no/such/file.js")).unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }
}
