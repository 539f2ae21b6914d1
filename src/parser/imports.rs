//! Static import extraction via AST traversal.
//!
//! Only unconditional, top-level `import` declarations count as edges.
//! Dynamic `import()` calls and re-export clauses are not collected;
//! modules using them get an incomplete edge list rather than an error.

use tree_sitter::Node;

use super::ParsedModule;

/// One static import as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport {
    /// The literal module specifier, e.g. `./b` or `../lib/util.js`.
    pub specifier: String,
    /// Line number of the import statement (1-indexed).
    pub line: usize,
}

/// Collect every top-level static import specifier, in source order.
///
/// Duplicate specifiers are returned as written; the graph builder
/// treats repeats as idempotent edge inserts.
pub fn extract_imports(module: &ParsedModule) -> Vec<RawImport> {
    let root = module.root();
    let source = module.source.as_bytes();
    let mut imports = Vec::new();

    for i in 0..root.child_count() {
        let Some(child) = root.child(i) else { continue };
        if child.kind() != "import_statement" {
            continue;
        }
        if let Some(specifier) = import_source(&child, source) {
            imports.push(RawImport {
                specifier,
                line: child.start_position().row + 1,
            });
        }
    }

    imports
}

/// Read the string literal out of an import statement's `source` field.
pub(super) fn import_source(statement: &Node, source: &[u8]) -> Option<String> {
    let node = statement.child_by_field_name("source")?;
    let text = node.utf8_text(source).ok()?;
    Some(unquote(text))
}

/// Strip the surrounding quote characters from a string literal.
fn unquote(literal: &str) -> String {
    literal
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use std::path::PathBuf;

    fn imports_of(source: &str) -> Vec<RawImport> {
        let module = parse_source(&PathBuf::from("test.js"), source.to_string()).unwrap();
        extract_imports(&module)
    }

    #[test]
    fn collects_specifiers_in_source_order() {
        let imports = imports_of(
            "import { a } from './a';\nimport b from \"./b\";\nimport './side-effect';\n",
        );
        let specifiers: Vec<&str> = imports.iter().map(|i| i.specifier.as_str()).collect();
        assert_eq!(specifiers, vec!["./a", "./b", "./side-effect"]);
        assert_eq!(imports[1].line, 2);
    }

    #[test]
    fn duplicates_are_preserved_for_the_builder() {
        let imports = imports_of("import { a } from './a';\nimport { b } from './a';\n");
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].specifier, imports[1].specifier);
    }

    #[test]
    fn dynamic_import_is_not_an_edge() {
        let imports = imports_of("const m = import('./lazy');\n");
        assert!(imports.is_empty());
    }

    #[test]
    fn module_without_imports_yields_empty_list() {
        let imports = imports_of("export const x = 1;\n");
        assert!(imports.is_empty());
    }
}
