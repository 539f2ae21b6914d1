//! ESM → loader-call lowering.
//!
//! Rewrites top-level `import`/`export` statements into `require`/
//! `exports` form by splicing replacement text over the statements'
//! byte ranges; everything else passes through verbatim. The emitted
//! loader binds `require` and `exports` when it invokes the module.

use tree_sitter::Node;

use super::imports::import_source;
use super::ParsedModule;
use crate::error::{BundleError, Result};

/// Lower a parsed module to executable loader-call form.
pub fn to_executable(module: &ParsedModule) -> Result<String> {
    let source = module.source.as_str();
    let bytes = source.as_bytes();
    let root = module.root();

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;

    for i in 0..root.child_count() {
        let Some(child) = root.child(i) else { continue };
        let replacement = match child.kind() {
            "import_statement" => Some(lower_import(module, &child, bytes)?),
            "export_statement" => Some(lower_export(module, &child, bytes)?),
            _ => None,
        };
        if let Some(text) = replacement {
            out.push_str(&source[cursor..child.start_byte()]);
            out.push_str(&text);
            cursor = child.end_byte();
        }
    }
    out.push_str(&source[cursor..]);

    Ok(out)
}

/// Lower one `import` statement to `require` declarations.
fn lower_import(module: &ParsedModule, statement: &Node, source: &[u8]) -> Result<String> {
    let specifier =
        import_source(statement, source).ok_or_else(|| transform_error(module, "import clause"))?;
    let require = format!("require({})", js_string(&specifier));

    let Some(clause) = child_of_kind(statement, "import_clause") else {
        // Side-effect import: `import "./x";`
        return Ok(format!("{require};"));
    };

    let mut pieces = Vec::new();
    for i in 0..clause.child_count() {
        let Some(part) = clause.child(i) else { continue };
        match part.kind() {
            // Default import: `import a from "./x";`
            "identifier" => {
                let name = node_text(module, &part, source)?;
                pieces.push(format!("const {name} = {require}.default;"));
            }
            // Namespace import: `import * as ns from "./x";`
            "namespace_import" => {
                let name = child_of_kind(&part, "identifier")
                    .ok_or_else(|| transform_error(module, "namespace import"))
                    .and_then(|n| node_text(module, &n, source))?;
                pieces.push(format!("const {name} = {require};"));
            }
            // Named imports: `import { a, b as c } from "./x";`
            "named_imports" => {
                let pattern = named_import_pattern(module, &part, source)?;
                pieces.push(format!("const {pattern} = {require};"));
            }
            _ => {}
        }
    }

    if pieces.is_empty() {
        return Ok(format!("{require};"));
    }
    Ok(pieces.join(" "))
}

/// Build the destructuring pattern for a `named_imports` clause.
fn named_import_pattern(module: &ParsedModule, clause: &Node, source: &[u8]) -> Result<String> {
    let mut bindings = Vec::new();
    for i in 0..clause.child_count() {
        let Some(spec) = clause.child(i) else { continue };
        if spec.kind() != "import_specifier" {
            continue;
        }
        let name = spec
            .child_by_field_name("name")
            .ok_or_else(|| transform_error(module, "import specifier"))
            .and_then(|n| node_text(module, &n, source))?;
        match spec.child_by_field_name("alias") {
            Some(alias) => {
                let alias = node_text(module, &alias, source)?;
                bindings.push(format!("{name}: {alias}"));
            }
            None => bindings.push(name),
        }
    }
    Ok(format!("{{ {} }}", bindings.join(", ")))
}

/// Lower one `export` statement to `exports` assignments.
fn lower_export(module: &ParsedModule, statement: &Node, source: &[u8]) -> Result<String> {
    // `export ... from "./x"` re-exports are outside the loader's model.
    if statement.child_by_field_name("source").is_some() {
        return Err(transform_error(module, "re-export"));
    }

    if child_of_kind(statement, "default").is_some() {
        let value = statement
            .child_by_field_name("value")
            .or_else(|| statement.child_by_field_name("declaration"))
            .ok_or_else(|| transform_error(module, "default export"))?;
        let text = node_text(module, &value, source)?;
        // A named declaration stays a declaration so the rest of the
        // module can still reference its binding.
        if let Some(name) = default_declaration_name(module, &value, source)? {
            return Ok(format!("{text} exports.default = {name};"));
        }
        return Ok(format!("exports.default = {text};"));
    }

    if let Some(declaration) = statement.child_by_field_name("declaration") {
        let text = node_text(module, &declaration, source)?;
        let names = declared_names(module, &declaration, source)?;
        let assignments: Vec<String> = names
            .iter()
            .map(|name| format!("exports.{name} = {name};"))
            .collect();
        return Ok(format!("{text} {}", assignments.join(" ")));
    }

    if let Some(clause) = child_of_kind(statement, "export_clause") {
        // `export { a, b as c };`
        let mut assignments = Vec::new();
        for i in 0..clause.child_count() {
            let Some(spec) = clause.child(i) else { continue };
            if spec.kind() != "export_specifier" {
                continue;
            }
            let name = spec
                .child_by_field_name("name")
                .ok_or_else(|| transform_error(module, "export specifier"))
                .and_then(|n| node_text(module, &n, source))?;
            let exported = match spec.child_by_field_name("alias") {
                Some(alias) => node_text(module, &alias, source)?,
                None => name.clone(),
            };
            assignments.push(format!("exports.{exported} = {name};"));
        }
        return Ok(assignments.join(" "));
    }

    Err(transform_error(module, "export statement"))
}

/// The binding name of a default-exported declaration, when it has one.
///
/// `export default function f() {}` must keep `f` declared at module
/// scope; anonymous functions, classes, and plain expressions have no
/// binding and lower to expression form instead.
fn default_declaration_name(
    module: &ParsedModule,
    value: &Node,
    source: &[u8],
) -> Result<Option<String>> {
    match value.kind() {
        "function_declaration" | "generator_function_declaration" | "class_declaration" => {
            match value.child_by_field_name("name") {
                Some(name) => Ok(Some(node_text(module, &name, source)?)),
                None => Ok(None),
            }
        }
        _ => Ok(None),
    }
}

/// Names bound by an exported declaration.
fn declared_names(module: &ParsedModule, declaration: &Node, source: &[u8]) -> Result<Vec<String>> {
    match declaration.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut names = Vec::new();
            for i in 0..declaration.child_count() {
                let Some(declarator) = declaration.child(i) else { continue };
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let name = declarator
                    .child_by_field_name("name")
                    .ok_or_else(|| transform_error(module, "exported declaration"))?;
                if name.kind() != "identifier" {
                    return Err(transform_error(module, "destructuring export"));
                }
                names.push(node_text(module, &name, source)?);
            }
            Ok(names)
        }
        "function_declaration" | "generator_function_declaration" | "class_declaration" => {
            let name = declaration
                .child_by_field_name("name")
                .ok_or_else(|| transform_error(module, "anonymous export"))
                .and_then(|n| node_text(module, &n, source))?;
            Ok(vec![name])
        }
        other => Err(transform_error(module, other)),
    }
}

fn child_of_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find(|c| c.kind() == kind)
}

fn node_text(module: &ParsedModule, node: &Node, source: &[u8]) -> Result<String> {
    node.utf8_text(source)
        .map(|s| s.to_string())
        .map_err(|_| transform_error(module, "non-utf8 span"))
}

fn transform_error(module: &ParsedModule, construct: &str) -> BundleError {
    BundleError::Transform {
        path: module.path.clone(),
        construct: construct.to_string(),
    }
}

/// Escape a string as a JavaScript string literal.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.escape_default()))
}
