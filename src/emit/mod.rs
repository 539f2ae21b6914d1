//! Bundle emission — serializes a finished graph into one
//! self-executing output file.
//!
//! The output embeds the whole graph as a literal table of
//! `id -> { edges, fn }` and wraps it in a minimal synchronous loader.
//! Module bodies are function literals invoked with `require` and
//! `exports` bound as arguments; nothing is eval'd from a string at
//! runtime. The loader caches a module's exports object *before*
//! running its body, so circular requires observe the in-progress
//! exports instead of recursing forever.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{BundleError, Result};
use crate::graph::DependencyGraph;
use crate::parser::transform::js_string;

/// Render the self-executing loader text for a finished graph.
pub fn emit_bundle(graph: &DependencyGraph) -> String {
    let mut table = String::new();
    for record in graph.modules.values() {
        let mut edges = String::new();
        for edge in &record.edges {
            if !edges.is_empty() {
                edges.push_str(", ");
            }
            edges.push_str(&js_string(&edge.specifier));
            edges.push_str(": ");
            edges.push_str(&js_string(&edge.target));
        }
        table.push_str(&format!(
            "  {}: {{\n    edges: {{{edges}}},\n    fn: function (require, exports) {{\n{}\n    }}\n  }},\n",
            js_string(&record.id),
            indent(&record.code, "      "),
        ));
    }

    format!(
        r#"(function (modules) {{
  var cache = {{}};
  function load(id) {{
    var cached = cache[id];
    if (cached) {{
      return cached.exports;
    }}
    var module = {{ exports: {{}} }};
    cache[id] = module;
    function localRequire(specifier) {{
      return load(modules[id].edges[specifier]);
    }}
    modules[id].fn(localRequire, module.exports);
    return module.exports;
  }}
  load({entry});
}})({{
{table}}});
"#,
        entry = js_string(&graph.entry),
    )
}

/// Emit the bundle and write it under `out_dir/filename`.
///
/// Only called with a complete graph; build failures happen earlier
/// and leave no output behind.
pub fn write_bundle(graph: &DependencyGraph, out_dir: &Path, filename: &str) -> Result<PathBuf> {
    let bundle = emit_bundle(graph);
    fs::create_dir_all(out_dir).map_err(|source| BundleError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let out_path = out_dir.join(filename);
    fs::write(&out_path, bundle).map_err(|source| BundleError::Io {
        path: out_path.clone(),
        source,
    })?;
    info!(path = %out_path.display(), "bundle written");
    Ok(out_path)
}

/// Indent every non-empty line of a code block.
fn indent(code: &str, prefix: &str) -> String {
    code.trim_end()
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
