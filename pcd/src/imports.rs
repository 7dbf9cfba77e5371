//! Scan Python source for the third-party packages it imports.

use crate::error::{Error, Result};
use crate::python::{self, named_children, node_text};
use crate::stdlib::is_stdlib;
use check_deps_core::{DiagnosticSink, Location, ParsedImport};
use std::fs;
use std::io::Read;
use std::path::Path;
use tree_sitter::Node;
use walkdir::WalkDir;

/// Imports found in a chunk of Python source.
///
/// Only the top-level package of each import is kept. Relative imports and
/// standard-library modules are dropped. A syntax error is reported as a
/// warning and whatever parsed is still returned.
pub fn parse_code(
    code: &str,
    location: &Location,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<ParsedImport>> {
    let tree = python::parse_source(code, location)?;
    if let Some(line) = python::first_error_line(&tree) {
        sink.warn(format!("Could not fully parse {location}: invalid syntax at line {line}"));
    }

    let mut imports = Vec::new();
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "import_statement" => {
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    push_import(name, code, location, &mut imports);
                }
            }
            "import_from_statement" => {
                if let Some(module) = node.child_by_field_name("module_name") {
                    push_import(module, code, location, &mut imports);
                }
            }
            _ => stack.extend(named_children(node).into_iter().rev()),
        }
    }
    Ok(imports)
}

/// Record the top-level package of a `dotted_name` or `aliased_import`
fn push_import(node: Node<'_>, code: &str, location: &Location, out: &mut Vec<ParsedImport>) {
    let dotted = match node.kind() {
        "dotted_name" => node,
        "aliased_import" => match node.child_by_field_name("name") {
            Some(name) => name,
            None => return,
        },
        // relative_import and anything the grammar recovered oddly
        _ => return,
    };

    let Some(package) = node_text(dotted, code).split('.').next().map(str::trim) else {
        return;
    };
    if package.is_empty() || is_stdlib(package) {
        return;
    }

    let line = node.start_position().row + 1;
    out.push(ParsedImport::new(package, location.clone().with_line(line)));
}

/// Imports in a single Python file
pub fn parse_file(path: &Path, sink: &dyn DiagnosticSink) -> Result<Vec<ParsedImport>> {
    let code = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_code(&code, &Location::new(path), sink)
}

/// Imports in every `*.py` file below `path`
pub fn parse_dir(path: &Path, sink: &dyn DiagnosticSink) -> Result<Vec<ParsedImport>> {
    let mut imports = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let is_python = entry.path().extension().is_some_and(|ext| ext == "py");
        if entry.file_type().is_file() && is_python {
            imports.extend(parse_file(entry.path(), sink)?);
        }
    }
    Ok(imports)
}

/// Imports in a file or, for a directory, in every Python file below it
pub fn parse_path(path: &Path, sink: &dyn DiagnosticSink) -> Result<Vec<ParsedImport>> {
    if path.is_dir() {
        parse_dir(path, sink)
    } else {
        parse_file(path, sink)
    }
}

/// Imports in Python code read to the end of `reader` (usually stdin)
pub fn parse_reader(mut reader: impl Read, sink: &dyn DiagnosticSink) -> Result<Vec<ParsedImport>> {
    let mut code = String::new();
    reader.read_to_string(&mut code).map_err(|source| Error::Io {
        path: "<stdin>".into(),
        source,
    })?;
    parse_code(&code, &Location::stdin(), sink)
}
