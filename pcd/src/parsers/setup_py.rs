//! Declared dependencies from the literal arguments of a `setup(...)` call.
//!
//! The file is parsed, never executed: only `install_requires=[...]` and
//! `extras_require={...: [...]}` built from string literals are understood.

use super::ManifestParser;
use super::requirements::parse_requirements_contents;
use crate::error::{Error, Result};
use check_deps_core::{DeclaredDependency, DiagnosticSink, Location};
use ruff_python_ast::{self as ast, DictItem, Expr, Stmt};
use ruff_python_parser::parse_module;
use ruff_text_size::Ranged;
use std::collections::VecDeque;

/// The shapes of Python expressions that matter when reading `setup()`
enum Shape<'a> {
    List(&'a [Expr]),
    Mapping(&'a [DictItem]),
    Str(&'a str),
    Call(&'a ast::ExprCall),
    Identifier(&'a str),
    Other,
}

fn classify(expr: &Expr) -> Shape<'_> {
    match expr {
        Expr::List(list) => Shape::List(&list.elts),
        Expr::Dict(dict) => Shape::Mapping(&dict.items),
        Expr::StringLiteral(literal) => Shape::Str(literal.value.to_str()),
        Expr::Call(call) => Shape::Call(call),
        Expr::Name(name) => Shape::Identifier(name.id.as_str()),
        _ => Shape::Other,
    }
}

/// An argument value that is not the literal shape we can read
struct Unparsed {
    source_text: String,
}

impl Unparsed {
    fn new(node: &impl Ranged, source: &str) -> Self {
        Self {
            source_text: source[node.range()].to_string(),
        }
    }
}

/// Strings of a literal list; other elements are ignored
fn literal_string_list(expr: &Expr, source: &str) -> std::result::Result<Vec<String>, Unparsed> {
    let Shape::List(elements) = classify(expr) else {
        return Err(Unparsed::new(expr, source));
    };
    Ok(elements
        .iter()
        .filter_map(|element| match classify(element) {
            Shape::Str(value) => Some(value.to_string()),
            _ => None,
        })
        .collect())
}

/// Statement blocks nested directly inside a compound statement
fn nested_bodies(stmt: &Stmt) -> Vec<&[Stmt]> {
    match stmt {
        Stmt::If(stmt) => {
            let mut bodies = vec![stmt.body.as_slice()];
            bodies.extend(stmt.elif_else_clauses.iter().map(|c| c.body.as_slice()));
            bodies
        }
        Stmt::For(stmt) => vec![stmt.body.as_slice(), stmt.orelse.as_slice()],
        Stmt::While(stmt) => vec![stmt.body.as_slice(), stmt.orelse.as_slice()],
        Stmt::With(stmt) => vec![stmt.body.as_slice()],
        Stmt::Try(stmt) => {
            let handlers = stmt.handlers.iter().map(|handler| match handler {
                ast::ExceptHandler::ExceptHandler(handler) => handler.body.as_slice(),
            });
            std::iter::once(stmt.body.as_slice())
                .chain(handlers)
                .chain([stmt.orelse.as_slice(), stmt.finalbody.as_slice()])
                .collect()
        }
        Stmt::FunctionDef(stmt) => vec![stmt.body.as_slice()],
        Stmt::ClassDef(stmt) => vec![stmt.body.as_slice()],
        Stmt::Match(stmt) => stmt.cases.iter().map(|case| case.body.as_slice()).collect(),
        _ => Vec::new(),
    }
}

/// `setup(...)` calls in breadth-first order, so module-level calls come first
fn find_setup_calls(module: &[Stmt]) -> Vec<&ast::ExprCall> {
    let mut calls = Vec::new();
    let mut queue: VecDeque<&Stmt> = module.iter().collect();

    while let Some(stmt) = queue.pop_front() {
        if let Stmt::Expr(statement) = stmt
            && let Shape::Call(call) = classify(&statement.value)
            && matches!(classify(&call.func), Shape::Identifier("setup"))
        {
            calls.push(call);
            continue;
        }
        queue.extend(nested_bodies(stmt).into_iter().flatten());
    }

    calls
}

/// 1-indexed line containing a byte offset
fn line_at(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Parser for setup.py files
pub struct SetupPyParser;

impl SetupPyParser {
    pub fn new() -> Self {
        Self
    }

    fn warn_unparsed(keyword: &str, unparsed: &Unparsed, sink: &dyn DiagnosticSink) {
        sink.warn(format!(
            "Could not parse contents of `{keyword}`: {}",
            unparsed.source_text
        ));
    }

    /// Requirement strings from an `extras_require` mapping.
    ///
    /// An entry whose value is not a literal list is reported and skipped; the
    /// remaining entries are still read.
    fn extras_require(
        value: &Expr,
        source: &str,
        sink: &dyn DiagnosticSink,
    ) -> std::result::Result<Vec<String>, Unparsed> {
        let Shape::Mapping(items) = classify(value) else {
            return Err(Unparsed::new(value, source));
        };

        let mut requirements = Vec::new();
        for item in items {
            // `**spread` entries have no key
            let parsed = match item.key {
                Some(_) => literal_string_list(&item.value, source),
                None => Err(Unparsed::new(&item.value, source)),
            };
            match parsed {
                Ok(strings) => requirements.extend(strings),
                Err(unparsed) => Self::warn_unparsed("extras_require", &unparsed, sink),
            }
        }
        Ok(requirements)
    }

    fn extract_from_call(
        call: &ast::ExprCall,
        source: &str,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> Vec<DeclaredDependency> {
        let mut dependencies = Vec::new();

        for keyword in &call.arguments.keywords {
            let Some(name) = &keyword.arg else {
                continue;
            };

            let name = name.as_str();
            let requirements = match name {
                "install_requires" => literal_string_list(&keyword.value, source),
                "extras_require" => Self::extras_require(&keyword.value, source, sink),
                _ => continue,
            };

            match requirements {
                Ok(requirements) => {
                    for text in requirements {
                        dependencies.extend(parse_requirements_contents(&text, location, sink));
                    }
                }
                Err(unparsed) => Self::warn_unparsed(name, &unparsed, sink),
            }
        }

        dependencies
    }
}

impl Default for SetupPyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for SetupPyParser {
    fn file_names(&self) -> &'static [&'static str] {
        &["setup.py"]
    }

    fn parse_contents(
        &self,
        text: &str,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<DeclaredDependency>> {
        let parsed = parse_module(text).map_err(|err| Error::PythonSyntax {
            location: Box::new(location.clone()),
            line: line_at(text, usize::from(err.location.start())),
            message: err.error.to_string(),
        })?;

        let calls = find_setup_calls(&parsed.syntax().body);
        let Some(call) = calls.first() else {
            sink.debug(format!("No setup() call found in {location}"));
            return Ok(Vec::new());
        };
        if calls.len() > 1 {
            sink.debug(format!(
                "Using the first setup() call in {location}; ignoring {} later call(s)",
                calls.len() - 1
            ));
        }

        Ok(Self::extract_from_call(call, text, location, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use check_deps_core::{CollectingSink, Level, NullSink};
    use std::path::PathBuf;

    fn parse(text: &str) -> Vec<String> {
        SetupPyParser::new()
            .parse_contents(text, &Location::new("setup.py"), &NullSink)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect()
    }

    #[test]
    fn test_simple_install_requires() {
        let text = r#"from setuptools import setup

setup(
    name="MyLib",
    install_requires=["pandas", "click"]
)
"#;
        assert_eq!(parse(text), vec!["pandas", "click"]);
    }

    #[test]
    fn test_versions_are_stripped() {
        assert_eq!(
            parse(r#"setup(install_requires=["a", "b>=2"])"#),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_location_is_the_file() {
        let deps = SetupPyParser::new()
            .parse_contents(
                r#"setup(install_requires=["pandas"])"#,
                &Location::new("pkg/setup.py"),
                &NullSink,
            )
            .unwrap();
        assert_eq!(
            deps,
            vec![DeclaredDependency::new("pandas", Location::new("pkg/setup.py"))]
        );
    }

    #[test]
    fn test_no_requirements() {
        assert!(parse("from setuptools import setup\n\nsetup(name=\"MyLib\")\n").is_empty());
        assert!(parse("print('no setup here')\n").is_empty());
    }

    #[test]
    fn test_nested_functions_and_computed_arguments() {
        let text = r#"from setuptools import setup

def random_version():
    return 42

setup(
    name="MyLib",
    version=random_version(),
    install_requires=["pandas", "click>=1.2"]
)
"#;
        assert_eq!(parse(text), vec!["pandas", "click"]);
    }

    #[test]
    fn test_only_first_setup_call_is_used() {
        let text = r#"from setuptools import setup

setup(
    name="MyLib",
    install_requires=["pandas", "click>=1.2"]
)

setup(
    name="IncorrectCall",
    install_requires=["foo"]
)
"#;
        assert_eq!(parse(text), vec!["pandas", "click"]);
    }

    #[test]
    fn test_module_level_call_wins_over_nested_call() {
        let text = r#"if False:
    setup(install_requires=["nested"])

setup(install_requires=["toplevel"])
"#;
        assert_eq!(parse(text), vec!["toplevel"]);
    }

    #[test]
    fn test_main_guard_call_is_found() {
        let text = r#"from setuptools import setup

if __name__ == "__main__":
    setup(install_requires=["requests"])
"#;
        assert_eq!(parse(text), vec!["requests"]);
    }

    #[test]
    fn test_extras_require() {
        let text = r#"from setuptools import setup

setup(
    name="MyLib",
    install_requires=["pandas", "click>=1.2"],
    extras_require={
        'annoy': ['annoy==1.15.2'],
        'chinese': ['jieba']
        }
)
"#;
        assert_eq!(parse(text), vec!["pandas", "click", "annoy", "jieba"]);
    }

    #[test]
    fn test_non_literal_install_requires_warns() {
        let sink = CollectingSink::new();
        let deps = SetupPyParser::new()
            .parse_contents(
                "setup(install_requires=compute_deps())\n",
                &Location::new("setup.py"),
                &sink,
            )
            .unwrap();

        assert!(deps.is_empty());
        let warnings = sink.messages_at(Level::WARN);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("install_requires"));
        assert!(warnings[0].contains("compute_deps()"));
    }

    #[test]
    fn test_bad_extras_entry_skips_only_that_entry() {
        let sink = CollectingSink::new();
        let text = r#"setup(
    install_requires=REQUIREMENTS,
    extras_require={
        "fast": FAST_DEPS,
        "docs": ["sphinx"],
    },
)
"#;
        let deps = SetupPyParser::new()
            .parse_contents(text, &Location::new("setup.py"), &sink)
            .unwrap();

        let names: Vec<_> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["sphinx"]);
        let warnings = sink.messages_at(Level::WARN);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("`install_requires`: REQUIREMENTS"));
        assert!(warnings[1].contains("`extras_require`"));
        assert!(warnings[1].contains("FAST_DEPS"));
    }

    #[test]
    fn test_non_mapping_extras_require_warns() {
        let sink = CollectingSink::new();
        let deps = SetupPyParser::new()
            .parse_contents(
                "setup(extras_require=dict(test=['pytest']))\n",
                &Location::new("setup.py"),
                &sink,
            )
            .unwrap();

        assert!(deps.is_empty());
        assert_eq!(sink.messages_at(Level::WARN).len(), 1);
    }

    #[test]
    fn test_non_string_list_elements_are_ignored() {
        assert_eq!(
            parse(r#"setup(install_requires=["pandas", OTHER, f"x{y}", "numpy"])"#),
            vec!["pandas", "numpy"]
        );
    }

    #[test]
    fn test_multiline_string_is_requirements_text() {
        assert_eq!(
            parse("setup(install_requires=['''\npandas\n# comment\nnumpy>=1\n'''])\n"),
            vec!["pandas", "numpy"]
        );
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let result = SetupPyParser::new().parse_contents(
            "setup(install_requires=[\"pandas\"\n",
            &Location::new("setup.py"),
            &NullSink,
        );
        assert!(matches!(result, Err(Error::PythonSyntax { .. })));
    }

    #[test]
    fn test_incomplete_expression_is_fatal() {
        let result = SetupPyParser::new().parse_contents(
            "x = 1 +\nsetup(install_requires=['a'])\n",
            &Location::new("setup.py"),
            &NullSink,
        );
        assert!(matches!(result, Err(Error::PythonSyntax { .. })));
    }

    #[test]
    fn test_python2_print_statement_is_fatal() {
        let result = SetupPyParser::new().parse_contents(
            "print \"hello\"\nsetup(install_requires=['a'])\n",
            &Location::new("setup.py"),
            &NullSink,
        );
        assert!(matches!(result, Err(Error::PythonSyntax { .. })));
    }

    #[test]
    fn test_setup_inside_try_and_function_bodies() {
        let text = r#"try:
    from setuptools import setup
except ImportError:
    from distutils.core import setup

def main():
    setup(install_requires=["requests"])
"#;
        assert_eq!(parse(text), vec!["requests"]);
    }

    #[test]
    fn test_line_at() {
        let source = "a\nbb\nccc\n";
        assert_eq!(line_at(source, 0), 1);
        assert_eq!(line_at(source, 2), 2);
        assert_eq!(line_at(source, 6), 3);
        assert_eq!(line_at(source, 100), 4);
    }

    #[test]
    fn test_can_parse() {
        let parser = SetupPyParser::new();
        assert!(parser.can_parse(&PathBuf::from("setup.py")));
        assert!(parser.can_parse(&PathBuf::from("/path/to/setup.py")));
        assert!(!parser.can_parse(&PathBuf::from("setup.cfg")));
    }
}
