use super::ManifestParser;
use super::requirement::canonical_name;
use super::requirements::parse_requirements_contents;
use crate::error::{Error, Result};
use check_deps_core::{DeclaredDependency, DiagnosticSink, Location};
use std::fmt;
use toml::{Table, Value};

/// Why a single pyproject field produced no dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field (or one of its parents) does not exist
    Missing { field: String },
    /// The field exists but has the wrong TOML type
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Missing { field } => write!(f, "`{field}` is not present"),
            FieldError::WrongType {
                field,
                expected,
                found,
            } => write!(f, "`{field}` is {found}, expected {expected}"),
        }
    }
}

type FieldResult<T> = std::result::Result<T, FieldError>;

/// Walk `path` down from `table`; absence is a value, not a failure
fn lookup<'a>(table: &'a Table, prefix: &str, path: &[&str]) -> FieldResult<&'a Value> {
    let mut field = prefix.to_string();
    let mut current = table;
    let mut value = None;

    for (idx, key) in path.iter().enumerate() {
        if !field.is_empty() {
            field.push('.');
        }
        field.push_str(key);

        let found = current
            .get(*key)
            .ok_or_else(|| FieldError::Missing { field: field.clone() })?;
        if idx + 1 < path.len() {
            current = as_table(found, &field)?;
        }
        value = Some(found);
    }

    value.ok_or(FieldError::Missing { field })
}

fn as_table<'a>(value: &'a Value, field: &str) -> FieldResult<&'a Table> {
    value.as_table().ok_or_else(|| FieldError::WrongType {
        field: field.to_string(),
        expected: "table",
        found: value.type_str(),
    })
}

fn as_array<'a>(value: &'a Value, field: &str) -> FieldResult<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| FieldError::WrongType {
        field: field.to_string(),
        expected: "array",
        found: value.type_str(),
    })
}

fn as_str<'a>(value: &'a Value, field: &str) -> FieldResult<&'a str> {
    value.as_str().ok_or_else(|| FieldError::WrongType {
        field: field.to_string(),
        expected: "string",
        found: value.type_str(),
    })
}

/// Parse every element of an array of requirement strings.
///
/// A non-string element fails the whole field.
fn requirement_array(
    value: &Value,
    field: &str,
    location: &Location,
    sink: &dyn DiagnosticSink,
) -> FieldResult<Vec<DeclaredDependency>> {
    let mut dependencies = Vec::new();
    for (idx, element) in as_array(value, field)?.iter().enumerate() {
        let requirement = as_str(element, &format!("{field}[{idx}]"))?;
        dependencies.extend(parse_requirements_contents(requirement, location, sink));
    }
    Ok(dependencies)
}

/// Keys of a Poetry dependency table, minus the `python` pseudo-dependency
fn poetry_table_keys(
    value: &Value,
    field: &str,
    location: &Location,
) -> FieldResult<Vec<DeclaredDependency>> {
    Ok(as_table(value, field)?
        .keys()
        .filter(|name| name.as_str() != "python")
        .map(|name| DeclaredDependency::new(canonical_name(name), location.clone()))
        .collect())
}

/// Parser for pyproject.toml files (PEP 621 and Poetry)
pub struct PyProjectParser;

impl PyProjectParser {
    pub fn new() -> Self {
        Self
    }

    /// Keep the dependencies of a field that parsed, report one that did not
    fn report(
        result: FieldResult<Vec<DeclaredDependency>>,
        schema: &str,
        field_type: &str,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> Vec<DeclaredDependency> {
        match result {
            Ok(dependencies) => dependencies,
            Err(err @ FieldError::Missing { .. }) => {
                sink.debug(format!(
                    "Failed to find {schema} {field_type} dependencies in {location}: {err}"
                ));
                Vec::new()
            }
            Err(err @ FieldError::WrongType { .. }) => {
                sink.error(format!(
                    "Failed to parse {schema} {field_type} dependencies in {location}: {err}"
                ));
                Vec::new()
            }
        }
    }

    /// `[project] dependencies`
    fn pep621_main(
        document: &Table,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> FieldResult<Vec<DeclaredDependency>> {
        let value = lookup(document, "", &["project", "dependencies"])?;
        requirement_array(value, "project.dependencies", location, sink)
    }

    /// `[project.optional-dependencies]`
    fn pep621_optional(
        document: &Table,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> FieldResult<Vec<DeclaredDependency>> {
        let field = "project.optional-dependencies";
        let groups = as_table(
            lookup(document, "", &["project", "optional-dependencies"])?,
            field,
        )?;

        let mut dependencies = Vec::new();
        for (group, requirements) in groups {
            dependencies.extend(requirement_array(
                requirements,
                &format!("{field}.{group}"),
                location,
                sink,
            )?);
        }
        Ok(dependencies)
    }

    /// `[tool.poetry.dependencies]`
    fn poetry_main(poetry: &Table, location: &Location) -> FieldResult<Vec<DeclaredDependency>> {
        let value = lookup(poetry, "tool.poetry", &["dependencies"])?;
        poetry_table_keys(value, "tool.poetry.dependencies", location)
    }

    /// `[tool.poetry.group.<name>.dependencies]`
    fn poetry_groups(
        poetry: &Table,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> FieldResult<Vec<DeclaredDependency>> {
        let groups = as_table(
            lookup(poetry, "tool.poetry", &["group"])?,
            "tool.poetry.group",
        )?;

        let mut dependencies = Vec::new();
        for (name, group) in groups {
            let prefix = format!("tool.poetry.group.{name}");
            let group = as_table(group, &prefix)?;
            match lookup(group, &prefix, &["dependencies"]) {
                Ok(value) => dependencies.extend(poetry_table_keys(
                    value,
                    &format!("{prefix}.dependencies"),
                    location,
                )?),
                Err(err @ FieldError::Missing { .. }) => {
                    sink.debug(format!("Skipping Poetry group in {location}: {err}"));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(dependencies)
    }

    /// `[tool.poetry.extras]`
    fn poetry_extras(
        poetry: &Table,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> FieldResult<Vec<DeclaredDependency>> {
        let extras = as_table(
            lookup(poetry, "tool.poetry", &["extras"])?,
            "tool.poetry.extras",
        )?;

        let mut dependencies = Vec::new();
        for (extra, requirements) in extras {
            dependencies.extend(requirement_array(
                requirements,
                &format!("tool.poetry.extras.{extra}"),
                location,
                sink,
            )?);
        }
        Ok(dependencies)
    }
}

impl Default for PyProjectParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for PyProjectParser {
    fn file_names(&self) -> &'static [&'static str] {
        &["pyproject.toml"]
    }

    fn parse_contents(
        &self,
        text: &str,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<DeclaredDependency>> {
        let document: Table = toml::from_str(text).map_err(|source| Error::Toml {
            location: Box::new(location.clone()),
            source: Box::new(source),
        })?;

        let mut dependencies = Vec::new();

        // PEP 621
        let main = Self::pep621_main(&document, location, sink);
        dependencies.extend(Self::report(main, "PEP621", "main", location, sink));
        let optional = Self::pep621_optional(&document, location, sink);
        dependencies.extend(Self::report(optional, "PEP621", "optional", location, sink));

        // Poetry
        let poetry = lookup(&document, "", &["tool", "poetry"])
            .and_then(|value| as_table(value, "tool.poetry"));
        match poetry {
            Ok(poetry) => {
                let main = Self::poetry_main(poetry, location);
                dependencies.extend(Self::report(main, "Poetry", "main", location, sink));
                let groups = Self::poetry_groups(poetry, location, sink);
                dependencies.extend(Self::report(groups, "Poetry", "group", location, sink));
                let extras = Self::poetry_extras(poetry, location, sink);
                dependencies.extend(Self::report(extras, "Poetry", "extra", location, sink));
            }
            Err(FieldError::Missing { .. }) => {
                sink.debug(format!("{location} does not contain [tool.poetry]"));
            }
            Err(err) => {
                sink.error(format!("Failed to parse Poetry dependencies in {location}: {err}"));
            }
        }

        Ok(dependencies)
    }
}
