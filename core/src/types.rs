use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a name was read from: a real file or a synthetic source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// A file on disk
    File(PathBuf),
    /// Text piped in on standard input
    Stdin,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::File(path) => write!(f, "{}", path.display()),
            Origin::Stdin => write!(f, "<stdin>"),
        }
    }
}

impl Serialize for Origin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pointer to where a name was found (file plus optional 1-indexed line)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub path: Origin,
    #[serde(rename = "lineno", skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Origin::File(path.into()),
            line: None,
        }
    }

    pub fn stdin() -> Self {
        Self {
            path: Origin::Stdin,
            line: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// The file path, if this location refers to a file
    pub fn file(&self) -> Option<&Path> {
        match &self.path {
            Origin::File(path) => Some(path),
            Origin::Stdin => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.path),
            None => write!(f, "{}", self.path),
        }
    }
}

/// A dependency name declared by a manifest file (one per textual occurrence)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeclaredDependency {
    /// Canonical package name (lowercase)
    pub name: String,
    pub location: Location,
}

impl DeclaredDependency {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// A module name imported by source code (one per import statement)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParsedImport {
    /// Module name as written in the source
    pub name: String,
    pub location: Location,
}

impl ParsedImport {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// An imported name with no matching declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndeclaredDependency {
    pub name: String,
    /// Every import of this name, in input order
    pub occurrences: Vec<ParsedImport>,
}

/// A declared dependency that is never imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedDependency {
    pub name: String,
    /// Every declaration of this name, in input order
    pub occurrences: Vec<DeclaredDependency>,
}
