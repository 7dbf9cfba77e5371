//! Error types for pcd

use check_deps_core::Location;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using pcd Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop extraction of a single file
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Python source that does not parse
    #[error("invalid Python syntax in {location} (line {line}): {message}")]
    PythonSyntax {
        location: Box<Location>,
        line: usize,
        message: String,
    },

    /// TOML document that does not parse
    #[error("failed to parse TOML in {location}: {source}")]
    Toml {
        location: Box<Location>,
        #[source]
        source: Box<toml::de::Error>,
    },

    /// INI document that does not parse
    #[error("failed to parse INI in {location}: {message}")]
    Ini {
        location: Box<Location>,
        message: String,
    },

    /// Directory traversal failed
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// The Python grammar could not be loaded into the parser
    #[error("failed to load Python grammar: {0}")]
    Grammar(String),

    /// The parser gave up without producing a tree
    #[error("Python parser produced no syntax tree for {0}")]
    NoTree(Box<Location>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_stays_small() {
        assert!(std::mem::size_of::<Error>() <= 128);
    }

    #[test]
    fn test_python_syntax_message() {
        let err = Error::PythonSyntax {
            location: Box::new(Location::new("setup.py")),
            line: 3,
            message: "Expected an expression".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid Python syntax in setup.py (line 3): Expected an expression"
        );
    }
}
