use clap::{ArgAction, ArgGroup, Parser};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Find undeclared and unused Python dependencies
#[derive(Parser, Debug, Clone)]
#[command(name = "pcd")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("action").args(["check", "list_imports", "list_deps"])))]
pub struct Args {
    /// Report undeclared and unused dependencies (default)
    #[arg(long)]
    pub check: bool,

    /// List third-party imports found in the code
    #[arg(long)]
    pub list_imports: bool,

    /// List dependencies declared by manifest files
    #[arg(long)]
    pub list_deps: bool,

    /// Python file or directory to scan for imports, or `-` for stdin
    #[arg(long, value_name = "PATH|-", default_value = ".")]
    pub code: PathBuf,

    /// Manifest file or directory to read declared dependencies from
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub deps: PathBuf,

    /// Dependencies never reported as unused
    #[arg(long, value_name = "NAME", num_args = 1..)]
    pub ignore_unused: Vec<String>,

    /// Imports never reported as undeclared
    #[arg(long, value_name = "NAME", num_args = 1..)]
    pub ignore_undeclared: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Only print names, not where each one was found
    #[arg(long)]
    pub summary: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

/// What the run should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Check,
    ListImports,
    ListDeps,
}

/// Where Python code is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSource<'a> {
    Stdin,
    Path(&'a Path),
}

impl Args {
    pub fn action(&self) -> Action {
        if self.list_imports {
            Action::ListImports
        } else if self.list_deps {
            Action::ListDeps
        } else {
            Action::Check
        }
    }

    pub fn code_source(&self) -> CodeSource<'_> {
        if self.code.as_os_str() == "-" {
            CodeSource::Stdin
        } else {
            CodeSource::Path(&self.code)
        }
    }

    /// Maximum log level; `None` silences logging entirely
    pub fn log_level(&self) -> Option<Level> {
        match i16::from(self.verbose) - i16::from(self.quiet) {
            i16::MIN..=-2 => None,
            -1 => Some(Level::ERROR),
            0 => Some(Level::WARN),
            1 => Some(Level::INFO),
            2 => Some(Level::DEBUG),
            _ => Some(Level::TRACE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pcd").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.action(), Action::Check);
        assert_eq!(args.code_source(), CodeSource::Path(Path::new(".")));
        assert_eq!(args.deps, PathBuf::from("."));
        assert_eq!(args.log_level(), Some(Level::WARN));
    }

    #[test]
    fn test_actions_are_exclusive() {
        assert_eq!(parse(&["--list-deps"]).action(), Action::ListDeps);
        assert_eq!(parse(&["--list-imports"]).action(), Action::ListImports);
        assert!(Args::try_parse_from(["pcd", "--check", "--list-deps"]).is_err());
    }

    #[test]
    fn test_stdin_code() {
        assert_eq!(parse(&["--code", "-"]).code_source(), CodeSource::Stdin);
    }

    #[test]
    fn test_ignore_lists() {
        let args = parse(&["--ignore-unused", "black", "pytest", "--ignore-undeclared", "numpy"]);
        assert_eq!(args.ignore_unused, vec!["black", "pytest"]);
        assert_eq!(args.ignore_undeclared, vec!["numpy"]);
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["-v"]).log_level(), Some(Level::INFO));
        assert_eq!(parse(&["-vv"]).log_level(), Some(Level::DEBUG));
        assert_eq!(parse(&["-q"]).log_level(), Some(Level::ERROR));
        assert_eq!(parse(&["-qq"]).log_level(), None);
        assert!(Args::try_parse_from(["pcd", "-v", "-q"]).is_err());
    }
}
