pub mod cli;
pub mod error;
pub mod extract;
pub mod imports;
pub mod logging;
pub mod parsers;
pub mod python;
pub mod stdlib;

pub use check_deps_core::{
    Analysis, DeclaredDependency, DiagnosticSink, Location, ParsedImport, ReportRenderer,
    TracingSink, compare_imports_to_dependencies,
};
pub use cli::Args;
pub use error::{Error, Result};
pub use extract::DependencyExtractor;
