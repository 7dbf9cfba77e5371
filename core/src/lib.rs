pub mod check;
pub mod diagnostics;
pub mod output;
pub mod types;

// Re-export commonly used types at crate root
pub use check::{DependencyComparison, compare_imports_to_dependencies};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Level, NullSink, TracingSink};
pub use output::{Analysis, ReportRenderer};
pub use types::{
    DeclaredDependency, Location, Origin, ParsedImport, UndeclaredDependency, UnusedDependency,
};
