pub mod pyproject;
pub mod requirement;
pub mod requirements;
pub mod setup_cfg;
pub mod setup_py;

pub use pyproject::PyProjectParser;
pub use requirement::{canonical_name, parse_requirement};
pub use requirements::{RequirementsParser, parse_requirements_contents};
pub use setup_cfg::SetupCfgParser;
pub use setup_py::SetupPyParser;

use crate::error::{Error, Result};
use check_deps_core::{DeclaredDependency, DiagnosticSink, Location};
use std::fs;
use std::path::Path;

/// Trait for manifest file parsers
pub trait ManifestParser: Send + Sync {
    /// Exact file names this parser handles
    fn file_names(&self) -> &'static [&'static str];

    /// Extract declared dependencies from the text of a manifest.
    ///
    /// Every returned dependency carries `location`. Recoverable problems are
    /// reported to `sink`; only whole-file syntax errors are returned.
    fn parse_contents(
        &self,
        text: &str,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<DeclaredDependency>>;

    /// Check if this parser can handle the given file
    fn can_parse(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.file_names().contains(&n))
    }

    /// Read a manifest from disk and extract its declared dependencies
    fn parse(&self, path: &Path, sink: &dyn DiagnosticSink) -> Result<Vec<DeclaredDependency>> {
        // The file handle is closed before parsing starts
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_contents(&text, &Location::new(path), sink)
    }
}
