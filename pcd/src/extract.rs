//! Find manifest files and extract their declared dependencies.

use crate::error::{Error, Result};
use crate::parsers::{
    ManifestParser, PyProjectParser, RequirementsParser, SetupCfgParser, SetupPyParser,
};
use check_deps_core::{DeclaredDependency, DiagnosticSink};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::vec;
use walkdir::WalkDir;

/// Dispatches manifest files to the parser registered for their file name
pub struct DependencyExtractor {
    parsers: Vec<Box<dyn ManifestParser>>,
}

impl DependencyExtractor {
    /// Extractor with every supported manifest format registered
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(RequirementsParser::new()),
                Box::new(SetupPyParser::new()),
                Box::new(SetupCfgParser::new()),
                Box::new(PyProjectParser::new()),
            ],
        }
    }

    /// The parser registered for this file name, if any
    pub fn parser_for(&self, path: &Path) -> Option<&dyn ManifestParser> {
        self.parsers
            .iter()
            .find(|parser| parser.can_parse(path))
            .map(Box::as_ref)
    }

    /// Extract from one file; an unsupported file name is logged and yields nothing
    pub fn extract_file(
        &self,
        path: &Path,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<DeclaredDependency>> {
        match self.parser_for(path) {
            Some(parser) => {
                sink.debug(format!("Extracting dependencies from {}", path.display()));
                parser.parse(path, sink)
            }
            None => {
                let name = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |name| name.to_string_lossy().into_owned(),
                );
                sink.error(format!("Parsing file {name} is not supported"));
                Ok(Vec::new())
            }
        }
    }

    /// Lazily extract declared dependencies from a file or a directory tree.
    ///
    /// Each manifest is parsed completely before its dependencies are
    /// yielded. A file that fails to parse yields one `Err` and iteration
    /// continues with the next file. No ordering is promised.
    pub fn extract<'a>(
        &'a self,
        path: &Path,
        sink: &'a dyn DiagnosticSink,
    ) -> DeclaredDependencies<'a> {
        let files = if path.is_file() {
            Candidates::Single(Some(path.to_path_buf()))
        } else {
            Candidates::Walk(WalkDir::new(path).sort_by_file_name().into_iter())
        };
        DeclaredDependencies {
            extractor: self,
            sink,
            files,
            pending: Vec::new().into_iter(),
        }
    }

    /// Like [`extract`](Self::extract), but parses manifests in parallel
    pub fn extract_parallel(
        &self,
        path: &Path,
        sink: &dyn DiagnosticSink,
    ) -> Vec<Result<DeclaredDependency>> {
        let files: Vec<Result<PathBuf>> = if path.is_file() {
            vec![Ok(path.to_path_buf())]
        } else {
            WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| self.manifest_entry(entry))
                .collect()
        };

        files
            .into_par_iter()
            .flat_map_iter(|file| match file.and_then(|f| self.extract_file(&f, sink)) {
                Ok(dependencies) => dependencies.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(err) => vec![Err(err)],
            })
            .collect()
    }

    /// Keep walk errors and files with a registered parser
    fn manifest_entry(
        &self,
        entry: std::result::Result<walkdir::DirEntry, walkdir::Error>,
    ) -> Option<Result<PathBuf>> {
        match entry {
            Ok(entry) if entry.file_type().is_file() && self.parser_for(entry.path()).is_some() => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(err) => Some(Err(Error::Walk(err))),
        }
    }
}

impl Default for DependencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

enum Candidates {
    Single(Option<PathBuf>),
    Walk(walkdir::IntoIter),
}

/// Iterator returned by [`DependencyExtractor::extract`]
pub struct DeclaredDependencies<'a> {
    extractor: &'a DependencyExtractor,
    sink: &'a dyn DiagnosticSink,
    files: Candidates,
    pending: vec::IntoIter<DeclaredDependency>,
}

impl DeclaredDependencies<'_> {
    fn next_file(&mut self) -> Option<Result<PathBuf>> {
        let extractor = self.extractor;
        match &mut self.files {
            Candidates::Single(path) => path.take().map(Ok),
            Candidates::Walk(walk) => walk.find_map(|entry| extractor.manifest_entry(entry)),
        }
    }
}

impl Iterator for DeclaredDependencies<'_> {
    type Item = Result<DeclaredDependency>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(dependency) = self.pending.next() {
                return Some(Ok(dependency));
            }

            let path = match self.next_file()? {
                Ok(path) => path,
                Err(err) => return Some(Err(err)),
            };
            match self.extractor.extract_file(&path, self.sink) {
                Ok(dependencies) => self.pending = dependencies.into_iter(),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
