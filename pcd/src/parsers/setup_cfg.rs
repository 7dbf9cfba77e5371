use super::ManifestParser;
use super::requirements::parse_requirements_contents;
use crate::error::{Error, Result};
use check_deps_core::{DeclaredDependency, DiagnosticSink, Location};
use configparser::ini::Ini;
use std::collections::HashMap;

type Sections = HashMap<String, HashMap<String, Option<String>>>;

/// Parser for setuptools' declarative setup.cfg files.
///
/// A repeated option keeps its last value instead of failing the file.
pub struct SetupCfgParser;

impl SetupCfgParser {
    pub fn new() -> Self {
        Self
    }

    /// Value of one option, matched case-insensitively within a section
    fn option<'a>(sections: &'a Sections, section: &str, option: &str) -> Option<&'a str> {
        sections
            .get(section)?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(option))
            .and_then(|(_, value)| value.as_deref())
    }

    fn extract_option(
        sections: &Sections,
        section: &str,
        option: &str,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> Vec<DeclaredDependency> {
        match Self::option(sections, section, option) {
            Some(value) => {
                sink.debug(format!("deps found for [{section}] / {option}: {value}"));
                parse_requirements_contents(value, location, sink)
            }
            None => Vec::new(),
        }
    }

    /// Every option of a section holds requirement lines
    fn extract_section(
        sections: &Sections,
        section: &str,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> Vec<DeclaredDependency> {
        let Some(options) = sections.get(section) else {
            return Vec::new();
        };

        let mut dependencies = Vec::new();
        for (option, value) in options {
            if let Some(value) = value {
                sink.debug(format!("deps found for [{section}] / {option}: {value}"));
                dependencies.extend(parse_requirements_contents(value, location, sink));
            }
        }
        dependencies
    }
}

impl Default for SetupCfgParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for SetupCfgParser {
    fn file_names(&self) -> &'static [&'static str] {
        &["setup.cfg"]
    }

    fn parse_contents(
        &self,
        text: &str,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<DeclaredDependency>> {
        let mut config = Ini::new_cs();
        config.set_multiline(true);
        let sections = config
            .read(text.to_string())
            .map_err(|message| Error::Ini {
                location: Box::new(location.clone()),
                message,
            })?;
        let sections: Sections = sections
            .into_iter()
            .map(|(section, options)| (section, options.into_iter().collect()))
            .collect();

        let option = |name: &str| Self::extract_option(&sections, "options", name, location, sink);
        let section = |name: &str| Self::extract_section(&sections, name, location, sink);

        let mut dependencies = option("install_requires");

        // [options] extras_require, and/or a whole [options.extras_require] section
        dependencies.extend(option("extras_require"));
        dependencies.extend(section("options.extras_require"));

        // [options] tests_require, and/or a whole [options.tests_require] section
        dependencies.extend(option("tests_require"));
        dependencies.extend(section("options.tests_require"));

        Ok(dependencies)
    }
}
