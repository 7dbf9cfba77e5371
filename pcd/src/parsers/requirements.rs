use super::ManifestParser;
use super::requirement::parse_requirement;
use crate::error::Result;
use check_deps_core::{DeclaredDependency, DiagnosticSink, Location};

/// Parser for requirements.txt / requirements.in files
pub struct RequirementsParser;

impl RequirementsParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RequirementsParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Join physical lines ending in `\` into logical lines
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for physical in text.lines() {
        if let Some(continued) = physical.strip_suffix('\\') {
            current.push_str(continued);
            continue;
        }
        current.push_str(physical);
        lines.push(std::mem::take(&mut current));
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Remove a `#` comment that starts the line or follows whitespace
fn strip_comment(line: &str) -> &str {
    for (idx, c) in line.char_indices() {
        if c == '#' && (idx == 0 || line[..idx].ends_with(char::is_whitespace)) {
            return &line[..idx];
        }
    }
    line
}

/// Extract dependencies from text in requirements-file format.
///
/// Blank lines, comments and option lines (`-r other.txt`, `--index-url ...`,
/// `-e .`) are skipped. Lines that are not valid specifiers are skipped too
/// and reported at debug level. All results share `location`.
pub fn parse_requirements_contents(
    text: &str,
    location: &Location,
    sink: &dyn DiagnosticSink,
) -> Vec<DeclaredDependency> {
    let mut dependencies = Vec::new();

    for line in logical_lines(text) {
        let line = strip_comment(&line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('-') {
            sink.debug(format!("Skipping requirements option in {location}: {line}"));
            continue;
        }

        match parse_requirement(line) {
            Some(name) => dependencies.push(DeclaredDependency::new(name, location.clone())),
            None => sink.debug(format!("Skipping unparsable requirement in {location}: {line}")),
        }
    }

    dependencies
}

impl ManifestParser for RequirementsParser {
    fn file_names(&self) -> &'static [&'static str] {
        &["requirements.txt", "requirements.in"]
    }

    fn parse_contents(
        &self,
        text: &str,
        location: &Location,
        sink: &dyn DiagnosticSink,
    ) -> Result<Vec<DeclaredDependency>> {
        Ok(parse_requirements_contents(text, location, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use check_deps_core::{CollectingSink, Level, NullSink};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn names(deps: &[DeclaredDependency]) -> Vec<&str> {
        deps.iter().map(|d| d.name.as_str()).collect()
    }

    fn parse(text: &str) -> Vec<DeclaredDependency> {
        parse_requirements_contents(text, &Location::new("requirements.txt"), &NullSink)
    }

    #[test]
    fn test_parse_simple_requirements() {
        let deps = parse("pandas\nclick\n");
        assert_eq!(names(&deps), vec!["pandas", "click"]);
        let expected = Location::new("requirements.txt");
        assert!(deps.iter().all(|d| d.location == expected));
    }

    #[test]
    fn test_parse_strips_versions_and_comments() {
        let deps = parse("pandas\nnumpy>=1.0\n# comment\n");
        assert_eq!(names(&deps), vec!["pandas", "numpy"]);

        let deps = parse("pandas\n\nclick >=1.2\n");
        assert_eq!(names(&deps), vec!["pandas", "click"]);
    }

    #[test]
    fn test_parse_with_inline_comments_and_markers() {
        let deps = parse(
            "requests==2.28.0  # inline comment\n\
             dataclasses>=0.6; python_version < '3.7'\n\
             Typing_Extensions>=3.7\n",
        );
        assert_eq!(
            names(&deps),
            vec!["requests", "dataclasses", "typing-extensions"]
        );
    }

    #[test]
    fn test_parse_with_extras() {
        let deps = parse("requests[security]>=2.0.0\ncelery[redis,msgpack]==5.2.0\n");
        assert_eq!(names(&deps), vec!["requests", "celery"]);
    }

    #[test]
    fn test_parse_skip_directives() {
        let deps = parse(
            "--index-url https://pypi.org/simple\n\
             -r requirements-dev.txt\n\
             -e .\n\
             -c constraints.txt\n\
             requests==2.28.0\n",
        );
        assert_eq!(names(&deps), vec!["requests"]);
    }

    #[test]
    fn test_parse_requirement_with_options() {
        let deps = parse(
            "pkg --install-option=\"--prefix=/x\"\n\
             numpy==1.24 \\\n    --hash=sha256:abcdef\n",
        );
        assert_eq!(names(&deps), vec!["pkg", "numpy"]);
    }

    #[test]
    fn test_parse_line_continuation() {
        let deps = parse("django>=2.0,\\\n    <3.0\nflask\n");
        assert_eq!(names(&deps), vec!["django", "flask"]);
    }

    #[test]
    fn test_malformed_lines_are_skipped_and_logged() {
        let sink = CollectingSink::new();
        let deps = parse_requirements_contents(
            "pandas\nthis is not a requirement\nnumpy\n",
            &Location::new("requirements.txt"),
            &sink,
        );

        assert_eq!(names(&deps), vec!["pandas", "numpy"]);
        let debug = sink.messages_at(Level::DEBUG);
        assert_eq!(debug.len(), 1);
        assert!(debug[0].contains("this is not a requirement"));
    }

    #[test]
    fn test_hash_inside_url_is_not_a_comment() {
        assert_eq!(
            strip_comment("pkg @ https://x/y#egg=pkg"),
            "pkg @ https://x/y#egg=pkg"
        );
        assert_eq!(strip_comment("pkg # note"), "pkg ");
        assert_eq!(strip_comment("# note"), "");
    }

    #[test]
    fn test_parse_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.in");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "requests==2.28.0").unwrap();
        writeln!(file, "numpy>=1.24.0").unwrap();
        drop(file);

        let parser = RequirementsParser::new();
        let deps = parser.parse(&path, &NullSink).unwrap();

        assert_eq!(names(&deps), vec!["requests", "numpy"]);
        assert_eq!(deps[0].location, Location::new(&path));
    }

    #[test]
    fn test_can_parse() {
        let parser = RequirementsParser::new();
        assert!(parser.can_parse(&PathBuf::from("requirements.txt")));
        assert!(parser.can_parse(&PathBuf::from("/path/to/requirements.in")));
        assert!(!parser.can_parse(&PathBuf::from("requirements-dev.txt")));
        assert!(!parser.can_parse(&PathBuf::from("pyproject.toml")));
        assert!(!parser.can_parse(&PathBuf::from("setup.py")));
    }
}
