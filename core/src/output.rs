use crate::check::DependencyComparison;
use crate::types::{DeclaredDependency, ParsedImport, UndeclaredDependency, UnusedDependency};
use colored::Colorize;
use serde::Serialize;

/// Everything gathered during one run, ready to be rendered
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub imports: Option<Vec<ParsedImport>>,
    pub declared_deps: Option<Vec<DeclaredDependency>>,
    pub undeclared_deps: Option<Vec<UndeclaredDependency>>,
    pub unused_deps: Option<Vec<UnusedDependency>>,
}

impl Analysis {
    /// Attach a comparison result
    pub fn with_comparison(mut self, comparison: DependencyComparison) -> Self {
        self.undeclared_deps = Some(comparison.undeclared);
        self.unused_deps = Some(comparison.unused);
        self
    }
}

/// Renders an [`Analysis`] for people or for machines
pub struct ReportRenderer {
    show_colors: bool,
    /// Show every occurrence instead of only the names
    details: bool,
}

impl ReportRenderer {
    pub fn new(show_colors: bool, details: bool) -> Self {
        Self {
            show_colors,
            details,
        }
    }

    /// Pretty-printed JSON
    pub fn render_json(&self, analysis: &Analysis) -> serde_json::Result<String> {
        serde_json::to_string_pretty(analysis)
    }

    /// Human-readable listing of whatever parts of the analysis are present
    pub fn render_human(&self, analysis: &Analysis) -> String {
        let mut lines = Vec::new();

        if let Some(imports) = &analysis.imports {
            for import in imports {
                lines.push(format!("{}: {}", import.location, import.name));
            }
        }

        if let Some(declared) = &analysis.declared_deps {
            for dep in declared {
                lines.push(format!("{}: {}", dep.location, dep.name));
            }
        }

        if let Some(undeclared) = &analysis.undeclared_deps
            && !undeclared.is_empty()
        {
            lines.push(self.heading("These imports appear to be undeclared dependencies:"));
            for dep in undeclared {
                lines.push(format!("- {}", self.name(&dep.name)));
                if self.details {
                    for import in &dep.occurrences {
                        lines.push(format!("    imported at: {}", import.location));
                    }
                }
            }
        }

        if let Some(unused) = &analysis.unused_deps
            && !unused.is_empty()
        {
            lines.push(self.heading("These dependencies appear to be unused (i.e. not imported):"));
            for dep in unused {
                lines.push(format!("- {}", self.name(&dep.name)));
                if self.details {
                    for declared in &dep.occurrences {
                        lines.push(format!("    declared in: {}", declared.location));
                    }
                }
            }
        }

        let checked = analysis.undeclared_deps.is_some() || analysis.unused_deps.is_some();
        let clean = analysis.undeclared_deps.as_ref().is_none_or(Vec::is_empty)
            && analysis.unused_deps.as_ref().is_none_or(Vec::is_empty);
        if checked && clean {
            lines.push(self.success("No undeclared or unused dependencies found."));
        }

        lines.into_iter().map(|line| line + "\n").collect()
    }

    /// Print the human-readable report to stdout
    pub fn render(&self, analysis: &Analysis) {
        print!("{}", self.render_human(analysis));
    }

    fn heading(&self, text: &str) -> String {
        if self.show_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn name(&self, name: &str) -> String {
        if self.show_colors {
            name.yellow().to_string()
        } else {
            name.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.show_colors {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }
}
