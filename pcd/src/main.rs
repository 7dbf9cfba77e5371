use anyhow::{Context, Result};
use check_deps_core::{
    Analysis, DeclaredDependency, DependencyComparison, ParsedImport, ReportRenderer,
    TracingSink, compare_imports_to_dependencies,
};
use clap::Parser;
use colored::Colorize;
use std::collections::HashSet;
use std::io::{self, IsTerminal};
use std::process::ExitCode;

use pcd::cli::{Action, Args, CodeSource};
use pcd::extract::DependencyExtractor;
use pcd::imports;
use pcd::logging::init_tracing;

const EXIT_UNDECLARED: u8 = 3;
const EXIT_UNUSED: u8 = 4;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = init_tracing(args.log_level()) {
        eprintln!("Failed to initialise logging: {err:#}");
    }
    if args.no_color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut analysis = Analysis::default();
    let mut comparison = None;

    match args.action() {
        Action::ListImports => analysis.imports = Some(scan_imports(args)?),
        Action::ListDeps => analysis.declared_deps = Some(extract_declared(args)?),
        Action::Check => {
            let imports = scan_imports(args)?;
            let declared = extract_declared(args)?;
            let ignored_unused: HashSet<String> = args.ignore_unused.iter().cloned().collect();
            let ignored_undeclared: HashSet<String> =
                args.ignore_undeclared.iter().cloned().collect();

            let result = compare_imports_to_dependencies(
                &imports,
                &declared,
                &ignored_unused,
                &ignored_undeclared,
            );
            tracing::info!(
                "{} undeclared, {} unused",
                result.undeclared.len(),
                result.unused.len()
            );
            analysis.imports = Some(imports);
            analysis.declared_deps = Some(declared);
            comparison = Some(result);
        }
    }

    let exit_code = comparison.as_ref().map_or(0, exit_status);
    if let Some(result) = comparison {
        analysis = analysis.with_comparison(result);
        if !args.json {
            // Imports and declarations are only listed by the list actions
            analysis.imports = None;
            analysis.declared_deps = None;
        }
    }

    let renderer = ReportRenderer::new(!args.no_color, !args.summary);
    if args.json {
        let json = renderer
            .render_json(&analysis)
            .context("Failed to serialise report")?;
        println!("{json}");
    } else {
        renderer.render(&analysis);
    }

    Ok(ExitCode::from(exit_code))
}

fn exit_status(comparison: &DependencyComparison) -> u8 {
    if !comparison.undeclared.is_empty() {
        EXIT_UNDECLARED
    } else if !comparison.unused.is_empty() {
        EXIT_UNUSED
    } else {
        0
    }
}

fn scan_imports(args: &Args) -> Result<Vec<ParsedImport>> {
    let sink = TracingSink;
    match args.code_source() {
        CodeSource::Stdin => imports::parse_reader(io::stdin().lock(), &sink)
            .context("Failed to read code from stdin"),
        CodeSource::Path(path) => {
            if !path.exists() {
                anyhow::bail!("Code path does not exist: {}", path.display());
            }
            imports::parse_path(path, &sink)
                .with_context(|| format!("Failed to scan imports in {}", path.display()))
        }
    }
}

fn extract_declared(args: &Args) -> Result<Vec<DeclaredDependency>> {
    if !args.deps.exists() {
        anyhow::bail!("Dependencies path does not exist: {}", args.deps.display());
    }

    let extractor = DependencyExtractor::new();
    let sink = TracingSink;
    let mut declared = Vec::new();
    // A broken manifest only loses its own dependencies
    for result in extractor.extract_parallel(&args.deps, &sink) {
        match result {
            Ok(dependency) => declared.push(dependency),
            Err(err) => tracing::error!("Skipping manifest: {err}"),
        }
    }
    Ok(declared)
}
