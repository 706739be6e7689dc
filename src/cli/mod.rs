//! The tablefit command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::io::Write;
use std::path::Path;
use std::process;

use clap::Parser;
use env_logger::Env;

use crate::cli::args::{Command, FitArgs, GlobalArgs};
use crate::config::Config;
use crate::discovery::discover_pages;
use crate::engine::PageRunner;
use crate::errors::FitError;
use crate::fixture::FixtureRegistry;
use crate::naming::QualifiedName;
use crate::err_msg;

pub mod args;
pub mod output;

pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = FitArgs::parse();
    init_logging(args.global.log_filter.as_deref());

    let result = match args.command {
        Command::Name { input, json } => handle_name(&input, json),
        Command::Run { file, json } => handle_run(&args.global, &file, json),
        Command::Test { path } => handle_test(&args.global, &path),
        Command::ListFixtures => handle_list_fixtures(&args.global),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            output::print_error(e);
            process::exit(2);
        }
    }
}

pub fn init_logging(cli_filter: Option<&str>) {
    let env = Env::default().default_filter_or(DEFAULT_LOG_FILTER);
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(filter) = cli_filter {
        builder.parse_filters(filter);
    }
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{:<5} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    });
    // A second init (e.g. from tests) is harmless.
    let _ = builder.try_init();
}

// ============================================================================
// COMMAND HANDLERS - each returns whether the command succeeded
// ============================================================================

fn handle_name(input: &str, json: bool) -> Result<bool, FitError> {
    let parts = QualifiedName::new(input).parts();
    if json {
        let text = serde_json::to_string_pretty(&parts)
            .map_err(|e| err_msg!(Internal, "Failed to encode name: {}", e).with_cause(e))?;
        println!("{}", text);
    } else {
        output::print_name(&mut output::stdout(), &parts).map_err(stdout_error)?;
    }
    Ok(true)
}

fn handle_run(global: &GlobalArgs, file: &Path, json: bool) -> Result<bool, FitError> {
    let (config, registry) = load(global)?;
    let report = PageRunner::new(&registry)
        .with_imports(&config.imports)
        .run_file(file)?;

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| err_msg!(Internal, "Failed to encode report: {}", e).with_cause(e))?;
        println!("{}", text);
    } else {
        output::print_page(&mut output::stdout(), &report).map_err(stdout_error)?;
    }

    let success = report.is_success();
    output::print_diagnostics(report);
    Ok(success)
}

fn handle_test(global: &GlobalArgs, path: &Path) -> Result<bool, FitError> {
    let (config, registry) = load(global)?;
    let pages = discover_pages(path, &config.extensions)?;
    if pages.is_empty() {
        println!("No pages found under {}", path.display());
        return Ok(true);
    }
    println!("Found {} page(s)", pages.len());

    let runner = PageRunner::new(&registry).with_imports(&config.imports);
    let mut summary = Vec::with_capacity(pages.len());
    for page in &pages {
        match runner.run_file(page) {
            Ok(report) => {
                summary.push((report.name.clone(), report.counts));
                output::print_diagnostics(report);
            }
            Err(e) => {
                let counts = crate::fixture::Counts {
                    exceptions: 1,
                    ..Default::default()
                };
                summary.push((page.display().to_string(), counts));
                output::print_error(e);
            }
        }
    }

    output::print_summary(&mut output::stdout(), &summary).map_err(stdout_error)?;
    Ok(summary.iter().all(|(_, counts)| counts.is_success()))
}

fn handle_list_fixtures(global: &GlobalArgs) -> Result<bool, FitError> {
    let (_, registry) = load(global)?;
    let names = registry.names();
    if names.is_empty() {
        println!("  No fixtures registered.");
    }
    for name in names {
        println!("  {}", name);
    }
    Ok(true)
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn load(global: &GlobalArgs) -> Result<(Config, FixtureRegistry), FitError> {
    let config = Config::load_or_default(global.config.as_deref())?
        .with_imports(global.imports.iter().cloned())?;
    let registry = config.registry()?;
    Ok((config, registry))
}

fn stdout_error(e: std::io::Error) -> FitError {
    err_msg!(Io, "Failed to write to stdout").with_cause(e)
}
