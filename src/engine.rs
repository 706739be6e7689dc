//! Page runner.
//!
//! Walks a page's tables in order. `|import|` tables extend the namespaces
//! used to complete short fixture names; every other table is resolved to a
//! fixture and checked. A failing table is recorded as an exception and the
//! page carries on, so one bad table never hides the results of the rest.

use std::path::Path;

use serde::Serialize;

use crate::err_ctx;
use crate::err_msg;
use crate::errors::FitError;
use crate::fixture::{check_rows, Counts, FixtureRegistry, TableReport};
use crate::naming::QualifiedName;
use crate::table::{self, Page, Table};

const IMPORT_DIRECTIVE: &str = "import";

/// Outcome of running one page.
#[derive(Debug, Serialize)]
pub struct PageReport {
    pub name: String,
    pub tables: Vec<TableReport>,
    pub counts: Counts,
}

impl PageReport {
    pub fn is_success(&self) -> bool {
        self.counts.is_success()
    }

    /// Every diagnostic raised while running the page, in table order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &FitError> {
        self.tables.iter().flat_map(|t| t.diagnostics.iter())
    }
}

pub struct PageRunner<'r> {
    registry: &'r FixtureRegistry,
    imports: Vec<String>,
}

impl<'r> PageRunner<'r> {
    pub fn new(registry: &'r FixtureRegistry) -> Self {
        Self {
            registry,
            imports: Vec::new(),
        }
    }

    /// Seeds the import list every page starts from.
    pub fn with_imports(mut self, imports: &[String]) -> Self {
        self.imports = imports.to_vec();
        self
    }

    pub fn run_file(&self, path: &Path) -> Result<PageReport, FitError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            err_msg!(Io, "Failed to read page '{}'", path.display()).with_cause(e)
        })?;
        self.run_source(&source, &path.display().to_string())
    }

    /// Parses and runs a page. Only a parse failure fails the whole page.
    pub fn run_source(&self, source: &str, name: &str) -> Result<PageReport, FitError> {
        let page = table::parse(source, name)?;
        Ok(self.run_page(&page))
    }

    pub fn run_page(&self, page: &Page) -> PageReport {
        let mut imports = self.imports.clone();
        let mut report = PageReport {
            name: page.name.clone(),
            tables: Vec::new(),
            counts: Counts::default(),
        };

        for table in &page.tables {
            let table_report = if table.heading().eq_ignore_ascii_case(IMPORT_DIRECTIVE) {
                apply_imports(table, page, &mut imports)
            } else {
                self.check_table(table, page, &imports)
            };
            report.counts.tally(&table_report.counts);
            report.tables.push(table_report);
        }

        log::info!("{}: {}", page.name, report.counts);
        report
    }

    fn check_table(&self, table: &Table, page: &Page, imports: &[String]) -> TableReport {
        let heading = table.heading();
        let result = self
            .registry
            .resolve(heading, imports)
            .map_err(|e| e.located(&page.source, table.heading_span()))
            .and_then(|(name, fixture)| {
                log::debug!("checking table {} with {}", heading, name);
                check_rows(fixture.as_ref(), table, page)
            });

        match result {
            Ok(report) => report,
            Err(error) => {
                log::warn!("{}: table {} skipped: {}", page.name, heading, error);
                TableReport::failed(heading, error)
            }
        }
    }
}

/// Adds the first cell of each row after the directive to `imports`.
fn apply_imports(table: &Table, page: &Page, imports: &mut Vec<String>) -> TableReport {
    let mut report = TableReport::new(table.heading());
    for row in table.rows.iter().skip(1) {
        let Some(cell) = row.cell(0) else {
            continue;
        };
        if QualifiedName::new(cell.text.as_str()).is_fully_qualified() {
            log::debug!("import {}", cell.text);
            if !imports.contains(&cell.text) {
                imports.push(cell.text.clone());
            }
        } else {
            report.counts.exceptions += 1;
            report.diagnostics.push(err_ctx!(
                Table,
                format!("Import '{}' is not a dotted namespace", cell.text),
                &page.source,
                cell.span,
                "imports name namespaces such as eg.music"
            ));
        }
    }
    report
}
