//! Checking a table's expected rows against a fixture's actual rows.
//!
//! Row 0 names the fixture, row 1 is the header, and every later row is an
//! expected row. Rows are paired by key before any cell is compared: both
//! sides are bucketed on the first column, buckets holding one row on each
//! side are checked, and ambiguous buckets are split again on the next
//! column. When the columns run out the remaining rows pair up in order.
//! Whatever is left over is missing (expected only) or surplus (actual only).

use std::fmt;

use serde::Serialize;

use super::{RowFixture, TargetShape};
use crate::errors::{FitError, RelatedLabel};
use crate::table::{Page, Table};
use crate::{err_ctx, err_src};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub right: usize,
    pub wrong: usize,
    pub ignores: usize,
    pub exceptions: usize,
}

impl Counts {
    pub fn tally(&mut self, other: &Counts) {
        self.right += other.right;
        self.wrong += other.wrong;
        self.ignores += other.ignores;
        self.exceptions += other.exceptions;
    }

    pub fn is_success(&self) -> bool {
        self.wrong == 0 && self.exceptions == 0
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} right, {} wrong, {} ignored, {} exceptions",
            self.right, self.wrong, self.ignores, self.exceptions
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CellOutcome {
    Right { value: String },
    Wrong { expected: String, actual: String },
    /// Blank expected cell; shows what the fixture holds.
    Info { actual: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    /// `row` is the row index within the table.
    Checked { row: usize, cells: Vec<CellOutcome> },
    Missing { row: usize, cells: Vec<String> },
    Surplus { cells: Vec<String> },
    ExtraCells { row: usize, cells: Vec<String> },
}

impl RowOutcome {
    fn order_key(&self) -> usize {
        match self {
            RowOutcome::Checked { row, .. }
            | RowOutcome::Missing { row, .. }
            | RowOutcome::ExtraCells { row, .. } => *row,
            RowOutcome::Surplus { .. } => usize::MAX,
        }
    }
}

/// Result of checking one table.
#[derive(Debug, Serialize)]
pub struct TableReport {
    pub fixture: String,
    pub header: Vec<String>,
    pub rows: Vec<RowOutcome>,
    pub counts: Counts,
    /// Set when the table could not be checked at all.
    pub error: Option<String>,
    #[serde(skip)]
    pub diagnostics: Vec<FitError>,
}

impl TableReport {
    pub fn new(fixture: impl Into<String>) -> Self {
        Self {
            fixture: fixture.into(),
            header: Vec::new(),
            rows: Vec::new(),
            counts: Counts::default(),
            error: None,
            diagnostics: Vec::new(),
        }
    }

    /// A table that failed outright counts as a single exception.
    pub fn failed(fixture: impl Into<String>, error: FitError) -> Self {
        let mut report = Self::new(fixture);
        report.counts.exceptions = 1;
        report.error = Some(error.to_string());
        report.diagnostics.push(error);
        report
    }

    pub fn is_success(&self) -> bool {
        self.counts.is_success()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Checks `table` against the rows `fixture` produces.
pub fn check_rows(
    fixture: &dyn RowFixture,
    table: &Table,
    page: &Page,
) -> Result<TableReport, FitError> {
    let shape = fixture.target_shape();
    let columns = bind_header(&shape, table, page)?;

    let mut report = TableReport::new(table.heading());
    report.header = columns.iter().map(|c| c.to_string()).collect();

    let mut expected = Vec::new();
    let mut expected_rows = Vec::new();
    for (index, row) in table.rows.iter().enumerate().skip(2) {
        let mut texts: Vec<String> = row.cells.iter().map(|c| c.text.clone()).collect();
        if texts.len() > columns.len() {
            report.counts.exceptions += 1;
            report.diagnostics.push(extra_cells_error(table, index, columns.len(), page));
            report.rows.push(RowOutcome::ExtraCells { row: index, cells: texts });
            continue;
        }
        texts.resize(columns.len(), String::new());
        expected.push(texts);
        expected_rows.push(index);
    }

    let actual: Vec<Vec<String>> = fixture
        .query()
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.field(c).unwrap_or_default())
                .collect()
        })
        .collect();
    log::debug!(
        "checking {} expected against {} actual row(s) for {}",
        expected.len(),
        actual.len(),
        shape.type_name
    );

    let mut matcher = Matcher {
        width: columns.len(),
        expected: &expected,
        expected_rows: &expected_rows,
        actual: &actual,
        outcomes: Vec::new(),
        counts: Counts::default(),
    };
    matcher.match_rows((0..expected.len()).collect(), (0..actual.len()).collect(), 0);

    report.counts.tally(&matcher.counts);
    report.rows.extend(matcher.outcomes);
    report.rows.sort_by_key(RowOutcome::order_key);
    Ok(report)
}

// ============================================================================
// MATCHING
// ============================================================================

struct Matcher<'a> {
    width: usize,
    expected: &'a [Vec<String>],
    expected_rows: &'a [usize],
    actual: &'a [Vec<String>],
    outcomes: Vec<RowOutcome>,
    counts: Counts,
}

impl Matcher<'_> {
    fn match_rows(&mut self, expected: Vec<usize>, actual: Vec<usize>, column: usize) {
        if column >= self.width {
            self.pair_in_order(expected, actual);
            return;
        }

        let mut buckets: Vec<(String, Vec<usize>, Vec<usize>)> = Vec::new();
        for e in expected {
            bucket(&mut buckets, key_of(&self.expected[e][column])).1.push(e);
        }
        for a in actual {
            bucket(&mut buckets, key_of(&self.actual[a][column])).2.push(a);
        }

        for (_, e, a) in buckets {
            match (e.len(), a.len()) {
                (_, 0) => e.into_iter().for_each(|e| self.missing(e)),
                (0, _) => a.into_iter().for_each(|a| self.surplus(a)),
                (1, 1) => self.check(e[0], a[0]),
                _ => self.match_rows(e, a, column + 1),
            }
        }
    }

    fn pair_in_order(&mut self, expected: Vec<usize>, actual: Vec<usize>) {
        let mut actual = actual.into_iter();
        for e in expected {
            match actual.next() {
                Some(a) => self.check(e, a),
                None => self.missing(e),
            }
        }
        actual.for_each(|a| self.surplus(a));
    }

    fn check(&mut self, e: usize, a: usize) {
        let cells = self.expected[e]
            .iter()
            .zip(&self.actual[a])
            .map(|(expected, actual)| {
                if expected.is_empty() {
                    self.counts.ignores += 1;
                    CellOutcome::Info {
                        actual: actual.clone(),
                    }
                } else if values_equal(expected, actual) {
                    self.counts.right += 1;
                    CellOutcome::Right {
                        value: expected.clone(),
                    }
                } else {
                    self.counts.wrong += 1;
                    CellOutcome::Wrong {
                        expected: expected.clone(),
                        actual: actual.clone(),
                    }
                }
            })
            .collect();
        self.outcomes.push(RowOutcome::Checked {
            row: self.expected_rows[e],
            cells,
        });
    }

    fn missing(&mut self, e: usize) {
        self.counts.wrong += 1;
        self.outcomes.push(RowOutcome::Missing {
            row: self.expected_rows[e],
            cells: self.expected[e].clone(),
        });
    }

    fn surplus(&mut self, a: usize) {
        self.counts.wrong += 1;
        self.outcomes.push(RowOutcome::Surplus {
            cells: self.actual[a].clone(),
        });
    }
}

fn bucket(
    buckets: &mut Vec<(String, Vec<usize>, Vec<usize>)>,
    key: String,
) -> &mut (String, Vec<usize>, Vec<usize>) {
    let index = match buckets.iter().position(|b| b.0 == key) {
        Some(index) => index,
        None => {
            buckets.push((key, Vec::new(), Vec::new()));
            buckets.len() - 1
        }
    };
    &mut buckets[index]
}

/// Largest magnitude below which every integral `f64` is exact.
const EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Canonical text of a numeric cell. Integers are compared exactly, so
/// large values never collapse onto their nearest `f64`, and `-0` is `0`.
fn canonical_number(text: &str) -> Option<String> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i128>() {
        return Some(n.to_string());
    }
    let n = text.parse::<f64>().ok().filter(|n| n.is_finite())?;
    if n.fract() == 0.0 && n.abs() < EXACT_FLOAT_INT {
        return Some((n as i128).to_string());
    }
    Some((n + 0.0).to_string())
}

/// Numbers compare by value, so `3`, `3.0` and `03` share a key.
fn key_of(text: &str) -> String {
    canonical_number(text).unwrap_or_else(|| text.trim().to_string())
}

fn values_equal(expected: &str, actual: &str) -> bool {
    if expected == actual.trim() {
        return true;
    }
    matches!(
        (canonical_number(expected), canonical_number(actual)),
        (Some(a), Some(b)) if a == b
    )
}

// ============================================================================
// HEADER BINDING
// ============================================================================

fn bind_header<'s>(
    shape: &'s TargetShape,
    table: &Table,
    page: &Page,
) -> Result<Vec<&'s str>, FitError> {
    let header = table.rows.get(1).ok_or_else(|| {
        err_ctx!(
            Table,
            format!("Table for {} has no header row", table.heading()),
            &page.source,
            table.heading_span(),
            "add a row naming the columns to check, e.g. |title|artist|"
        )
    })?;

    header
        .cells
        .iter()
        .map(|cell| {
            shape.column(&cell.text).ok_or_else(|| {
                err_ctx!(
                    Table,
                    format!("Unknown column '{}' for {}", cell.text, shape.type_name),
                    &page.source,
                    cell.span,
                    format!("known columns: {}", shape.columns.join(", "))
                )
            })
        })
        .collect()
}

fn extra_cells_error(table: &Table, index: usize, width: usize, page: &Page) -> FitError {
    let row = &table.rows[index];
    let extra = row.cells[width..]
        .iter()
        .map(|c| c.span)
        .reduce(|a, b| a.merge(b))
        .unwrap_or(row.span);
    let related = table
        .rows
        .get(1)
        .map(|header| {
            vec![RelatedLabel {
                span: header.span,
                label: format!("header has {} column(s)", width),
            }]
        })
        .unwrap_or_default();
    err_src!(Table, "Extra table cells", &page.source, extra, related)
}
