//! Handles all user-facing output for the CLI.
//!
//! Annotated tables, name breakdowns, summaries and diagnostics are all
//! printed from here so every command looks the same.

use std::io;

use atty::Stream;
use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::engine::PageReport;
use crate::errors::FitError;
use crate::fixture::{CellOutcome, Counts, RowOutcome, TableReport};
use crate::naming::NameParts;

// ============================================================================
// STREAMS
// ============================================================================

pub fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice(Stream::Stdout))
}

fn color_choice(stream: Stream) -> ColorChoice {
    if atty::is(stream) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Renders a diagnostic with miette to stderr.
pub fn print_error(error: FitError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// Renders every diagnostic a page collected.
pub fn print_diagnostics(report: PageReport) {
    for table in report.tables {
        for error in table.diagnostics {
            print_error(error);
        }
    }
}

pub fn print_name(out: &mut impl WriteColor, parts: &NameParts) -> io::Result<()> {
    let rows = [
        ("short name", parts.short_name.as_str()),
        ("namespace", parts.namespace.as_str()),
        ("original", parts.original.as_str()),
    ];
    for (label, value) in rows {
        writeln!(out, "{:<16}{}", label, value)?;
    }
    write!(out, "{:<16}", "fully qualified")?;
    paint(out, Some(if parts.fully_qualified { Color::Green } else { Color::Red }))?;
    writeln!(out, "{}", if parts.fully_qualified { "yes" } else { "no" })?;
    out.reset()
}

/// Prints every table of a page with its cells marked up, then the counts.
pub fn print_page(out: &mut impl WriteColor, report: &PageReport) -> io::Result<()> {
    paint(out, Some(Color::Cyan))?;
    writeln!(out, "{}", report.name)?;
    out.reset()?;
    for table in &report.tables {
        print_table(out, table)?;
        writeln!(out)?;
    }
    print_counts(out, &report.counts)
}

pub fn print_counts(out: &mut impl WriteColor, counts: &Counts) -> io::Result<()> {
    let color = if counts.is_success() { Color::Green } else { Color::Red };
    paint(out, Some(color))?;
    writeln!(out, "{}", counts)?;
    out.reset()
}

/// One line per page plus a total, for the `test` command.
pub fn print_summary(out: &mut impl WriteColor, pages: &[(String, Counts)]) -> io::Result<()> {
    let mut total = Counts::default();
    let width = pages.iter().map(|(n, _)| n.width()).max().unwrap_or(0);
    for (name, counts) in pages {
        total.tally(counts);
        let (mark, color) = if counts.is_success() {
            ("✓", Color::Green)
        } else {
            ("✗", Color::Red)
        };
        paint(out, Some(color))?;
        write!(out, "{} ", mark)?;
        out.reset()?;
        writeln!(out, "{}  {}", pad(name, width), counts)?;
    }
    writeln!(out)?;
    let passed = pages.iter().filter(|(_, c)| c.is_success()).count();
    write!(out, "{}/{} pages passed: ", passed, pages.len())?;
    print_counts(out, &total)
}

// ============================================================================
// TABLE RENDERING
// ============================================================================

#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Right,
    Wrong,
    Info,
}

impl Tone {
    fn color(self) -> Option<Color> {
        match self {
            Tone::Plain => None,
            Tone::Right => Some(Color::Green),
            Tone::Wrong => Some(Color::Red),
            Tone::Info => Some(Color::Yellow),
        }
    }
}

type Line = (Vec<(String, Tone)>, Option<&'static str>);

fn print_table(out: &mut impl WriteColor, table: &TableReport) -> io::Result<()> {
    let mut lines: Vec<Line> = vec![(vec![(table.fixture.clone(), Tone::Plain)], None)];
    if let Some(error) = &table.error {
        lines[0].0[0].1 = Tone::Wrong;
        lines.push((vec![(error.clone(), Tone::Wrong)], None));
    } else {
        lines.push((table.header.iter().map(|h| (h.clone(), Tone::Plain)).collect(), None));
        lines.extend(table.rows.iter().map(row_line));
    }

    // The fixture line is left out of the column widths.
    let columns = lines.iter().map(|(cells, _)| cells.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            lines
                .iter()
                .skip(1)
                .filter_map(|(cells, _)| cells.get(i))
                .map(|(text, _)| text.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for (line, (cells, note)) in lines.iter().enumerate() {
        write!(out, "|")?;
        for (i, (text, tone)) in cells.iter().enumerate() {
            let width = if line == 0 { 0 } else { widths[i] };
            paint(out, tone.color())?;
            write!(out, "{}", pad(text, width))?;
            out.reset()?;
            write!(out, "|")?;
        }
        if let Some(note) = note {
            paint(out, Some(Color::Red))?;
            write!(out, " {}", note)?;
            out.reset()?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn row_line(row: &RowOutcome) -> Line {
    match row {
        RowOutcome::Checked { cells, .. } => (cells.iter().map(cell_text).collect(), None),
        RowOutcome::Missing { cells, .. } => (tone_all(cells, Tone::Wrong), Some("missing")),
        RowOutcome::Surplus { cells } => (tone_all(cells, Tone::Wrong), Some("surplus")),
        RowOutcome::ExtraCells { cells, .. } => {
            (tone_all(cells, Tone::Wrong), Some("extra table cells"))
        }
    }
}

fn cell_text(cell: &CellOutcome) -> (String, Tone) {
    match cell {
        CellOutcome::Right { value } => (value.clone(), Tone::Right),
        CellOutcome::Wrong { expected, actual } => {
            (format!("{} expected / {} actual", expected, actual), Tone::Wrong)
        }
        CellOutcome::Info { actual } => (actual.clone(), Tone::Info),
    }
}

fn tone_all(cells: &[String], tone: Tone) -> Vec<(String, Tone)> {
    cells.iter().map(|c| (c.clone(), tone)).collect()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn paint(out: &mut impl WriteColor, color: Option<Color>) -> io::Result<()> {
    match color {
        Some(color) => out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true)),
        None => out.reset(),
    }
}

/// Pads to a display width, so wide characters line up.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}
