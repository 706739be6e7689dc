//! Table parser: page text in, [`Page`] out.
//!
//! Purely syntactic. Deciding what a table means (fixture, import, header)
//! is left to the engine.

use pest::{error::InputLocation, iterators::Pair, Parser};
use pest_derive::Parser;

use super::{Cell, Page, Row, Span, Table};
use crate::errors::FitError;
use crate::{err_ctx, err_msg};

#[derive(Parser)]
#[grammar = "table/grammar.pest"]
struct TableParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses page text into tables. A page without tables is valid and empty.
pub fn parse(source: &str, name: &str) -> Result<Page, FitError> {
    let mut page = Page::empty(name, source);
    if source.trim().is_empty() {
        return Ok(page);
    }

    let mut pairs = TableParser::parse(Rule::page, source)
        .map_err(|e| convert_parse_error(e, &page))?;
    let program = pairs
        .next()
        .ok_or_else(|| err_msg!(Internal, "page rule produced no output"))?;

    page.tables = program
        .into_inner()
        .filter(|p| p.as_rule() == Rule::table)
        .map(build_table)
        .collect();
    log::debug!("parsed {} table(s) from {}", page.tables.len(), page.name);
    Ok(page)
}

// ============================================================================
// BUILDERS
// ============================================================================

fn build_table(pair: Pair<Rule>) -> Table {
    let span = get_span(&pair);
    let raw = pair.as_str();
    let mut escaped = false;
    let rows: Vec<Row> = pair
        .into_inner()
        .enumerate()
        .map(|(i, row)| {
            let (row, bang) = build_row(row);
            if i == 0 {
                escaped = bang;
            }
            row
        })
        .collect();
    Table {
        rows,
        span: trim_line_end(span, raw.as_bytes()),
        escaped,
    }
}

fn build_row(pair: Pair<Rule>) -> (Row, bool) {
    let span = get_span(&pair);
    let raw = pair.as_str();
    let mut bang = false;
    let mut cells = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::bang => bang = true,
            Rule::cell => cells.push(build_cell(inner)),
            _ => {}
        }
    }
    let row = Row {
        cells,
        span: trim_line_end(span, raw.as_bytes()),
    };
    (row, bang)
}

fn build_cell(pair: Pair<Rule>) -> Cell {
    let raw = pair.as_str();
    let span = get_span(&pair);
    let text = raw.trim();
    if text.is_empty() {
        return Cell {
            text: String::new(),
            span,
        };
    }
    // Narrow the span to the trimmed text.
    let lead = raw.len() - raw.trim_start().len();
    let start = span.start + lead;
    Cell {
        text: text.to_string(),
        span: Span {
            start,
            end: start + text.len(),
        },
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn get_span(pair: &Pair<Rule>) -> Span {
    let s = pair.as_span();
    Span {
        start: s.start(),
        end: s.end(),
    }
}

/// Drops the trailing newline a row match swallows.
fn trim_line_end(span: Span, raw: &[u8]) -> Span {
    let mut end = span.end;
    let mut tail = raw.len();
    while tail > 0 && matches!(raw[tail - 1], b'\n' | b'\r') {
        tail -= 1;
        end -= 1;
    }
    Span {
        start: span.start,
        end,
    }
}

fn convert_parse_error(error: pest::error::Error<Rule>, page: &Page) -> FitError {
    let span = match error.location {
        InputLocation::Pos(pos) => Span {
            start: pos,
            end: pos,
        },
        InputLocation::Span((start, end)) => Span { start, end },
    };
    let message = error.variant.message().to_string();
    err_ctx!(
        Parse,
        message,
        &page.source,
        span,
        "tables are lines of the form |cell|cell|"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_table() {
        let page = parse("!|eg.music.Display|\n|title|artist|\n|Akila|Toure Kunda|\n", "p").unwrap();
        assert_eq!(page.tables.len(), 1);
        let table = &page.tables[0];
        assert!(table.escaped);
        assert_eq!(table.heading(), "eg.music.Display");
        assert_eq!(table.rows[1].texts(), vec!["title", "artist"]);
        assert_eq!(table.rows[2].texts(), vec!["Akila", "Toure Kunda"]);
    }

    #[test]
    fn prose_and_blank_lines_split_tables() {
        let source = "Intro text.\n|import|\n|eg.music|\n\n|a|\n|b|\nnot a table\n|c|";
        let page = parse(source, "p").unwrap();
        let headings: Vec<_> = page.tables.iter().map(|t| t.heading()).collect();
        assert_eq!(headings, vec!["import", "a", "c"]);
        assert_eq!(page.tables[1].rows.len(), 2);
    }

    #[test]
    fn cells_are_trimmed_and_spans_point_at_text() {
        let source = "|  Toure Kunda  | |";
        let page = parse(source, "p").unwrap();
        let row = &page.tables[0].rows[0];
        let cell = &row.cells[0];
        assert_eq!(cell.text, "Toure Kunda");
        assert_eq!(&source[cell.span.start..cell.span.end], "Toure Kunda");
        assert!(row.cells[1].is_blank());
    }

    #[test]
    fn unterminated_row_is_prose() {
        let page = parse("|a|b\n", "p").unwrap();
        assert!(page.tables.is_empty());
    }

    #[test]
    fn empty_page_has_no_tables() {
        assert!(parse("", "p").unwrap().tables.is_empty());
        assert!(parse("   \n\n", "p").unwrap().tables.is_empty());
    }

    #[test]
    fn row_spans_exclude_newlines() {
        let source = "|a|b|\r\n|c|d|\r\n";
        let page = parse(source, "p").unwrap();
        let row = &page.tables[0].rows[0];
        assert_eq!(&source[row.span.start..row.span.end], "|a|b|");
    }
}
