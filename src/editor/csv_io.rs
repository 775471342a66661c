//! Editor CSV wire format.
//!
//! UTF-8 with a leading BOM, CRLF line endings, the fixed header row and one
//! full-width record per row.

use super::columns::{COLUMN_COUNT, EDITOR_COLUMNS, column_index};
use super::row::CsvRow;
use crate::error::{AdforgeError, Result};
use crate::utils::sanitize_filename;
use chrono::NaiveDate;
use std::io::Write;

pub const BOM: &str = "\u{feff}";

/// Write BOM, header and rows to `writer`.
pub fn write_csv<W: Write>(rows: &[CsvRow], mut writer: W) -> Result<W> {
    writer.write_all(BOM.as_bytes())?;

    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .flexible(false)
        .from_writer(writer);

    csv_writer.write_record(EDITOR_COLUMNS)?;
    for row in rows {
        csv_writer.write_record(row.values())?;
    }
    csv_writer.flush()?;
    csv_writer
        .into_inner()
        .map_err(|e| AdforgeError::Io(e.into_error()))
}

/// Render rows to an in-memory CSV string.
pub fn to_csv_string(rows: &[CsvRow]) -> Result<String> {
    let bytes = write_csv(rows, Vec::new())?;
    String::from_utf8(bytes)
        .map_err(|e| AdforgeError::Other(format!("CSV output is not valid UTF-8: {e}")))
}

/// `<sanitized-campaign-name>_google_ads_editor_<YYYY-MM-DD>.csv`
pub fn export_filename(campaign_name: &str, date: NaiveDate) -> String {
    format!(
        "{}_google_ads_editor_{}.csv",
        sanitize_filename(campaign_name),
        date.format("%Y-%m-%d")
    )
}

/// Rows read back from an Editor CSV, plus any structural problems found.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub rows: Vec<CsvRow>,
    /// Header or field-count mismatches; empty for a well-formed file
    pub issues: Vec<String>,
}

/// Parse Editor CSV text. Columns are matched by header name so files with
/// reordered or missing columns can still be validated.
pub fn parse_csv(text: &str) -> Result<ParsedCsv> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    let mut issues = header_issues(&header);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != header.len() {
            issues.push(format!(
                "Row {}: expected {} fields, found {}",
                index + 1,
                header.len(),
                record.len()
            ));
        }
        let mut row = CsvRow::default();
        for (name, value) in header.iter().zip(record.iter()) {
            if column_index(name).is_some() {
                row.set(name, value);
            }
        }
        rows.push(row);
    }

    Ok(ParsedCsv { rows, issues })
}

fn header_issues(header: &[String]) -> Vec<String> {
    let mut issues = Vec::new();
    if header.len() != COLUMN_COUNT {
        issues.push(format!(
            "Header has {} columns, expected {COLUMN_COUNT}",
            header.len()
        ));
    }
    for (position, (found, expected)) in header.iter().zip(EDITOR_COLUMNS).enumerate() {
        if found != expected {
            issues.push(format!(
                "Header column {}: expected '{expected}', found '{found}'",
                position + 1
            ));
        }
    }
    for unknown in header.iter().filter(|name| column_index(name).is_none()) {
        issues.push(format!("Unknown column '{unknown}' ignored"));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::row::RowType;

    fn sample_rows() -> Vec<CsvRow> {
        let mut campaign = CsvRow::new(RowType::Campaign, "ADD");
        campaign.set("Campaign", "Plumbing, Inc.");
        campaign.set("Budget", "50");
        let mut keyword = CsvRow::new(RowType::Keyword, "ADD");
        keyword.set("Campaign", "Plumbing, Inc.");
        keyword.set("Ad group", "Drains");
        keyword.set("Keyword", "drain \"cleaning\"");
        keyword.set("Match type", "Broad");
        vec![campaign, keyword]
    }

    #[test]
    fn test_output_starts_with_bom_and_header() {
        let csv = to_csv_string(&sample_rows()).expect("render");
        assert!(csv.starts_with("\u{feff}Type,Operation,Campaign,Campaign ID,Campaign status"));
    }

    #[test]
    fn test_lines_end_with_crlf() {
        let csv = to_csv_string(&sample_rows()).expect("render");
        assert!(csv.ends_with("\r\n"));
        assert_eq!(csv.matches("\r\n").count(), 3, "header plus two rows");
        assert_eq!(csv.matches('\n').count(), 3, "no bare LF");
    }

    #[test]
    fn test_parse_reads_back_written_rows() {
        let rows = sample_rows();
        let csv = to_csv_string(&rows).expect("render");
        let parsed = parse_csv(&csv).expect("parse");
        assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
        assert_eq!(parsed.rows, rows);
    }

    #[test]
    fn test_parse_reports_header_mismatch() {
        let parsed = parse_csv("Row Type,Campaign\r\nCAMPAIGN,Test\r\n").expect("parse");
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows.first().map(|r| r.get("Campaign")), Some("Test"));
        assert!(parsed.issues.iter().any(|i| i.contains("Unknown column 'Row Type'")));
        assert!(parsed.issues.iter().any(|i| i.starts_with("Header has 2 columns")));
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        assert_eq!(
            export_filename("Plumbing – Search (NYC)", date),
            "plumbing_search_nyc_google_ads_editor_2024-03-09.csv"
        );
    }
}
