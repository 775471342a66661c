//! Google Ads Editor bulk-import format.
//!
//! - [`columns`]: the fixed header
//! - [`row`]: full-width rows keyed by column name
//! - [`keywords`]: match-type extraction and keyword cleaning
//! - [`compiler`]: campaign structure to rows
//! - [`csv_io`]: BOM + CRLF serialization and reading files back

pub mod columns;
pub mod compiler;
pub mod csv_io;
pub mod keywords;
pub mod row;

pub use columns::{COLUMN_COUNT, EDITOR_COLUMNS};
pub use compiler::{CompileOutput, CompileStats, compile, compile_detailed};
pub use csv_io::{ParsedCsv, export_filename, parse_csv, to_csv_string, write_csv};
pub use row::{CsvRow, RowType};
