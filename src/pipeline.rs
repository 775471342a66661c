//! Export jobs: compile, validate and write Editor CSV files headlessly.
//!
//! An export spec is a versioned JSON file describing where the campaign
//! structure comes from (a saved structure, or keywords plus wizard settings)
//! and where the CSV should be written.
//!
//! # Example
//!
//! ```no_run
//! use adforge::config::ExportConfig;
//! use adforge::pipeline::{ExportSpec, run_export};
//!
//! let spec = ExportSpec::from_file("plumbing.export.json")?;
//! let today = chrono::Local::now().date_naive();
//! let report = run_export(&spec, &ExportConfig::default(), None, today)?;
//! println!("{}", report.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Validation never throws: [`validate_rows`] returns row-addressed errors
//! and warnings, and [`run_export`] refuses to write a file with errors
//! unless `output.allow_errors` is set.

pub mod executor;
pub mod spec;
pub mod validation;

pub use executor::{RenderedExport, RunReport, render_export, run_export};
pub use spec::{ExportSpec, OutputConfig, SPEC_VERSION, Source};
pub use validation::{RowIssue, ValidationReport, validate_rows, validate_rows_with};
