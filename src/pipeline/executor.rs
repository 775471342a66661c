//! Export execution engine.
//!
//! Compiles a campaign structure, validates the rows, serializes the Editor
//! CSV and writes it out, producing a run report.

use super::spec::{ExportSpec, OutputConfig, SPEC_VERSION};
use super::validation::{ValidationReport, validate_rows_with};
use crate::config::ExportConfig;
use crate::editor::{CompileStats, compile_detailed, export_filename, to_csv_string};
use crate::error::{AdforgeError, Result, ResultExt as _};
use crate::model::CampaignStructure;
use crate::utils::sanitize_filename;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// In-memory export: everything needed to hand the file to a caller.
#[derive(Debug, Clone)]
pub struct RenderedExport {
    /// BOM-prefixed, CRLF-terminated CSV text
    pub csv: String,
    /// `<campaign>_google_ads_editor_<date>.csv`
    pub filename: String,
    pub rows: usize,
    pub stats: CompileStats,
    pub validation: ValidationReport,
}

/// Report generated after an export run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where the CSV was written
    pub output_path: PathBuf,

    /// Number of data rows written (header excluded)
    pub rows: usize,

    /// What the compiler kept and dropped
    pub stats: CompileStats,

    /// Validator errors (non-empty only when errors were allowed)
    pub errors: Vec<String>,

    /// Validator warnings
    pub warnings: Vec<String>,

    /// Time taken for execution
    pub duration: std::time::Duration,
}

impl RunReport {
    /// Create a summary message
    pub fn summary(&self) -> String {
        format!(
            "Export completed: {} rows ({} campaigns, {} ad groups, {} keywords, {} ads), {} keywords dropped, {} errors, {} warnings, {:.2}s",
            self.rows,
            self.stats.campaigns,
            self.stats.ad_groups,
            self.stats.keywords,
            self.stats.ads,
            self.stats.dropped_keywords(),
            self.errors.len(),
            self.warnings.len(),
            self.duration.as_secs_f64()
        )
    }
}

/// Compile, validate and serialize without touching the filesystem.
pub fn render_export(
    structure: &CampaignStructure,
    config: &ExportConfig,
    today: NaiveDate,
) -> Result<RenderedExport> {
    let output = compile_detailed(structure, config)?;
    let validation = validate_rows_with(&output.rows, &config.limits);
    let csv = to_csv_string(&output.rows)?;
    let filename = export_filename(first_campaign_name(structure), today);

    Ok(RenderedExport {
        csv,
        filename,
        rows: output.rows.len(),
        stats: output.stats,
        validation,
    })
}

/// Execute an export spec and write the CSV.
///
/// Validation errors block the write unless `output.allow_errors` is set.
pub fn run_export(
    spec: &ExportSpec,
    config: &ExportConfig,
    output_path_override: Option<&Path>,
    today: NaiveDate,
) -> Result<RunReport> {
    let start = std::time::Instant::now();

    if spec.version != SPEC_VERSION {
        return Err(AdforgeError::InvalidInput(format!(
            "Unsupported export spec version '{}', expected '{SPEC_VERSION}'",
            spec.version
        )));
    }

    let structure = spec.source.resolve();
    let rendered = render_export(&structure, config, today)?;

    let ValidationReport {
        is_valid,
        errors,
        warnings,
    } = rendered.validation;
    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    if !is_valid {
        if !spec.output.allow_errors {
            return Err(AdforgeError::Validation { errors });
        }
        tracing::warn!(
            "Writing '{}' despite {} validation error(s)",
            spec.name,
            errors.len()
        );
    }

    let output_path = match output_path_override {
        Some(path) => path.to_path_buf(),
        None if !spec.output.path_template.is_empty() => expand_path_template(
            &spec.output.path_template,
            first_campaign_name(&structure),
            today,
        ),
        None => PathBuf::from(&rendered.filename),
    };

    write_output(&rendered.csv, &output_path, &spec.output)?;

    let report = RunReport {
        output_path,
        rows: rendered.rows,
        stats: rendered.stats,
        errors,
        warnings,
        duration: start.elapsed(),
    };
    tracing::info!("{} -> {}", report.summary(), report.output_path.display());
    Ok(report)
}

fn first_campaign_name(structure: &CampaignStructure) -> &str {
    structure
        .campaigns
        .first()
        .map_or("", |campaign| campaign.name.as_str())
}

/// Expand path template with variables ({date}, {campaign})
fn expand_path_template(template: &str, campaign: &str, today: NaiveDate) -> PathBuf {
    let expanded = template
        .replace("{date}", &today.format("%Y-%m-%d").to_string())
        .replace("{campaign}", &sanitize_filename(campaign));
    PathBuf::from(expanded)
}

/// Write the CSV text, honouring the overwrite setting
fn write_output(csv: &str, path: &Path, config: &OutputConfig) -> Result<()> {
    if path.exists() && !config.overwrite {
        return Err(AdforgeError::OutputExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create output directory: {}", parent.display())
        })?;
    }

    std::fs::write(path, csv)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}
