use adforge::config::{ExportConfig, get_config_path, load_export_config, save_export_config};
use adforge::editor::{EDITOR_COLUMNS, parse_csv};
use adforge::error::AdforgeError;
use adforge::logging::LogOptions;
use adforge::model::{Ad, Keyword};
use adforge::pipeline::{ExportSpec, run_export, validate_rows_with};
use adforge::repair::repair_with;
use adforge::structure::{StructureSettings, build};
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "adforge",
    version,
    about = "Compile campaign structures into Google Ads Editor CSV files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a JSON config file. Defaults to the stored config.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write rotating log files to the app data directory
    #[arg(long, global = true)]
    pub log_to_file: bool,
}

impl Cli {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            verbose: self.verbose,
            log_to_file: self.log_to_file,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a campaign structure from keywords and wizard settings
    Build {
        /// Path to the structure settings JSON file
        #[arg(short, long)]
        settings: PathBuf,

        /// Keyword list: one keyword per line, or a JSON array when the file ends in .json
        #[arg(short, long)]
        keywords: PathBuf,

        /// Where to write the structure JSON. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run an export spec and write the Editor CSV
    Export {
        /// Path to the export spec JSON file
        spec: PathBuf,

        /// Output file path. Overrides the spec's path template.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the file even when validation reports errors
        #[arg(long)]
        allow_errors: bool,
    },
    /// Validate an existing Editor CSV file
    Validate {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Repair ads so they meet minimum content and length rules
    Repair {
        /// Path to a JSON array of ads
        ads: PathBuf,
    },
    /// Print the Editor column header
    Columns,
    /// Print the effective config as JSON
    Config {
        /// Store the effective config as the default config
        #[arg(long)]
        save: bool,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            settings,
            keywords,
            output,
        } => handle_build(&settings, &keywords, output.as_deref()),
        Commands::Export {
            spec,
            output,
            allow_errors,
        } => handle_export(&spec, output.as_deref(), allow_errors, &config),
        Commands::Validate { file } => handle_validate(&file, &config),
        Commands::Repair { ads } => handle_repair(&ads, &config),
        Commands::Columns => {
            for column in EDITOR_COLUMNS {
                println!("{column}");
            }
            Ok(())
        }
        Commands::Config { save } => handle_config(&config, save),
    }
}

fn load_config(path: Option<&Path>) -> Result<ExportConfig> {
    match path {
        Some(path) => Ok(ExportConfig::from_file(path)?),
        None => Ok(load_export_config()),
    }
}

fn handle_build(settings_path: &Path, keywords_path: &Path, output: Option<&Path>) -> Result<()> {
    let settings = StructureSettings::from_file(settings_path)?;
    let keywords = read_keywords(keywords_path)?;

    let structure = build(&keywords, &settings);
    let json = serde_json::to_string_pretty(&structure).context("Failed to serialize structure")?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "Built {} campaign(s) from {} keyword(s): {}",
                structure.campaigns.len(),
                keywords.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn read_keywords(path: &Path) -> Result<Vec<Keyword>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keyword file {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        return serde_json::from_str(&content).context("Failed to parse keyword JSON");
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Keyword::from)
        .collect())
}

fn handle_export(
    spec_path: &Path,
    output: Option<&Path>,
    allow_errors: bool,
    config: &ExportConfig,
) -> Result<()> {
    let mut spec = ExportSpec::from_file(spec_path)?;
    if allow_errors {
        spec.output.allow_errors = true;
    }

    let today = chrono::Local::now().date_naive();
    let report = run_export(&spec, config, output, today)?;

    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &report.errors {
        println!("error: {error}");
    }
    println!("{}", report.summary());
    println!("Written to: {}", report.output_path.display());
    Ok(())
}

fn handle_validate(path: &Path, config: &ExportConfig) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = parse_csv(&content)?;
    let report = validate_rows_with(&parsed.rows, &config.limits);

    let mut errors = parsed.issues;
    errors.extend(report.errors);

    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &errors {
        println!("error: {error}");
    }
    println!(
        "{}: {} rows, {} errors, {} warnings",
        path.display(),
        parsed.rows.len(),
        errors.len(),
        report.warnings.len()
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AdforgeError::Validation { errors }.into())
    }
}

fn handle_repair(path: &Path, config: &ExportConfig) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let ads: Vec<Ad> = serde_json::from_str(&content).context("Failed to parse ads JSON")?;

    let outcome = repair_with(&ads, config);
    tracing::info!("Repaired {} of {} ad(s)", outcome.report.fixed, ads.len());
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("Failed to serialize repair outcome")?
    );
    Ok(())
}

fn handle_config(config: &ExportConfig, save: bool) -> Result<()> {
    if save {
        let path = save_export_config(config)?;
        println!("Config saved to: {}", path.display());
    } else {
        tracing::info!("Stored config path: {}", get_config_path()?.display());
        println!("{}", config.to_json()?);
    }
    Ok(())
}
