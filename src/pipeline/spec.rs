//! Export job definition.
//!
//! A versioned JSON file naming where the campaign structure comes from and
//! where the Editor CSV goes, so exports can run headlessly from the CLI.

use crate::model::{CampaignStructure, Keyword};
use crate::structure::{StructureSettings, build};
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current export spec version
pub const SPEC_VERSION: &str = "0.1";

/// Root export job definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportSpec {
    /// File format version for future migrations
    pub version: String,

    /// Human-readable job name
    pub name: String,

    /// Where the campaign structure comes from
    pub source: Source,

    /// Output file configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl ExportSpec {
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Self {
            version: SPEC_VERSION.to_owned(),
            name: name.into(),
            source,
            output: OutputConfig::default(),
        }
    }

    /// Load an export spec from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read export spec file")?;
        Self::from_json(&content)
    }

    /// Parse an export spec from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse export spec JSON")
    }

    /// Save export spec to a JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).context("Failed to write export spec file")
    }

    /// Serialize export spec to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize export spec")
    }
}

/// Campaign structure source (tagged enum)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// A prebuilt structure, as saved by the wizard
    Structure { structure: CampaignStructure },

    /// Keywords plus wizard settings, run through the structure builder
    Build {
        keywords: Vec<Keyword>,
        settings: StructureSettings,
    },
}

impl Source {
    pub fn resolve(&self) -> CampaignStructure {
        match self {
            Self::Structure { structure } => structure.clone(),
            Self::Build { keywords, settings } => build(keywords, settings),
        }
    }
}

/// Output file configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Output path template (supports {date} and {campaign} substitution).
    /// Empty means the standard Editor filename in the working directory.
    #[serde(default)]
    pub path_template: String,

    /// Whether to overwrite existing files
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Write the file even when the validator reports errors
    #[serde(default)]
    pub allow_errors: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path_template: String::new(),
            overwrite: default_true(),
            allow_errors: false,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::StructureType;

    #[test]
    fn test_spec_serialization() {
        let spec = ExportSpec::new(
            "plumbing",
            Source::Build {
                keywords: vec![Keyword::from("plumber near me")],
                settings: StructureSettings {
                    structure_type: StructureType::Skag,
                    campaign_name: "Plumbing".to_owned(),
                    ..StructureSettings::default()
                },
            },
        );

        let json = spec.to_json().expect("serialize spec");
        assert!(json.contains(r#""kind": "build""#));
        let parsed = ExportSpec::from_json(&json).expect("parse spec");
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_output_defaults() {
        let spec = ExportSpec::from_json(
            r#"{
                "version": "0.1",
                "name": "saved",
                "source": { "kind": "structure", "structure": { "campaigns": [] } }
            }"#,
        )
        .expect("parse spec");
        assert!(spec.output.overwrite);
        assert!(!spec.output.allow_errors);
        assert!(spec.output.path_template.is_empty());
        assert!(spec.source.resolve().campaigns.is_empty());
    }

    #[test]
    fn test_unknown_source_rejected() {
        let result = ExportSpec::from_json(
            r#"{ "version": "0.1", "name": "x", "source": { "kind": "database" } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_spec_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("export.json");
        let spec = ExportSpec::new(
            "saved",
            Source::Structure {
                structure: CampaignStructure::default(),
            },
        );
        spec.to_file(&path).expect("write spec");
        assert_eq!(ExportSpec::from_file(&path).expect("read spec"), spec);
    }
}
