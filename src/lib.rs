//! # adforge - Google Ads Editor CSV compiler
//!
//! adforge turns keyword lists and wizard settings into a hierarchical
//! campaign structure, then compiles that structure into the flat 112-column
//! CSV that Google Ads Editor imports.
//!
//! ## Quick Start
//!
//! ```no_run
//! use adforge::config::ExportConfig;
//! use adforge::model::Keyword;
//! use adforge::pipeline::render_export;
//! use adforge::structure::{StructureSettings, StructureType, build};
//!
//! let settings = StructureSettings {
//!     structure_type: StructureType::Skag,
//!     campaign_name: "Plumbing".to_owned(),
//!     url: "https://plumbing.example.com".to_owned(),
//!     ..StructureSettings::default()
//! };
//! let structure = build(&[Keyword::from("plumber near me")], &settings);
//!
//! let today = chrono::Local::now().date_naive();
//! let export = render_export(&structure, &ExportConfig::default(), today)?;
//! std::fs::write(&export.filename, &export.csv)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Stages
//!
//! 1. [`structure`]: groups keywords into campaigns and ad groups using one
//!    of twelve strategies (SKAG, STAG, intent, funnel, geo and more)
//! 2. [`repair`]: pads thin ads and truncates overlong fields, never dropping an ad
//! 3. [`editor`]: compiles the structure into Editor rows, deduplicating
//!    keywords and ads, and serializes the BOM-prefixed CRLF CSV
//! 4. [`pipeline::validation`]: reports row-addressed errors and warnings
//!
//! ## Core Modules
//!
//! - [`model`]: campaign, ad group, keyword and ad types
//! - [`config`]: field limits, defaults, filler pools and keyword policy
//! - [`pipeline`]: export spec files and the headless export runner
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing setup for the CLI
//! - [`utils`]: text helpers shared by the stages

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod repair;
pub mod structure;
pub mod utils;
