use crate::error::{AdforgeError, Result, ResultExt as _};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Character limits and per-entity caps enforced by the Editor.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FieldLimits {
    pub headline: usize,
    pub description: usize,
    pub path: usize,
    pub keyword_max: usize,
    pub keyword_min: usize,
    /// Negatives may legitimately be short ("tv", "diy")
    pub negative_min: usize,
    pub ads_per_ad_group: usize,
    pub sitelinks_per_ad_group: usize,
    pub callouts_per_ad: usize,
    pub sitelink_text: usize,
    pub sitelink_description: usize,
    pub callout: usize,
    pub business_name: usize,
    pub rsa_max_headlines: usize,
    pub rsa_max_descriptions: usize,
    pub rsa_min_headlines: usize,
    pub rsa_min_descriptions: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            headline: 30,
            description: 90,
            path: 15,
            keyword_max: 80,
            keyword_min: 3,
            negative_min: 2,
            ads_per_ad_group: 3,
            sitelinks_per_ad_group: 4,
            callouts_per_ad: 4,
            sitelink_text: 25,
            sitelink_description: 35,
            callout: 25,
            business_name: 25,
            rsa_max_headlines: 15,
            rsa_max_descriptions: 4,
            rsa_min_headlines: 3,
            rsa_min_descriptions: 2,
        }
    }
}

/// Values written into a row when the structure leaves a column unset.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CampaignDefaults {
    pub operation: String,
    pub campaign_status: String,
    pub campaign_type: String,
    pub budget_type: String,
    pub bid_strategy: String,
    pub networks: String,
    pub languages: String,
    pub ad_group_status: String,
    pub ad_group_type: String,
    pub keyword_status: String,
    pub ad_status: String,
    pub country_code: String,
}

impl Default for CampaignDefaults {
    fn default() -> Self {
        Self {
            operation: "ADD".to_owned(),
            campaign_status: "Enabled".to_owned(),
            campaign_type: "Search".to_owned(),
            budget_type: "Daily".to_owned(),
            bid_strategy: "Manual CPC".to_owned(),
            networks: "Google search".to_owned(),
            languages: "en".to_owned(),
            ad_group_status: "Enabled".to_owned(),
            ad_group_type: "Standard".to_owned(),
            keyword_status: "Enabled".to_owned(),
            ad_status: "Enabled".to_owned(),
            country_code: "US".to_owned(),
        }
    }
}

/// Deterministic filler used by the ad repairer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RepairDefaults {
    /// Tried in order; entries already present on the ad are skipped
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    pub dki_headline: String,
    pub business_name: String,
    pub phone_number: String,
}

impl Default for RepairDefaults {
    fn default() -> Self {
        Self {
            headlines: vec![
                "Professional Service".to_owned(),
                "Quality Results Guaranteed".to_owned(),
                "Contact Us Today".to_owned(),
                "Trusted Local Experts".to_owned(),
                "Call For A Free Quote".to_owned(),
            ],
            descriptions: vec![
                "Get professional service you can trust.".to_owned(),
                "Contact us today for a free consultation and a fast response.".to_owned(),
                "Experienced team, transparent pricing and guaranteed results.".to_owned(),
            ],
            dki_headline: "{KeyWord:Professional Service}".to_owned(),
            business_name: "Business Name".to_owned(),
            phone_number: "123 456 789".to_owned(),
        }
    }
}

/// Heuristics that mark a generated keyword as too weak to export.
///
/// The lists are data rather than code so they can be tuned per account
/// without a rebuild.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LowQualityPolicy {
    /// Reject "plumber plumber near me"
    pub reject_adjacent_duplicates: bool,
    /// A keyword made only of these words carries no intent ("best cheap near me")
    pub vague_terms: Vec<String>,
    /// Words that open a question
    pub question_words: Vec<String>,
    /// A question ending on one of these is a fragment ("how to", "what is the").
    /// A lone question word is one too; "can opener" is not.
    pub dangling_words: Vec<String>,
    /// Additional case-insensitive regexes; a match rejects the keyword
    pub extra_patterns: Vec<String>,
}

impl Default for LowQualityPolicy {
    fn default() -> Self {
        let words = |list: &[&str]| -> Vec<String> { list.iter().map(|w| (*w).to_owned()).collect() };
        Self {
            reject_adjacent_duplicates: true,
            vague_terms: words(&[
                "best", "top", "good", "great", "cheap", "cheapest", "affordable", "near", "me",
                "nearby", "local", "now", "today", "online", "free", "service", "services",
                "company", "companies", "the", "a", "an", "for", "in", "and", "or",
            ]),
            question_words: words(&[
                "how", "what", "why", "when", "where", "who", "which", "can", "does", "do", "is",
                "are", "should",
            ]),
            dangling_words: words(&[
                "to", "is", "the", "a", "an", "for", "of", "do", "does", "can", "are", "in",
                "with", "and", "or", "my", "i",
            ]),
            extra_patterns: Vec::new(),
        }
    }
}

impl LowQualityPolicy {
    /// Compile the policy into a matcher, rejecting invalid regexes.
    pub fn compile(&self) -> Result<CompiledPolicy> {
        let patterns = self
            .extra_patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("(?i){pattern}")).map_err(|e| {
                    AdforgeError::Config(format!("Invalid keyword pattern '{pattern}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let lower = |list: &[String]| -> Vec<String> { list.iter().map(|w| w.to_lowercase()).collect() };
        Ok(CompiledPolicy {
            reject_adjacent_duplicates: self.reject_adjacent_duplicates,
            vague_terms: lower(&self.vague_terms),
            question_words: lower(&self.question_words),
            dangling_words: lower(&self.dangling_words),
            patterns,
        })
    }
}

/// Ready-to-evaluate form of [`LowQualityPolicy`].
#[derive(Debug, Clone)]
pub struct CompiledPolicy {
    reject_adjacent_duplicates: bool,
    vague_terms: Vec<String>,
    question_words: Vec<String>,
    dangling_words: Vec<String>,
    patterns: Vec<Regex>,
}

/// Why a keyword was classified low quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowQualityReason {
    RepeatedWord,
    VagueOnly,
    IncompleteQuestion,
    Pattern,
}

impl CompiledPolicy {
    /// Classify an already-cleaned keyword. `None` means the keyword is acceptable.
    pub fn classify(&self, keyword: &str) -> Option<LowQualityReason> {
        let lowered = keyword.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        if self.reject_adjacent_duplicates && words.windows(2).any(|pair| pair.first() == pair.last())
        {
            return Some(LowQualityReason::RepeatedWord);
        }

        if !words.is_empty() && words.iter().all(|w| self.vague_terms.iter().any(|v| v == w)) {
            return Some(LowQualityReason::VagueOnly);
        }

        if let (Some(first), Some(last)) = (words.first(), words.last())
            && self.question_words.iter().any(|q| q == first)
            && (words.len() == 1 || self.dangling_words.iter().any(|d| d == last))
        {
            return Some(LowQualityReason::IncompleteQuestion);
        }

        if self.patterns.iter().any(|re| re.is_match(keyword)) {
            return Some(LowQualityReason::Pattern);
        }

        None
    }
}

/// Everything the compiler, repairer and validator can be tuned with.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ExportConfig {
    pub limits: FieldLimits,
    pub defaults: CampaignDefaults,
    pub repair: RepairDefaults,
    pub keyword_policy: LowQualityPolicy,
}

impl ExportConfig {
    /// Load a config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse a config from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse config JSON")
    }

    /// Serialize config to a pretty JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| AdforgeError::Config("Failed to determine config directory".to_owned()))?;
    Ok(base.join("adforge").join("config.json"))
}

/// Load the stored config, falling back to defaults when it is missing or unreadable.
pub fn load_export_config() -> ExportConfig {
    let Ok(path) = get_config_path() else {
        return ExportConfig::default();
    };
    if !path.exists() {
        return ExportConfig::default();
    }
    match ExportConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring unreadable config {}: {e}", path.display());
            ExportConfig::default()
        }
    }
}

pub fn save_export_config(config: &ExportConfig) -> Result<PathBuf> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, config.to_json()?)?;
    Ok(path)
}
