//! Structure-to-rows compiler.
//!
//! Walks a [`CampaignStructure`] in order and emits one [`CsvRow`] per
//! entity. Bad keywords and duplicate ads are dropped silently; thin ads are
//! repaired. The only hard failure is a structure with no campaigns.
//!
//! All tracking state (seen keywords, counters) lives on a [`RowCompiler`]
//! created per call, so concurrent compiles never share anything.

use super::columns::{description_column, headline_column};
use super::keywords::{DropReason, KeywordKind, KeywordNormalizer, clean_name};
use super::row::{CsvRow, RowType};
use crate::config::{CompiledPolicy, ExportConfig};
use crate::error::{AdforgeError, Result};
use crate::model::{
    Ad, AdGroup, Campaign, CampaignStructure, Extension, Keyword, MatchType, SitelinkEntry,
};
use crate::repair::repair_with;
use crate::utils::{collapse_whitespace, truncate_at_word, truncate_chars};
use serde::Serialize;
use std::collections::HashSet;

/// Counters describing what the compiler kept, dropped and repaired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileStats {
    pub campaigns: usize,
    pub ad_groups: usize,
    pub keywords: usize,
    pub negative_keywords: usize,
    pub ads: usize,
    pub sitelinks: usize,
    pub dropped_empty_keywords: usize,
    pub dropped_short_keywords: usize,
    pub dropped_low_quality_keywords: usize,
    pub duplicate_keywords: usize,
    pub duplicate_ads: usize,
    pub ads_over_limit: usize,
    pub skipped_ad_groups: usize,
    pub repaired_ads: usize,
    pub invalid_postal_codes: usize,
}

impl CompileStats {
    pub fn dropped_keywords(&self) -> usize {
        self.dropped_empty_keywords
            + self.dropped_short_keywords
            + self.dropped_low_quality_keywords
            + self.duplicate_keywords
    }

    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::Empty => self.dropped_empty_keywords += 1,
            DropReason::TooShort => self.dropped_short_keywords += 1,
            DropReason::LowQuality => self.dropped_low_quality_keywords += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub rows: Vec<CsvRow>,
    pub stats: CompileStats,
}

/// Compile with the default configuration.
pub fn compile(structure: &CampaignStructure) -> Result<Vec<CsvRow>> {
    compile_detailed(structure, &ExportConfig::default()).map(|output| output.rows)
}

/// Compile and report what was dropped or repaired along the way.
pub fn compile_detailed(
    structure: &CampaignStructure,
    config: &ExportConfig,
) -> Result<CompileOutput> {
    if structure.campaigns.is_empty() {
        return Err(AdforgeError::EmptyStructure);
    }

    let policy = config.keyword_policy.compile()?;
    let mut compiler = RowCompiler::new(config, &policy);
    for campaign in &structure.campaigns {
        compiler.compile_campaign(campaign);
    }

    let RowCompiler { rows, stats, .. } = compiler;
    tracing::info!(
        "Compiled {} rows: {} campaigns, {} ad groups, {} keywords ({} dropped), {} ads",
        rows.len(),
        stats.campaigns,
        stats.ad_groups,
        stats.keywords,
        stats.dropped_keywords(),
        stats.ads
    );
    Ok(CompileOutput { rows, stats })
}

/// Dedup state for one ad group: positives are unique per campaign,
/// negatives per ad group.
struct SeenKeywords<'s> {
    campaign: &'s mut HashSet<(String, MatchType)>,
    ad_group_negatives: HashSet<(String, MatchType)>,
}

/// Case-folded identity of a rendered ad.
type AdFingerprint = [String; 7];

struct RowCompiler<'a> {
    config: &'a ExportConfig,
    normalizer: KeywordNormalizer<'a>,
    rows: Vec<CsvRow>,
    stats: CompileStats,
}

impl<'a> RowCompiler<'a> {
    fn new(config: &'a ExportConfig, policy: &'a CompiledPolicy) -> Self {
        let limits = &config.limits;
        Self {
            config,
            normalizer: KeywordNormalizer {
                max_len: limits.keyword_max,
                positive_min_len: limits.keyword_min,
                negative_min_len: limits.negative_min,
                policy,
            },
            rows: Vec::new(),
            stats: CompileStats::default(),
        }
    }

    fn row(&self, row_type: RowType) -> CsvRow {
        CsvRow::new(row_type, &self.config.defaults.operation)
    }

    fn compile_campaign(&mut self, campaign: &Campaign) {
        let name = clean_name(&campaign.name);
        let row = self.campaign_row(campaign, &name);
        self.rows.push(row);
        self.stats.campaigns += 1;

        // Keyed per campaign: a keyword repeated in two ad groups of the same
        // campaign is emitted once.
        let mut seen_keywords = HashSet::new();
        for ad_group in &campaign.ad_groups {
            let ad_group_name = clean_name(&ad_group.name);
            if ad_group_name.is_empty() {
                tracing::warn!(
                    "Skipping ad group with empty name in campaign '{name}' ({} keywords)",
                    ad_group.keywords.len()
                );
                self.stats.skipped_ad_groups += 1;
                continue;
            }
            self.compile_ad_group(&name, &ad_group_name, ad_group, &mut seen_keywords);
        }
    }

    fn campaign_row(&mut self, campaign: &Campaign, name: &str) -> CsvRow {
        let config = self.config;
        let defaults = &config.defaults;
        let mut row = self.row(RowType::Campaign);
        row.set("Campaign", name);
        row.set(
            "Campaign status",
            non_blank(campaign.status.as_deref()).unwrap_or(defaults.campaign_status.as_str()),
        );
        row.set(
            "Campaign type",
            non_blank(campaign.campaign_type.as_deref()).unwrap_or(defaults.campaign_type.as_str()),
        );
        if let Some(budget) = &campaign.budget {
            row.set("Budget", budget.to_string());
        }
        row.set(
            "Budget type",
            non_blank(campaign.budget_type.as_deref()).unwrap_or(defaults.budget_type.as_str()),
        );
        row.set(
            "Bid strategy type",
            non_blank(campaign.bidding_strategy.as_deref()).unwrap_or(defaults.bid_strategy.as_str()),
        );
        row.set("Networks", &defaults.networks);
        row.set("Languages", &defaults.languages);
        row.set_opt("Start date", campaign.start_date.as_deref());
        row.set_opt("End date", campaign.end_date.as_deref());

        row.set_opt("Country", campaign.country.as_deref());
        row.set_opt("State", first_non_blank(&campaign.states));
        row.set_opt("Region", first_non_blank(&campaign.regions));
        self.set_multi_location(&mut row, &campaign.cities, &campaign.zip_codes);
        row
    }

    /// City and postal code take comma-joined lists; invalid ZIPs are dropped.
    fn set_multi_location(&mut self, row: &mut CsvRow, cities: &[String], zips: &[String]) {
        let cities = dedup_trimmed(cities.iter().map(String::as_str));
        if !cities.is_empty() {
            row.set("City", cities.join(", "));
        }

        let candidates = dedup_trimmed(zips.iter().map(String::as_str));
        let (valid, invalid): (Vec<&str>, Vec<&str>) =
            candidates.into_iter().partition(|zip| is_postal_code(zip));
        if !invalid.is_empty() {
            tracing::debug!("Dropping invalid postal codes: {}", invalid.join(", "));
            self.stats.invalid_postal_codes += invalid.len();
        }
        if !valid.is_empty() {
            row.set("Postal code", valid.join(", "));
        }
    }

    fn compile_ad_group(
        &mut self,
        campaign: &str,
        name: &str,
        ad_group: &AdGroup,
        seen_keywords: &mut HashSet<(String, MatchType)>,
    ) {
        let config = self.config;
        let defaults = &config.defaults;
        let mut row = self.row(RowType::AdGroup);
        row.set("Campaign", campaign);
        row.set("Ad group", name);
        row.set("Ad group status", &defaults.ad_group_status);
        row.set("Ad group type", &defaults.ad_group_type);
        if let Some(cpc) = &ad_group.default_max_cpc {
            row.set("Default max CPC", cpc.to_string());
        }
        if ad_group.has_location_override() {
            row.set_opt("State", first_non_blank(&ad_group.states));
            self.set_multi_location(&mut row, &ad_group.cities, &ad_group.zip_codes);
        }
        self.rows.push(row);
        self.stats.ad_groups += 1;

        // Negative rows are scoped to this ad group, so their dedup is too.
        let mut seen = SeenKeywords {
            campaign: seen_keywords,
            ad_group_negatives: HashSet::new(),
        };
        for keyword in &ad_group.keywords {
            self.compile_keyword(campaign, name, keyword, KeywordKind::Positive, &mut seen);
        }

        let emitted_ads = self.compile_ads(campaign, name, &ad_group.ads);

        for negative in &ad_group.negative_keywords {
            self.compile_keyword(campaign, name, negative, KeywordKind::Negative, &mut seen);
        }

        self.compile_sitelinks(campaign, name, &emitted_ads);
    }

    fn compile_keyword(
        &mut self,
        campaign: &str,
        ad_group: &str,
        keyword: &Keyword,
        kind: KeywordKind,
        seen: &mut SeenKeywords<'_>,
    ) {
        let normalized = match self.normalizer.normalize(keyword, kind) {
            Ok(normalized) => normalized,
            Err(reason) => {
                tracing::debug!("Dropping keyword '{}' ({reason:?})", keyword.text());
                self.stats.record_drop(reason);
                return;
            }
        };

        let seen_set = match normalized.kind {
            KeywordKind::Positive => &mut *seen.campaign,
            KeywordKind::Negative => &mut seen.ad_group_negatives,
        };
        if !seen_set.insert(normalized.dedup_key()) {
            self.stats.duplicate_keywords += 1;
            return;
        }

        let config = self.config;
        let (row_type, status) = match normalized.kind {
            KeywordKind::Positive => (RowType::Keyword, Some(&config.defaults.keyword_status)),
            KeywordKind::Negative => (RowType::NegativeKeyword, None),
        };
        let mut row = self.row(row_type);
        row.set("Campaign", campaign);
        row.set("Ad group", ad_group);
        row.set("Keyword", &normalized.text);
        row.set("Match type", normalized.match_type.editor_label());
        if let Some(status) = status {
            row.set("Keyword status", status);
            if let Some(cpc) = keyword.max_cpc() {
                row.set("Max CPC", cpc.to_string());
            }
            row.set_opt("Final URL", keyword.final_url());
        }
        self.rows.push(row);

        match normalized.kind {
            KeywordKind::Positive => self.stats.keywords += 1,
            KeywordKind::Negative => self.stats.negative_keywords += 1,
        }
    }

    /// Repair, dedupe and cap ads; returns the ads that were emitted.
    fn compile_ads(&mut self, campaign: &str, ad_group: &str, ads: &[Ad]) -> Vec<Ad> {
        let outcome = repair_with(ads, self.config);
        self.stats.repaired_ads += outcome.report.fixed;

        let cap = self.config.limits.ads_per_ad_group;
        let mut seen: HashSet<AdFingerprint> = HashSet::new();
        let mut emitted = Vec::new();
        for ad in outcome.ads {
            if !seen.insert(fingerprint(&ad)) {
                self.stats.duplicate_ads += 1;
                continue;
            }
            if emitted.len() >= cap {
                self.stats.ads_over_limit += 1;
                continue;
            }
            let row = self.ad_row(campaign, ad_group, &ad);
            self.rows.push(row);
            emitted.push(ad);
        }

        self.stats.ads += emitted.len();
        emitted
    }

    fn ad_row(&self, campaign: &str, ad_group: &str, ad: &Ad) -> CsvRow {
        let limits = &self.config.limits;
        let defaults = &self.config.defaults;
        let row_type = match ad {
            Ad::CallOnly(_) => RowType::CallOnlyAd,
            Ad::Rsa(_) | Ad::Dki(_) => RowType::ResponsiveSearchAd,
        };

        let mut row = self.row(row_type);
        row.set("Campaign", campaign);
        row.set("Ad group", ad_group);
        row.set("Ad type", row_type.label());
        row.set("Ad status", &defaults.ad_status);
        row.set_opt("Final URL", ad.final_url());

        for (n, headline) in ad.headlines().into_iter().enumerate().take(limits.rsa_max_headlines) {
            row.set(&headline_column(n + 1), truncate_at_word(headline, limits.headline));
        }
        for (n, description) in ad
            .descriptions()
            .into_iter()
            .enumerate()
            .take(limits.rsa_max_descriptions)
        {
            row.set(
                &description_column(n + 1),
                truncate_at_word(description, limits.description),
            );
        }

        let (path1, path2) = ad.paths();
        if let Some(path) = non_blank(path1) {
            row.set("Path 1", truncate_chars(path, limits.path));
        }
        if let Some(path) = non_blank(path2) {
            row.set("Path 2", truncate_chars(path, limits.path));
        }

        match ad {
            Ad::Rsa(rsa) => {
                row.set_opt("Final mobile URL", rsa.final_mobile_url.as_deref());
                row.set_opt("Tracking template", rsa.tracking_template.as_deref());
            }
            Ad::Dki(dki) => {
                row.set_opt("Final mobile URL", dki.final_mobile_url.as_deref());
                row.set_opt("Tracking template", dki.tracking_template.as_deref());
            }
            Ad::CallOnly(call) => {
                row.set("Business name", &call.business_name);
                row.set("Phone number", &call.phone_number);
                row.set(
                    "Country code",
                    non_blank(call.country_code.as_deref()).unwrap_or(defaults.country_code.as_str()),
                );
                row.set_opt("Verification URL", call.verification_url.as_deref());
                row.set_opt("Display URL", call.display_url.as_deref());
            }
        }

        self.flatten_extensions(&mut row, ad.extensions());
        row
    }

    /// Callouts fill `Callout 1..4`; the first snippet, call and price
    /// extensions fill their columns. Sitelinks get their own rows.
    fn flatten_extensions(&self, row: &mut CsvRow, extensions: &[Extension]) {
        let limits = &self.config.limits;
        let callouts = dedup_trimmed(
            extensions
                .iter()
                .filter_map(|ext| match ext {
                    Extension::Callout { callouts } => Some(callouts),
                    _ => None,
                })
                .flatten()
                .map(String::as_str),
        );
        for (n, callout) in callouts.into_iter().take(limits.callouts_per_ad).enumerate() {
            row.set(&format!("Callout {}", n + 1), truncate_at_word(callout, limits.callout));
        }

        let mut snippet_done = false;
        let mut call_done = false;
        let mut price_done = false;
        for extension in extensions {
            match extension {
                Extension::Snippet { header, values } if !snippet_done => {
                    snippet_done = true;
                    row.set("Structured snippet header", header.trim());
                    let values = dedup_trimmed(values.iter().map(String::as_str));
                    row.set("Structured snippet values", values.join(";"));
                }
                Extension::Call {
                    phone_number,
                    country_code,
                } if !call_done && !phone_number.trim().is_empty() => {
                    call_done = true;
                    row.set("Call phone number", phone_number.trim());
                    row.set(
                        "Call country code",
                        non_blank(country_code.as_deref())
                            .unwrap_or(self.config.defaults.country_code.as_str()),
                    );
                }
                Extension::Price {
                    price_type,
                    qualifier,
                    currency,
                    items,
                } if !price_done => {
                    price_done = true;
                    row.set_opt("Price type", price_type.as_deref());
                    row.set_opt("Price qualifier", qualifier.as_deref());
                    row.set_opt("Price currency", currency.as_deref());
                    if let Some(item) = items.first() {
                        row.set_opt("Price item header", Some(item.header.as_str()));
                        row.set_opt("Price item description", Some(item.description.as_str()));
                        if let Some(price) = &item.price {
                            row.set("Price amount", price.to_string());
                        }
                        row.set_opt("Price unit", item.unit.as_deref());
                        row.set_opt("Price final URL", item.final_url.as_deref());
                    }
                }
                _ => {}
            }
        }
    }

    /// One row per distinct sitelink across the emitted ads, capped per ad group.
    fn compile_sitelinks(&mut self, campaign: &str, ad_group: &str, ads: &[Ad]) {
        let config = self.config;
        let limits = &config.limits;
        let mut seen = HashSet::new();
        let links: Vec<&SitelinkEntry> = ads
            .iter()
            .flat_map(Ad::extensions)
            .filter_map(|ext| match ext {
                Extension::Sitelink { links } => Some(links),
                _ => None,
            })
            .flatten()
            .filter(|link| !link.text.trim().is_empty() || !link.final_url.trim().is_empty())
            .filter(|link| {
                seen.insert((
                    link.text.trim().to_lowercase(),
                    link.final_url.trim().to_lowercase(),
                ))
            })
            .take(limits.sitelinks_per_ad_group)
            .collect();

        for (index, link) in links.iter().enumerate() {
            let n = index + 1;
            let mut row = self.row(RowType::Sitelink);
            row.set("Campaign", campaign);
            row.set("Ad group", ad_group);
            row.set(
                &format!("Sitelink text {n}"),
                truncate_at_word(&link.text, limits.sitelink_text),
            );
            row.set(&format!("Sitelink final URL {n}"), link.final_url.trim());
            if index == 0 {
                if let Some(description) = non_blank(link.description1.as_deref()) {
                    row.set(
                        "Sitelink description 1",
                        truncate_at_word(description, limits.sitelink_description),
                    );
                }
                if let Some(description) = non_blank(link.description2.as_deref()) {
                    row.set(
                        "Sitelink description 2",
                        truncate_at_word(description, limits.sitelink_description),
                    );
                }
            }
            self.rows.push(row);
        }
        self.stats.sitelinks += links.len();
    }
}

fn fingerprint(ad: &Ad) -> AdFingerprint {
    let fold = |text: Option<&str>| collapse_whitespace(text.unwrap_or_default()).to_lowercase();
    let headlines = ad.headlines();
    let descriptions = ad.descriptions();
    [
        ad.kind().to_owned(),
        fold(headlines.first().copied()),
        fold(headlines.get(1).copied()),
        fold(headlines.get(2).copied()),
        fold(descriptions.first().copied()),
        fold(descriptions.get(1).copied()),
        fold(ad.final_url()),
    ]
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn first_non_blank(values: &[String]) -> Option<&str> {
    values.iter().map(|v| v.trim()).find(|v| !v.is_empty())
}

/// Trimmed, non-blank values with case-insensitive duplicates removed, in order.
fn dedup_trimmed<'v>(values: impl Iterator<Item = &'v str>) -> Vec<&'v str> {
    let mut seen = HashSet::new();
    values
        .map(str::trim)
        .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
        .collect()
}

/// US ZIP: `NNNNN` or `NNNNN-NNNN`.
fn is_postal_code(value: &str) -> bool {
    let (base, plus4) = match value.split_once('-') {
        Some((base, plus4)) => (base, Some(plus4)),
        None => (value, None),
    };
    let digits = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_digit());
    digits(base, 5) && plus4.is_none_or(|p| digits(p, 4))
}
