//! Row validation.
//!
//! Re-walks compiled (or imported) rows and reports what the Editor would
//! reject. Validation never fails: every problem becomes a row-addressed
//! message and the caller decides whether errors block the export.

use crate::config::FieldLimits;
use crate::editor::columns::{description_column, headline_column};
use crate::editor::row::{CsvRow, RowType};
use crate::error::{AdforgeError, Result};
use crate::utils::char_len;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

const OPERATIONS: [&str; 3] = ["ADD", "EDIT", "REMOVE"];
const POSITIVE_MATCH_TYPES: [&str; 3] = ["Broad", "Phrase", "Exact"];
const NEGATIVE_MATCH_TYPES: [&str; 3] = ["Negative Broad", "Negative Phrase", "Negative Exact"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A problem found on one row, or on the file as a whole when `row` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    /// 1-based data row number (the header is not counted)
    pub row: Option<usize>,
    pub message: String,
}

impl RowIssue {
    fn row(row: usize, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            message: message.into(),
        }
    }

    fn file(message: impl Into<String>) -> Self {
        Self {
            row: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.row {
            Some(row) => write!(f, "Row {row}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of validating a row set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True when `errors` is empty; warnings never affect it
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Turn a report with errors into [`AdforgeError::Validation`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_valid {
            Ok(self)
        } else {
            Err(AdforgeError::Validation {
                errors: self.errors,
            })
        }
    }
}

/// Validate rows against the default Editor limits.
pub fn validate_rows(rows: &[CsvRow]) -> ValidationReport {
    validate_rows_with(rows, &FieldLimits::default())
}

pub fn validate_rows_with(rows: &[CsvRow], limits: &FieldLimits) -> ValidationReport {
    let mut validator = RowValidator::new(limits);
    if rows.is_empty() {
        validator.errors.push(RowIssue::file("No rows to export"));
    }
    for (index, row) in rows.iter().enumerate() {
        validator.check_row(index + 1, row);
    }
    validator.finish()
}

#[derive(Debug, Default)]
struct CampaignTally {
    row: usize,
    ad_groups: usize,
}

#[derive(Debug, Default)]
struct AdGroupTally {
    row: usize,
    keywords: usize,
    ads: usize,
}

struct RowValidator<'a> {
    limits: &'a FieldLimits,
    errors: Vec<RowIssue>,
    warnings: Vec<RowIssue>,
    campaigns: IndexMap<String, CampaignTally>,
    ad_groups: IndexMap<(String, String), AdGroupTally>,
    seen_keywords: HashSet<(String, String, String, String)>,
}

impl<'a> RowValidator<'a> {
    fn new(limits: &'a FieldLimits) -> Self {
        Self {
            limits,
            errors: Vec::new(),
            warnings: Vec::new(),
            campaigns: IndexMap::new(),
            ad_groups: IndexMap::new(),
            seen_keywords: HashSet::new(),
        }
    }

    fn error(&mut self, row: usize, message: impl Into<String>) {
        self.errors.push(RowIssue::row(row, message));
    }

    fn warn(&mut self, row: usize, message: impl Into<String>) {
        self.warnings.push(RowIssue::row(row, message));
    }

    fn check_row(&mut self, n: usize, row: &CsvRow) {
        let Some(type_value) = row.get_trimmed("Type") else {
            self.error(n, "Type is required");
            return;
        };
        let Ok(row_type) = type_value.parse::<RowType>() else {
            self.error(n, format!("Unknown row type \"{type_value}\""));
            return;
        };

        match row.get_trimmed("Operation") {
            None => self.error(n, "Operation is required"),
            Some(op) if !OPERATIONS.iter().any(|known| known.eq_ignore_ascii_case(op)) => {
                self.error(n, format!("Invalid operation \"{op}\""));
            }
            Some(_) => {}
        }

        match row_type {
            RowType::Campaign => self.check_campaign(n, row),
            RowType::AdGroup => self.check_ad_group(n, row),
            RowType::Keyword => self.check_keyword(n, row),
            RowType::NegativeKeyword => self.check_negative(n, row),
            RowType::ResponsiveSearchAd => self.check_rsa(n, row),
            RowType::CallOnlyAd => self.check_call_only(n, row),
            RowType::Sitelink => self.check_sitelink(n, row),
        }
    }

    fn check_campaign(&mut self, n: usize, row: &CsvRow) {
        let Some(name) = row.get_trimmed("Campaign") else {
            self.error(n, "Campaign name is required");
            return;
        };
        if self.campaigns.contains_key(name) {
            self.warn(n, format!("Duplicate campaign \"{name}\""));
        } else {
            self.campaigns.insert(
                name.to_owned(),
                CampaignTally {
                    row: n,
                    ad_groups: 0,
                },
            );
        }

        if let Some(budget) = row.get_trimmed("Budget") {
            match parse_amount(budget) {
                None => self.error(n, "Budget must be a number"),
                Some(value) if value <= 0.0 => self.error(n, "Budget must be greater than 0"),
                Some(_) => {}
            }
        }

        let start = self.check_date(n, row, "Start date");
        let end = self.check_date(n, row, "End date");
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            self.warn(n, "End date is before start date");
        }
    }

    fn check_date(&mut self, n: usize, row: &CsvRow, column: &str) -> Option<NaiveDate> {
        let value = row.get_trimmed(column)?;
        let parsed = NaiveDate::parse_from_str(value, DATE_FORMAT)
            .ok()
            .filter(|_| value.len() == 10);
        if parsed.is_none() {
            self.error(n, format!("{column} must be in YYYY-MM-DD format"));
        }
        parsed
    }

    fn check_ad_group(&mut self, n: usize, row: &CsvRow) {
        let campaign = row.get_trimmed("Campaign");
        if campaign.is_none() {
            self.error(n, "Campaign name is required");
        }
        let Some(name) = row.get_trimmed("Ad group") else {
            self.error(n, "Ad group name is required");
            return;
        };
        let Some(campaign) = campaign else {
            return;
        };

        match self.campaigns.get_mut(campaign) {
            Some(tally) => tally.ad_groups += 1,
            None => self.error(
                n,
                format!("Ad group \"{name}\" appears before its campaign \"{campaign}\""),
            ),
        }

        let key = (campaign.to_owned(), name.to_owned());
        if self.ad_groups.contains_key(&key) {
            self.warn(n, format!("Duplicate ad group \"{name}\""));
        } else {
            self.ad_groups.insert(
                key,
                AdGroupTally {
                    row: n,
                    ..AdGroupTally::default()
                },
            );
        }

        if let Some(cpc) = row.get_trimmed("Default max CPC")
            && parse_amount(cpc).is_none()
        {
            self.error(n, "Default max CPC must be a number");
        }
    }

    /// Require campaign and ad group names and an earlier `Ad group` row.
    fn parent_ad_group(&mut self, n: usize, row: &CsvRow) -> Option<&mut AdGroupTally> {
        let row_type = row.get("Type").trim().to_owned();
        let campaign = row.get_trimmed("Campaign");
        let ad_group = row.get_trimmed("Ad group");
        if campaign.is_none() {
            self.error(n, "Campaign name is required");
        }
        if ad_group.is_none() {
            self.error(n, "Ad group name is required");
        }
        let key = (campaign?.to_owned(), ad_group?.to_owned());
        if !self.ad_groups.contains_key(&key) {
            self.error(
                n,
                format!(
                    "{row_type} references ad group \"{}\" before its Ad group row",
                    key.1
                ),
            );
            return None;
        }
        self.ad_groups.get_mut(&key)
    }

    fn check_keyword(&mut self, n: usize, row: &CsvRow) {
        if let Some(tally) = self.parent_ad_group(n, row) {
            tally.keywords += 1;
        }

        let Some(text) = row.get_trimmed("Keyword") else {
            self.error(n, "Keyword text is required");
            return;
        };
        let match_type = row.get("Match type").trim();
        if !POSITIVE_MATCH_TYPES.contains(&match_type) {
            self.error(n, format!("Invalid match type \"{match_type}\""));
        }
        self.check_keyword_text(n, text);
        self.check_duplicate_keyword(n, row, text, match_type);

        if let Some(cpc) = row.get_trimmed("Max CPC")
            && parse_amount(cpc).is_none()
        {
            self.error(n, "Max CPC must be a number");
        }
        if let Some(url) = row.get_trimmed("Final URL") {
            match check_url(url) {
                UrlCheck::Https => {}
                UrlCheck::Insecure => self.warn(n, "Final URL should use https://"),
                UrlCheck::Invalid => self.error(n, format!("Final URL \"{url}\" is not a valid URL")),
            }
        }
    }

    fn check_negative(&mut self, n: usize, row: &CsvRow) {
        if row.get_trimmed("Ad group").is_some() {
            self.parent_ad_group(n, row);
        } else if let Some(campaign) = row.get_trimmed("Campaign") {
            if !self.campaigns.contains_key(campaign) {
                self.error(
                    n,
                    format!("Negative keyword appears before its campaign \"{campaign}\""),
                );
            }
        } else {
            self.error(n, "Campaign name is required");
        }

        let Some(text) = row.get_trimmed("Keyword") else {
            self.error(n, "Keyword text is required");
            return;
        };
        let match_type = row.get("Match type").trim();
        if !NEGATIVE_MATCH_TYPES.contains(&match_type) {
            self.error(n, format!("Invalid match type \"{match_type}\""));
        }
        self.check_keyword_text(n, text);
        self.check_duplicate_keyword(n, row, text, match_type);
    }

    fn check_keyword_text(&mut self, n: usize, text: &str) {
        let len = char_len(text);
        if len > self.limits.keyword_max {
            self.warn(
                n,
                format!(
                    "Keyword exceeds {} characters ({len} chars)",
                    self.limits.keyword_max
                ),
            );
        }
        if text.contains(['[', ']', '"']) {
            self.warn(n, "Keyword text contains match type punctuation");
        }
    }

    fn check_duplicate_keyword(&mut self, n: usize, row: &CsvRow, text: &str, match_type: &str) {
        let key = (
            row.get("Campaign").trim().to_owned(),
            row.get("Ad group").trim().to_owned(),
            text.to_lowercase(),
            match_type.to_owned(),
        );
        if !self.seen_keywords.insert(key) {
            self.warn(n, format!("Duplicate keyword \"{text}\" ({match_type})"));
        }
    }

    fn check_final_url(&mut self, n: usize, row: &CsvRow) {
        match row.get_trimmed("Final URL") {
            None => self.error(n, "Final URL is required for ad"),
            Some(url) => match check_url(url) {
                UrlCheck::Https => {}
                UrlCheck::Insecure => self.error(n, "Final URL must use https://"),
                UrlCheck::Invalid => self.error(n, format!("Final URL \"{url}\" is not a valid URL")),
            },
        }
    }

    fn check_rsa(&mut self, n: usize, row: &CsvRow) {
        if let Some(tally) = self.parent_ad_group(n, row) {
            tally.ads += 1;
        }
        self.check_final_url(n, row);

        let limits = self.limits;
        let headlines = self.check_text_slots(
            n,
            row,
            limits.rsa_max_headlines,
            headline_column,
            limits.headline,
        );
        if headlines < limits.rsa_min_headlines {
            self.error(
                n,
                format!(
                    "Responsive search ads require at least {} headlines",
                    limits.rsa_min_headlines
                ),
            );
        }
        let descriptions = self.check_text_slots(
            n,
            row,
            limits.rsa_max_descriptions,
            description_column,
            limits.description,
        );
        if descriptions < limits.rsa_min_descriptions {
            self.error(
                n,
                format!(
                    "Responsive search ads require at least {} descriptions",
                    limits.rsa_min_descriptions
                ),
            );
        }

        for column in ["Path 1", "Path 2"] {
            if let Some(path) = row.get_trimmed(column) {
                if char_len(path) > limits.path {
                    self.warn(n, format!("{column} exceeds {} characters", limits.path));
                }
                if path.contains(char::is_whitespace) {
                    self.warn(n, format!("{column} contains spaces"));
                }
            }
        }
    }

    /// Count non-empty numbered slots and flag any over `max_len`.
    fn check_text_slots(
        &mut self,
        n: usize,
        row: &CsvRow,
        slots: usize,
        column: fn(usize) -> String,
        max_len: usize,
    ) -> usize {
        let mut filled = 0;
        for slot in 1..=slots {
            let name = column(slot);
            let Some(text) = row.get_trimmed(&name) else {
                continue;
            };
            filled += 1;
            let len = char_len(text);
            if len > max_len {
                self.error(n, format!("{name} exceeds {max_len} characters ({len} chars)"));
            }
        }
        filled
    }

    fn check_call_only(&mut self, n: usize, row: &CsvRow) {
        if let Some(tally) = self.parent_ad_group(n, row) {
            tally.ads += 1;
        }

        let limits = self.limits;
        let required = [
            ("Headline 1", limits.headline),
            ("Headline 2", limits.headline),
            ("Description 1", limits.description),
            ("Description 2", limits.description),
            ("Business name", limits.business_name),
            ("Phone number", usize::MAX),
        ];
        for (column, max_len) in required {
            match row.get_trimmed(column) {
                None => self.error(n, format!("{column} is required for call-only ad")),
                Some(text) if char_len(text) > max_len => {
                    let len = char_len(text);
                    self.error(n, format!("{column} exceeds {max_len} characters ({len} chars)"));
                }
                Some(_) => {}
            }
        }

        if let Some(url) = row.get_trimmed("Verification URL")
            && check_url(url) != UrlCheck::Https
        {
            self.error(n, "Verification URL must be a valid https:// URL");
        }
    }

    fn check_sitelink(&mut self, n: usize, row: &CsvRow) {
        self.parent_ad_group(n, row);

        let limits = self.limits;
        let mut complete = 0;
        for slot in 1..=limits.sitelinks_per_ad_group {
            let text = row.get_trimmed(&format!("Sitelink text {slot}"));
            let url = row.get_trimmed(&format!("Sitelink final URL {slot}"));
            match (text, url) {
                (None, None) => continue,
                (Some(_), None) => {
                    self.error(n, format!("Sitelink final URL {slot} is required"));
                }
                (None, Some(_)) => self.error(n, format!("Sitelink text {slot} is required")),
                (Some(text), Some(url)) => {
                    complete += 1;
                    if char_len(text) > limits.sitelink_text {
                        self.error(
                            n,
                            format!(
                                "Sitelink text {slot} exceeds {} characters",
                                limits.sitelink_text
                            ),
                        );
                    }
                    if check_url(url) != UrlCheck::Https {
                        self.error(n, format!("Sitelink final URL {slot} must use https://"));
                    }
                }
            }
        }
        if complete == 0 && self.errors.last().is_none_or(|issue| issue.row != Some(n)) {
            self.error(n, "Sitelink requires text and final URL");
        }
    }

    fn finish(mut self) -> ValidationReport {
        if !self.errors.iter().any(|issue| issue.row.is_none()) && self.campaigns.is_empty() {
            self.errors.push(RowIssue::file("No campaign rows found"));
        }

        let mut count_warnings = Vec::new();
        for (name, tally) in &self.campaigns {
            if tally.ad_groups == 0 {
                count_warnings.push(RowIssue::row(
                    tally.row,
                    format!("Campaign \"{name}\" has no ad groups"),
                ));
            }
        }
        for ((_, name), tally) in &self.ad_groups {
            if tally.keywords == 0 {
                count_warnings.push(RowIssue::row(
                    tally.row,
                    format!("Ad group \"{name}\" has no keywords"),
                ));
            }
            if tally.ads == 0 {
                count_warnings.push(RowIssue::row(
                    tally.row,
                    format!("Ad group \"{name}\" has no ads"),
                ));
            }
        }
        self.warnings.extend(count_warnings);

        if !self.errors.is_empty() {
            tracing::debug!(
                "Validation found {} error(s), {} warning(s)",
                self.errors.len(),
                self.warnings.len()
            );
        }

        ValidationReport {
            is_valid: self.errors.is_empty(),
            errors: self.errors.iter().map(ToString::to_string).collect(),
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlCheck {
    Https,
    Insecure,
    Invalid,
}

fn check_url(value: &str) -> UrlCheck {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "https" && url.host().is_some() => UrlCheck::Https,
        Ok(url) if url.scheme() == "http" => UrlCheck::Insecure,
        _ => UrlCheck::Invalid,
    }
}

/// Parse a money value, tolerating a leading currency symbol.
fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_start_matches(['$', '€', '£'])
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(row_type: RowType, fields: &[(&str, &str)]) -> CsvRow {
        let mut row = CsvRow::new(row_type, "ADD");
        for (column, value) in fields {
            row.set(column, *value);
        }
        row
    }

    fn valid_rows() -> Vec<CsvRow> {
        vec![
            row(RowType::Campaign, &[("Campaign", "Plumbing"), ("Budget", "50")]),
            row(RowType::AdGroup, &[("Campaign", "Plumbing"), ("Ad group", "Drains")]),
            row(
                RowType::Keyword,
                &[
                    ("Campaign", "Plumbing"),
                    ("Ad group", "Drains"),
                    ("Keyword", "drain cleaning"),
                    ("Match type", "Exact"),
                ],
            ),
            row(
                RowType::ResponsiveSearchAd,
                &[
                    ("Campaign", "Plumbing"),
                    ("Ad group", "Drains"),
                    ("Final URL", "https://example.com"),
                    ("Headline 1", "Fast Drain Cleaning"),
                    ("Headline 2", "Local Plumbers"),
                    ("Headline 3", "Call Today"),
                    ("Description 1", "Same day service."),
                    ("Description 2", "Licensed and insured."),
                ],
            ),
        ]
    }

    #[test]
    fn test_valid_rows() {
        let report = validate_rows(&valid_rows());
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_empty_rows() {
        let report = validate_rows(&[]);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["No rows to export".to_owned()]);
    }

    #[test]
    fn test_campaign_checks() {
        let rows = vec![row(
            RowType::Campaign,
            &[
                ("Campaign", "Plumbing"),
                ("Budget", "lots"),
                ("Start date", "2024-02-30"),
                ("End date", "03/01/2024"),
            ],
        )];
        let report = validate_rows(&rows);
        assert!(report.errors.contains(&"Row 1: Budget must be a number".to_owned()));
        assert!(
            report
                .errors
                .contains(&"Row 1: Start date must be in YYYY-MM-DD format".to_owned())
        );
        assert!(
            report
                .errors
                .contains(&"Row 1: End date must be in YYYY-MM-DD format".to_owned())
        );
    }

    #[test]
    fn test_end_before_start_is_warning() {
        let mut rows = valid_rows();
        if let Some(campaign) = rows.first_mut() {
            campaign.set("Start date", "2024-05-01");
            campaign.set("End date", "2024-04-01");
        }
        let report = validate_rows(&rows);
        assert!(report.is_valid);
        assert!(report.warnings.contains(&"Row 1: End date is before start date".to_owned()));
    }

    #[test]
    fn test_match_type_spellings() {
        let mut rows = valid_rows();
        rows.push(row(
            RowType::NegativeKeyword,
            &[
                ("Campaign", "Plumbing"),
                ("Ad group", "Drains"),
                ("Keyword", "cheap"),
                ("Match type", "NEGATIVE_EXACT"),
            ],
        ));
        let report = validate_rows(&rows);
        assert_eq!(
            report.errors,
            vec!["Row 5: Invalid match type \"NEGATIVE_EXACT\"".to_owned()]
        );
    }

    #[test]
    fn test_rsa_minimums_and_https() {
        let rows = vec![
            row(RowType::Campaign, &[("Campaign", "C")]),
            row(RowType::AdGroup, &[("Campaign", "C"), ("Ad group", "G")]),
            row(
                RowType::ResponsiveSearchAd,
                &[
                    ("Campaign", "C"),
                    ("Ad group", "G"),
                    ("Final URL", "http://example.com"),
                    ("Headline 1", "This headline is much too long for the Editor"),
                    ("Description 1", "Only one"),
                ],
            ),
        ];
        let report = validate_rows(&rows);
        assert!(!report.is_valid);
        assert!(report.errors.contains(&"Row 3: Final URL must use https://".to_owned()));
        assert!(
            report
                .errors
                .contains(&"Row 3: Responsive search ads require at least 3 headlines".to_owned())
        );
        assert!(
            report
                .errors
                .contains(&"Row 3: Responsive search ads require at least 2 descriptions".to_owned())
        );
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.starts_with("Row 3: Headline 1 exceeds 30 characters"))
        );
    }

    #[test]
    fn test_missing_final_url() {
        let mut rows = valid_rows();
        if let Some(ad) = rows.get_mut(3) {
            ad.set("Final URL", "");
        }
        let report = validate_rows(&rows);
        assert_eq!(report.errors, vec!["Row 4: Final URL is required for ad".to_owned()]);
    }

    #[test]
    fn test_child_before_parent() {
        let rows = vec![
            row(RowType::AdGroup, &[("Campaign", "C"), ("Ad group", "G")]),
            row(RowType::Campaign, &[("Campaign", "C")]),
        ];
        let report = validate_rows(&rows);
        assert!(
            report
                .errors
                .contains(&"Row 1: Ad group \"G\" appears before its campaign \"C\"".to_owned())
        );
    }

    #[test]
    fn test_count_warnings() {
        let rows = vec![
            row(RowType::Campaign, &[("Campaign", "Empty")]),
            row(RowType::Campaign, &[("Campaign", "C")]),
            row(RowType::AdGroup, &[("Campaign", "C"), ("Ad group", "G")]),
        ];
        let report = validate_rows(&rows);
        assert!(report.is_valid);
        assert_eq!(
            report.warnings,
            vec![
                "Row 1: Campaign \"Empty\" has no ad groups".to_owned(),
                "Row 3: Ad group \"G\" has no keywords".to_owned(),
                "Row 3: Ad group \"G\" has no ads".to_owned(),
            ]
        );
    }

    #[test]
    fn test_duplicate_keyword_warning() {
        let mut rows = valid_rows();
        rows.push(row(
            RowType::Keyword,
            &[
                ("Campaign", "Plumbing"),
                ("Ad group", "Drains"),
                ("Keyword", "Drain Cleaning"),
                ("Match type", "Exact"),
            ],
        ));
        let report = validate_rows(&rows);
        assert!(report.is_valid);
        assert_eq!(
            report.warnings,
            vec!["Row 5: Duplicate keyword \"Drain Cleaning\" (Exact)".to_owned()]
        );
    }

    #[test]
    fn test_unknown_type_and_operation() {
        let mut bad_type = CsvRow::default();
        bad_type.set("Type", "Banner");
        bad_type.set("Operation", "ADD");
        let mut bad_op = CsvRow::new(RowType::Campaign, "UPSERT");
        bad_op.set("Campaign", "C");
        let report = validate_rows(&[bad_type, bad_op]);
        assert!(report.errors.contains(&"Row 1: Unknown row type \"Banner\"".to_owned()));
        assert!(report.errors.contains(&"Row 2: Invalid operation \"UPSERT\"".to_owned()));
    }

    #[test]
    fn test_call_only_and_sitelink_checks() {
        let mut rows = valid_rows();
        rows.push(row(
            RowType::CallOnlyAd,
            &[
                ("Campaign", "Plumbing"),
                ("Ad group", "Drains"),
                ("Headline 1", "Call A Plumber"),
                ("Headline 2", "24/7 Service"),
                ("Description 1", "Fast response."),
                ("Description 2", "Local experts."),
                ("Phone number", "555 0100"),
            ],
        ));
        rows.push(row(
            RowType::Sitelink,
            &[
                ("Campaign", "Plumbing"),
                ("Ad group", "Drains"),
                ("Sitelink text 1", "Contact Us"),
                ("Sitelink final URL 1", "http://example.com/contact"),
            ],
        ));
        let report = validate_rows(&rows);
        assert_eq!(
            report.errors,
            vec![
                "Row 5: Business name is required for call-only ad".to_owned(),
                "Row 6: Sitelink final URL 1 must use https://".to_owned(),
            ]
        );
    }

    #[test]
    fn test_into_result() {
        let error = validate_rows(&[]).into_result().expect_err("invalid");
        assert!(error.to_string().contains("No rows to export"));
        assert!(validate_rows(&valid_rows()).into_result().is_ok());
    }
}
