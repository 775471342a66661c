//! Ad normalizer and repairer.
//!
//! Guarantees every ad meets its minimum-content and length rules without
//! ever dropping an ad: thin ads are padded with deterministic filler and
//! overlong fields are truncated. Each change is recorded in a
//! [`RepairReport`] which is informational only.

use crate::config::{ExportConfig, FieldLimits, RepairDefaults};
use crate::model::{Ad, CallOnlyAd, DkiAd, RsaAd};
use crate::utils::{char_len, truncate_at_word, truncate_chars};
use serde::{Deserialize, Serialize};

/// Fixes applied to one ad, addressed by its position in the input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepairDetail {
    pub index: usize,
    pub fixes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepairReport {
    /// Number of ads that needed at least one fix
    pub fixed: usize,
    pub details: Vec<RepairDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepairOutcome {
    pub ads: Vec<Ad>,
    pub report: RepairReport,
}

/// Repair ads with the default limits and filler text.
pub fn repair(ads: &[Ad]) -> RepairOutcome {
    repair_with(ads, &ExportConfig::default())
}

/// Repair ads using the limits and filler pools from `config`.
pub fn repair_with(ads: &[Ad], config: &ExportConfig) -> RepairOutcome {
    let repairer = Repairer {
        limits: &config.limits,
        defaults: &config.repair,
    };

    let mut report = RepairReport::default();
    let repaired = ads
        .iter()
        .enumerate()
        .map(|(index, ad)| {
            let mut fixes = Vec::new();
            let ad = repairer.repair_ad(ad, &mut fixes);
            if !fixes.is_empty() {
                tracing::debug!("Repaired {} ad #{index}: {}", ad.kind(), fixes.join("; "));
                report.fixed += 1;
                report.details.push(RepairDetail { index, fixes });
            }
            ad
        })
        .collect();

    RepairOutcome {
        ads: repaired,
        report,
    }
}

struct Repairer<'a> {
    limits: &'a FieldLimits,
    defaults: &'a RepairDefaults,
}

impl Repairer<'_> {
    fn repair_ad(&self, ad: &Ad, fixes: &mut Vec<String>) -> Ad {
        match ad {
            Ad::Rsa(rsa) => Ad::Rsa(self.repair_rsa(rsa, fixes)),
            Ad::Dki(dki) => Ad::Dki(self.repair_dki(dki, fixes)),
            Ad::CallOnly(call) => Ad::CallOnly(self.repair_call_only(call, fixes)),
        }
    }

    fn repair_rsa(&self, ad: &RsaAd, fixes: &mut Vec<String>) -> RsaAd {
        let headlines = repair_pool(
            &ad.headlines,
            &PoolRules {
                label: "headline",
                max_len: self.limits.headline,
                min_count: self.limits.rsa_min_headlines,
                max_count: self.limits.rsa_max_headlines,
                filler: &self.defaults.headlines,
            },
            fixes,
        );
        let descriptions = repair_pool(
            &ad.descriptions,
            &PoolRules {
                label: "description",
                max_len: self.limits.description,
                min_count: self.limits.rsa_min_descriptions,
                max_count: self.limits.rsa_max_descriptions,
                filler: &self.defaults.descriptions,
            },
            fixes,
        );

        RsaAd {
            headlines,
            descriptions,
            path1: self.repair_path(ad.path1.as_deref(), "Path 1", fixes),
            path2: self.repair_path(ad.path2.as_deref(), "Path 2", fixes),
            ..ad.clone()
        }
    }

    fn repair_dki(&self, ad: &DkiAd, fixes: &mut Vec<String>) -> DkiAd {
        let headline_limit = self.limits.headline;
        let description_limit = self.limits.description;

        let headline1 = fill_or_fit(&ad.headline1, "Headline 1", headline_limit, fixes, || {
            self.defaults.dki_headline.clone()
        });
        let headline2 = fill_or_fit(&ad.headline2, "Headline 2", headline_limit, fixes, || {
            next_filler(&self.defaults.headlines, &[headline1.as_str()], headline_limit)
        });
        let headline3 = fill_or_fit(&ad.headline3, "Headline 3", headline_limit, fixes, || {
            next_filler(
                &self.defaults.headlines,
                &[headline1.as_str(), headline2.as_str()],
                headline_limit,
            )
        });
        let description1 =
            fill_or_fit(&ad.description1, "Description 1", description_limit, fixes, || {
                next_filler(&self.defaults.descriptions, &[], description_limit)
            });
        let description2 =
            fill_or_fit(&ad.description2, "Description 2", description_limit, fixes, || {
                next_filler(
                    &self.defaults.descriptions,
                    &[description1.as_str()],
                    description_limit,
                )
            });

        DkiAd {
            headline1,
            headline2,
            headline3,
            description1,
            description2,
            path1: self.repair_path(ad.path1.as_deref(), "Path 1", fixes),
            path2: self.repair_path(ad.path2.as_deref(), "Path 2", fixes),
            ..ad.clone()
        }
    }

    fn repair_call_only(&self, ad: &CallOnlyAd, fixes: &mut Vec<String>) -> CallOnlyAd {
        let headline_limit = self.limits.headline;
        let description_limit = self.limits.description;

        let headline1 = fill_or_fit(&ad.headline1, "Headline 1", headline_limit, fixes, || {
            next_filler(&self.defaults.headlines, &[], headline_limit)
        });
        let headline2 = fill_or_fit(&ad.headline2, "Headline 2", headline_limit, fixes, || {
            next_filler(&self.defaults.headlines, &[headline1.as_str()], headline_limit)
        });
        let description1 =
            fill_or_fit(&ad.description1, "Description 1", description_limit, fixes, || {
                next_filler(&self.defaults.descriptions, &[], description_limit)
            });
        let description2 =
            fill_or_fit(&ad.description2, "Description 2", description_limit, fixes, || {
                next_filler(
                    &self.defaults.descriptions,
                    &[description1.as_str()],
                    description_limit,
                )
            });
        let business_name = fill_or_fit(
            &ad.business_name,
            "Business name",
            self.limits.business_name,
            fixes,
            || self.defaults.business_name.clone(),
        );
        let phone_number = if ad.phone_number.trim().is_empty() {
            fixes.push("Added default phone number".to_owned());
            self.defaults.phone_number.clone()
        } else {
            ad.phone_number.trim().to_owned()
        };

        CallOnlyAd {
            headline1,
            headline2,
            description1,
            description2,
            phone_number,
            business_name,
            ..ad.clone()
        }
    }

    fn repair_path(&self, path: Option<&str>, label: &str, fixes: &mut Vec<String>) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        if char_len(path) > self.limits.path {
            fixes.push(format!("{label} truncated to {} characters", self.limits.path));
            Some(truncate_chars(path, self.limits.path))
        } else {
            Some(path.to_owned())
        }
    }
}

struct PoolRules<'a> {
    label: &'a str,
    max_len: usize,
    min_count: usize,
    max_count: usize,
    filler: &'a [String],
}

/// Trim, truncate, dedupe, cap and pad a headline or description pool.
fn repair_pool(entries: &[String], rules: &PoolRules<'_>, fixes: &mut Vec<String>) -> Vec<String> {
    let label = rules.label;
    let mut pool: Vec<String> = Vec::with_capacity(entries.len());
    let mut empties = 0;

    for (position, entry) in entries.iter().enumerate() {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            empties += 1;
            continue;
        }
        let text = if char_len(trimmed) > rules.max_len {
            fixes.push(format!(
                "{} {} truncated to {} characters",
                capitalize(label),
                position + 1,
                rules.max_len
            ));
            truncate_at_word(trimmed, rules.max_len)
        } else {
            trimmed.to_owned()
        };
        if pool.iter().any(|existing| existing.eq_ignore_ascii_case(&text)) {
            fixes.push(format!("Removed duplicate {label} '{text}'"));
            continue;
        }
        pool.push(text);
    }

    if empties > 0 {
        fixes.push(format!("Removed {empties} empty {label}(s)"));
    }

    if pool.len() > rules.max_count {
        fixes.push(format!(
            "Dropped {} {label}(s) beyond the limit of {}",
            pool.len() - rules.max_count,
            rules.max_count
        ));
        pool.truncate(rules.max_count);
    }

    while pool.len() < rules.min_count {
        let present: Vec<&str> = pool.iter().map(String::as_str).collect();
        let filler = next_filler(rules.filler, &present, rules.max_len);
        fixes.push(format!("Added filler {label} '{filler}'"));
        pool.push(filler);
    }

    pool
}

/// Return `value` trimmed and within `max_len`, or a default when blank.
fn fill_or_fit(
    value: &str,
    label: &str,
    max_len: usize,
    fixes: &mut Vec<String>,
    default: impl FnOnce() -> String,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        let filled = truncate_at_word(&default(), max_len);
        fixes.push(format!("Added default {label} '{filled}'"));
        return filled;
    }
    if char_len(trimmed) > max_len {
        fixes.push(format!("{label} truncated to {max_len} characters"));
        return truncate_at_word(trimmed, max_len);
    }
    trimmed.to_owned()
}

/// First pool entry not already present once cut to `max_len`, compared
/// case-insensitively. The returned text always fits `max_len`.
fn next_filler(pool: &[String], present: &[&str], max_len: usize) -> String {
    let is_present = |candidate: &str| present.iter().any(|p| p.eq_ignore_ascii_case(candidate));
    if let Some(found) = pool
        .iter()
        .map(|candidate| truncate_at_word(candidate, max_len))
        .find(|candidate| !is_present(candidate))
    {
        return found;
    }

    // Pool exhausted: number the first entry until it is unique, keeping the suffix.
    let base = pool.first().map_or("Professional Service", String::as_str);
    (2..)
        .map(|n| {
            let suffix = format!(" {n}");
            let head = truncate_at_word(base, max_len.saturating_sub(char_len(&suffix)));
            format!("{head}{suffix}")
        })
        .find(|candidate| !is_present(candidate))
        .unwrap_or_else(|| truncate_at_word(base, max_len))
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
