//! Grouping strategies: each turns a keyword list into named ad group plans.
//!
//! Strategies only decide membership and names. Match-type fan-out, ads and
//! locations are applied uniformly afterwards in [`super::build`].

use super::default_ads::{FUNNEL_STAGES, funnel_stage_name};
use super::{StructureSettings, StructureType};
use crate::editor::keywords::clean_keyword_text;
use crate::model::{Keyword, MatchType};
use crate::utils::title_case;
use indexmap::IndexMap;

const SKAG_MAX_GROUPS: usize = 20;
const STAG_MAX_GROUPS: usize = 10;
const MIX_SINGLE_GROUPS: usize = 5;
const MIX_THEME_GROUPS: usize = 5;

/// Where a group's ads come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdPlan {
    /// Caller-supplied `ads`, or the generic stock ad
    Settings,
    Intent(String),
    Alpha,
    Beta,
    Funnel(String),
    Competitor,
}

/// One ad group before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPlan {
    pub name: String,
    pub keywords: Vec<Keyword>,
    pub ads: AdPlan,
    /// Restricts fan-out to these match types instead of the enabled set
    pub match_types: Option<Vec<MatchType>>,
    /// Copy the selected locations onto the ad group as well as the campaign
    pub location_override: bool,
}

impl GroupPlan {
    fn new(name: impl Into<String>, keywords: Vec<Keyword>) -> Self {
        Self {
            name: name.into(),
            keywords,
            ads: AdPlan::Settings,
            match_types: None,
            location_override: false,
        }
    }

    fn with_ads(mut self, ads: AdPlan) -> Self {
        self.ads = ads;
        self
    }

    fn with_location_override(mut self) -> Self {
        self.location_override = true;
        self
    }
}

/// Plan the ad groups of a single-campaign strategy.
///
/// `Geo` returns the fallback single group; per-geo campaigns are expanded
/// by the caller.
pub fn plan_groups(
    structure_type: StructureType,
    keywords: &[Keyword],
    settings: &StructureSettings,
    match_types: &[MatchType],
) -> Vec<GroupPlan> {
    match structure_type {
        StructureType::Skag => skag(keywords),
        StructureType::Stag => stag(keywords),
        StructureType::Mix => mix(keywords),
        StructureType::StagPlus => clustered(keywords, settings, "Smart Group", true),
        StructureType::Intent => intent(settings),
        StructureType::AlphaBeta => alpha_beta(keywords, settings),
        StructureType::MatchType => match_type_split(keywords, match_types),
        StructureType::Geo => vec![GroupPlan::new("Default Ad Group", keywords.to_vec())],
        StructureType::Funnel => funnel(settings),
        StructureType::BrandSplit => brand_split(keywords, settings),
        StructureType::Competitor => competitor(keywords, settings),
        StructureType::Ngram => clustered(keywords, settings, "Cluster", false),
    }
}

/// One group per keyword, named after it.
fn skag(keywords: &[Keyword]) -> Vec<GroupPlan> {
    keywords
        .iter()
        .take(SKAG_MAX_GROUPS)
        .map(|keyword| GroupPlan::new(clean_keyword_text(keyword.text()), vec![keyword.clone()]))
        .collect()
}

fn stag(keywords: &[Keyword]) -> Vec<GroupPlan> {
    cluster_by_first_word(keywords)
        .into_iter()
        .take(STAG_MAX_GROUPS)
        .enumerate()
        .map(|(index, (theme, members))| {
            GroupPlan::new(format!("Ad Group {} - {theme}", index + 1), members)
        })
        .collect()
}

/// Leading keywords as single-keyword groups, the rest by theme.
fn mix(keywords: &[Keyword]) -> Vec<GroupPlan> {
    let split = MIX_SINGLE_GROUPS.min(keywords.len());
    let (singles, rest) = keywords.split_at(split);

    let mut groups: Vec<GroupPlan> = singles
        .iter()
        .map(|keyword| {
            GroupPlan::new(clean_keyword_text(keyword.text()), vec![keyword.clone()])
                .with_location_override()
        })
        .collect();
    groups.extend(
        cluster_by_first_word(rest)
            .into_iter()
            .take(MIX_THEME_GROUPS)
            .enumerate()
            .map(|(index, (theme, members))| {
                GroupPlan::new(format!("Mixed Group {} - {theme}", index + 1), members)
                    .with_location_override()
            }),
    );
    groups
}

/// Caller-provided clusters, or first-word clustering when none are given.
fn clustered(
    keywords: &[Keyword],
    settings: &StructureSettings,
    prefix: &str,
    location_override: bool,
) -> Vec<GroupPlan> {
    let clusters: IndexMap<String, Vec<Keyword>> = match &settings.smart_clusters {
        Some(clusters) => clusters
            .iter()
            .map(|(name, members)| (name.clone(), to_keywords(members)))
            .collect(),
        None => cluster_by_first_word(keywords),
    };

    clusters
        .into_iter()
        .enumerate()
        .map(|(index, (name, members))| {
            let group = GroupPlan::new(format!("{prefix} {} - {name}", index + 1), members);
            if location_override {
                group.with_location_override()
            } else {
                group
            }
        })
        .collect()
}

fn intent(settings: &StructureSettings) -> Vec<GroupPlan> {
    settings
        .selected_intents()
        .iter()
        .filter_map(|intent| {
            let members = settings.intent_groups.get(intent.as_str())?;
            if members.is_empty() {
                return None;
            }
            Some(
                GroupPlan::new(format!("Intent: {}", title_case(intent)), to_keywords(members))
                    .with_ads(AdPlan::Intent(intent.clone())),
            )
        })
        .collect()
}

/// Beta (discovery) first, then Alpha (proven winners).
fn alpha_beta(keywords: &[Keyword], settings: &StructureSettings) -> Vec<GroupPlan> {
    let beta = match &settings.beta_keywords {
        Some(beta) => to_keywords(beta),
        None => keywords.to_vec(),
    };
    let alpha = to_keywords(&settings.alpha_keywords);

    let mut groups = Vec::new();
    if !beta.is_empty() {
        groups.push(GroupPlan::new("Beta - Discovery", beta).with_ads(AdPlan::Beta));
    }
    if !alpha.is_empty() {
        groups.push(GroupPlan::new("Alpha - Winners", alpha).with_ads(AdPlan::Alpha));
    }
    groups
}

/// One group per enabled match type, each holding every keyword.
fn match_type_split(keywords: &[Keyword], match_types: &[MatchType]) -> Vec<GroupPlan> {
    match_types
        .iter()
        .map(|match_type| GroupPlan {
            match_types: Some(vec![*match_type]),
            ..GroupPlan::new(format!("{match_type} Match"), keywords.to_vec())
        })
        .collect()
}

fn funnel(settings: &StructureSettings) -> Vec<GroupPlan> {
    FUNNEL_STAGES
        .iter()
        .filter_map(|stage| {
            let members = settings.funnel_groups.get(*stage)?;
            if members.is_empty() {
                return None;
            }
            let name = format!("{} - {}", stage.to_uppercase(), funnel_stage_name(stage));
            Some(
                GroupPlan::new(name, to_keywords(members))
                    .with_ads(AdPlan::Funnel((*stage).to_owned()))
                    .with_location_override(),
            )
        })
        .collect()
}

fn brand_split(keywords: &[Keyword], settings: &StructureSettings) -> Vec<GroupPlan> {
    let brand = to_keywords(&settings.brand_keywords);
    let non_brand = match &settings.non_brand_keywords {
        Some(non_brand) => to_keywords(non_brand),
        None => keywords
            .iter()
            .filter(|keyword| {
                !settings
                    .brand_keywords
                    .iter()
                    .any(|b| b.trim().eq_ignore_ascii_case(keyword.text().trim()))
            })
            .cloned()
            .collect(),
    };

    let mut groups = Vec::new();
    if !brand.is_empty() {
        groups.push(GroupPlan::new("Brand Keywords", brand).with_location_override());
    }
    if !non_brand.is_empty() {
        groups.push(GroupPlan::new("Non-Brand Keywords", non_brand).with_location_override());
    }
    groups
}

/// Explicit competitor keywords, else those mentioning a competitor marker.
fn competitor(keywords: &[Keyword], settings: &StructureSettings) -> Vec<GroupPlan> {
    let members = match &settings.competitor_keywords {
        Some(members) => to_keywords(members),
        None => keywords
            .iter()
            .filter(|keyword| {
                let text = keyword.text().to_lowercase();
                settings
                    .competitor_markers
                    .iter()
                    .any(|marker| !marker.trim().is_empty() && text.contains(&marker.to_lowercase()))
            })
            .cloned()
            .collect(),
    };

    if members.is_empty() {
        return Vec::new();
    }
    vec![GroupPlan::new("Competitor Keywords", members).with_ads(AdPlan::Competitor)]
}

/// Group by lowercased first word, preserving first-seen order.
pub fn cluster_by_first_word(keywords: &[Keyword]) -> IndexMap<String, Vec<Keyword>> {
    let mut clusters: IndexMap<String, Vec<Keyword>> = IndexMap::new();
    for keyword in keywords {
        let cleaned = clean_keyword_text(keyword.text());
        let theme = cleaned
            .split_whitespace()
            .next()
            .map_or_else(|| "other".to_owned(), str::to_lowercase);
        clusters.entry(theme).or_default().push(keyword.clone());
    }
    clusters
}

fn to_keywords(texts: &[String]) -> Vec<Keyword> {
    texts
        .iter()
        .filter(|text| !text.trim().is_empty())
        .map(|text| Keyword::from(text.as_str()))
        .collect()
}
