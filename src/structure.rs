//! Structure builder: keyword list + wizard settings -> [`CampaignStructure`].
//!
//! A strategy from [`grouping`] decides ad group membership, then every group
//! goes through the same assembly: match-type fan-out, ads, negatives and
//! location data. Building is pure and never fails; a strategy that yields no
//! groups produces a campaign with no ad groups, which the validator flags.
//!
//! ```
//! use adforge::model::Keyword;
//! use adforge::structure::{StructureSettings, StructureType, build};
//!
//! let settings = StructureSettings {
//!     structure_type: StructureType::Skag,
//!     campaign_name: "Plumbing".to_owned(),
//!     url: "https://example.com".to_owned(),
//!     ..StructureSettings::default()
//! };
//! let structure = build(&[Keyword::from("plumber near me")], &settings);
//! assert_eq!(structure.campaigns.len(), 1);
//! ```

pub mod default_ads;
pub mod grouping;

use crate::editor::keywords::{clean_keyword_text, extract_match_type};
use crate::error::{Result, ResultExt as _};
use crate::model::{Ad, AdGroup, Amount, Campaign, CampaignStructure, Keyword, KeywordSpec, MatchType};
use grouping::{AdPlan, GroupPlan};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Used when neither the ad nor the settings carry a landing page.
pub const FALLBACK_URL: &str = "https://www.example.com";

/// Grouping strategy identifiers as sent by the campaign wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    /// Single keyword ad groups
    Skag,
    /// Single theme ad groups
    #[default]
    Stag,
    Mix,
    StagPlus,
    Intent,
    AlphaBeta,
    MatchType,
    Geo,
    Funnel,
    BrandSplit,
    Competitor,
    Ngram,
}

impl StructureType {
    pub const ALL: [Self; 12] = [
        Self::Skag,
        Self::Stag,
        Self::Mix,
        Self::StagPlus,
        Self::Intent,
        Self::AlphaBeta,
        Self::MatchType,
        Self::Geo,
        Self::Funnel,
        Self::BrandSplit,
        Self::Competitor,
        Self::Ngram,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skag => "skag",
            Self::Stag => "stag",
            Self::Mix => "mix",
            Self::StagPlus => "stag_plus",
            Self::Intent => "intent",
            Self::AlphaBeta => "alpha_beta",
            Self::MatchType => "match_type",
            Self::Geo => "geo",
            Self::Funnel => "funnel",
            Self::BrandSplit => "brand_split",
            Self::Competitor => "competitor",
            Self::Ngram => "ngram",
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StructureType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("Unknown structure type '{s}'"))
    }
}

/// Which match types each keyword is fanned out into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTypeToggles {
    pub broad: bool,
    pub phrase: bool,
    pub exact: bool,
}

impl MatchTypeToggles {
    pub const ALL: Self = Self {
        broad: true,
        phrase: true,
        exact: true,
    };

    /// Enabled match types in Broad, Phrase, Exact order; all three when
    /// nothing is enabled.
    pub fn enabled(self) -> Vec<MatchType> {
        let picked: Vec<MatchType> = [
            (self.broad, MatchType::Broad),
            (self.phrase, MatchType::Phrase),
            (self.exact, MatchType::Exact),
        ]
        .into_iter()
        .filter_map(|(on, match_type)| on.then_some(match_type))
        .collect();

        if picked.is_empty() {
            MatchType::POSITIVE.to_vec()
        } else {
            picked
        }
    }
}

/// Geographic unit the geo-segmented strategy splits campaigns by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GeoType {
    #[serde(alias = "state")]
    State,
    #[serde(alias = "city")]
    City,
    #[serde(alias = "zip")]
    Zip,
    #[serde(alias = "country")]
    Country,
}

/// Wizard settings driving [`build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureSettings {
    #[serde(alias = "structureType")]
    pub structure_type: StructureType,
    #[serde(alias = "campaignName")]
    pub campaign_name: String,
    #[serde(alias = "matchTypes")]
    pub match_types: MatchTypeToggles,
    /// Landing page for ads without their own final URL
    #[serde(alias = "finalUrl", alias = "final_url")]
    pub url: String,
    #[serde(alias = "negativeKeywords")]
    pub negative_keywords: Vec<Keyword>,
    /// Caller-supplied ads; `None` means use stock ads
    pub ads: Option<Vec<Ad>>,

    #[serde(alias = "geoType")]
    pub geo_type: Option<GeoType>,
    #[serde(alias = "selectedStates")]
    pub selected_states: Vec<String>,
    #[serde(alias = "selectedCities")]
    pub selected_cities: Vec<String>,
    #[serde(alias = "selectedZips")]
    pub selected_zips: Vec<String>,
    #[serde(alias = "targetCountry")]
    pub target_country: Option<String>,

    pub budget: Option<Amount>,
    #[serde(alias = "budgetType")]
    pub budget_type: Option<String>,
    #[serde(alias = "biddingStrategy")]
    pub bidding_strategy: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,

    #[serde(alias = "intentGroups")]
    pub intent_groups: IndexMap<String, Vec<String>>,
    /// Defaults to `high_intent, research, brand` when unset
    #[serde(alias = "selectedIntents")]
    pub selected_intents: Option<Vec<String>>,
    #[serde(alias = "alphaKeywords")]
    pub alpha_keywords: Vec<String>,
    /// Defaults to the full keyword list when unset
    #[serde(alias = "betaKeywords")]
    pub beta_keywords: Option<Vec<String>>,
    #[serde(alias = "funnelGroups")]
    pub funnel_groups: IndexMap<String, Vec<String>>,
    #[serde(alias = "brandKeywords")]
    pub brand_keywords: Vec<String>,
    #[serde(alias = "nonBrandKeywords")]
    pub non_brand_keywords: Option<Vec<String>>,
    #[serde(alias = "competitorKeywords")]
    pub competitor_keywords: Option<Vec<String>>,
    /// Substrings marking a keyword as a competitor term
    #[serde(alias = "competitorMarkers")]
    pub competitor_markers: Vec<String>,
    #[serde(alias = "smartClusters")]
    pub smart_clusters: Option<IndexMap<String, Vec<String>>>,
}

impl Default for StructureSettings {
    fn default() -> Self {
        Self {
            structure_type: StructureType::default(),
            campaign_name: String::new(),
            match_types: MatchTypeToggles::ALL,
            url: String::new(),
            negative_keywords: Vec::new(),
            ads: None,
            geo_type: None,
            selected_states: Vec::new(),
            selected_cities: Vec::new(),
            selected_zips: Vec::new(),
            target_country: None,
            budget: None,
            budget_type: None,
            bidding_strategy: None,
            start_date: None,
            end_date: None,
            intent_groups: IndexMap::new(),
            selected_intents: None,
            alpha_keywords: Vec::new(),
            beta_keywords: None,
            funnel_groups: IndexMap::new(),
            brand_keywords: Vec::new(),
            non_brand_keywords: None,
            competitor_keywords: None,
            competitor_markers: vec!["competitor".to_owned(), "alternative".to_owned()],
            smart_clusters: None,
        }
    }
}

impl StructureSettings {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .context("Failed to read structure settings file")?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse structure settings JSON")
    }

    pub fn selected_intents(&self) -> Vec<String> {
        self.selected_intents.clone().unwrap_or_else(|| {
            ["high_intent", "research", "brand"]
                .map(str::to_owned)
                .to_vec()
        })
    }
}

/// Build a campaign structure from keywords using `settings.structure_type`.
pub fn build(keywords: &[Keyword], settings: &StructureSettings) -> CampaignStructure {
    let keywords: Vec<Keyword> = keywords
        .iter()
        .filter(|keyword| !clean_keyword_text(keyword.text()).is_empty())
        .cloned()
        .collect();
    let match_types = settings.match_types.enabled();
    let main_keyword = keywords
        .first()
        .map(|keyword| clean_keyword_text(keyword.text()))
        .unwrap_or_else(|| default_ads::FALLBACK_KEYWORD.to_owned());

    let assembler = Assembler {
        settings,
        match_types: &match_types,
        main_keyword: &main_keyword,
    };

    let geo_units = match settings.structure_type {
        StructureType::Geo => geo_units(settings),
        _ => Vec::new(),
    };

    let campaigns = if geo_units.is_empty() {
        let plans = grouping::plan_groups(settings.structure_type, &keywords, settings, &match_types);
        let mut campaign = assembler.campaign(settings.campaign_name.trim().to_owned(), &plans);
        assembler.apply_selected_locations(&mut campaign);
        vec![campaign]
    } else {
        geo_units
            .iter()
            .map(|unit| {
                let plan = grouping::GroupPlan {
                    name: unit.ad_group_name(),
                    keywords: keywords.clone(),
                    ads: AdPlan::Settings,
                    match_types: None,
                    location_override: false,
                };
                let name = format!("{} - {}", settings.campaign_name.trim(), unit.value);
                let mut campaign = assembler.campaign(name, std::slice::from_ref(&plan));
                unit.apply(&mut campaign);
                campaign
            })
            .collect()
    };

    let ad_groups: usize = campaigns.iter().map(|c| c.ad_groups.len()).sum();
    tracing::info!(
        "Built {} structure: {} campaign(s), {ad_groups} ad group(s) from {} keyword(s)",
        settings.structure_type,
        campaigns.len(),
        keywords.len()
    );
    CampaignStructure { campaigns }
}

/// One campaign's worth of the geo-segmented strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GeoUnit {
    kind: GeoType,
    value: String,
}

impl GeoUnit {
    fn ad_group_name(&self) -> String {
        match self.kind {
            GeoType::Zip => format!("ZIP {} Ad Group", self.value),
            _ => format!("{} Ad Group", self.value),
        }
    }

    fn apply(&self, campaign: &mut Campaign) {
        let value = vec![self.value.clone()];
        match self.kind {
            GeoType::State => campaign.states = value,
            GeoType::City => campaign.cities = value,
            GeoType::Zip => campaign.zip_codes = value,
            GeoType::Country => campaign.country = Some(self.value.clone()),
        }
    }
}

/// Geo units for the selected geo type; empty means fall back to one campaign.
fn geo_units(settings: &StructureSettings) -> Vec<GeoUnit> {
    let (kind, values) = match settings.geo_type {
        Some(GeoType::State) => (GeoType::State, &settings.selected_states),
        Some(GeoType::City) => (GeoType::City, &settings.selected_cities),
        Some(GeoType::Zip) => (GeoType::Zip, &settings.selected_zips),
        Some(GeoType::Country) | None => return Vec::new(),
    };
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| GeoUnit {
            kind,
            value: value.to_owned(),
        })
        .collect()
}

struct Assembler<'a> {
    settings: &'a StructureSettings,
    match_types: &'a [MatchType],
    main_keyword: &'a str,
}

impl Assembler<'_> {
    fn campaign(&self, name: String, plans: &[GroupPlan]) -> Campaign {
        let settings = self.settings;
        Campaign {
            name,
            budget: settings.budget.clone(),
            budget_type: settings.budget_type.clone(),
            bidding_strategy: settings.bidding_strategy.clone(),
            start_date: settings.start_date.clone(),
            end_date: settings.end_date.clone(),
            country: settings.target_country.clone(),
            ad_groups: plans.iter().map(|plan| self.ad_group(plan)).collect(),
            ..Campaign::default()
        }
    }

    fn ad_group(&self, plan: &GroupPlan) -> AdGroup {
        let match_types = plan.match_types.as_deref().unwrap_or(self.match_types);
        // `-kw` in the keyword list is an exclusion for this group, not a bid
        let (negatives, positives): (Vec<&Keyword>, Vec<&Keyword>) =
            plan.keywords.iter().partition(|keyword| is_negative(keyword));
        let mut negative_keywords = self.settings.negative_keywords.clone();
        negative_keywords.extend(negatives.into_iter().cloned());

        let mut ad_group = AdGroup {
            keywords: positives
                .into_iter()
                .flat_map(|keyword| fan_out(keyword, match_types))
                .collect(),
            ads: self.ads(&plan.ads),
            negative_keywords,
            ..AdGroup::new(plan.name.clone())
        };
        if plan.location_override {
            ad_group.states = self.settings.selected_states.clone();
            ad_group.cities = self.settings.selected_cities.clone();
            ad_group.zip_codes = self.settings.selected_zips.clone();
        }
        ad_group
    }

    fn ads(&self, plan: &AdPlan) -> Vec<Ad> {
        let keyword = self.main_keyword;
        let mut ads = match plan {
            AdPlan::Settings => self
                .settings
                .ads
                .clone()
                .unwrap_or_else(|| default_ads::generic(keyword)),
            AdPlan::Intent(intent) => default_ads::intent(intent, keyword),
            AdPlan::Alpha => default_ads::alpha(keyword),
            AdPlan::Beta => default_ads::beta(keyword),
            AdPlan::Funnel(stage) => default_ads::funnel(stage, keyword),
            AdPlan::Competitor => default_ads::competitor(),
        };

        let url = match self.settings.url.trim() {
            "" => FALLBACK_URL,
            url => url,
        };
        for ad in &mut ads {
            if ad.final_url().is_none_or(|existing| existing.trim().is_empty()) {
                ad.set_final_url(url);
            }
        }
        ads
    }

    fn apply_selected_locations(&self, campaign: &mut Campaign) {
        campaign.states = self.settings.selected_states.clone();
        campaign.cities = self.settings.selected_cities.clone();
        campaign.zip_codes = self.settings.selected_zips.clone();
    }
}

fn is_negative(keyword: &Keyword) -> bool {
    keyword
        .explicit_match_type()
        .unwrap_or_else(|| extract_match_type(keyword.text()))
        .is_negative()
}

/// One keyword per match type, match type encoded the way the compiler
/// reads it back. Detailed keywords keep their bid and URL.
fn fan_out(keyword: &Keyword, match_types: &[MatchType]) -> Vec<Keyword> {
    let text = clean_keyword_text(keyword.text());
    match_types
        .iter()
        .map(|match_type| match keyword {
            Keyword::Detailed(spec) if spec.max_cpc.is_some() || spec.final_url.is_some() => {
                Keyword::Detailed(KeywordSpec {
                    text: text.clone(),
                    match_type: Some(*match_type),
                    max_cpc: spec.max_cpc.clone(),
                    final_url: spec.final_url.clone(),
                })
            }
            _ => Keyword::Text(match_type.format_keyword(&text)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skag_settings() -> StructureSettings {
        StructureSettings {
            structure_type: StructureType::Skag,
            campaign_name: "Plumbing".to_owned(),
            url: "https://example.com/plumbing".to_owned(),
            ..StructureSettings::default()
        }
    }

    #[test]
    fn test_structure_type_ids() {
        for kind in StructureType::ALL {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{kind}\""));
            assert_eq!(kind.as_str().parse::<StructureType>(), Ok(kind));
        }
        assert!(serde_json::from_str::<StructureType>("\"pyramid\"").is_err());
    }

    #[test]
    fn test_match_type_defaults_to_all() {
        assert_eq!(MatchTypeToggles::default().enabled(), MatchType::POSITIVE.to_vec());
        let exact_only = MatchTypeToggles {
            exact: true,
            ..MatchTypeToggles::default()
        };
        assert_eq!(exact_only.enabled(), vec![MatchType::Exact]);
    }

    #[test]
    fn test_skag_fan_out() {
        let structure = build(&[Keyword::from("plumber near me")], &skag_settings());
        let campaign = structure.campaigns.first().expect("campaign");
        assert_eq!(campaign.name, "Plumbing");
        let ad_group = campaign.ad_groups.first().expect("ad group");
        assert_eq!(ad_group.name, "plumber near me");
        let texts: Vec<&str> = ad_group.keywords.iter().map(Keyword::text).collect();
        assert_eq!(texts, vec!["plumber near me", "\"plumber near me\"", "[plumber near me]"]);
        assert!(
            ad_group
                .ads
                .iter()
                .all(|ad| ad.final_url() == Some("https://example.com/plumbing"))
        );
    }

    #[test]
    fn test_hyphenated_keyword_becomes_group_negative() {
        let settings = StructureSettings {
            structure_type: StructureType::Stag,
            negative_keywords: vec!["diy".into()],
            ..skag_settings()
        };
        let structure = build(
            &[Keyword::from("plumber repair"), Keyword::from("-plumber jobs")],
            &settings,
        );
        let ad_group = structure
            .campaigns
            .first()
            .and_then(|c| c.ad_groups.first())
            .expect("ad group");
        assert!(ad_group.keywords.iter().all(|k| !k.text().contains("jobs")));
        let negatives: Vec<&str> = ad_group.negative_keywords.iter().map(Keyword::text).collect();
        assert_eq!(negatives, vec!["diy", "-plumber jobs"]);
    }

    #[test]
    fn test_supplied_ads_get_url() {
        let settings = StructureSettings {
            ads: Some(vec![Ad::Rsa(crate::model::RsaAd::default())]),
            url: String::new(),
            ..skag_settings()
        };
        let structure = build(&[Keyword::from("plumber")], &settings);
        let ads = structure
            .campaigns
            .first()
            .and_then(|c| c.ad_groups.first())
            .map(|g| g.ads.clone())
            .unwrap_or_default();
        assert_eq!(ads.len(), 1);
        assert_eq!(ads.first().and_then(Ad::final_url), Some(FALLBACK_URL));
    }

    #[test]
    fn test_geo_campaign_per_state() {
        let settings = StructureSettings {
            structure_type: StructureType::Geo,
            geo_type: Some(GeoType::State),
            selected_states: vec!["California".to_owned(), "Texas".to_owned()],
            ..skag_settings()
        };
        let structure = build(&[Keyword::from("plumber")], &settings);
        let names: Vec<&str> = structure.campaigns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Plumbing - California", "Plumbing - Texas"]);
        let first = structure.campaigns.first().expect("campaign");
        assert_eq!(first.states, vec!["California".to_owned()]);
        assert_eq!(
            first.ad_groups.first().map(|g| g.name.as_str()),
            Some("California Ad Group")
        );
    }

    #[test]
    fn test_geo_zip_naming_and_fallback() {
        let zips = StructureSettings {
            structure_type: StructureType::Geo,
            geo_type: Some(GeoType::Zip),
            selected_zips: vec!["90210".to_owned()],
            ..skag_settings()
        };
        let structure = build(&[Keyword::from("plumber")], &zips);
        assert_eq!(
            structure
                .campaigns
                .first()
                .and_then(|c| c.ad_groups.first())
                .map(|g| g.name.as_str()),
            Some("ZIP 90210 Ad Group")
        );

        let no_selection = StructureSettings {
            structure_type: StructureType::Geo,
            ..skag_settings()
        };
        let structure = build(&[Keyword::from("plumber")], &no_selection);
        assert_eq!(structure.campaigns.len(), 1);
        assert_eq!(
            structure
                .campaigns
                .first()
                .and_then(|c| c.ad_groups.first())
                .map(|g| g.name.as_str()),
            Some("Default Ad Group")
        );
    }

    #[test]
    fn test_no_keywords_gives_empty_campaign() {
        let structure = build(&[], &skag_settings());
        assert_eq!(structure.campaigns.len(), 1);
        assert!(structure.campaigns.iter().all(|c| c.ad_groups.is_empty()));
    }

    #[test]
    fn test_settings_accept_wizard_json() {
        let settings = StructureSettings::from_json(
            r#"{
                "structureType": "alpha_beta",
                "campaignName": "Plumbing",
                "matchTypes": { "broad": false, "phrase": true, "exact": true },
                "url": "https://example.com",
                "geoType": "ZIP",
                "selectedZips": ["10001"],
                "alphaKeywords": ["emergency plumber"]
            }"#,
        )
        .expect("parse settings");
        assert_eq!(settings.structure_type, StructureType::AlphaBeta);
        assert_eq!(settings.match_types.enabled(), vec![MatchType::Phrase, MatchType::Exact]);
        assert_eq!(settings.geo_type, Some(GeoType::Zip));
        assert_eq!(settings.selected_intents().len(), 3);
    }

    #[test]
    fn test_detailed_keyword_keeps_bid() {
        let keyword: Keyword =
            serde_json::from_str(r#"{ "text": "[plumber]", "maxCPC": 2.5 }"#).expect("parse");
        let variants = fan_out(&keyword, &[MatchType::Broad, MatchType::Exact]);
        assert_eq!(variants.len(), 2);
        assert!(variants.iter().all(|v| v.text() == "plumber"));
        assert_eq!(
            variants.get(1).and_then(Keyword::explicit_match_type),
            Some(MatchType::Exact)
        );
        assert!(variants.iter().all(|v| v.max_cpc().is_some()));
    }
}
