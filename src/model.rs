//! In-memory campaign graph: campaigns own ad groups, ad groups own
//! keywords, ads and negatives.
//!
//! Every type deserializes from the JSON the campaign wizard produces, which
//! mixes `snake_case` and `camelCase` field names; both spellings are accepted.

pub mod ads;

pub use ads::{Ad, CallOnlyAd, DkiAd, Extension, PriceItem, RsaAd, SitelinkEntry};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root container handed to the compiler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignStructure {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    #[serde(alias = "campaign_name", alias = "campaignName")]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type", alias = "campaign_type", alias = "campaignType")]
    pub campaign_type: Option<String>,
    #[serde(default)]
    pub budget: Option<Amount>,
    #[serde(default, alias = "budgetType")]
    pub budget_type: Option<String>,
    #[serde(default, alias = "biddingStrategy", alias = "bid_strategy")]
    pub bidding_strategy: Option<String>,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(default, alias = "targetCountry")]
    pub country: Option<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default, alias = "zipCodes", alias = "zips")]
    pub zip_codes: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default, alias = "adgroups", alias = "adGroups")]
    pub ad_groups: Vec<AdGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdGroup {
    #[serde(alias = "adgroup_name", alias = "adGroupName")]
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub ads: Vec<Ad>,
    #[serde(default, alias = "negativeKeywords", alias = "negatives")]
    pub negative_keywords: Vec<Keyword>,
    #[serde(default, alias = "defaultMaxCpc", alias = "max_cpc")]
    pub default_max_cpc: Option<Amount>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default, alias = "zipCodes", alias = "zips")]
    pub zip_codes: Vec<String>,
}

impl AdGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether this ad group carries its own location targeting.
    pub fn has_location_override(&self) -> bool {
        !self.states.is_empty() || !self.cities.is_empty() || !self.zip_codes.is_empty()
    }
}

/// A money value that may arrive as a JSON number or a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

/// How strictly a keyword must match a search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MatchType {
    Broad,
    Phrase,
    Exact,
    NegativeBroad,
    NegativePhrase,
    NegativeExact,
}

impl MatchType {
    pub const POSITIVE: [Self; 3] = [Self::Broad, Self::Phrase, Self::Exact];

    pub fn is_negative(self) -> bool {
        matches!(
            self,
            Self::NegativeBroad | Self::NegativePhrase | Self::NegativeExact
        )
    }

    pub fn negated(self) -> Self {
        match self {
            Self::Broad | Self::NegativeBroad => Self::NegativeBroad,
            Self::Phrase | Self::NegativePhrase => Self::NegativePhrase,
            Self::Exact | Self::NegativeExact => Self::NegativeExact,
        }
    }

    pub fn positive(self) -> Self {
        match self {
            Self::Broad | Self::NegativeBroad => Self::Broad,
            Self::Phrase | Self::NegativePhrase => Self::Phrase,
            Self::Exact | Self::NegativeExact => Self::Exact,
        }
    }

    /// Spelling the Editor expects in the `Match type` column.
    pub fn editor_label(self) -> &'static str {
        match self {
            Self::Broad => "Broad",
            Self::Phrase => "Phrase",
            Self::Exact => "Exact",
            Self::NegativeBroad => "Negative Broad",
            Self::NegativePhrase => "Negative Phrase",
            Self::NegativeExact => "Negative Exact",
        }
    }

    /// Encode the match type into keyword text: `kw`, `"kw"`, `[kw]`, with a
    /// leading `-` for negatives.
    pub fn format_keyword(self, text: &str) -> String {
        let body = match self.positive() {
            Self::Phrase => format!("\"{text}\""),
            Self::Exact => format!("[{text}]"),
            _ => text.to_owned(),
        };
        if self.is_negative() {
            format!("-{body}")
        } else {
            body
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.editor_label())
    }
}

impl FromStr for MatchType {
    type Err = String;

    /// Accepts `exact`, `EXACT`, `Negative Exact`, `negative_exact`, `negative-exact`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.as_str() {
            "broad" => Ok(Self::Broad),
            "phrase" => Ok(Self::Phrase),
            "exact" => Ok(Self::Exact),
            "negative broad" => Ok(Self::NegativeBroad),
            "negative phrase" => Ok(Self::NegativePhrase),
            "negative exact" => Ok(Self::NegativeExact),
            _ => Err(format!("Unknown match type '{s}'")),
        }
    }
}

impl TryFrom<String> for MatchType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchType> for String {
    fn from(value: MatchType) -> Self {
        value.editor_label().to_owned()
    }
}

/// A keyword as supplied: either bare text carrying its match type in
/// punctuation, or an object with explicit fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Keyword {
    Text(String),
    Detailed(KeywordSpec),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeywordSpec {
    #[serde(alias = "keyword")]
    pub text: String,
    #[serde(default, alias = "matchType", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    #[serde(default, alias = "maxCPC", alias = "maxCpc", skip_serializing_if = "Option::is_none")]
    pub max_cpc: Option<Amount>,
    #[serde(default, alias = "finalURL", alias = "finalUrl", skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
}

impl Keyword {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Detailed(spec) => &spec.text,
        }
    }

    pub fn explicit_match_type(&self) -> Option<MatchType> {
        match self {
            Self::Text(_) => None,
            Self::Detailed(spec) => spec.match_type,
        }
    }

    pub fn max_cpc(&self) -> Option<&Amount> {
        match self {
            Self::Text(_) => None,
            Self::Detailed(spec) => spec.max_cpc.as_ref(),
        }
    }

    pub fn final_url(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Detailed(spec) => spec.final_url.as_deref(),
        }
    }
}

impl From<&str> for Keyword {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Keyword {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_accepts_string_or_object() {
        let keywords: Vec<Keyword> = serde_json::from_str(
            r#"["plumber", { "text": "drain cleaning", "matchType": "EXACT", "maxCPC": "2.50" }]"#,
        )
        .expect("keywords should parse");

        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords.first().map(Keyword::text), Some("plumber"));
        let detailed = keywords.get(1).expect("second keyword");
        assert_eq!(detailed.explicit_match_type(), Some(MatchType::Exact));
        assert_eq!(detailed.max_cpc().map(ToString::to_string).as_deref(), Some("2.50"));
    }

    #[test]
    fn test_match_type_spellings() {
        assert_eq!("negative_exact".parse::<MatchType>(), Ok(MatchType::NegativeExact));
        assert_eq!("Negative Phrase".parse::<MatchType>(), Ok(MatchType::NegativePhrase));
        assert!("fuzzy".parse::<MatchType>().is_err());
        assert_eq!(MatchType::NegativeExact.editor_label(), "Negative Exact");
    }

    #[test]
    fn test_format_keyword() {
        assert_eq!(MatchType::Broad.format_keyword("plumber"), "plumber");
        assert_eq!(MatchType::Phrase.format_keyword("plumber"), "\"plumber\"");
        assert_eq!(MatchType::Exact.format_keyword("plumber"), "[plumber]");
        assert_eq!(MatchType::NegativeExact.format_keyword("free"), "-[free]");
    }

    #[test]
    fn test_campaign_camel_case_aliases() {
        let campaign: Campaign = serde_json::from_str(
            r#"{
                "campaign_name": "Plumbing",
                "budget": 50,
                "zipCodes": ["10001"],
                "adgroups": [{ "name": "Drains", "negativeKeywords": ["-free"] }]
            }"#,
        )
        .expect("campaign should parse");

        assert_eq!(campaign.name, "Plumbing");
        assert_eq!(campaign.budget.map(|b| b.to_string()).as_deref(), Some("50"));
        assert_eq!(campaign.zip_codes, vec!["10001".to_owned()]);
        assert_eq!(campaign.ad_groups.len(), 1);
        assert_eq!(
            campaign.ad_groups.first().map(|g| g.negative_keywords.len()),
            Some(1)
        );
    }
}
