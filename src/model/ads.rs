//! Ad and extension payloads.
//!
//! Ads are a closed sum type discriminated by `type`. Responsive search ads
//! accept either `headlines`/`descriptions` arrays or the numbered
//! `headline1..headline15` / `description1..description4` fields; both forms
//! are merged into the arrays on load.

use super::Amount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Ad {
    Rsa(RsaAd),
    Dki(DkiAd),
    #[serde(rename = "callonly", alias = "call_only", alias = "callOnly")]
    CallOnly(CallOnlyAd),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RsaAdWire")]
pub struct RsaAd {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    pub final_url: Option<String>,
    pub final_mobile_url: Option<String>,
    pub path1: Option<String>,
    pub path2: Option<String>,
    pub tracking_template: Option<String>,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DkiAd {
    pub headline1: String,
    pub headline2: String,
    pub headline3: String,
    pub description1: String,
    pub description2: String,
    #[serde(alias = "finalUrl")]
    pub final_url: Option<String>,
    #[serde(alias = "finalMobileUrl")]
    pub final_mobile_url: Option<String>,
    pub path1: Option<String>,
    pub path2: Option<String>,
    #[serde(alias = "trackingTemplate")]
    pub tracking_template: Option<String>,
    pub extensions: Vec<Extension>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CallOnlyAd {
    pub headline1: String,
    pub headline2: String,
    pub description1: String,
    pub description2: String,
    #[serde(alias = "phoneNumber", alias = "phone")]
    pub phone_number: String,
    #[serde(alias = "businessName")]
    pub business_name: String,
    #[serde(alias = "countryCode")]
    pub country_code: Option<String>,
    #[serde(alias = "verificationUrl")]
    pub verification_url: Option<String>,
    #[serde(alias = "displayUrl")]
    pub display_url: Option<String>,
    #[serde(alias = "finalUrl")]
    pub final_url: Option<String>,
    pub extensions: Vec<Extension>,
}

/// Accepts both the array form and the numbered-field form of an RSA.
#[derive(Deserialize)]
struct RsaAdWire {
    #[serde(default)]
    headlines: Vec<String>,
    #[serde(default)]
    descriptions: Vec<String>,
    #[serde(default, alias = "finalUrl")]
    final_url: Option<String>,
    #[serde(default, alias = "finalMobileUrl")]
    final_mobile_url: Option<String>,
    #[serde(default)]
    path1: Option<String>,
    #[serde(default)]
    path2: Option<String>,
    #[serde(default, alias = "trackingTemplate")]
    tracking_template: Option<String>,
    #[serde(default)]
    extensions: Vec<Extension>,
    #[serde(flatten)]
    numbered: BTreeMap<String, serde_json::Value>,
}

impl From<RsaAdWire> for RsaAd {
    fn from(wire: RsaAdWire) -> Self {
        let mut headlines = wire.headlines;
        headlines.extend(numbered_fields(&wire.numbered, "headline"));
        let mut descriptions = wire.descriptions;
        descriptions.extend(numbered_fields(&wire.numbered, "description"));

        Self {
            headlines,
            descriptions,
            final_url: wire.final_url,
            final_mobile_url: wire.final_mobile_url,
            path1: wire.path1,
            path2: wire.path2,
            tracking_template: wire.tracking_template,
            extensions: wire.extensions,
        }
    }
}

/// Collect `<prefix>N` string fields ordered by N.
fn numbered_fields(fields: &BTreeMap<String, serde_json::Value>, prefix: &str) -> Vec<String> {
    let mut found: Vec<(u32, String)> = fields
        .iter()
        .filter_map(|(key, value)| {
            let index = key.strip_prefix(prefix)?.parse::<u32>().ok()?;
            let text = value.as_str()?;
            Some((index, text.to_owned()))
        })
        .collect();
    found.sort_by_key(|(index, _)| *index);
    found.into_iter().map(|(_, text)| text).collect()
}

impl Ad {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "rsa",
            Self::Dki(_) => "dki",
            Self::CallOnly(_) => "callonly",
        }
    }

    pub fn final_url(&self) -> Option<&str> {
        match self {
            Self::Rsa(ad) => ad.final_url.as_deref(),
            Self::Dki(ad) => ad.final_url.as_deref(),
            Self::CallOnly(ad) => ad.final_url.as_deref(),
        }
    }

    pub fn set_final_url(&mut self, url: impl Into<String>) {
        let url = Some(url.into());
        match self {
            Self::Rsa(ad) => ad.final_url = url,
            Self::Dki(ad) => ad.final_url = url,
            Self::CallOnly(ad) => ad.final_url = url,
        }
    }

    pub fn extensions(&self) -> &[Extension] {
        match self {
            Self::Rsa(ad) => &ad.extensions,
            Self::Dki(ad) => &ad.extensions,
            Self::CallOnly(ad) => &ad.extensions,
        }
    }

    /// Headline slots in display order, empty slots included for fixed-shape ads.
    pub fn headlines(&self) -> Vec<&str> {
        match self {
            Self::Rsa(ad) => ad.headlines.iter().map(String::as_str).collect(),
            Self::Dki(ad) => vec![
                ad.headline1.as_str(),
                ad.headline2.as_str(),
                ad.headline3.as_str(),
            ],
            Self::CallOnly(ad) => vec![ad.headline1.as_str(), ad.headline2.as_str()],
        }
    }

    pub fn descriptions(&self) -> Vec<&str> {
        match self {
            Self::Rsa(ad) => ad.descriptions.iter().map(String::as_str).collect(),
            Self::Dki(ad) => vec![ad.description1.as_str(), ad.description2.as_str()],
            Self::CallOnly(ad) => vec![ad.description1.as_str(), ad.description2.as_str()],
        }
    }

    /// Path 1 / Path 2, absent on call-only ads.
    pub fn paths(&self) -> (Option<&str>, Option<&str>) {
        match self {
            Self::Rsa(ad) => (ad.path1.as_deref(), ad.path2.as_deref()),
            Self::Dki(ad) => (ad.path1.as_deref(), ad.path2.as_deref()),
            Self::CallOnly(_) => (None, None),
        }
    }
}

/// Asset attached to an ad.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Extension {
    Sitelink {
        #[serde(default, alias = "sitelinks")]
        links: Vec<SitelinkEntry>,
    },
    Callout {
        #[serde(default)]
        callouts: Vec<String>,
    },
    Snippet {
        #[serde(default)]
        header: String,
        #[serde(default)]
        values: Vec<String>,
    },
    Call {
        #[serde(default, alias = "phoneNumber", alias = "phone")]
        phone_number: String,
        #[serde(default, alias = "countryCode")]
        country_code: Option<String>,
    },
    Price {
        #[serde(default, alias = "priceType")]
        price_type: Option<String>,
        #[serde(default, alias = "priceQualifier")]
        qualifier: Option<String>,
        #[serde(default)]
        currency: Option<String>,
        #[serde(default)]
        items: Vec<PriceItem>,
    },
    /// Extension kinds the Editor export does not carry (promotion, image, ...)
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SitelinkEntry {
    #[serde(alias = "linkText")]
    pub text: String,
    #[serde(alias = "url", alias = "finalUrl")]
    pub final_url: String,
    pub description1: Option<String>,
    pub description2: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PriceItem {
    pub header: String,
    pub description: String,
    pub price: Option<Amount>,
    pub unit: Option<String>,
    #[serde(alias = "url", alias = "finalUrl")]
    pub final_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsa_numbered_fields_are_merged() {
        let ad: Ad = serde_json::from_str(
            r#"{
                "type": "rsa",
                "headline2": "Fast Response",
                "headline1": "Emergency Plumber",
                "description1": "Available around the clock.",
                "finalUrl": "https://example.com"
            }"#,
        )
        .expect("rsa should parse");

        let Ad::Rsa(rsa) = ad else {
            panic!("expected rsa variant");
        };
        assert_eq!(rsa.headlines, vec!["Emergency Plumber", "Fast Response"]);
        assert_eq!(rsa.descriptions, vec!["Available around the clock."]);
        assert_eq!(rsa.final_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_call_only_aliases() {
        let ad: Ad = serde_json::from_str(
            r#"{ "type": "callonly", "phoneNumber": "555 0100", "businessName": "Acme" }"#,
        )
        .expect("call-only should parse");
        let Ad::CallOnly(call) = ad else {
            panic!("expected call-only variant");
        };
        assert_eq!(call.phone_number, "555 0100");
        assert_eq!(call.business_name, "Acme");
        assert!(call.headline1.is_empty());
    }

    #[test]
    fn test_extensions_parse() {
        let extensions: Vec<Extension> = serde_json::from_str(
            r#"[
                { "type": "sitelink", "links": [{ "text": "Contact", "url": "https://example.com/contact" }] },
                { "type": "callout", "callouts": ["24/7 Service"] },
                { "type": "promotion", "discount": 10 }
            ]"#,
        )
        .expect("extensions should parse");

        assert_eq!(extensions.len(), 3);
        assert!(matches!(extensions.get(2), Some(Extension::Unsupported)));
        let Some(Extension::Sitelink { links }) = extensions.first() else {
            panic!("expected sitelink");
        };
        assert_eq!(links.first().map(|l| l.final_url.as_str()), Some("https://example.com/contact"));
    }
}
