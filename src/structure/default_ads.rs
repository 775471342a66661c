//! Stock ads for groups the caller supplied no copy for.
//!
//! Copy is built around the campaign's main keyword and fitted to the
//! default Editor limits, so the repairer only has to fill gaps.

use crate::config::FieldLimits;
use crate::model::{Ad, RsaAd};
use crate::utils::{title_case, truncate_at_word};

/// Stand-in when the keyword list is empty.
pub const FALLBACK_KEYWORD: &str = "your service";

/// Funnel stages in the order their ad groups are emitted.
pub const FUNNEL_STAGES: [&str; 3] = ["tof", "mof", "bof"];

fn rsa(headlines: &[String], descriptions: &[String]) -> Ad {
    let limits = FieldLimits::default();
    Ad::Rsa(RsaAd {
        headlines: headlines
            .iter()
            .map(|h| truncate_at_word(h, limits.headline))
            .collect(),
        descriptions: descriptions
            .iter()
            .map(|d| truncate_at_word(d, limits.description))
            .collect(),
        ..RsaAd::default()
    })
}

/// General-purpose ad used by most strategies.
pub fn generic(keyword: &str) -> Vec<Ad> {
    let title = title_case(keyword);
    vec![rsa(
        &[
            title.clone(),
            format!("Professional {title}"),
            "Trusted Local Experts".to_owned(),
            "Get A Free Quote Today".to_owned(),
        ],
        &[
            format!("Looking for {keyword}? Our experienced team delivers fast, reliable results."),
            "Contact us today for a free quote. Satisfaction guaranteed.".to_owned(),
        ],
    )]
}

/// Ads for `Intent: ...` groups. Unknown intents get the generic ad.
pub fn intent(intent: &str, keyword: &str) -> Vec<Ad> {
    match intent {
        "high_intent" => vec![rsa(
            &[
                format!("Need {keyword} Now?"),
                "Immediate Solutions".to_owned(),
                "Fast Response".to_owned(),
            ],
            &[
                format!("Get {keyword} immediately."),
                "Quick and reliable service.".to_owned(),
            ],
        )],
        "research" => vec![rsa(
            &[
                format!("Affordable {keyword} Info"),
                "Compare Prices".to_owned(),
                "Research Options".to_owned(),
            ],
            &[
                format!("Learn about {keyword} pricing."),
                "Make informed decisions.".to_owned(),
            ],
        )],
        _ => generic(keyword),
    }
}

pub fn alpha(keyword: &str) -> Vec<Ad> {
    vec![rsa(
        &[
            format!("{keyword} - Exact Match"),
            "Precision Targeting".to_owned(),
            "Optimized Performance".to_owned(),
        ],
        &[
            format!("Get the exact {keyword} solution you need."),
            "Tailored for high-converting searches.".to_owned(),
        ],
    )]
}

pub fn beta(keyword: &str) -> Vec<Ad> {
    vec![rsa(
        &[
            format!("Best {keyword} Options"),
            "Compare & Choose".to_owned(),
            "Multiple Solutions".to_owned(),
        ],
        &[
            format!("Explore various {keyword} options."),
            "Find the perfect fit for your needs.".to_owned(),
        ],
    )]
}

/// Top and bottom of funnel get dedicated copy; the middle uses the generic ad.
pub fn funnel(stage: &str, keyword: &str) -> Vec<Ad> {
    match stage {
        "tof" => vec![rsa(
            &[
                format!("Learn About {keyword}"),
                "Educational Resources".to_owned(),
                "Expert Guides".to_owned(),
            ],
            &[
                format!("Discover everything about {keyword}."),
                "Start your journey here.".to_owned(),
            ],
        )],
        "bof" => vec![rsa(
            &[
                format!("Get {keyword} Today"),
                "Limited Time Offer".to_owned(),
                "Book Your Service Now".to_owned(),
            ],
            &[
                format!("Act now and get {keyword}."),
                "Don't miss out, call today.".to_owned(),
            ],
        )],
        _ => generic(keyword),
    }
}

pub fn funnel_stage_name(stage: &str) -> &str {
    match stage {
        "tof" => "Top of Funnel",
        "mof" => "Middle of Funnel",
        "bof" => "Bottom of Funnel",
        other => other,
    }
}

pub fn competitor() -> Vec<Ad> {
    vec![rsa(
        &[
            "Better Than Your Provider".to_owned(),
            "Superior Solutions".to_owned(),
            "Proven Results".to_owned(),
        ],
        &[
            "Switch to a better solution.".to_owned(),
            "Experience the difference.".to_owned(),
        ],
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fits_limits(ads: &[Ad]) -> bool {
        ads.iter().all(|ad| {
            ad.headlines().iter().all(|h| h.chars().count() <= 30)
                && ad.descriptions().iter().all(|d| d.chars().count() <= 90)
        })
    }

    #[test]
    fn test_stock_ads_fit_limits() {
        let long = "emergency residential plumbing repair";
        assert!(fits_limits(&generic(long)));
        assert!(fits_limits(&intent("high_intent", long)));
        assert!(fits_limits(&alpha(long)));
        assert!(fits_limits(&funnel("tof", long)));
        assert!(fits_limits(&competitor()));
    }

    #[test]
    fn test_stock_ads_meet_minimums() {
        for ads in [generic("plumber"), beta("plumber"), funnel("bof", "plumber")] {
            for ad in &ads {
                assert!(ad.headlines().len() >= 3, "too few headlines");
                assert!(ad.descriptions().len() >= 2, "too few descriptions");
            }
        }
    }

    #[test]
    fn test_unknown_variants_fall_back_to_generic() {
        assert_eq!(intent("brand", "plumber"), generic("plumber"));
        assert_eq!(funnel("mof", "plumber"), generic("plumber"));
        assert_eq!(funnel_stage_name("mof"), "Middle of Funnel");
        assert_eq!(funnel_stage_name("custom"), "custom");
    }
}
