//! Keyword text normalization.
//!
//! Match type is read from the punctuation *before* cleaning, since cleaning
//! removes the very characters that signal it.

use crate::config::CompiledPolicy;
use crate::model::{Keyword, MatchType};
use crate::utils::{char_len, collapse_whitespace, truncate_at_word};
use serde::Serialize;

/// Characters that never belong in Editor keyword text.
const STRIP_CHARS: [char; 5] = ['[', ']', '"', '\u{201c}', '\u{201d}'];

/// Whether a keyword is being compiled as a positive or a negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    Positive,
    Negative,
}

/// Why a keyword was left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Empty,
    TooShort,
    LowQuality,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedKeyword {
    pub text: String,
    pub match_type: MatchType,
    /// `Negative` also for a `-`-prefixed entry in a positive list
    pub kind: KeywordKind,
}

impl NormalizedKeyword {
    /// Case-folded identity used for per-campaign deduplication.
    pub fn dedup_key(&self) -> (String, MatchType) {
        (self.text.to_lowercase(), self.match_type)
    }
}

/// Infer the match type encoded in keyword punctuation.
///
/// `[kw]` is Exact, `"kw"` is Phrase, anything else Broad; a leading `-`
/// makes it the negative variant.
pub fn extract_match_type(raw: &str) -> MatchType {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    let is_wrapped = |open: char, close: char| {
        body.chars().count() >= 2 && body.starts_with(open) && body.ends_with(close)
    };
    let base = if is_wrapped('[', ']') {
        MatchType::Exact
    } else if is_wrapped('"', '"') || is_wrapped('\u{201c}', '\u{201d}') {
        MatchType::Phrase
    } else {
        MatchType::Broad
    };

    if negative { base.negated() } else { base }
}

/// Strip brackets, quotes and leading hyphens until nothing changes, then
/// collapse whitespace.
pub fn clean_keyword_text(raw: &str) -> String {
    let mut current = raw.to_owned();
    loop {
        let next: String = current
            .trim()
            .trim_start_matches('-')
            .chars()
            .filter(|c| !STRIP_CHARS.contains(c))
            .collect();
        if next == current {
            break;
        }
        current = next;
    }
    collapse_whitespace(&current)
}

/// Strip quote and bracket characters from an entity name.
pub fn clean_name(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !STRIP_CHARS.contains(c)).collect();
    collapse_whitespace(&stripped)
}

/// Rules applied to every keyword of one compile call.
pub struct KeywordNormalizer<'a> {
    pub max_len: usize,
    pub positive_min_len: usize,
    pub negative_min_len: usize,
    pub policy: &'a CompiledPolicy,
}

impl KeywordNormalizer<'_> {
    /// Resolve match type, clean, truncate and filter one keyword.
    ///
    /// An explicit match type on a detailed keyword wins over punctuation.
    /// Negatives always come out as a negative match type, so a bare
    /// `cheap` in a negative list is Negative Broad. A negative match type
    /// in a positive list stays negative: `-free` among keywords is an
    /// exclusion, never a bid.
    pub fn normalize(
        &self,
        keyword: &Keyword,
        kind: KeywordKind,
    ) -> Result<NormalizedKeyword, DropReason> {
        let raw = keyword.text();
        let inferred = keyword
            .explicit_match_type()
            .unwrap_or_else(|| extract_match_type(raw));
        let kind = if inferred.is_negative() {
            KeywordKind::Negative
        } else {
            kind
        };
        let match_type = match kind {
            KeywordKind::Positive => inferred,
            KeywordKind::Negative => inferred.negated(),
        };

        let cleaned = clean_keyword_text(raw);
        if cleaned.is_empty() {
            return Err(DropReason::Empty);
        }

        let text = truncate_at_word(&cleaned, self.max_len);
        let min_len = match kind {
            KeywordKind::Positive => self.positive_min_len,
            KeywordKind::Negative => self.negative_min_len,
        };
        if char_len(&text) < min_len {
            return Err(DropReason::TooShort);
        }

        // Low-quality heuristics target generated positives; short negatives
        // such as "free" or "diy" are intentional.
        if kind == KeywordKind::Positive
            && let Some(reason) = self.policy.classify(&text)
        {
            tracing::debug!("Dropping low-quality keyword '{text}': {reason:?}");
            return Err(DropReason::LowQuality);
        }

        Ok(NormalizedKeyword {
            text,
            match_type,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LowQualityPolicy;

    fn normalize(raw: &str, kind: KeywordKind) -> Result<NormalizedKeyword, DropReason> {
        let policy = LowQualityPolicy::default().compile().expect("policy");
        let normalizer = KeywordNormalizer {
            max_len: 80,
            positive_min_len: 3,
            negative_min_len: 2,
            policy: &policy,
        };
        normalizer.normalize(&Keyword::from(raw), kind)
    }

    #[test]
    fn test_exact_keyword_round_trip() {
        let keyword = normalize("[  Emergency Plumber ]", KeywordKind::Positive).expect("kept");
        assert_eq!(keyword.match_type, MatchType::Exact);
        assert_eq!(keyword.text, "Emergency Plumber");
    }

    #[test]
    fn test_match_type_punctuation() {
        assert_eq!(extract_match_type("plumber"), MatchType::Broad);
        assert_eq!(extract_match_type("\"plumber\""), MatchType::Phrase);
        assert_eq!(extract_match_type("[plumber]"), MatchType::Exact);
        assert_eq!(extract_match_type("-[cheap]"), MatchType::NegativeExact);
        assert_eq!(extract_match_type("-\"diy\""), MatchType::NegativePhrase);
        assert_eq!(extract_match_type("-free"), MatchType::NegativeBroad);
    }

    #[test]
    fn test_negative_exact_spelling() {
        let keyword = normalize("-[cheap]", KeywordKind::Negative).expect("kept");
        assert_eq!(keyword.text, "cheap");
        assert_eq!(keyword.match_type.editor_label(), "Negative Exact");
    }

    #[test]
    fn test_hyphenated_positive_stays_negative() {
        let keyword = normalize("-[cheap plumber]", KeywordKind::Positive).expect("kept");
        assert_eq!(keyword.kind, KeywordKind::Negative);
        assert_eq!(keyword.match_type, MatchType::NegativeExact);
        assert_eq!(keyword.text, "cheap plumber");

        let keyword = normalize("-free", KeywordKind::Positive).expect("kept");
        assert_eq!(keyword.kind, KeywordKind::Negative);
        assert_eq!(keyword.match_type, MatchType::NegativeBroad);
    }

    #[test]
    fn test_unprefixed_negative_is_negative_broad() {
        let keyword = normalize("free", KeywordKind::Negative).expect("kept");
        assert_eq!(keyword.match_type, MatchType::NegativeBroad);
    }

    #[test]
    fn test_clean_reaches_fixed_point() {
        assert_eq!(clean_keyword_text(r#""""plumber""""#), "plumber");
        assert_eq!(clean_keyword_text("- [ -drain  cleaning ]"), "drain cleaning");
        assert_eq!(clean_name("\"\"\"Drains\"\"\""), "Drains");
    }

    #[test]
    fn test_drop_reasons() {
        assert_eq!(normalize("[]", KeywordKind::Positive), Err(DropReason::Empty));
        assert_eq!(normalize("ab", KeywordKind::Positive), Err(DropReason::TooShort));
        assert!(normalize("tv", KeywordKind::Negative).is_ok());
        assert_eq!(
            normalize("plumber plumber", KeywordKind::Positive),
            Err(DropReason::LowQuality)
        );
    }

    #[test]
    fn test_long_keyword_truncated() {
        let long = "emergency plumber ".repeat(10);
        let keyword = normalize(&long, KeywordKind::Positive).expect("kept");
        assert!(char_len(&keyword.text) <= 80);
    }

    #[test]
    fn test_explicit_match_type_wins() {
        let keyword: Keyword =
            serde_json::from_str(r#"{ "text": "plumber", "matchType": "phrase" }"#).expect("parse");
        let policy = LowQualityPolicy::default().compile().expect("policy");
        let normalizer = KeywordNormalizer {
            max_len: 80,
            positive_min_len: 3,
            negative_min_len: 2,
            policy: &policy,
        };
        let normalized = normalizer
            .normalize(&keyword, KeywordKind::Positive)
            .expect("kept");
        assert_eq!(normalized.match_type, MatchType::Phrase);
    }
}
