//! The fixed, ordered column list of the Editor bulk-import format.
//!
//! The Editor parses by header name AND position, so this list is part of the
//! wire contract: never reorder it, only append.

use std::collections::HashMap;
use std::sync::LazyLock;

pub const COLUMN_COUNT: usize = 112;

pub const EDITOR_COLUMNS: [&str; COLUMN_COUNT] = [
    // Campaign
    "Type",
    "Operation",
    "Campaign",
    "Campaign ID",
    "Campaign status",
    "Campaign type",
    "Budget",
    "Budget type",
    "Bid strategy type",
    "Networks",
    "Languages",
    "Start date",
    "End date",
    "Ad schedule",
    "Labels",
    // Location targeting
    "Location",
    "Location ID",
    "Country",
    "State",
    "City",
    "Postal code",
    "Region",
    "Radius",
    "Radius unit",
    "Bid adjustment",
    // Ad group
    "Ad group",
    "Ad group ID",
    "Ad group status",
    "Ad group type",
    "Default max CPC",
    // Keyword
    "Keyword",
    "Match type",
    "Keyword status",
    "Max CPC",
    // URLs
    "Final URL",
    "Final mobile URL",
    "Tracking template",
    "Final URL suffix",
    "Custom parameters",
    // Ad
    "Ad type",
    "Ad status",
    "Headline 1",
    "Headline 2",
    "Headline 3",
    "Headline 4",
    "Headline 5",
    "Headline 6",
    "Headline 7",
    "Headline 8",
    "Headline 9",
    "Headline 10",
    "Headline 11",
    "Headline 12",
    "Headline 13",
    "Headline 14",
    "Headline 15",
    "Headline 1 position",
    "Headline 2 position",
    "Headline 3 position",
    "Headline 4 position",
    "Headline 5 position",
    "Headline 6 position",
    "Headline 7 position",
    "Headline 8 position",
    "Headline 9 position",
    "Headline 10 position",
    "Headline 11 position",
    "Headline 12 position",
    "Headline 13 position",
    "Headline 14 position",
    "Headline 15 position",
    "Description 1",
    "Description 2",
    "Description 3",
    "Description 4",
    "Description 1 position",
    "Description 2 position",
    "Description 3 position",
    "Description 4 position",
    "Path 1",
    "Path 2",
    // Call-only ad
    "Business name",
    "Phone number",
    "Country code",
    "Verification URL",
    "Display URL",
    // Sitelinks
    "Sitelink text 1",
    "Sitelink text 2",
    "Sitelink text 3",
    "Sitelink text 4",
    "Sitelink final URL 1",
    "Sitelink final URL 2",
    "Sitelink final URL 3",
    "Sitelink final URL 4",
    "Sitelink description 1",
    "Sitelink description 2",
    // Callouts
    "Callout 1",
    "Callout 2",
    "Callout 3",
    "Callout 4",
    // Structured snippet
    "Structured snippet header",
    "Structured snippet values",
    // Call asset
    "Call phone number",
    "Call country code",
    // Price asset
    "Price type",
    "Price qualifier",
    "Price currency",
    "Price item header",
    "Price item description",
    "Price amount",
    "Price unit",
    "Price final URL",
];

static COLUMN_INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    EDITOR_COLUMNS
        .iter()
        .enumerate()
        .map(|(index, name)| (*name, index))
        .collect()
});

/// Position of a column in the header, if it is part of the format.
pub fn column_index(name: &str) -> Option<usize> {
    COLUMN_INDEX.get(name).copied()
}

/// `Headline N`, 1-based.
pub fn headline_column(n: usize) -> String {
    format!("Headline {n}")
}

/// `Description N`, 1-based.
pub fn description_column(n: usize) -> String {
    format!("Description {n}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_header_prefix_is_fixed() {
        assert_eq!(
            EDITOR_COLUMNS.get(..7),
            Some(
                &[
                    "Type",
                    "Operation",
                    "Campaign",
                    "Campaign ID",
                    "Campaign status",
                    "Campaign type",
                    "Budget",
                ][..]
            )
        );
    }

    #[test]
    fn test_column_names_unique() {
        let unique: HashSet<_> = EDITOR_COLUMNS.iter().collect();
        assert_eq!(unique.len(), COLUMN_COUNT);
    }

    #[test]
    fn test_numbered_columns_exist() {
        for n in 1..=15 {
            assert!(column_index(&headline_column(n)).is_some(), "Headline {n} missing");
        }
        for n in 1..=4 {
            assert!(column_index(&description_column(n)).is_some(), "Description {n} missing");
        }
        assert_eq!(column_index("Type"), Some(0));
        assert_eq!(column_index("Price final URL"), Some(COLUMN_COUNT - 1));
        assert_eq!(column_index("Row Type"), None);
    }
}
