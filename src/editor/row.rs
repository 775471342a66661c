use super::columns::{COLUMN_COUNT, EDITOR_COLUMNS, column_index};
use serde::ser::SerializeMap as _;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Entity kind carried in the `Type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowType {
    Campaign,
    AdGroup,
    Keyword,
    ResponsiveSearchAd,
    CallOnlyAd,
    NegativeKeyword,
    Sitelink,
}

impl RowType {
    pub const ALL: [Self; 7] = [
        Self::Campaign,
        Self::AdGroup,
        Self::Keyword,
        Self::ResponsiveSearchAd,
        Self::CallOnlyAd,
        Self::NegativeKeyword,
        Self::Sitelink,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Campaign => "Campaign",
            Self::AdGroup => "Ad group",
            Self::Keyword => "Keyword",
            Self::ResponsiveSearchAd => "Responsive search ad",
            Self::CallOnlyAd => "Call-only ad",
            Self::NegativeKeyword => "Negative keyword",
            Self::Sitelink => "Sitelink",
        }
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RowType {
    type Err = String;

    /// Case-insensitive, so `AD GROUP` and `ad group` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|row_type| row_type.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown row type '{wanted}'"))
    }
}

/// One flat output row holding a value for every Editor column.
///
/// Rows are allocated with every column set to the empty string and only the
/// columns relevant to the row's `Type` are overwritten, so every row has
/// the same length and order regardless of what its entity populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    values: Vec<String>,
}

impl Default for CsvRow {
    fn default() -> Self {
        Self {
            values: vec![String::new(); COLUMN_COUNT],
        }
    }
}

impl CsvRow {
    /// A row of the given type with every other column empty.
    pub fn new(row_type: RowType, operation: &str) -> Self {
        let mut row = Self::default();
        row.set("Type", row_type.label());
        row.set("Operation", operation);
        row
    }

    /// Overwrite one column. Unknown column names are a programming error
    /// and are logged rather than silently widening the row.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        match column_index(column).and_then(|index| self.values.get_mut(index)) {
            Some(slot) => *slot = value.into(),
            None => tracing::warn!("Ignoring value for unknown column '{column}'"),
        }
    }

    /// Set a column only when `value` is present and non-blank.
    pub fn set_opt(&mut self, column: &str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.set(column, value);
        }
    }

    /// Value of a column, or `""` for unknown columns.
    pub fn get(&self, column: &str) -> &str {
        column_index(column)
            .and_then(|index| self.values.get(index))
            .map_or("", String::as_str)
    }

    /// Trimmed value of a column, `None` when blank.
    pub fn get_trimmed(&self, column: &str) -> Option<&str> {
        Some(self.get(column).trim()).filter(|v| !v.is_empty())
    }

    pub fn row_type(&self) -> Option<RowType> {
        self.get("Type").parse().ok()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        EDITOR_COLUMNS
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }
}

/// Serializes as a header-ordered map so JSON previews keep column order.
impl Serialize for CsvRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COLUMN_COUNT))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
