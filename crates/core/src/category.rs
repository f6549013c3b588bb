//! Spending categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The fixed set of categories a transaction or budget can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Groceries, restaurants.
    Food,
    /// Fuel, fares.
    Transport,
    /// Utilities, rent, subscriptions.
    Bills,
    /// Retail purchases.
    Shopping,
    /// Leisure.
    Entertainment,
    /// Medical and fitness.
    Health,
    /// Anything else.
    Other,
}

/// Raised when a category name is not one of [`Category::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 7] = [
        Self::Food,
        Self::Transport,
        Self::Bills,
        Self::Shopping,
        Self::Entertainment,
        Self::Health,
        Self::Other,
    ];

    /// Canonical name, as stored and serialized.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Bills => "Bills",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Parses a category name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Food", Category::Food)]
    #[case("food", Category::Food)]
    #[case("  TRANSPORT ", Category::Transport)]
    #[case("Entertainment", Category::Entertainment)]
    #[case("other", Category::Other)]
    fn test_parse_category(#[case] raw: &str, #[case] expected: Category) {
        assert_eq!(raw.parse::<Category>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_category() {
        let err = "Crypto".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("Crypto".to_string()));
    }

    #[test]
    fn test_every_name_parses_back() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        assert_eq!(serde_json::to_string(&Category::Bills).unwrap(), "\"Bills\"");
        let parsed: Category = serde_json::from_str("\"health\"").unwrap();
        assert_eq!(parsed, Category::Health);
        assert!(serde_json::from_str::<Category>("\"Travel\"").is_err());
    }
}
