//! Product categories and the browse-page category filter.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// A STEAM product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Science,
    Technology,
    Engineering,
    Arts,
    Math,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Science,
        Self::Technology,
        Self::Engineering,
        Self::Arts,
        Self::Math,
    ];

    /// Display name, also used as the form value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Science => "Science",
            Self::Technology => "Technology",
            Self::Engineering => "Engineering",
            Self::Arts => "Arts",
            Self::Math => "Math",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

/// Category selection on the browse page: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Form value for the "everything" option.
    pub const ALL_LABEL: &'static str = "All";

    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => *selected == category,
        }
    }

    /// Label used in forms and analytics payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Only(c) => c.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ALL_LABEL {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_parse_is_case_sensitive() {
        assert_eq!(
            "science".parse::<Category>(),
            Err(CategoryError("science".to_string()))
        );
    }

    #[test]
    fn test_filter_all_matches_everything() {
        let filter: CategoryFilter = "All".parse().unwrap();
        assert_eq!(filter, CategoryFilter::All);
        assert!(Category::ALL.into_iter().all(|c| filter.matches(c)));
    }

    #[test]
    fn test_filter_only_matches_selected() {
        let filter: CategoryFilter = "Arts".parse().unwrap();
        assert!(filter.matches(Category::Arts));
        assert!(!filter.matches(Category::Math));
        assert_eq!(filter.to_string(), "Arts");
    }

    #[test]
    fn test_filter_rejects_unknown() {
        assert!("Cooking".parse::<CategoryFilter>().is_err());
    }
}
