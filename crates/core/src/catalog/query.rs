use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Category;
use crate::errors::DomainError;

/// Inclusive price interval in the base currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    /// Bounds used when there is nothing to derive them from.
    pub const DEFAULT: PriceRange = PriceRange { min: Decimal::ZERO, max: Decimal::ONE_THOUSAND };

    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// Narrows `self` so that it lies within `bounds`.
    pub fn clamp_to(&self, bounds: PriceRange) -> PriceRange {
        let min = self.min.max(bounds.min).min(bounds.max);
        let max = self.max.min(bounds.max).max(bounds.min);
        PriceRange { min, max }
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategorySelector {
    #[default]
    All,
    Only(Category),
}

impl CategorySelector {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => *selected == category,
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategorySelector {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    RatingDesc,
    #[default]
    Newest,
    MostReviewed,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::RatingDesc => "rating-desc",
            Self::Newest => "newest",
            Self::MostReviewed => "most-reviewed",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "rating-desc" => Ok(Self::RatingDesc),
            "newest" => Ok(Self::Newest),
            "most-reviewed" => Ok(Self::MostReviewed),
            other => Err(DomainError::UnknownSortKey(other.to_string())),
        }
    }
}

/// Everything that decides which products are visible and in which order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub term: String,
    pub category: CategorySelector,
    pub price: PriceRange,
    pub sort: SortKey,
}

/// Thresholds for autocomplete output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuggestionPolicy {
    pub min_chars: usize,
    pub limit: usize,
}

impl SuggestionPolicy {
    pub const DEFAULT: SuggestionPolicy = SuggestionPolicy { min_chars: 2, limit: 6 };

    pub fn accepts(&self, term: &str) -> bool {
        term.trim().chars().count() >= self.min_chars
    }
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
