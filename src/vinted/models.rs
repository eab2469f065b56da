//! Data models for filter selections and catalog items.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An upstream listing record. Its shape is not fixed, so it stays a JSON document.
pub type RawItem = serde_json::Value;

/// The set of brand identifiers a request restricts results to.
///
/// Equality is set equality: `["a", "b"]` and `["b", "a"]` are the same
/// selection. Identifiers iterate in sorted order, which keeps the outbound
/// `brand_ids` parameter stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    ids: BTreeSet<String>,
}

impl FilterSelection {
    /// Creates a selection from identifiers, dropping blank entries.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        Self { ids }
    }

    /// Selection that applies no brand restriction.
    pub fn unfiltered() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Comma-joined identifiers, as sent in the `brand_ids` query parameter.
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "(all)")
        } else {
            write!(f, "{}", self.joined())
        }
    }
}

/// A listing in the fixed, display-ready shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    /// Listing title, never empty
    pub title: String,
    /// Price formatted for display (e.g. "1 234,50 €")
    pub price_display: String,
    /// Size label, possibly empty
    pub size: String,
    /// Link to the listing on the marketplace
    pub detail_url: String,
    /// Absolute photo URL, possibly empty
    pub photo_url: String,
    /// Seller display name, never empty
    pub seller_name: String,
    /// Absolute seller avatar URL, possibly empty
    pub seller_avatar_url: String,
    /// "4.7/5" or a placeholder when unknown
    pub seller_rating_display: String,
    /// Star glyphs for the seller rating or a placeholder when unknown
    pub seller_stars_glyphs: String,
}
