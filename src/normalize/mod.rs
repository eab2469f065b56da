//! Normalization of loosely-shaped catalog items into display-ready records.
//!
//! Upstream items vary in which fields are present and how they nest, so
//! every output field is produced by an ordered list of JSON paths: the first
//! path that resolves to a usable value wins, otherwise a fallback applies.
//! Normalization never fails.

pub mod price;
pub mod stars;
pub mod urls;

use crate::vinted::market::Market;
use crate::vinted::models::{NormalizedItem, RawItem};
use serde_json::Value;

pub use price::format_price;
pub use stars::{star_glyphs, star_glyphs_for, UNKNOWN};
pub use urls::normalize_url;

/// Title used when an item has none.
pub const DEFAULT_TITLE: &str = "Annonce";

/// Seller name used when an item carries no seller identity.
pub const DEFAULT_SELLER: &str = "Utilisateur";

/// One step into a JSON document.
#[derive(Debug, Clone, Copy)]
enum Step {
    Key(&'static str),
    Index(usize),
}

use Step::{Index, Key};

type Path = &'static [Step];

const PHOTO_RULES: &[Path] = &[
    &[Key("photo"), Key("url")],
    &[Key("photo"), Key("url_thumb")],
    &[Key("photo")],
    &[Key("photos"), Index(0), Key("url_fullxfull")],
    &[Key("photos"), Index(0), Key("url")],
    &[Key("photos"), Index(0), Key("url_300")],
    &[Key("photos"), Index(0), Key("url_thumb")],
];

const TITLE_RULES: &[Path] = &[&[Key("title")], &[Key("brand_title")]];

const SIZE_RULES: &[Path] = &[&[Key("size_title")]];

const PRICE_RAW_KEYS: &[&str] = &["price", "price_info"];
const PRICE_NUMERIC_KEYS: &[&str] = &["price_numeric", "price_amount"];
const CURRENCY_KEYS: &[&str] = &["currency", "price_currency"];

const SELLER_KEYS: &[&str] = &["user", "seller", "owner"];

// Relative to the seller object.
const SELLER_NAME_RULES: &[Path] = &[
    &[Key("display_name")],
    &[Key("login")],
    &[Key("username")],
    &[Key("nickname")],
    &[Key("title")],
];

const AVATAR_RULES: &[Path] = &[
    &[Key("avatar"), Key("url")],
    &[Key("avatar"), Key("url_thumb")],
    &[Key("avatar"), Key("thumb")],
    &[Key("avatar")],
    &[Key("photo"), Key("url")],
    &[Key("photo"), Key("url_thumb")],
    &[Key("photo"), Key("thumb")],
    &[Key("photo")],
    &[Key("thumb")],
];

const SELLER_RATING_KEYS: &[&str] =
    &["rating_average", "avg_rating", "score", "rating", "rating_value"];
const STATS_RATING_KEYS: &[&str] = &["rating_average", "avg_rating", "rating"];

/// Converts raw catalog items into [`NormalizedItem`]s for one marketplace.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    market: Market,
}

impl Normalizer {
    /// Creates a normalizer resolving relative URLs against `market`'s host.
    pub fn new(market: Market) -> Self {
        Self { market }
    }

    /// Normalizes every item, preserving order.
    pub fn normalize_all(&self, items: &[RawItem]) -> Vec<NormalizedItem> {
        items.iter().map(|item| self.normalize(item)).collect()
    }

    /// Normalizes a single item.
    pub fn normalize(&self, item: &RawItem) -> NormalizedItem {
        let host = self.market.host();

        let title = first_text(item, TITLE_RULES).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let size = first_text(item, SIZE_RULES).unwrap_or_default();
        let photo_url = first_url(item, PHOTO_RULES)
            .map(|url| normalize_url(url, host))
            .unwrap_or_default();

        let price_display = format_price(
            first_truthy(item, PRICE_RAW_KEYS),
            first_truthy(item, PRICE_NUMERIC_KEYS),
            first_truthy(item, CURRENCY_KEYS).and_then(as_text).as_deref(),
            self.market,
        );

        let id = item.get("id").and_then(as_text).unwrap_or_default();
        let detail_url = format!("https://{}/items/{}", host, id);

        let seller = first_truthy(item, SELLER_KEYS).filter(|s| s.is_object());

        let seller_name = seller
            .and_then(|s| first_text(s, SELLER_NAME_RULES))
            .unwrap_or_else(|| DEFAULT_SELLER.to_string());

        let seller_avatar_url = seller
            .and_then(|s| first_url(s, AVATAR_RULES))
            .map(|url| normalize_url(url, host))
            .unwrap_or_default();

        let rating = seller_rating(item, seller);
        let seller_rating_display = rating
            .and_then(as_number)
            .map(|r| format!("{:.1}/5", r))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let seller_stars_glyphs =
            rating.map(star_glyphs_for).unwrap_or_else(|| UNKNOWN.to_string());

        NormalizedItem {
            title,
            price_display,
            size,
            detail_url,
            photo_url,
            seller_name,
            seller_avatar_url,
            seller_rating_display,
            seller_stars_glyphs,
        }
    }
}

/// First present rating on the seller, then on `user_stats`.
fn seller_rating<'a>(item: &'a Value, seller: Option<&'a Value>) -> Option<&'a Value> {
    seller.and_then(|s| first_present(s, SELLER_RATING_KEYS)).or_else(|| {
        item.get("user_stats")
            .filter(|stats| stats.is_object())
            .and_then(|stats| first_present(stats, STATS_RATING_KEYS))
    })
}

fn resolve<'a>(value: &'a Value, path: &[Step]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, step| match step {
        Step::Key(key) => current.get(*key),
        Step::Index(idx) => current.get(*idx),
    })
}

/// First rule resolving to non-empty text.
fn first_text(value: &Value, rules: &[Path]) -> Option<String> {
    rules
        .iter()
        .filter_map(|path| resolve(value, path))
        .filter(|v| is_truthy(v))
        .find_map(as_text)
}

/// First rule resolving to a non-blank string.
fn first_url<'a>(value: &'a Value, rules: &[Path]) -> Option<&'a str> {
    rules
        .iter()
        .filter_map(|path| resolve(value, path))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
}

/// JSON truthiness: null, false, 0, "", [] and {} are all falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// First truthy value among `keys` of an object.
pub(crate) fn first_truthy<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| value.get(*key)).find(|v| is_truthy(v))
}

/// First non-null value among `keys` of an object; zero and empty strings count.
pub(crate) fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| value.get(*key)).find(|v| !v.is_null())
}

/// Text of a scalar: strings verbatim, numbers rendered.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite number from a JSON number or numeric string (`"4.5"`, `"4,5"`).
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
