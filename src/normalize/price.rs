//! Price extraction and display formatting.

use super::{as_number, as_text, first_truthy};
use crate::vinted::market::Market;
use serde_json::Value;

/// Grouping separator between thousands.
const THOUSANDS_SEP: char = ' ';
const DECIMAL_SEP: char = ',';

/// Formats a listing price for display, e.g. `1 234,50 €`.
///
/// `raw` is the item's price field, which may be an object carrying
/// `amount`/`value` and `currency`/`currency_code`, a number, or free text.
/// `numeric` and `currency` are separate item fields that take precedence.
/// When no number can be obtained the trimmed text is returned, or an empty
/// string.
pub fn format_price(
    raw: Option<&Value>,
    numeric: Option<&Value>,
    currency: Option<&str>,
    market: Market,
) -> String {
    let mut numeric = numeric;
    let mut currency = currency.map(str::to_string);
    let mut text: Option<&str> = None;

    match raw {
        Some(object @ Value::Object(_)) => {
            numeric = numeric.or_else(|| first_truthy(object, &["amount", "value"]));
            if currency.is_none() {
                currency = first_truthy(object, &["currency", "currency_code"]).and_then(as_text);
            }
        }
        Some(number @ Value::Number(_)) => numeric = numeric.or(Some(number)),
        Some(Value::String(s)) => text = Some(s.as_str()),
        _ => {}
    }

    let value = numeric.and_then(as_number).or_else(|| text.and_then(parse_price_text));

    let Some(value) = value else {
        return text.map(str::trim).unwrap_or_default().to_string();
    };

    let amount = group_thousands(value);
    match currency_suffix(currency.as_deref(), market) {
        Some(suffix) => format!("{} {}", amount, suffix),
        None => amount,
    }
}

/// Extracts a number from free text such as `"19.90 €"` or `"1.234,50"`.
///
/// Only digits and `,`/`.` are kept. When both separators occur the last one
/// is the decimal point; a separator that occurs once on its own is a decimal
/// point; a separator repeated on its own is a grouping mark.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned: String =
        text.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',').collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let decimal = match cleaned.rfind(['.', ',']) {
        Some(idx) => {
            let sep = cleaned[idx..].chars().next()?;
            let has_other = cleaned.contains(if sep == '.' { ',' } else { '.' });
            let repeated = cleaned.matches(sep).count() > 1;
            if has_other || !repeated {
                Some(idx)
            } else {
                None
            }
        }
        None => None,
    };

    let normalized: String = cleaned
        .char_indices()
        .filter_map(|(i, c)| match c {
            '.' | ',' if Some(i) == decimal => Some('.'),
            '.' | ',' => None,
            _ => Some(c),
        })
        .collect();

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Two decimals, grouped thousands, comma decimal separator.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && fixed != "0.00" {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(THOUSANDS_SEP);
        }
        out.push(c);
    }
    out.push(DECIMAL_SEP);
    out.push_str(frac_part);
    out
}

/// Euro sign for euro prices and French deployments, else the currency code.
fn currency_suffix(currency: Option<&str>, market: Market) -> Option<String> {
    let code = currency.map(|c| c.trim().to_uppercase()).unwrap_or_default();

    if matches!(code.as_str(), "EUR" | "€" | "EURO") || market.is_french() {
        Some("€".to_string())
    } else if !code.is_empty() {
        Some(code)
    } else {
        None
    }
}
