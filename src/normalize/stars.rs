//! Star-glyph rendering of seller ratings.

use super::as_number;
use serde_json::Value;

pub const FULL_STAR: char = '★';
pub const HALF_STAR: char = '⭐';
pub const EMPTY_STAR: char = '☆';

/// Shown when a rating is unknown or not a number.
pub const UNKNOWN: &str = "—";

pub const MAX_STARS: u32 = 5;

/// Renders `rating` as exactly `max` glyphs: full stars, an optional half
/// star, then empty stars. The rating is clamped into `[0, max]`.
pub fn star_glyphs(rating: f64, max: u32) -> String {
    if rating.is_nan() {
        return UNKNOWN.to_string();
    }

    let rating = rating.clamp(0.0, f64::from(max));
    let filled = rating.floor() as u32;
    let half = u32::from(rating - f64::from(filled) >= 0.5);
    let empty = max - filled - half;

    let mut glyphs = String::with_capacity(max as usize * 3);
    glyphs.extend(std::iter::repeat(FULL_STAR).take(filled as usize));
    if half == 1 {
        glyphs.push(HALF_STAR);
    }
    glyphs.extend(std::iter::repeat(EMPTY_STAR).take(empty as usize));
    glyphs
}

/// Like [`star_glyphs`] on a five-star scale, for a rating of unknown JSON type.
pub fn star_glyphs_for(value: &Value) -> String {
    match as_number(value) {
        Some(rating) => star_glyphs(rating, MAX_STARS),
        None => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count(s: &str, glyph: char) -> usize {
        s.chars().filter(|c| *c == glyph).count()
    }

    #[test]
    fn test_four_point_seven() {
        let s = star_glyphs(4.7, 5);
        assert_eq!(count(&s, FULL_STAR), 4);
        assert_eq!(count(&s, HALF_STAR), 1);
        assert_eq!(count(&s, EMPTY_STAR), 0);
        assert_eq!(s, "★★★★⭐");
    }

    #[test]
    fn test_zero() {
        assert_eq!(star_glyphs(0.0, 5), "☆☆☆☆☆");
    }

    #[test]
    fn test_half_boundary() {
        assert_eq!(star_glyphs(3.5, 5), "★★★⭐☆");
        assert_eq!(star_glyphs(3.49, 5), "★★★☆☆");
    }

    #[test]
    fn test_clamped() {
        assert_eq!(star_glyphs(7.2, 5), "★★★★★");
        assert_eq!(star_glyphs(-1.0, 5), "☆☆☆☆☆");
        assert_eq!(star_glyphs(f64::INFINITY, 5), "★★★★★");
    }

    #[test]
    fn test_glyph_count_always_max() {
        for tenth in 0..=50 {
            let s = star_glyphs(f64::from(tenth) / 10.0, 5);
            assert_eq!(s.chars().count(), 5, "rating {}", tenth);
        }
        assert_eq!(star_glyphs(2.5, 10).chars().count(), 10);
    }

    #[test]
    fn test_nan_is_unknown() {
        assert_eq!(star_glyphs(f64::NAN, 5), UNKNOWN);
    }

    #[test]
    fn test_json_values() {
        assert_eq!(star_glyphs_for(&json!("bad")), UNKNOWN);
        assert_eq!(star_glyphs_for(&json!(null)), UNKNOWN);
        assert_eq!(star_glyphs_for(&json!({ "value": 4 })), UNKNOWN);
        assert_eq!(star_glyphs_for(&json!(4.7)), "★★★★⭐");
        assert_eq!(star_glyphs_for(&json!("4.5")), "★★★★⭐");
        assert_eq!(star_glyphs_for(&json!(2)), "★★☆☆☆");
    }
}
