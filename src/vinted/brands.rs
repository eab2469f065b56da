//! Brand filters offered on the watch page.

use serde::Serialize;

/// A selectable brand filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Brand {
    /// Vinted brand identifier, sent upstream as part of `brand_ids`
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
}

const fn brand(id: &'static str, name: &'static str) -> Brand {
    Brand { id, name }
}

/// Known brands, in display order.
pub const BRANDS: &[Brand] = &[
    brand("2367131", "Andersson Bell"),
    brand("11814083", "Applied art forms"),
    brand("2053426", "Auralee"),
    brand("7373680", "Beams Plus"),
    brand("6781847", "Cmmawear"),
    brand("56974", "Comme des Garçons"),
    brand("5589958", "Comme des Garçons Homme"),
    brand("2318552", "Comme des Garçons Homme Plus"),
    brand("1330138", "Comme des Garçons tricot"),
    brand("17308095", "Diomene"),
    brand("5204470", "Evan Kinori"),
    brand("257216", "Fucking Awesome"),
    brand("4461245", "GR10K"),
    brand("428133", "Haven"),
    brand("235040", "Junya Watanabe"),
    brand("2441307", "Mfpen"),
    brand("596562", "Nanamica"),
    brand("165016", "Noah"),
    brand("218132", "Our Legacy"),
    brand("139960", "Palace"),
    brand("222038", "Palace Skateboards"),
    brand("19580903", "Pet Tree Kor"),
    brand("3935554", "Post Archive Faction"),
    brand("11333247", "Ranra"),
    brand("8640622", "Rier"),
    brand("600988", "Roa"),
    brand("369700", "Sacai"),
    brand("11442249", "Sage Nation"),
    brand("4690051", "Stefan Cooke"),
    brand("441", "Stussy"),
    brand("14969", "Supreme"),
    brand("3232772", "This is never that"),
    brand("11119537", "USM Haller"),
];

/// Looks up the display name of a brand identifier.
pub fn name_of(id: &str) -> Option<&'static str> {
    BRANDS.iter().find(|b| b.id == id).map(|b| b.name)
}

/// Returns every known brand identifier.
pub fn all_ids() -> impl Iterator<Item = &'static str> {
    BRANDS.iter().map(|b| b.id)
}
