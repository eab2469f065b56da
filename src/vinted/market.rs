//! Vinted marketplace domains and locale settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported Vinted marketplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    #[default]
    Fr,
    Be,
    Lu,
    De,
    At,
    Es,
    It,
    Nl,
    Pl,
    Pt,
    Uk,
    Us,
}

impl Market {
    /// Returns the host name of this marketplace.
    pub fn host(&self) -> &'static str {
        match self {
            Market::Fr => "www.vinted.fr",
            Market::Be => "www.vinted.be",
            Market::Lu => "www.vinted.lu",
            Market::De => "www.vinted.de",
            Market::At => "www.vinted.at",
            Market::Es => "www.vinted.es",
            Market::It => "www.vinted.it",
            Market::Nl => "www.vinted.nl",
            Market::Pl => "www.vinted.pl",
            Market::Pt => "www.vinted.pt",
            Market::Uk => "www.vinted.co.uk",
            Market::Us => "www.vinted.com",
        }
    }

    /// Returns the base URL for this marketplace.
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host())
    }

    /// Returns the Accept-Language header value for this marketplace.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Market::Fr | Market::Be | Market::Lu => "fr-FR,fr;q=0.9,en;q=0.8",
            Market::De | Market::At => "de-DE,de;q=0.9,en;q=0.8",
            Market::Es => "es-ES,es;q=0.9,en;q=0.8",
            Market::It => "it-IT,it;q=0.9,en;q=0.8",
            Market::Nl => "nl-NL,nl;q=0.9,en;q=0.8",
            Market::Pl => "pl-PL,pl;q=0.9,en;q=0.8",
            Market::Pt => "pt-PT,pt;q=0.9,en;q=0.8",
            Market::Uk => "en-GB,en;q=0.9",
            Market::Us => "en-US,en;q=0.9",
        }
    }

    /// Returns true when the marketplace is served from a `.fr` domain.
    ///
    /// French deployments always display prices in euros.
    pub fn is_french(&self) -> bool {
        self.host().ends_with(".fr")
    }

    /// Returns all supported marketplaces.
    pub fn all() -> &'static [Market] {
        &[
            Market::Fr,
            Market::Be,
            Market::Lu,
            Market::De,
            Market::At,
            Market::Es,
            Market::It,
            Market::Nl,
            Market::Pl,
            Market::Pt,
            Market::Uk,
            Market::Us,
        ]
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Market::Fr => "fr",
            Market::Be => "be",
            Market::Lu => "lu",
            Market::De => "de",
            Market::At => "at",
            Market::Es => "es",
            Market::It => "it",
            Market::Nl => "nl",
            Market::Pl => "pl",
            Market::Pt => "pt",
            Market::Uk => "uk",
            Market::Us => "us",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Market {
    type Err = MarketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fr" | "france" => Ok(Market::Fr),
            "be" | "belgium" => Ok(Market::Be),
            "lu" | "luxembourg" => Ok(Market::Lu),
            "de" | "germany" => Ok(Market::De),
            "at" | "austria" => Ok(Market::At),
            "es" | "spain" => Ok(Market::Es),
            "it" | "italy" => Ok(Market::It),
            "nl" | "netherlands" => Ok(Market::Nl),
            "pl" | "poland" => Ok(Market::Pl),
            "pt" | "portugal" => Ok(Market::Pt),
            "uk" | "gb" | "united kingdom" => Ok(Market::Uk),
            "us" | "usa" | "united states" => Ok(Market::Us),
            _ => Err(MarketParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketParseError(String);

impl fmt::Display for MarketParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown market '{}'. Valid markets: fr, be, lu, de, at, es, it, nl, pl, pt, uk, us",
            self.0
        )
    }
}

impl std::error::Error for MarketParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_parsing() {
        assert_eq!(Market::from_str("fr").unwrap(), Market::Fr);
        assert_eq!(Market::from_str("France").unwrap(), Market::Fr);
        assert_eq!(Market::from_str("gb").unwrap(), Market::Uk);
        assert_eq!(Market::from_str("united states").unwrap(), Market::Us);
        assert_eq!(Market::from_str("DE").unwrap(), Market::De);

        assert!(Market::from_str("invalid").is_err());
        assert!(Market::from_str("").is_err());
    }

    #[test]
    fn test_market_hosts() {
        assert_eq!(Market::Fr.host(), "www.vinted.fr");
        assert_eq!(Market::Uk.host(), "www.vinted.co.uk");
        assert_eq!(Market::Us.host(), "www.vinted.com");
        assert_eq!(Market::Fr.base_url(), "https://www.vinted.fr");
    }

    #[test]
    fn test_only_fr_is_french() {
        let french: Vec<_> = Market::all().iter().filter(|m| m.is_french()).collect();
        assert_eq!(french, vec![&Market::Fr]);
    }

    #[test]
    fn test_accept_language() {
        assert!(Market::Fr.accept_language().starts_with("fr-FR"));
        assert!(Market::Be.accept_language().starts_with("fr-FR"));
        assert!(Market::Uk.accept_language().starts_with("en-GB"));
        assert!(Market::Pl.accept_language().starts_with("pl-PL"));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for market in Market::all() {
            assert_eq!(Market::from_str(&market.to_string()).unwrap(), *market);
        }
    }

    #[test]
    fn test_market_default() {
        assert_eq!(Market::default(), Market::Fr);
    }

    #[test]
    fn test_market_parse_error_display() {
        let msg = Market::from_str("xyz").unwrap_err().to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("Valid markets"));
    }

    #[test]
    fn test_market_serde() {
        assert_eq!(serde_json::to_string(&Market::Fr).unwrap(), "\"fr\"");
        let parsed: Market = serde_json::from_str("\"uk\"").unwrap();
        assert_eq!(parsed, Market::Uk);
    }
}
