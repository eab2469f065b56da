//! vinted-watch - Live mirror of the newest Vinted listings
//!
//! Polls the catalog API with TLS fingerprint emulation, normalizes the
//! loosely-shaped listings and serves them as a self-refreshing page.

pub mod cache;
pub mod commands;
pub mod config;
pub mod format;
pub mod normalize;
pub mod vinted;
pub mod web;

pub use cache::SelectionCache;
pub use config::Config;
pub use normalize::Normalizer;
pub use vinted::{FilterSelection, Market, NormalizedItem, VintedClient};
