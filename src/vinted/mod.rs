//! Vinted-specific modules for the catalog client, retry policy, and data models.

pub mod brands;
pub mod client;
pub mod market;
pub mod models;
pub mod retry;

pub use brands::Brand;
pub use client::{CatalogSource, VintedClient};
pub use market::Market;
pub use models::{FilterSelection, NormalizedItem, RawItem};
pub use retry::{FetchError, RetryPolicy, Sleeper};
