//! Fetch command implementation: one catalog request, printed.

use crate::config::Config;
use crate::format::Formatter;
use crate::normalize::Normalizer;
use crate::vinted::brands;
use crate::vinted::{CatalogSource, FilterSelection, VintedClient};
use anyhow::{Context, Result};
use tracing::info;

/// Fetches the newest listings once and formats them.
pub struct FetchCommand {
    config: Config,
}

impl FetchCommand {
    /// Creates a new fetch command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the fetch and returns formatted output.
    pub async fn execute(&self, selection: &FilterSelection) -> Result<String> {
        let client =
            VintedClient::new(&self.config).await.context("Failed to create HTTP client")?;

        Ok(self.execute_with_client(&client, selection).await)
    }

    /// Executes the fetch with a provided source (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl CatalogSource,
        selection: &FilterSelection,
    ) -> String {
        info!("Fetching newest items for {}", brand_label(selection));

        let raw = client.fetch_items(selection).await;
        let items = Normalizer::new(client.market()).normalize_all(&raw);

        info!("Fetched {} items", items.len());

        Formatter::new(self.config.format).format_items(&items)
    }
}

/// Brand names of a selection, falling back to the raw id for unknown brands.
fn brand_label(selection: &FilterSelection) -> String {
    if selection.is_empty() {
        return "all brands".to_string();
    }
    selection.iter().map(|id| brands::name_of(id).unwrap_or(id)).collect::<Vec<_>>().join(", ")
}
