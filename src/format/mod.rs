//! Output formatting for normalized items (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::vinted::NormalizedItem;

/// Formats items for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats multiple items.
    pub fn format_items(&self, items: &[NormalizedItem]) -> String {
        if items.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No items found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_items(items),
            OutputFormat::Table => self.table_items(items),
            OutputFormat::Markdown => self.markdown_items(items),
            OutputFormat::Csv => self.csv_items(items),
        }
    }

    // JSON formatting

    fn json_items(&self, items: &[NormalizedItem]) -> String {
        serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_items(&self, items: &[NormalizedItem]) -> String {
        let price_width = 14;
        let size_width = 8;
        let stars_width = 6;
        let seller_width = 18;
        let title_width = 40;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<price_width$}  {:<size_width$}  {:<stars_width$}  {:<seller_width$}  {}",
            "Price", "Size", "Stars", "Seller", "Title"
        ));
        lines.push(format!(
            "{:-<price_width$}  {:-<size_width$}  {:-<stars_width$}  {:-<seller_width$}  {:-<title_width$}",
            "", "", "", "", ""
        ));

        for item in items {
            lines.push(format!(
                "{:>price_width$}  {:<size_width$}  {:<stars_width$}  {:<seller_width$}  {}",
                item.price_display,
                truncate(&item.size, size_width),
                item.seller_stars_glyphs,
                truncate(&item.seller_name, seller_width),
                truncate(&item.title, title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} items", items.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_items(&self, items: &[NormalizedItem]) -> String {
        let mut lines = Vec::new();

        lines.push("| Price | Size | Seller | Rating | Title |".to_string());
        lines.push("|-------|------|--------|--------|-------|".to_string());

        for item in items {
            lines.push(format!(
                "| {} | {} | {} | {} | [{}]({}) |",
                Self::markdown_escape(&item.price_display),
                Self::markdown_escape(&item.size),
                Self::markdown_escape(&item.seller_name),
                Self::markdown_escape(&item.seller_rating_display),
                Self::markdown_escape(&truncate(&item.title, 40)),
                Self::markdown_escape(&item.detail_url)
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} items found*", items.len()));

        lines.join("\n")
    }

    fn markdown_escape(s: &str) -> String {
        s.replace('|', "\\|").replace('\n', " ")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "title,price,size,seller,rating,url,photo".to_string()
    }

    fn csv_items(&self, items: &[NormalizedItem]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for item in items {
            lines.push(format!(
                "{},{},{},{},{},{},{}",
                Self::csv_escape(&item.title),
                Self::csv_escape(&item.price_display),
                Self::csv_escape(&item.size),
                Self::csv_escape(&item.seller_name),
                Self::csv_escape(&item.seller_rating_display),
                Self::csv_escape(&item.detail_url),
                Self::csv_escape(&item.photo_url)
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Shortens to `max` characters, ending with "..." when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
