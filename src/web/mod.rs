//! HTTP surface: the watch page, its JSON twin, and a health check.

pub mod page;

use crate::cache::SelectionCache;
use crate::vinted::brands::{self, Brand, BRANDS};
use crate::vinted::{CatalogSource, FilterSelection, NormalizedItem};
use anyhow::{Context, Result};
use axum::{
    extract::{RawQuery, State},
    response::{Html, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Everything the presentation layer needs for one page view.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub items: Vec<NormalizedItem>,
    pub selected_brands: Vec<String>,
    pub available_brands: Vec<Brand>,
    pub cache_ttl_secs: u64,
    /// Local wall-clock time of the render, `HH:MM:SS`
    pub refresh_time: String,
}

/// Shared server state, constructed once at startup.
pub struct AppState<S> {
    cache: Mutex<SelectionCache<S>>,
    cache_ttl_secs: u64,
}

impl<S: CatalogSource> AppState<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self { cache: Mutex::new(SelectionCache::new(source, ttl)), cache_ttl_secs: ttl.as_secs() }
    }

    /// Resolves the query, consults the cache and assembles the page context.
    ///
    /// The cache lock is held across the upstream fetch, so concurrent views
    /// of a stale selection trigger a single fetch.
    pub async fn page_context(&self, raw_query: Option<&str>) -> PageContext {
        let selection = resolve_selection(raw_query);
        let items = self.cache.lock().await.get_items(&selection).await;

        PageContext {
            items,
            selected_brands: selection.iter().map(str::to_string).collect(),
            available_brands: BRANDS.to_vec(),
            cache_ttl_secs: self.cache_ttl_secs,
            refresh_time: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

/// Reads repeated `brands` parameters. No brands means every known brand.
pub fn resolve_selection(raw_query: Option<&str>) -> FilterSelection {
    let requested = FilterSelection::new(
        url::form_urlencoded::parse(raw_query.unwrap_or_default().as_bytes())
            .filter(|(key, _)| key == "brands")
            .map(|(_, value)| value.into_owned()),
    );

    if requested.is_empty() {
        FilterSelection::new(brands::all_ids())
    } else {
        requested
    }
}

/// Builds the application router.
pub fn router<S: CatalogSource + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(index::<S>))
        .route("/api/items", get(api_items::<S>))
        .route("/health", get(health))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve<S: CatalogSource + 'static>(state: Arc<AppState<S>>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state)).await.context("HTTP server failed")
}

async fn index<S: CatalogSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    RawQuery(query): RawQuery,
) -> Html<String> {
    let ctx = state.page_context(query.as_deref()).await;
    debug!("Rendering {} items", ctx.items.len());
    Html(page::render(&ctx))
}

async fn api_items<S: CatalogSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    RawQuery(query): RawQuery,
) -> Json<PageContext> {
    Json(state.page_context(query.as_deref()).await)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vinted::{Market, RawItem};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Mutex as StdMutex;
    use tower::ServiceExt;

    /// Records every selection it is asked for.
    #[derive(Default)]
    struct RecordingSource {
        seen: StdMutex<Vec<FilterSelection>>,
    }

    #[async_trait]
    impl CatalogSource for RecordingSource {
        async fn fetch_items(&self, selection: &FilterSelection) -> Vec<RawItem> {
            self.seen.lock().unwrap().push(selection.clone());
            vec![json!({
                "id": 99,
                "title": "Box logo <tee>",
                "price": { "amount": "80.0", "currency_code": "EUR" },
                "user": { "login": "carol", "rating_average": 4.5 }
            })]
        }

        fn market(&self) -> Market {
            Market::Fr
        }
    }

    fn make_state() -> Arc<AppState<RecordingSource>> {
        Arc::new(AppState::new(RecordingSource::default(), Duration::from_secs(25)))
    }

    async fn get(state: Arc<AppState<RecordingSource>>, uri: &str) -> (StatusCode, String) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_resolve_selection_defaults_to_all_brands() {
        let all = FilterSelection::new(brands::all_ids());
        assert_eq!(resolve_selection(None), all);
        assert_eq!(resolve_selection(Some("")), all);
        assert_eq!(resolve_selection(Some("other=1&brands=")), all);
    }

    #[test]
    fn test_resolve_selection_repeated_params() {
        let selection = resolve_selection(Some("brands=441&brands=14969&x=1&brands=441"));
        assert_eq!(selection, FilterSelection::new(["14969", "441"]));
    }

    #[test]
    fn test_resolve_selection_decodes_values() {
        let selection = resolve_selection(Some("brands=%20441+"));
        assert_eq!(selection, FilterSelection::new(["441"]));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(make_state(), "/health").await;
        assert_eq!(status, StatusCode::OK);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_index_renders_items() {
        let (status, body) = get(make_state(), "/?brands=441").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Box logo &lt;tee&gt;"));
        assert!(body.contains("80,00 €"));
        assert!(body.contains("https://www.vinted.fr/items/99"));
    }

    #[tokio::test]
    async fn test_api_items_context() {
        let (status, body) = get(make_state(), "/api/items?brands=441&brands=14969").await;
        assert_eq!(status, StatusCode::OK);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["selected_brands"], json!(["14969", "441"]));
        assert_eq!(value["cache_ttl_secs"], 25);
        assert_eq!(value["available_brands"].as_array().unwrap().len(), BRANDS.len());
        assert_eq!(value["items"][0]["seller_name"], "carol");
        assert_eq!(value["refresh_time"].as_str().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_repeat_views_share_cache() {
        let state = make_state();

        get(state.clone(), "/?brands=441&brands=14969").await;
        get(state.clone(), "/api/items?brands=14969&brands=441").await;
        get(state.clone(), "/?brands=14969").await;

        let cache = state.cache.lock().await;
        let seen = cache.source().seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], FilterSelection::new(["14969"]));
    }

    #[tokio::test]
    async fn test_no_brands_requests_full_catalog() {
        let state = make_state();
        get(state.clone(), "/").await;

        let cache = state.cache.lock().await;
        let seen = cache.source().seen.lock().unwrap();
        assert_eq!(seen[0].len(), BRANDS.len());
    }
}
