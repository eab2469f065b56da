//! HTTP client for the Vinted catalog API using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::vinted::market::Market;
use crate::vinted::models::{FilterSelection, RawItem};
use crate::vinted::retry::{retry, Backoff, FetchError, RetryPolicy, Sleeper, TokioSleeper};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use wreq::{Client, RequestBuilder};
use wreq_util::Emulation;

const CATALOG_PATH: &str = "/api/v2/catalog/items";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
const ACCEPT: &str = "application/json, text/plain, */*";

const WARM_UP_TIMEOUT: Duration = Duration::from_secs(12);
const API_TIMEOUT: Duration = Duration::from_secs(18);
const WARM_UP_PAUSE: Backoff = Backoff::from_millis(200, 600);

/// Logged body prefix length for unparseable responses.
const SNIPPET_LEN: usize = 500;

/// Source of raw catalog listings - enables mocking for tests.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches the newest listings for a selection.
    ///
    /// Never fails: once retries are exhausted the result is empty.
    async fn fetch_items(&self, selection: &FilterSelection) -> Vec<RawItem>;

    /// Returns the marketplace this source talks to.
    fn market(&self) -> Market;
}

/// Vinted HTTP client with a warmed, cookie-carrying session.
pub struct VintedClient {
    client: Client,
    market: Market,
    per_page: u32,
    order: String,
    base_url: Option<String>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    warmed_up: OnceCell<()>,
}

impl VintedClient {
    /// Creates a new Vinted client with the given configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None).await
    }

    /// Creates a new Vinted client with an optional custom base URL (for testing).
    pub async fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            market: config.market,
            per_page: config.per_page,
            order: config.order.clone(),
            base_url,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            warmed_up: OnceCell::new(),
        })
    }

    /// Replaces the sleeper used for backoff and warm-up pauses.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Replaces the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the base URL (custom for testing, or market-based for production).
    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| self.market.base_url())
    }

    /// Builds the catalog listing URL for a selection.
    pub fn catalog_url(&self, selection: &FilterSelection) -> String {
        let mut url = format!(
            "{}{}?order={}&per_page={}",
            self.base_url(),
            CATALOG_PATH,
            urlencoding::encode(&self.order),
            self.per_page
        );

        if !selection.is_empty() {
            url.push_str("&brand_ids=");
            url.push_str(&urlencoding::encode(&selection.joined()));
        }

        url
    }

    /// A GET carrying the session's browser identity.
    fn session_get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", USER_AGENT)
            .header("Accept", ACCEPT)
            .header("Accept-Language", self.market.accept_language())
            .header("Connection", "keep-alive")
    }

    /// Visits the home page once so the cookie store holds anti-bot tokens.
    async fn ensure_warm(&self) {
        self.warmed_up.get_or_init(|| self.warm_up()).await;
    }

    async fn warm_up(&self) {
        let url = format!("{}/", self.base_url());
        debug!("Warming up session: GET {}", url);

        match tokio::time::timeout(WARM_UP_TIMEOUT, self.session_get(&url).send()).await {
            Ok(Ok(response)) => {
                debug!("Warm-up status: {}", response.status());
                self.sleeper.sleep(WARM_UP_PAUSE.pick()).await;
            }
            Ok(Err(e)) => debug!("Warm-up failed, continuing without cookies: {}", e),
            Err(_) => debug!("Warm-up timed out after {:?}, continuing", WARM_UP_TIMEOUT),
        }
    }

    /// Performs a single catalog request.
    async fn attempt(&self, url: &str) -> Result<Vec<RawItem>, FetchError> {
        let base = self.base_url();
        debug!("GET {}", url);

        let request = self
            .session_get(url)
            .header("Referer", format!("{}/", base))
            .header("Origin", base)
            .header("X-Requested-With", "XMLHttpRequest");

        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, wreq::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(API_TIMEOUT, exchange).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => return Err(FetchError::Transport(e.to_string())),
            Err(_) => {
                return Err(FetchError::Transport(format!("timed out after {:?}", API_TIMEOUT)))
            }
        };

        debug!("Response status: {}", status);

        if status == 403 {
            return Err(FetchError::Blocked);
        }

        if !(200..300).contains(&status) {
            debug!("Error body: {}", snippet(&body));
            return Err(FetchError::Status(status));
        }

        let data: Value = serde_json::from_str(&body)
            .map_err(|_| FetchError::Malformed { status, snippet: snippet(&body) })?;

        Ok(extract_items(data))
    }
}

#[async_trait]
impl CatalogSource for VintedClient {
    async fn fetch_items(&self, selection: &FilterSelection) -> Vec<RawItem> {
        self.ensure_warm().await;

        let url = self.catalog_url(selection);
        info!("Fetching catalog for brands: {}", selection);

        let client = self;
        let url = url.as_str();
        match retry(&self.policy, self.sleeper.as_ref(), move |_| client.attempt(url)).await {
            Ok(items) => {
                debug!("Received {} raw items", items.len());
                items
            }
            Err(e) => {
                warn!(
                    "Giving up on catalog fetch after {} attempts: {}",
                    self.policy.max_attempts, e
                );
                Vec::new()
            }
        }
    }

    fn market(&self) -> Market {
        self.market
    }
}

/// Takes the `items` array out of a catalog response; anything else yields nothing.
fn extract_items(data: Value) -> Vec<RawItem> {
    match data {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_LEN).map(|c| if c == '\n' { ' ' } else { c }).collect()
}
