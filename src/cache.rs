//! Short-lived cache of normalized items for the most recent filter selection.

use crate::normalize::Normalizer;
use crate::vinted::client::CatalogSource;
use crate::vinted::models::{FilterSelection, NormalizedItem};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default time-to-live of a cached result, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 25;

/// Source of the current instant. Swapped out in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// The single cached result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub selection: FilterSelection,
    pub items: Vec<NormalizedItem>,
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// True while the entry answers `selection` and is younger than `ttl`.
    pub fn is_valid_for(&self, selection: &FilterSelection, now: Instant, ttl: Duration) -> bool {
        self.selection == *selection && now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Memoizes normalized items for one selection at a time.
///
/// Asking for a different selection replaces the entry, even if the old one
/// was still fresh.
pub struct SelectionCache<S, C = SystemClock> {
    source: S,
    clock: C,
    normalizer: Normalizer,
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl<S: CatalogSource> SelectionCache<S, SystemClock> {
    /// Creates a cache over `source` using the wall clock.
    pub fn new(source: S, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, SystemClock)
    }
}

impl<S: CatalogSource, C: Clock> SelectionCache<S, C> {
    /// Creates a cache with a custom clock (for testing).
    pub fn with_clock(source: S, ttl: Duration, clock: C) -> Self {
        let normalizer = Normalizer::new(source.market());
        Self { source, clock, normalizer, ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The current entry, fresh or not.
    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    /// Returns items for `selection`, hitting the upstream only when the
    /// cached entry is stale or belongs to another selection.
    ///
    /// Never fails: an upstream failure yields (and caches) an empty list.
    pub async fn get_items(&mut self, selection: &FilterSelection) -> Vec<NormalizedItem> {
        let now = self.clock.now();

        if let Some(entry) = &self.entry {
            if entry.is_valid_for(selection, now, self.ttl) {
                debug!(
                    "Cache hit for {} ({:?} old)",
                    selection,
                    now.saturating_duration_since(entry.fetched_at)
                );
                return entry.items.clone();
            }
            if entry.selection != *selection {
                debug!("Selection changed from {} to {}, evicting", entry.selection, selection);
            }
        }

        let raw = self.source.fetch_items(selection).await;
        let items = self.normalizer.normalize_all(&raw);
        info!("Cached {} items for brands {}", items.len(), selection);

        self.entry = Some(CacheEntry {
            selection: selection.clone(),
            items: items.clone(),
            fetched_at: self.clock.now(),
        });

        items
    }
}
