//! Optimistic collection synchronizer for the promotions list.
//!
//! Keeps the cached, filtered, paginated promotion list responsive by
//! applying toggle mutations locally before the server confirms them, then
//! reconciling against server truth: confirm-and-invalidate on success, exact
//! rollback on failure. Whether a toggle may be patched in place depends on
//! the active filter — a record whose new value the filter would reject is
//! never patched locally, because a patched-then-hidden row would flicker and
//! miscount pagination. Those toggles defer all visible change to the
//! post-confirmation refetch.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::cache::{CollectionCache, QueryKey};
use crate::error::{Error, Result};
use crate::metrics::PromotionMetrics;
use crate::models::{Page, Promotion, PromotionId};
use crate::query::{SearchParams, SearchPatch};
use crate::remote::PromotionApi;

const RESOURCE: &str = "promotions";
const SUMMARY_RESOURCE: &str = "promotions/summary";

/// User-facing outcome notification, the toast analogue of the web client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

/// Sink for exactly-once mutation outcome notifications.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Default notifier: structured log lines instead of toasts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(message) => info!("mutation succeeded: {message}"),
            Notice::Failure(message) => warn!("mutation failed: {message}"),
        }
    }
}

impl<N: Notifier> Notifier for std::sync::Arc<N> {
    fn notify(&self, notice: Notice) {
        self.as_ref().notify(notice);
    }
}

/// How a toggle was applied locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePath {
    /// Patched in place; the record stays visible under the active filter
    Optimistic,
    /// No local patch; the filter would hide the new value, so all visible
    /// change waits for the post-confirmation refetch
    Deferred,
}

/// Per-record mutation phase while a toggle is in flight.
///
/// `Pending` acts as a guard: a second toggle on the same record is rejected
/// instead of racing the first one's confirmation or rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationPhase {
    PendingOptimistic,
    PendingDeferred,
}

/// Terminal state of one toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Server confirmed; caches invalidated per path
    Committed(TogglePath),
    /// Server rejected; any optimistic patch was reverted exactly
    RolledBack(TogglePath),
    /// The record is in no cached page; treated as a no-op success
    NotCached,
}

/// Client-side synchronizer for one tenant's promotion collection.
///
/// Shared mutable cache state is guarded by short mutexes; no lock is held
/// across an await point, so the type is safe to share across tasks.
pub struct CollectionSynchronizer<A: PromotionApi, N: Notifier = TracingNotifier> {
    api: A,
    notifier: N,
    tenant: String,
    params: Mutex<SearchParams>,
    cache: CollectionCache<Promotion>,
    pending: Mutex<HashMap<PromotionId, MutationPhase>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A: PromotionApi> CollectionSynchronizer<A> {
    /// Synchronizer with the default tracing notifier.
    pub fn new(api: A, tenant: impl Into<String>) -> Self {
        Self::with_notifier(api, tenant, TracingNotifier)
    }
}

impl<A: PromotionApi, N: Notifier> CollectionSynchronizer<A, N> {
    pub fn with_notifier(api: A, tenant: impl Into<String>, notifier: N) -> Self {
        Self {
            api,
            notifier,
            tenant: tenant.into(),
            params: Mutex::new(SearchParams::default()),
            cache: CollectionCache::new(),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Snapshot of the active search parameters.
    pub fn search_params(&self) -> SearchParams {
        lock(&self.params).clone()
    }

    /// Merge a partial filter/sort/page-size update; resets to page 1.
    pub fn update_search_params(&self, patch: &SearchPatch) {
        lock(&self.params).apply(patch);
    }

    /// Move the page cursor without touching filters.
    pub fn go_to_page(&self, page: u32) {
        lock(&self.params).go_to_page(page);
    }

    fn filtered_key(&self, params: &SearchParams) -> QueryKey {
        QueryKey::new(RESOURCE, self.tenant.clone(), params.cache_token())
    }

    fn summary_key(&self, params: &SearchParams) -> QueryKey {
        QueryKey::new(
            SUMMARY_RESOURCE,
            self.tenant.clone(),
            params.cleared_filters().cache_token(),
        )
    }

    /// Cached page for the active parameters, fresh or stale.
    pub fn current_page(&self) -> Option<Page<Promotion>> {
        let params = self.search_params();
        self.cache.get(&self.filtered_key(&params))
    }

    /// Cached summary page, fresh or stale.
    pub fn summary_page(&self) -> Option<Page<Promotion>> {
        let params = self.search_params();
        self.cache.get(&self.summary_key(&params))
    }

    /// Load the page for the active parameters, refetching when the cached
    /// entry is absent or stale.
    pub async fn ensure_current(&self) -> Result<Page<Promotion>> {
        let params = self.search_params();
        let key = self.filtered_key(&params);
        if self.cache.needs_fetch(&key) {
            let page = self.api.fetch_page(&params).await?;
            self.cache.set(key.clone(), page)?;
        }
        Ok(self
            .cache
            .get(&key)
            .unwrap_or_else(|| Page::empty(params.page, params.page_size)))
    }

    /// Load the unfiltered summary page that feeds aggregate metrics.
    pub async fn ensure_summary(&self) -> Result<Page<Promotion>> {
        let params = self.search_params();
        let key = self.summary_key(&params);
        if self.cache.needs_fetch(&key) {
            let summary_params = params.cleared_filters();
            let page = self.api.fetch_page(&summary_params).await?;
            self.cache.set(key.clone(), page)?;
        }
        Ok(self
            .cache
            .get(&key)
            .unwrap_or_else(|| Page::empty(1, params.page_size)))
    }

    /// Aggregate metrics projected from current cache state.
    pub fn metrics(&self) -> PromotionMetrics {
        let params = self.search_params();
        let summary = self.cache.get(&self.summary_key(&params));
        let filtered = self.cache.get(&self.filtered_key(&params));
        let now_ms = chrono::Utc::now().timestamp_millis();
        PromotionMetrics::derive(summary.as_ref(), filtered.as_ref(), now_ms)
    }

    /// Toggle a promotion's active flag with zero perceived latency.
    ///
    /// Returns `Err(Error::MutationInFlight)` when a toggle for the same
    /// record has not yet resolved. Server rejection is not an `Err`: it is
    /// handled here — rollback, invalidation, failure notice — and reported
    /// as [`ToggleOutcome::RolledBack`].
    pub async fn toggle_active(&self, id: PromotionId, new_value: bool) -> Result<ToggleOutcome> {
        let params = self.search_params();
        let filtered_key = self.filtered_key(&params);
        let summary_key = self.summary_key(&params);

        let cached = self.cache.contains_record(&filtered_key, |p| p.id == id)
            || self.cache.contains_record(&summary_key, |p| p.id == id);
        if !cached {
            debug!(%id, "toggle for uncached promotion is a no-op");
            return Ok(ToggleOutcome::NotCached);
        }

        // Filter impact classification: a constrained filter that the new
        // value fails means the record must vanish, which only a refetch may
        // do without flicker or a wrong total_count.
        let path = if params.constrains_active() && params.is_active != Some(new_value) {
            TogglePath::Deferred
        } else {
            TogglePath::Optimistic
        };

        {
            let mut pending = lock(&self.pending);
            if pending.contains_key(&id) {
                return Err(Error::MutationInFlight(id));
            }
            let phase = match path {
                TogglePath::Optimistic => MutationPhase::PendingOptimistic,
                TogglePath::Deferred => MutationPhase::PendingDeferred,
            };
            pending.insert(id, phase);
        }

        let mut pre_filtered = None;
        let mut pre_summary = None;
        if path == TogglePath::Optimistic {
            pre_filtered =
                self.cache
                    .patch_record(&filtered_key, |p| p.id == id, |p| p.is_active = new_value);
            pre_summary =
                self.cache
                    .patch_record(&summary_key, |p| p.id == id, |p| p.is_active = new_value);
        }

        let result = self.api.set_active(id, new_value).await;
        lock(&self.pending).remove(&id);

        match result {
            Ok(()) => {
                match path {
                    TogglePath::Optimistic => {
                        // A record that was only in the summary page may now
                        // match the filter; the filtered page has to refetch
                        // for it to appear.
                        if pre_filtered.is_none() {
                            self.cache.invalidate(&filtered_key);
                        }
                        self.cache.invalidate(&summary_key);
                    }
                    TogglePath::Deferred => {
                        self.cache.invalidate(&filtered_key);
                        self.cache.invalidate(&summary_key);
                    }
                }
                info!(%id, new_value, ?path, "promotion toggle confirmed");
                self.notifier
                    .notify(Notice::Success("Promotion updated".to_string()));
                Ok(ToggleOutcome::Committed(path))
            }
            Err(error) => {
                if let Some(before) = pre_filtered {
                    self.cache
                        .patch_record(&filtered_key, |p| p.id == id, |p| *p = before);
                }
                if let Some(before) = pre_summary {
                    self.cache
                        .patch_record(&summary_key, |p| p.id == id, |p| *p = before);
                }
                self.cache.invalidate(&summary_key);
                warn!(%id, %error, ?path, "promotion toggle failed");
                self.notifier.notify(Notice::Failure(failure_message(&error)));
                Ok(ToggleOutcome::RolledBack(path))
            }
        }
    }
}

/// Most specific message available: the server's own, else a generic one.
fn failure_message(error: &Error) -> String {
    match error {
        Error::Api(message) => message.clone(),
        _ => "Could not update promotion".to_string(),
    }
}
