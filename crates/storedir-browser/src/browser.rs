//! Store listing state machine.
//!
//! The current [`Location`] in the browser's [`History`] is the source of
//! truth for the filter set. Every filter control edits the URL; every URL
//! change re-derives [`FilterState`], resets pagination to page 1 and issues
//! a fresh fetch. The search box resets pagination without touching the URL.
//!
//! ## Request sequencing
//!
//! Each fetch is described by a [`PageRequest`] with a monotonically
//! increasing id. Issuing a page-1 request moves the reset point to its id;
//! a response whose request is older than the reset point belongs to a
//! superseded filter set and is dropped. Front-ends that run requests
//! concurrently use [`StoreBrowser::begin_refresh`],
//! [`StoreBrowser::begin_load_more`] and [`StoreBrowser::apply`] directly;
//! the async helpers run one request at a time.

use storedir_client::ApiResponse;
use storedir_core::{
    CategoryId, FilterKey, FilterState, FlagFilter, Location, SortField, Store, StoreId,
    StoreStatus,
};

use crate::history::History;
use crate::liked::{KeyValueStore, LikedStores};
use crate::source::StoreSource;

pub const END_OF_LIST_MESSAGE: &str = "You have seen all the stores.";

/// Snapshot of everything needed to fetch one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub id: u64,
    pub page: u32,
    pub search_query: String,
    pub filters: FilterState,
}

/// What a transition did to the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A page-1 response replaced the list with this many records.
    Replaced(usize),
    /// A later page appended this many records.
    Appended(usize),
    /// The response was for a superseded request and was dropped.
    Stale,
    /// The fetch failed; the list and `has_more` were left alone.
    Failed,
    /// Nothing to do: the state already matched, or no more pages exist.
    Unchanged,
}

#[derive(Debug)]
pub struct StoreBrowser<S, K> {
    source: S,
    liked: LikedStores<K>,
    history: History,
    filters: FilterState,
    search_query: String,
    page: u32,
    has_more: bool,
    data: Vec<Store>,
    last_error: Option<String>,
    failed_request: Option<PageRequest>,
    next_request_id: u64,
    reset_id: u64,
}

impl<S, K> StoreBrowser<S, K>
where
    S: StoreSource,
    K: KeyValueStore,
{
    #[must_use]
    pub fn new(source: S, liked: LikedStores<K>) -> Self {
        Self {
            source,
            liked,
            history: History::default(),
            filters: FilterState::default(),
            search_query: String::new(),
            page: 1,
            has_more: true,
            data: Vec::new(),
            last_error: None,
            failed_request: None,
            next_request_id: 1,
            reset_id: 0,
        }
    }

    /// Seeds the search box before [`Self::mount`] issues the first fetch.
    #[must_use]
    pub fn with_search_query(mut self, text: impl Into<String>) -> Self {
        self.search_query = text.into();
        self
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        self.history.current()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub fn category(&self) -> Option<CategoryId> {
        self.filters.category
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.data
    }

    #[must_use]
    pub fn liked(&self) -> &LikedStores<K> {
        &self.liked
    }

    #[must_use]
    pub fn is_liked(&self, id: StoreId) -> bool {
        self.liked.contains(id)
    }

    /// Message from the most recent failed fetch, cleared by the next success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ---------------------------------------------------------------------
    // URL-driven transitions
    // ---------------------------------------------------------------------

    /// Loads the page at `query` and fetches page 1.
    pub async fn mount(&mut self, query: &str) -> Applied {
        self.history.replace(Location::parse(query));
        self.location_changed().await
    }

    /// Navigates to `query`. Navigating to the current URL does nothing.
    pub async fn navigate(&mut self, query: &str) -> Applied {
        self.go_to(Location::parse(query)).await
    }

    pub async fn back(&mut self) -> Applied {
        if self.history.back().is_none() {
            return Applied::Unchanged;
        }
        self.location_changed().await
    }

    pub async fn forward(&mut self) -> Applied {
        if self.history.forward().is_none() {
            return Applied::Unchanged;
        }
        self.location_changed().await
    }

    /// Applies a category chosen outside the listing (the category sidebar).
    ///
    /// When the URL already carries the same category nothing is navigated,
    /// so a selection that came from the URL never bounces back into it.
    pub async fn set_category(&mut self, category: Option<CategoryId>) -> Applied {
        self.update_filter(FilterKey::Category, |f| f.category = category)
            .await
    }

    pub async fn toggle_flag(&mut self, flag: FlagFilter) -> Applied {
        self.update_filter(flag.key(), |f| f.set_flag(flag, !f.flag(flag)))
            .await
    }

    pub async fn set_sort(&mut self, sort: Option<SortField>) -> Applied {
        self.update_filter(FilterKey::Sort, |f| f.sort = sort).await
    }

    pub async fn set_status(&mut self, status: Option<StoreStatus>) -> Applied {
        self.update_filter(FilterKey::Status, |f| f.status = status)
            .await
    }

    /// Radio-style alphabet filter: the active letter clears, any other replaces it.
    pub async fn toggle_letter(&mut self, letter: char) -> Applied {
        self.update_filter(FilterKey::NameLetter, |f| f.toggle_letter(letter))
            .await
    }

    // ---------------------------------------------------------------------
    // Local transitions
    // ---------------------------------------------------------------------

    /// Updates the search text and restarts the listing from page 1.
    pub async fn set_search(&mut self, text: &str) -> Applied {
        if self.search_query == text {
            return Applied::Unchanged;
        }
        self.search_query = text.to_owned();
        self.refresh().await
    }

    /// Fetches the next page, if the last one was not empty.
    pub async fn load_more(&mut self) -> Applied {
        let Some(request) = self.begin_load_more() else {
            return Applied::Unchanged;
        };
        self.run(request).await
    }

    /// Re-issues the most recent failed request, if it is still current.
    pub async fn retry(&mut self) -> Applied {
        let Some(failed) = self.failed_request.take() else {
            return Applied::Unchanged;
        };
        if failed.id < self.reset_id {
            return Applied::Unchanged;
        }
        let request = self.issue(failed.page, failed.search_query, failed.filters);
        self.run(request).await
    }

    /// Flips the liked state of `id` and persists the set. Returns the new state.
    ///
    /// Never refetches and never touches the URL. A persistence failure is
    /// logged; the in-memory set still changes.
    pub fn toggle_like(&mut self, id: StoreId) -> bool {
        match self.liked.toggle(id) {
            Ok(liked) => liked,
            Err(e) => {
                tracing::warn!(store_id = id, error = %e, "could not persist liked stores");
                self.liked.contains(id)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Request sequencing
    // ---------------------------------------------------------------------

    /// Resets pagination, clears the list and returns the page-1 request.
    ///
    /// Any request issued before this one becomes stale.
    pub fn begin_refresh(&mut self) -> PageRequest {
        self.page = 1;
        self.has_more = true;
        self.data.clear();
        self.last_error = None;
        self.failed_request = None;
        self.issue(1, self.search_query.clone(), self.filters.clone())
    }

    /// Advances the page cursor and returns the request for it, or `None`
    /// when the previous page came back empty.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if !self.has_more {
            return None;
        }
        self.page += 1;
        Some(self.issue(
            self.page,
            self.search_query.clone(),
            self.filters.clone(),
        ))
    }

    /// Folds a response into the listing.
    ///
    /// Page 1 replaces the list, later pages append. An empty page sets
    /// `has_more` to false. Failures keep the list and `has_more` as they
    /// were and record the message for [`Self::last_error`].
    pub fn apply(&mut self, request: &PageRequest, response: ApiResponse<Store>) -> Applied {
        if request.id < self.reset_id {
            tracing::debug!(
                request_id = request.id,
                reset_id = self.reset_id,
                page = request.page,
                "discarding stale store page"
            );
            return Applied::Stale;
        }

        if !response.success {
            tracing::warn!(
                request_id = request.id,
                page = request.page,
                status = response.status,
                message = %response.message,
                "failed to fetch stores"
            );
            self.last_error = Some(response.message);
            self.failed_request = Some(request.clone());
            return Applied::Failed;
        }

        self.last_error = None;
        let count = response.data.len();
        self.has_more = count > 0;
        tracing::debug!(page = request.page, count, "applied store page");

        if request.page <= 1 {
            self.data = response.data;
            Applied::Replaced(count)
        } else {
            self.data.extend(response.data);
            Applied::Appended(count)
        }
    }

    async fn run(&mut self, request: PageRequest) -> Applied {
        let response = self
            .source
            .fetch_stores(request.page, &request.search_query, &request.filters)
            .await;
        self.apply(&request, response)
    }

    fn issue(&mut self, page: u32, search_query: String, filters: FilterState) -> PageRequest {
        let id = self.next_request_id;
        self.next_request_id += 1;
        if page <= 1 {
            self.reset_id = id;
        }
        PageRequest {
            id,
            page,
            search_query,
            filters,
        }
    }

    async fn refresh(&mut self) -> Applied {
        let request = self.begin_refresh();
        self.run(request).await
    }

    async fn location_changed(&mut self) -> Applied {
        self.filters = FilterState::from_location(self.history.current());
        tracing::debug!(query = %self.history.current(), "location changed");
        self.refresh().await
    }

    async fn go_to(&mut self, location: Location) -> Applied {
        if !self.history.push(location) {
            return Applied::Unchanged;
        }
        self.location_changed().await
    }

    /// Edits one filter and writes only that parameter back to the URL.
    async fn update_filter(
        &mut self,
        key: FilterKey,
        change: impl FnOnce(&mut FilterState),
    ) -> Applied {
        let mut next = self.filters.clone();
        change(&mut next);

        let mut location = self.history.current().clone();
        match next.value(key) {
            Some(value) => location.set(key.url_param(), value),
            None => location.remove(key.url_param()),
        }
        self.go_to(location).await
    }
}

#[cfg(test)]
#[path = "browser_test.rs"]
mod tests;
