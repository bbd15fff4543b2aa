//! The listing page: category sidebar next to the store browser.
//!
//! The browser owns the category filter through the URL. The sidebar only
//! proposes a new selection on click and is re-synced from the browser after
//! every transition.

use storedir_core::{CategoryId, StoreId};

use crate::browser::{Applied, StoreBrowser};
use crate::categories::CategorySelector;
use crate::liked::{KeyValueStore, LikedStores};
use crate::notify::Notifier;
use crate::source::StoreSource;

#[derive(Debug)]
pub struct Storefront<S, K, N> {
    browser: StoreBrowser<S, K>,
    selector: CategorySelector,
    categories_source: S,
    notifier: N,
}

impl<S, K, N> Storefront<S, K, N>
where
    S: StoreSource + Clone,
    K: KeyValueStore,
    N: Notifier,
{
    #[must_use]
    pub fn new(source: S, liked: LikedStores<K>, notifier: N) -> Self {
        Self {
            browser: StoreBrowser::new(source.clone(), liked),
            selector: CategorySelector::default(),
            categories_source: source,
            notifier,
        }
    }

    /// Loads the category list and the first page of stores concurrently.
    pub async fn mount(&mut self, query: &str) -> Applied {
        let (_, applied) = futures::join!(
            self.selector.mount(&self.categories_source, &self.notifier),
            self.browser.mount(query),
        );
        self.sync_selector();
        applied
    }

    /// Sidebar click: toggles the category and pushes the result to the URL.
    pub async fn click_category(&mut self, id: CategoryId) -> Applied {
        let selection = self.selector.click(id);
        let applied = self.browser.set_category(selection).await;
        self.sync_selector();
        applied
    }

    pub async fn navigate(&mut self, query: &str) -> Applied {
        let applied = self.browser.navigate(query).await;
        self.sync_selector();
        applied
    }

    pub async fn back(&mut self) -> Applied {
        let applied = self.browser.back().await;
        self.sync_selector();
        applied
    }

    pub async fn forward(&mut self) -> Applied {
        let applied = self.browser.forward().await;
        self.sync_selector();
        applied
    }

    pub fn toggle_like(&mut self, id: StoreId) -> bool {
        self.browser.toggle_like(id)
    }

    #[must_use]
    pub fn browser(&self) -> &StoreBrowser<S, K> {
        &self.browser
    }

    /// Direct access for transitions that never change the category
    /// (search, flags, sort, status, letter, paging). Call
    /// [`Self::sync_selector`] afterwards if a transition might.
    pub fn browser_mut(&mut self) -> &mut StoreBrowser<S, K> {
        &mut self.browser
    }

    #[must_use]
    pub fn selector(&self) -> &CategorySelector {
        &self.selector
    }

    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn sync_selector(&mut self) {
        self.selector.sync(self.browser.category());
    }
}
