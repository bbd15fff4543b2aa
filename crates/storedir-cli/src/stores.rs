//! One-shot listing commands: `stores` and `categories`.

use clap::Args;
use storedir_browser::{JsonFileStore, LikedStores, StoreBrowser, END_OF_LIST_MESSAGE};
use storedir_client::StoreApiClient;
use storedir_core::filters::normalize_letter;
use storedir_core::{AppConfig, CategoryId, FilterState, Location, SortField, StoreStatus};

use crate::render;

/// Filter flags shared by the listing commands.
///
/// `--query` seeds the state from an address-bar query string; the other
/// flags override individual filters on top of it.
#[derive(Debug, Default, Args)]
pub(crate) struct FilterArgs {
    /// Address-bar query string, e.g. "status=publish&cats=3"
    #[arg(long)]
    pub query: Option<String>,
    /// Free-text name search
    #[arg(long)]
    pub search: Option<String>,
    /// Store status: active, coming-soon or discontinued
    #[arg(long)]
    pub status: Option<StoreStatus>,
    /// Only stores whose name starts with this letter
    #[arg(long)]
    pub letter: Option<char>,
    /// Only stores with cashback enabled
    #[arg(long)]
    pub cashback: bool,
    /// Only promoted stores
    #[arg(long)]
    pub promoted: bool,
    /// Only share-and-earn stores
    #[arg(long)]
    pub sharable: bool,
    /// Sort by name, featured, popularity or cashback
    #[arg(long)]
    pub sort: Option<SortField>,
    /// Category id
    #[arg(long)]
    pub category: Option<CategoryId>,
}

impl FilterArgs {
    /// The address-bar location these flags describe.
    pub(crate) fn location(&self) -> anyhow::Result<Location> {
        let mut location = Location::parse(self.query.as_deref().unwrap_or_default());
        let mut state = FilterState::from_location(&location);

        if let Some(status) = self.status {
            state.status = Some(status);
        }
        if let Some(letter) = self.letter {
            let letter = normalize_letter(letter)
                .ok_or_else(|| anyhow::anyhow!("--letter must be A-Z, got {letter:?}"))?;
            state.name_letter = Some(letter);
        }
        state.cashback_enabled |= self.cashback;
        state.promoted |= self.promoted;
        state.sharable |= self.sharable;
        if let Some(sort) = self.sort {
            state.sort = Some(sort);
        }
        if let Some(category) = self.category {
            state.category = Some(category);
        }

        state.apply_to(&mut location);
        Ok(location)
    }
}

/// Fetches up to `pages` pages of stores and prints them.
///
/// # Errors
///
/// Returns an error if the client cannot be built, a flag is invalid, or the
/// first page cannot be fetched. A failure on a later page prints what was
/// already loaded and reports the error.
pub(crate) async fn run_stores(
    config: &AppConfig,
    filters: &FilterArgs,
    pages: u32,
) -> anyhow::Result<()> {
    let location = filters.location()?;
    let client = StoreApiClient::new(config)?;
    let liked = LikedStores::load(JsonFileStore::new(&config.liked_stores_path));

    let mut browser = StoreBrowser::new(client, liked)
        .with_search_query(filters.search.clone().unwrap_or_default());
    browser.mount(&location.to_string()).await;

    for _ in 1..pages {
        if !browser.has_more() || browser.last_error().is_some() {
            break;
        }
        browser.load_more().await;
    }

    if let Some(message) = browser.last_error() {
        if browser.stores().is_empty() {
            anyhow::bail!("failed to fetch stores: {message}");
        }
        eprintln!("warning: stopped after page {}: {message}", browser.page() - 1);
    }

    if browser.stores().is_empty() {
        println!("No stores found.");
        return Ok(());
    }

    for store in browser.stores() {
        println!("{}", render::store_line(store, browser.is_liked(store.id)));
    }
    if !browser.has_more() {
        println!("{END_OF_LIST_MESSAGE}");
    }

    Ok(())
}

/// Prints the category list.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the fetch fails.
pub(crate) async fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let client = StoreApiClient::new(config)?;
    let response = client.fetch_categories().await;
    if !response.success {
        anyhow::bail!(
            "failed to fetch categories (status {}): {}",
            response.status,
            response.message
        );
    }

    if response.data.is_empty() {
        println!("No categories.");
    }
    for category in &response.data {
        println!("{}", render::category_line(category, false));
    }
    Ok(())
}
