use std::sync::Arc;

use storedir_client::ApiResponse;
use storedir_core::{FlagFilter, SortField, StoreStatus};

use super::*;
use crate::liked::{MemoryStore, LIKED_STORES_KEY};
use crate::testing::{store, stores, FakeSource};

type TestBrowser = StoreBrowser<FakeSource, Arc<MemoryStore>>;

fn browser() -> (TestBrowser, FakeSource, Arc<MemoryStore>) {
    let source = FakeSource::new();
    let kv = Arc::new(MemoryStore::new());
    let liked = LikedStores::load(Arc::clone(&kv));
    (StoreBrowser::new(source.clone(), liked), source, kv)
}

fn pairs<'a>(params: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    params.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

fn ids(browser: &TestBrowser) -> Vec<i64> {
    browser.stores().iter().map(|s| s.id).collect()
}

// ---------------------------------------------------------------------------
// Mount and URL sync
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mount_derives_filters_from_url_and_fetches_page_one() {
    let (mut browser, source, _) = browser();
    source.push_page(stores(1..=3));

    let applied = browser
        .mount("?status=publish&cats=3&isCashbackEnabled=1")
        .await;

    assert_eq!(applied, Applied::Replaced(3));
    assert_eq!(browser.filters().status, Some(StoreStatus::Active));
    assert_eq!(browser.category(), Some(3));
    assert!(browser.filters().cashback_enabled);
    assert!(browser.has_more());
    assert_eq!(browser.page(), 1);

    let calls = source.store_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        pairs(&calls[0].backend_params()),
        vec![
            ("_page", "1"),
            ("status", "publish"),
            ("cashback_enabled", "1"),
            ("cats", "3"),
        ]
    );
}

#[tokio::test]
async fn mount_does_not_add_a_history_entry() {
    let (mut browser, _, _) = browser();
    browser.mount("cats=2").await;
    assert!(!browser.history().can_go_back());
    assert_eq!(browser.location().to_string(), "cats=2");
}

#[tokio::test]
async fn filter_change_resets_to_page_one_and_clears_the_list() {
    let (mut browser, source, _) = browser();
    source.push_page(stores(1..=2));
    source.push_page(stores(3..=4));
    browser.mount("").await;
    browser.load_more().await;
    assert_eq!(browser.page(), 2);

    let before_refetch = browser.begin_refresh();
    assert!(browser.stores().is_empty(), "list clears before the new page arrives");
    assert_eq!(before_refetch.page, 1);

    source.push_page(stores(10..=11));
    let applied = browser.toggle_flag(FlagFilter::Promoted).await;

    assert_eq!(applied, Applied::Replaced(2));
    assert_eq!(browser.page(), 1);
    assert_eq!(ids(&browser), vec![10, 11]);
    assert_eq!(browser.location().to_string(), "isPromoted=1");
    assert_eq!(source.last_store_call().map(|c| c.page), Some(1));
}

#[tokio::test]
async fn letter_b_then_c_leaves_only_c_in_the_url() {
    let (mut browser, source, _) = browser();
    browser.mount("").await;

    browser.toggle_letter('B').await;
    assert_eq!(browser.location().to_string(), "name_like=B");
    assert_eq!(
        pairs(&source.last_store_call().unwrap().backend_params()),
        vec![("_page", "1"), ("name_like", "^B")]
    );

    browser.toggle_letter('C').await;
    assert_eq!(browser.location().to_string(), "name_like=C");
    assert_eq!(browser.filters().name_letter, Some('C'));
    assert_eq!(
        pairs(&source.last_store_call().unwrap().backend_params()),
        vec![("_page", "1"), ("name_like", "^C")]
    );
}

#[tokio::test]
async fn toggling_the_active_letter_clears_it() {
    let (mut browser, _, _) = browser();
    browser.mount("name_like=B").await;
    browser.toggle_letter('b').await;
    assert_eq!(browser.filters().name_letter, None);
    assert!(browser.location().is_empty());
}

#[tokio::test]
async fn category_set_twice_then_cleared() {
    let (mut browser, source, _) = browser();
    browser.mount("").await;

    assert_eq!(browser.set_category(Some(3)).await, Applied::Replaced(0));
    assert_eq!(browser.location().to_string(), "cats=3");

    assert_eq!(
        browser.set_category(Some(3)).await,
        Applied::Unchanged,
        "same category must not navigate or refetch"
    );
    assert_eq!(source.store_calls().len(), 2);

    browser.set_category(None).await;
    assert!(browser.location().is_empty());
    assert_eq!(browser.category(), None);
    assert_eq!(source.store_calls().len(), 3);
}

#[tokio::test]
async fn filter_edits_keep_unrelated_params() {
    let (mut browser, _, _) = browser();
    browser.mount("utm_source=mail&cats=3").await;

    browser.set_sort(Some(SortField::Clicks)).await;
    browser.set_status(Some(StoreStatus::ComingSoon)).await;

    assert_eq!(
        browser.location().to_string(),
        "utm_source=mail&cats=3&_sort=clicks&status=draft"
    );
    assert_eq!(browser.filters().sort, Some(SortField::Clicks));
    assert_eq!(browser.filters().status, Some(StoreStatus::ComingSoon));
}

#[tokio::test]
async fn navigating_to_the_current_url_does_nothing() {
    let (mut browser, source, _) = browser();
    browser.mount("cats=1").await;
    assert_eq!(browser.navigate("?cats=1").await, Applied::Unchanged);
    assert_eq!(source.store_calls().len(), 1);
}

#[tokio::test]
async fn back_and_forward_rederive_filters() {
    let (mut browser, source, _) = browser();
    browser.mount("").await;
    browser.set_category(Some(4)).await;
    browser.toggle_flag(FlagFilter::Sharable).await;

    browser.back().await;
    assert_eq!(browser.location().to_string(), "cats=4");
    assert!(!browser.filters().sharable);

    browser.back().await;
    assert_eq!(browser.category(), None);
    assert_eq!(browser.back().await, Applied::Unchanged);

    browser.forward().await;
    assert_eq!(browser.category(), Some(4));
    assert_eq!(source.store_calls().len(), 6);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_refetches_without_touching_the_url() {
    let (mut browser, source, _) = browser();
    browser.mount("cats=2").await;

    source.push_page(vec![store(9, "Amazon")]);
    assert_eq!(browser.set_search("amaz").await, Applied::Replaced(1));

    assert_eq!(browser.location().to_string(), "cats=2");
    assert_eq!(browser.search_query(), "amaz");
    assert_eq!(
        pairs(&source.last_store_call().unwrap().backend_params()),
        vec![("_page", "1"), ("name_like", "amaz"), ("cats", "2")]
    );

    assert_eq!(browser.set_search("amaz").await, Applied::Unchanged);
    assert_eq!(source.store_calls().len(), 2);
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn later_pages_append() {
    let (mut browser, source, _) = browser();
    source.push_page(stores(1..=2));
    source.push_page(stores(3..=4));
    browser.mount("").await;

    assert_eq!(browser.load_more().await, Applied::Appended(2));
    assert_eq!(ids(&browser), vec![1, 2, 3, 4]);
    assert_eq!(source.last_store_call().map(|c| c.page), Some(2));
}

#[tokio::test]
async fn empty_page_ends_pagination() {
    let (mut browser, source, _) = browser();
    source.push_page(stores(1..=2));
    source.push_page(Vec::new());
    browser.mount("").await;

    assert_eq!(browser.load_more().await, Applied::Appended(0));
    assert!(!browser.has_more());
    assert_eq!(ids(&browser), vec![1, 2]);

    assert_eq!(browser.load_more().await, Applied::Unchanged);
    assert_eq!(source.store_calls().len(), 2, "no request after the end");
}

#[tokio::test]
async fn empty_first_page_means_no_stores() {
    let (mut browser, _, _) = browser();
    assert_eq!(browser.mount("status=trash").await, Applied::Replaced(0));
    assert!(browser.stores().is_empty());
    assert!(!browser.has_more());
}

#[tokio::test]
async fn load_more_carries_the_current_search_and_filters() {
    let (mut browser, source, _) = browser();
    source.push_page(stores(1..=1));
    browser.mount("isSharable=1").await;
    source.push_page(stores(2..=2));
    browser.set_search("shop").await;
    browser.load_more().await;

    let last = source.last_store_call().unwrap();
    assert_eq!(last.page, 2);
    assert_eq!(last.search_query, "shop");
    assert!(last.filters.sharable);
}

// ---------------------------------------------------------------------------
// Sequencing and failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_for_a_superseded_filter_set_is_discarded() {
    let (mut browser, _, _) = browser();
    browser.mount("").await;

    let old = browser.begin_refresh();
    let current = browser.begin_refresh();

    assert_eq!(
        browser.apply(&old, ApiResponse::ok(200, stores(1..=5), None)),
        Applied::Stale
    );
    assert!(browser.stores().is_empty());

    assert_eq!(
        browser.apply(&current, ApiResponse::ok(200, stores(6..=6), None)),
        Applied::Replaced(1)
    );
    assert_eq!(ids(&browser), vec![6]);
}

#[tokio::test]
async fn late_page_two_after_a_reset_is_discarded() {
    let (mut browser, source, _) = browser();
    source.push_page(stores(1..=2));
    browser.mount("").await;

    let page_two = browser.begin_load_more().unwrap();
    let fresh = browser.begin_refresh();
    browser.apply(&fresh, ApiResponse::ok(200, stores(7..=8), None));

    assert_eq!(
        browser.apply(&page_two, ApiResponse::ok(200, stores(3..=4), None)),
        Applied::Stale
    );
    assert_eq!(ids(&browser), vec![7, 8]);
}

#[tokio::test]
async fn failure_keeps_the_list_and_can_be_retried() {
    let (mut browser, source, _) = browser();
    source.push_page(stores(1..=2));
    browser.mount("").await;

    source.push_stores(ApiResponse::failure(503, Some("maintenance".to_owned())));
    assert_eq!(browser.load_more().await, Applied::Failed);
    assert_eq!(ids(&browser), vec![1, 2]);
    assert!(browser.has_more());
    assert_eq!(browser.last_error(), Some("maintenance"));

    source.push_page(stores(3..=3));
    assert_eq!(browser.retry().await, Applied::Appended(1));
    assert_eq!(ids(&browser), vec![1, 2, 3]);
    assert_eq!(browser.last_error(), None);
    assert_eq!(source.last_store_call().map(|c| c.page), Some(2));
}

#[tokio::test]
async fn retry_without_a_failure_does_nothing() {
    let (mut browser, source, _) = browser();
    browser.mount("").await;
    assert_eq!(browser.retry().await, Applied::Unchanged);
    assert_eq!(source.store_calls().len(), 1);
}

#[tokio::test]
async fn refresh_forgets_an_earlier_failure() {
    let (mut browser, source, _) = browser();
    source.push_stores(ApiResponse::failure(500, None));
    browser.mount("").await;
    assert_eq!(browser.last_error(), Some("An error occurred"));

    browser.set_category(Some(1)).await;
    assert_eq!(browser.last_error(), None);
    assert_eq!(browser.retry().await, Applied::Unchanged);
}

// ---------------------------------------------------------------------------
// Liked stores
// ---------------------------------------------------------------------------

#[tokio::test]
async fn liking_persists_without_refetch_or_navigation() {
    let (mut browser, source, kv) = browser();
    source.push_page(stores(1..=3));
    browser.mount("cats=3").await;

    assert!(browser.toggle_like(2));
    assert!(browser.is_liked(2));
    assert_eq!(source.store_calls().len(), 1);
    assert_eq!(browser.location().to_string(), "cats=3");
    assert!(!browser.history().can_go_back());
    assert_eq!(kv.get(LIKED_STORES_KEY).unwrap().as_deref(), Some("[2]"));

    assert!(!browser.toggle_like(2));
    assert!(!browser.is_liked(2));
    assert_eq!(kv.get(LIKED_STORES_KEY).unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn liked_stores_are_read_at_construction() {
    let kv = Arc::new(MemoryStore::new());
    kv.set(LIKED_STORES_KEY, "[5]").unwrap();

    let browser = StoreBrowser::new(FakeSource::new(), LikedStores::load(Arc::clone(&kv)));
    assert!(browser.is_liked(5));
    assert_eq!(browser.liked().len(), 1);
}

#[tokio::test]
async fn seeded_search_goes_out_with_the_first_fetch() {
    let (browser, source, _) = browser();
    let mut browser = browser.with_search_query("nike");
    browser.mount("isPromoted=1").await;

    assert_eq!(source.store_calls().len(), 1);
    assert_eq!(
        pairs(&source.last_store_call().unwrap().backend_params()),
        vec![("_page", "1"), ("name_like", "nike"), ("is_promoted", "1")]
    );
}

#[tokio::test]
async fn unknown_status_clears_the_status_filter() {
    let (mut browser, source, _) = browser();
    browser.mount("status=publish&cats=3").await;

    browser.set_status(Some(StoreStatus::Unknown)).await;
    assert_eq!(browser.location().to_string(), "cats=3");
    assert_eq!(browser.filters().status, None);

    assert_eq!(
        browser.set_status(Some(StoreStatus::Unknown)).await,
        Applied::Unchanged
    );
    assert_eq!(source.store_calls().len(), 2);
}
