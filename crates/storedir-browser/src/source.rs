use std::future::Future;

use storedir_client::{ApiResponse, StoreApiClient};
use storedir_core::{Category, FilterState, Store};

/// Where the storefront gets its records from.
///
/// Implementations follow the [`StoreApiClient`] contract: failures come back
/// as unsuccessful [`ApiResponse`]s, never as panics or errors.
pub trait StoreSource {
    fn fetch_stores(
        &self,
        page: u32,
        search_query: &str,
        filters: &FilterState,
    ) -> impl Future<Output = ApiResponse<Store>>;

    fn fetch_categories(&self) -> impl Future<Output = ApiResponse<Category>>;
}

impl StoreSource for StoreApiClient {
    async fn fetch_stores(
        &self,
        page: u32,
        search_query: &str,
        filters: &FilterState,
    ) -> ApiResponse<Store> {
        StoreApiClient::fetch_stores(self, page, search_query, filters).await
    }

    async fn fetch_categories(&self) -> ApiResponse<Category> {
        StoreApiClient::fetch_categories(self).await
    }
}
