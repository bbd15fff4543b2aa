//! In-memory doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use storedir_client::{store_query, ApiResponse};
use storedir_core::{Category, FilterState, Store, StoreStatus};

use crate::source::StoreSource;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoreCall {
    pub page: u32,
    pub search_query: String,
    pub filters: FilterState,
}

impl StoreCall {
    /// The query pairs the real client would send for this call.
    pub fn backend_params(&self) -> Vec<(&'static str, String)> {
        store_query(self.page, &self.search_query, &self.filters)
    }
}

#[derive(Debug, Default)]
struct FakeState {
    store_responses: VecDeque<ApiResponse<Store>>,
    category_response: Option<ApiResponse<Category>>,
    store_calls: Vec<StoreCall>,
    category_calls: usize,
}

/// Scripted [`StoreSource`]: hands out queued responses in order and records
/// every call. An empty queue answers with a successful empty page.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeSource {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_stores(&self, response: ApiResponse<Store>) {
        self.state.lock().unwrap().store_responses.push_back(response);
    }

    pub fn push_page(&self, stores: Vec<Store>) {
        self.push_stores(ApiResponse::ok(200, stores, None));
    }

    pub fn set_categories(&self, response: ApiResponse<Category>) {
        self.state.lock().unwrap().category_response = Some(response);
    }

    pub fn store_calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().store_calls.clone()
    }

    pub fn last_store_call(&self) -> Option<StoreCall> {
        self.store_calls().pop()
    }

    pub fn category_calls(&self) -> usize {
        self.state.lock().unwrap().category_calls
    }
}

impl StoreSource for FakeSource {
    async fn fetch_stores(
        &self,
        page: u32,
        search_query: &str,
        filters: &FilterState,
    ) -> ApiResponse<Store> {
        let mut state = self.state.lock().unwrap();
        state.store_calls.push(StoreCall {
            page,
            search_query: search_query.to_owned(),
            filters: filters.clone(),
        });
        state
            .store_responses
            .pop_front()
            .unwrap_or_else(|| ApiResponse::ok(200, Vec::new(), None))
    }

    async fn fetch_categories(&self) -> ApiResponse<Category> {
        let mut state = self.state.lock().unwrap();
        state.category_calls += 1;
        state
            .category_response
            .clone()
            .unwrap_or_else(|| ApiResponse::ok(200, Vec::new(), None))
    }
}

pub(crate) fn store(id: i64, name: &str) -> Store {
    Store {
        id,
        name: name.to_owned(),
        logo: None,
        homepage: Some(format!("https://{}.example.com", name.to_lowercase())),
        status: StoreStatus::Active,
        cashback_enabled: false,
        rate_type: None,
        amount_type: None,
        cashback_amount: None,
        is_promoted: false,
        is_sharable: false,
    }
}

pub(crate) fn stores(ids: std::ops::RangeInclusive<i64>) -> Vec<Store> {
    ids.map(|id| store(id, &format!("Store{id}"))).collect()
}

pub(crate) fn category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_owned(),
    }
}
