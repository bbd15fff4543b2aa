//! Plain-text rendering of store cards and the category sidebar.

use storedir_core::{Category, FilterState, Store, StoreStatus};

const LIKED_MARKER: &str = "*";

/// One store card on a single line.
pub(crate) fn store_line(store: &Store, liked: bool) -> String {
    let marker = if liked { LIKED_MARKER } else { " " };
    let mut line = format!(
        "{marker} [{id}] {name} | {cashback}",
        id = store.id,
        name = store.name,
        cashback = store.cashback_label(),
    );
    if store.status != StoreStatus::Active {
        line.push_str(&format!(" | {}", store.status));
    }
    if store.is_promoted {
        line.push_str(" | promoted");
    }
    if let Some(homepage) = store.homepage.as_deref().filter(|h| !h.is_empty()) {
        line.push_str(&format!(" | {homepage}"));
    }
    line
}

pub(crate) fn category_line(category: &Category, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    format!("{marker} [{}] {}", category.id, category.name)
}

/// Human summary of the active filters, e.g. `status: Active, letter: B`.
pub(crate) fn filter_summary(filters: &FilterState, search: &str) -> String {
    let mut parts = Vec::new();
    if !search.trim().is_empty() {
        parts.push(format!("search: {:?}", search.trim()));
    }
    if let Some(status) = filters.status {
        parts.push(format!("status: {status}"));
    }
    if let Some(letter) = filters.name_letter {
        parts.push(format!("letter: {letter}"));
    }
    for flag in storedir_core::FlagFilter::ALL {
        if filters.flag(flag) {
            parts.push(flag.label().to_owned());
        }
    }
    if let Some(sort) = filters.sort {
        parts.push(format!("sort: {}", sort.label()));
    }
    if let Some(category) = filters.category {
        parts.push(format!("category: {category}"));
    }

    if parts.is_empty() {
        "no filters".to_owned()
    } else {
        parts.join(", ")
    }
}
