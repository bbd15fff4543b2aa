//! Translation of listing state into `GET /stores` query parameters.
//!
//! URL and backend names come from [`storedir_core::FILTER_PARAMS`]; this
//! module only adds the pagination cursor, the free-text search term and the
//! prefix anchor on the alphabet letter.

use storedir_core::{FilterKey, FilterState, FILTER_PARAMS};

pub const PAGE_PARAM: &str = "_page";
/// Free-text search shares the backend's name pattern parameter.
pub const SEARCH_PARAM: &str = "name_like";

/// Builds the ordered query pairs for one page of stores.
///
/// The alphabet letter is sent as `^{letter}`. When a letter is active it
/// takes the `name_like` slot and the free-text query is not sent.
#[must_use]
pub fn store_query(
    page: u32,
    search_query: &str,
    filters: &FilterState,
) -> Vec<(&'static str, String)> {
    let mut params = vec![(PAGE_PARAM, page.to_string())];

    let search_query = search_query.trim();
    match filters.value(FilterKey::NameLetter) {
        Some(letter) => params.push((FilterKey::NameLetter.backend_param(), format!("^{letter}"))),
        None if !search_query.is_empty() => params.push((SEARCH_PARAM, search_query.to_owned())),
        None => {}
    }

    params.extend(
        FILTER_PARAMS
            .iter()
            .filter(|param| param.key != FilterKey::NameLetter)
            .filter_map(|param| filters.value(param.key).map(|value| (param.backend, value))),
    );

    params
}
