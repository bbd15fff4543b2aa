//! Headless storefront: the category selector, the store listing state
//! machine and the liked-stores bookmark set.
//!
//! Nothing here renders. Front-ends drive the transitions and read state
//! back; the address bar is a [`History`] of [`storedir_core::Location`]s and
//! browser storage is any [`KeyValueStore`].

pub mod browser;
pub mod categories;
pub mod history;
pub mod liked;
pub mod notify;
pub mod source;
pub mod storefront;

#[cfg(test)]
pub(crate) mod testing;

pub use browser::{Applied, PageRequest, StoreBrowser, END_OF_LIST_MESSAGE};
pub use categories::CategorySelector;
pub use history::History;
pub use liked::{JsonFileStore, KeyValueStore, LikedStores, MemoryStore, StoreError, LIKED_STORES_KEY};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use source::StoreSource;
pub use storefront::Storefront;
