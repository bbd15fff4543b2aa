//! `like` and `liked` commands against the local liked-stores file.

use storedir_browser::{JsonFileStore, LikedStores};
use storedir_core::{AppConfig, StoreId};

fn open(config: &AppConfig) -> LikedStores<JsonFileStore> {
    LikedStores::load(JsonFileStore::new(&config.liked_stores_path))
}

/// Toggles `id` in the liked set.
///
/// # Errors
///
/// Returns an error if the liked-stores file cannot be written.
pub(crate) fn run_like(config: &AppConfig, id: StoreId) -> anyhow::Result<()> {
    let mut liked = open(config);
    if liked.toggle(id)? {
        println!("Liked store {id}.");
    } else {
        println!("Unliked store {id}.");
    }
    Ok(())
}

pub(crate) fn run_liked(config: &AppConfig) {
    let liked = open(config);
    if liked.is_empty() {
        println!("No liked stores.");
        return;
    }
    for id in liked.ids() {
        println!("{id}");
    }
}
