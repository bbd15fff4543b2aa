//! Category sidebar: a single-select list of store categories.

use storedir_client::types::FAILURE_MESSAGE;
use storedir_core::{Category, CategoryId};

use crate::notify::Notifier;
use crate::source::StoreSource;

pub const CATEGORY_FETCH_FAILED: &str = "Failed to fetch categories. Please try again!";

#[derive(Debug, Clone, Default)]
pub struct CategorySelector {
    categories: Vec<Category>,
    selected: Option<CategoryId>,
}

impl CategorySelector {
    /// Creates a selector that starts from the parent's current selection.
    #[must_use]
    pub fn new(selected: Option<CategoryId>) -> Self {
        Self {
            categories: Vec::new(),
            selected,
        }
    }

    /// Fetches the category list.
    ///
    /// A failed fetch notifies the user and leaves the list empty; the
    /// selector stays usable.
    pub async fn mount<S, N>(&mut self, source: &S, notifier: &N)
    where
        S: StoreSource,
        N: Notifier,
    {
        let response = source.fetch_categories().await;
        if response.success {
            tracing::debug!(count = response.data.len(), "loaded categories");
            self.categories = response.data;
            return;
        }

        tracing::warn!(status = response.status, message = %response.message, "failed to fetch categories");
        let message = if response.message.is_empty() || response.message == FAILURE_MESSAGE {
            CATEGORY_FETCH_FAILED
        } else {
            response.message.as_str()
        };
        notifier.error(message);
        self.categories.clear();
    }

    /// Toggles `id`: selects it, or clears the selection if it was already
    /// selected. Returns the new selection for the parent to apply.
    pub fn click(&mut self, id: CategoryId) -> Option<CategoryId> {
        self.selected = if self.selected == Some(id) {
            None
        } else {
            Some(id)
        };
        self.selected
    }

    /// Adopts the parent's selection, dropping any local state.
    pub fn sync(&mut self, external: Option<CategoryId>) {
        self.selected = external;
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn selected(&self) -> Option<CategoryId> {
        self.selected
    }

    #[must_use]
    pub fn is_selected(&self, id: CategoryId) -> bool {
        self.selected == Some(id)
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<&Category> {
        let id = self.selected?;
        self.categories.iter().find(|c| c.id == id)
    }
}
