use contracts::shared::category_cache::{CategoryCache, CategorySnapshot};
use leptos::prelude::*;

use crate::shared::api_utils::get_json;

/// Category lists shared through context
#[derive(Clone, Copy)]
pub struct CategoryStore {
    pub cache: RwSignal<CategoryCache>,
    pub error: RwSignal<Option<String>>,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self {
            cache: RwSignal::new(CategoryCache::new()),
            error: RwSignal::new(None),
        }
    }

    /// Reload all three lists. A failed load keeps the previous lists.
    pub async fn reload(&self) {
        let result = get_json::<CategorySnapshot>("/api/categories")
            .await
            .map_err(|e| e.message());
        let mut outcome = Ok(());
        self.cache.update(|cache| outcome = cache.apply_load(result));
        match outcome {
            Ok(()) => self.error.set(None),
            Err(e) => {
                log::error!("Failed to load categories: {}", e);
                self.error.set(Some(e));
            }
        }
    }

    /// Load once per session
    pub async fn ensure_loaded(&self) {
        if !self.cache.with_untracked(|c| c.is_loaded()) {
            self.reload().await;
        }
    }

    /// Current lists, empty before the first load
    pub fn snapshot(&self) -> CategorySnapshot {
        self.cache
            .with(|c| c.snapshot().cloned())
            .unwrap_or_default()
    }
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_categories() -> CategoryStore {
    use_context::<CategoryStore>().expect("CategoryStore not found in context")
}
