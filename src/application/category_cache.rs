use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::error::LifecycleError;
use crate::domain::entities::Category;
use crate::domain::repositories::CategoryManager;

/// When the memoized root categories are thrown away
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootCategoryRefresh {
    /// Fetch once and keep for the lifetime of the cache
    #[default]
    Lifetime,
    /// Re-fetch at the start of every flush
    PerFlush,
}

/// Root category per context, fetched lazily from the category manager
pub struct RootCategoryCache {
    manager: Arc<dyn CategoryManager>,
    refresh: RootCategoryRefresh,
    categories: RwLock<Option<Arc<HashMap<String, Category>>>>,
}

impl RootCategoryCache {
    pub fn new(manager: Arc<dyn CategoryManager>, refresh: RootCategoryRefresh) -> Self {
        Self { manager, refresh, categories: RwLock::new(None) }
    }

    pub fn refresh_policy(&self) -> RootCategoryRefresh {
        self.refresh
    }

    /// Root category for `context`
    pub async fn get(&self, context: &str) -> Result<Category, LifecycleError> {
        let categories = self.load().await?;

        categories
            .get(context)
            .cloned()
            .ok_or_else(|| LifecycleError::Configuration { context: context.to_string() })
    }

    /// Inject an already fetched mapping, replacing whatever is cached
    pub async fn prime(&self, categories: HashMap<String, Category>) {
        *self.categories.write().await = Some(Arc::new(categories));
    }

    pub async fn invalidate(&self) {
        *self.categories.write().await = None;
    }

    pub async fn is_loaded(&self) -> bool {
        self.categories.read().await.is_some()
    }

    /// Apply the refresh policy at a flush boundary
    pub async fn on_flush_start(&self) {
        if self.refresh == RootCategoryRefresh::PerFlush {
            self.invalidate().await;
        }
    }

    async fn load(&self) -> Result<Arc<HashMap<String, Category>>, LifecycleError> {
        if let Some(categories) = self.categories.read().await.as_ref() {
            return Ok(Arc::clone(categories));
        }

        let mut guard = self.categories.write().await;
        if let Some(categories) = guard.as_ref() {
            return Ok(Arc::clone(categories));
        }

        let fetched = Arc::new(self.manager.get_root_categories(false).await?);
        debug!(contexts = fetched.len(), "Loaded root categories");
        *guard = Some(Arc::clone(&fetched));

        Ok(fetched)
    }
}

impl std::fmt::Debug for RootCategoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootCategoryCache").field("refresh", &self.refresh).finish_non_exhaustive()
    }
}
