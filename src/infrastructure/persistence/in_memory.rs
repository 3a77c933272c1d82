use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{Category, Media, MediaId};
use crate::domain::repositories::{CategoryManager, MediaRepository, RepositoryError};

/// Media rows kept in process memory, with sequential id assignment
#[derive(Debug)]
pub struct InMemoryMediaRepository {
    media: RwLock<HashMap<MediaId, Media>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl InMemoryMediaRepository {
    pub fn new() -> Self {
        Self {
            media: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every write fail with `RepositoryError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.media.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.media.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable {
                message: "in-memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for InMemoryMediaRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Row as stored: pending uploads are never persisted
fn stored(media: &Media, id: MediaId) -> Media {
    let mut row = media.clone();
    row.id = id;
    row.binary_content = None;
    row
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn insert(&self, media: &Media) -> Result<MediaId, RepositoryError> {
        self.check_available()?;
        let mut rows = self.media.write().await;

        if media.id.is_assigned() && rows.contains_key(&media.id) {
            return Err(RepositoryError::AlreadyPersisted(media.id));
        }

        let id = MediaId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        rows.insert(id, stored(media, id));
        debug!(media_id = %id, "Inserted media");

        Ok(id)
    }

    async fn update(&self, media: &Media) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut rows = self.media.write().await;

        let row = rows.get_mut(&media.id).ok_or(RepositoryError::NotFound(media.id))?;
        *row = stored(media, media.id);

        Ok(())
    }

    async fn delete(&self, id: MediaId) -> Result<bool, RepositoryError> {
        self.check_available()?;
        Ok(self.media.write().await.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: MediaId) -> Result<Option<Media>, RepositoryError> {
        Ok(self.media.read().await.get(&id).cloned())
    }
}

/// Category tree kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryCategoryManager {
    categories: RwLock<Vec<Category>>,
    fetches: AtomicUsize,
}

impl InMemoryCategoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, category: Category) {
        self.categories.write().await.push(category);
    }

    /// Number of `get_root_categories` calls served
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CategoryManager for InMemoryCategoryManager {
    async fn get_root_categories(
        &self,
        _include_children: bool,
    ) -> Result<HashMap<String, Category>, RepositoryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let mut roots = HashMap::new();
        for category in self.categories.read().await.iter().filter(|c| c.is_root()) {
            // First root added for a context is its main category
            roots.entry(category.context.clone()).or_insert_with(|| category.clone());
        }

        debug!(contexts = roots.len(), "Fetched root categories");
        Ok(roots)
    }
}
