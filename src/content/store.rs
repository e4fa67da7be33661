//! Content store - the read boundary between views and post sources

use async_trait::async_trait;
use std::sync::Arc;

use super::loader::ContentLoader;
use super::Post;
use crate::error::ContentError;

/// Source of the full post collection.
///
/// Implementations return the whole collection on every call. Ordering is not
/// part of the contract; lookup by slug is done by callers.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_all_posts(&self) -> Result<Vec<Post>, ContentError>;
}

#[async_trait]
impl<S: ContentStore + ?Sized> ContentStore for Arc<S> {
    async fn get_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        (**self).get_all_posts().await
    }
}

/// Store backed by the content directory, re-read on every call
#[derive(Clone)]
pub struct FileStore {
    loader: Arc<ContentLoader>,
}

impl FileStore {
    pub fn new(loader: ContentLoader) -> Self {
        Self {
            loader: Arc::new(loader),
        }
    }
}

#[async_trait]
impl ContentStore for FileStore {
    async fn get_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        let loader = Arc::clone(&self.loader);
        tokio::task::spawn_blocking(move || loader.load_posts())
            .await
            .map_err(|e| ContentError::Unavailable(format!("loader task failed: {}", e)))?
    }
}

/// Store over a fixed in-memory collection
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    posts: Vec<Post>,
}

impl MemoryStore {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        Ok(self.posts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_store_returns_collection() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
        let store = MemoryStore::new(vec![Post::new("a", "A", date), Post::new("b", "B", date)]);
        let posts = store.get_all_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].slug, "b");
    }

    #[tokio::test]
    async fn test_file_store_reads_fresh_content() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(ContentLoader::new(tmp.path(), &SiteConfig::default()));
        assert!(store.get_all_posts().await.unwrap().is_empty());

        std::fs::write(tmp.path().join("new.md"), "---\ntitle: New\n---\nbody").unwrap();
        let posts = store.get_all_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "New");
    }

    #[tokio::test]
    async fn test_file_store_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(ContentLoader::new(
            tmp.path().join("missing"),
            &SiteConfig::default(),
        ));
        assert!(store.get_all_posts().await.is_err());
    }
}
