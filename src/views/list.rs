//! Blog listing view

use super::PostSummary;
use crate::config::SiteConfig;
use crate::content::{ContentStore, Post};
use crate::error::ContentError;

/// Listing state. A failed load still ends in `Ready`, with no posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Ready(Vec<Post>),
}

/// Summaries split into highlighted blocks and the regular grid
#[derive(Debug, Clone, serde::Serialize)]
pub struct ListPage {
    pub featured: Vec<PostSummary>,
    pub regular: Vec<PostSummary>,
}

#[derive(Debug)]
pub struct PostListView {
    state: ListState,
}

impl PostListView {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Fetch the collection and settle into `Ready`
    pub async fn load<S: ContentStore + ?Sized>(&mut self, store: &S) {
        self.state = ListState::Loading;
        let result = store.get_all_posts().await;
        self.apply(result);
    }

    /// Settle with a load result; failures are logged and shown as an empty list
    pub fn apply(&mut self, result: Result<Vec<Post>, ContentError>) {
        let posts = match result {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("Error loading blog posts: {}", e);
                Vec::new()
            }
        };
        self.state = ListState::Ready(posts);
    }

    /// Posts currently shown (none while loading)
    pub fn posts(&self) -> &[Post] {
        match &self.state {
            ListState::Loading => &[],
            ListState::Ready(posts) => posts,
        }
    }

    pub fn featured(&self) -> impl Iterator<Item = &Post> {
        self.posts().iter().filter(|p| p.featured)
    }

    pub fn regular(&self) -> impl Iterator<Item = &Post> {
        self.posts().iter().filter(|p| !p.featured)
    }

    /// Build the summaries shown on the listing page
    pub fn page(&self, config: &SiteConfig) -> ListPage {
        ListPage {
            featured: self
                .featured()
                .map(|p| PostSummary::new(p, config, config.featured_excerpt_length))
                .collect(),
            regular: self
                .regular()
                .map(|p| PostSummary::new(p, config, config.excerpt_length))
                .collect(),
        }
    }
}

impl Default for PostListView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryStore;
    use crate::views::tests::{fixture_posts, FailingStore};

    #[tokio::test]
    async fn test_partition_featured_and_regular() {
        let posts = fixture_posts();
        let featured = posts.iter().filter(|p| p.featured).count();
        let regular = posts.len() - featured;

        let mut view = PostListView::new();
        assert_eq!(view.state(), &ListState::Loading);

        view.load(&MemoryStore::new(posts)).await;
        let page = view.page(&SiteConfig::default());

        assert_eq!(page.featured.len(), featured);
        assert_eq!(page.regular.len(), regular);
        assert!(page.featured.iter().all(|s| s.excerpt.ends_with("...")));
    }

    #[tokio::test]
    async fn test_every_featured_post_gets_a_block() {
        let mut posts = fixture_posts();
        for post in &mut posts {
            post.featured = true;
        }
        let total = posts.len();

        let mut view = PostListView::new();
        view.load(&MemoryStore::new(posts)).await;
        let page = view.page(&SiteConfig::default());

        assert_eq!(page.featured.len(), total);
        assert!(page.regular.is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_is_ready_and_empty() {
        let mut view = PostListView::new();
        view.load(&FailingStore).await;

        assert_eq!(view.state(), &ListState::Ready(Vec::new()));
        let page = view.page(&SiteConfig::default());
        assert!(page.featured.is_empty());
        assert!(page.regular.is_empty());
    }

    #[test]
    fn test_excerpt_budgets() {
        let mut posts = fixture_posts();
        let body = format!("<p>{}</p>", "word ".repeat(100));
        for post in &mut posts {
            post.content = body.clone();
        }

        let mut view = PostListView::new();
        view.apply(Ok(posts));
        let page = view.page(&SiteConfig::default());

        for summary in &page.featured {
            assert_eq!(summary.excerpt.chars().count(), 203);
        }
        for summary in &page.regular {
            assert_eq!(summary.excerpt.chars().count(), 153);
        }
    }
}
