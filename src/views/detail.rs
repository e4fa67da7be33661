//! Single post view
//!
//! Every slug change starts a new load generation. A load result carries the
//! [`LoadTicket`] it was issued under and is dropped if a newer generation has
//! started since, so a slow response for an old slug never replaces the
//! current one.

use crate::content::{find_by_slug, ContentStore, Post};
use crate::error::ContentError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Ready(Post),
    NotFound,
    Failed,
}

impl DetailState {
    /// User-facing message for the error states
    pub fn message(&self) -> Option<&'static str> {
        match self {
            DetailState::NotFound => Some("Post not found"),
            DetailState::Failed => Some("Failed to load post"),
            _ => None,
        }
    }
}

/// Identity of one load request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    slug: String,
}

impl LoadTicket {
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

#[derive(Debug)]
pub struct PostDetailView {
    slug: String,
    generation: u64,
    state: DetailState,
}

impl PostDetailView {
    /// Mount the view for a slug; the returned ticket identifies the first load
    pub fn mount(slug: impl Into<String>) -> (Self, LoadTicket) {
        let slug = slug.into();
        let view = Self {
            slug: slug.clone(),
            generation: 0,
            state: DetailState::Loading,
        };
        (view, LoadTicket { generation: 0, slug })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Switch to another slug, restarting from `Loading`
    pub fn navigate(&mut self, slug: impl Into<String>) -> LoadTicket {
        self.generation += 1;
        self.slug = slug.into();
        self.state = DetailState::Loading;
        LoadTicket {
            generation: self.generation,
            slug: self.slug.clone(),
        }
    }

    /// Apply a load result. Returns `false` when the ticket is stale and the
    /// result was discarded.
    pub fn apply(&mut self, ticket: &LoadTicket, result: Result<Vec<Post>, ContentError>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale load for '{}' (generation {} < {})",
                ticket.slug,
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(posts) => match find_by_slug(&posts, &ticket.slug) {
                Some(post) => DetailState::Ready(post.clone()),
                None => DetailState::NotFound,
            },
            Err(e) => {
                tracing::error!("Error loading post '{}': {}", ticket.slug, e);
                DetailState::Failed
            }
        };
        true
    }

    /// Load the current slug from the store and settle
    pub async fn load<S: ContentStore + ?Sized>(&mut self, store: &S) {
        let ticket = LoadTicket {
            generation: self.generation,
            slug: self.slug.clone(),
        };
        let result = store.get_all_posts().await;
        self.apply(&ticket, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::MemoryStore;
    use crate::views::tests::{fixture_posts, FailingStore};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_found_post_is_ready() {
        let store = MemoryStore::new(fixture_posts());
        let (mut view, _) = PostDetailView::mount("my-first-bot");
        assert_eq!(view.state(), &DetailState::Loading);

        view.load(&store).await;
        match view.state() {
            DetailState::Ready(post) => {
                assert_eq!(post.title, "My First Bot");
                assert!(post.content.contains("<h2>Wiring it up</h2>"));
            }
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let store = MemoryStore::new(fixture_posts());
        let (mut view, _) = PostDetailView::mount("does-not-exist");
        view.load(&store).await;
        assert_eq!(view.state(), &DetailState::NotFound);
        assert_eq!(view.state().message(), Some("Post not found"));
    }

    #[tokio::test]
    async fn test_load_failure_is_distinct_from_not_found() {
        let (mut view, _) = PostDetailView::mount("my-first-bot");
        view.load(&FailingStore).await;
        assert_eq!(view.state(), &DetailState::Failed);
        assert_eq!(view.state().message(), Some("Failed to load post"));
        assert_ne!(
            DetailState::Failed.message(),
            DetailState::NotFound.message()
        );
    }

    #[test]
    fn test_navigate_resets_to_loading() {
        let posts = fixture_posts();
        let (mut view, ticket) = PostDetailView::mount("my-first-bot");
        assert!(view.apply(&ticket, Ok(posts)));
        assert!(matches!(view.state(), DetailState::Ready(_)));

        let next = view.navigate("learning-rust");
        assert_eq!(next.slug(), "learning-rust");
        assert_eq!(view.slug(), "learning-rust");
        assert_eq!(view.state(), &DetailState::Loading);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let posts = fixture_posts();
        let (mut view, ticket_a) = PostDetailView::mount("my-first-bot");
        let ticket_b = view.navigate("learning-rust");

        assert!(view.apply(&ticket_b, Ok(posts.clone())));
        assert!(!view.apply(&ticket_a, Ok(posts)));

        match view.state() {
            DetailState::Ready(post) => assert_eq!(post.slug, "learning-rust"),
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    /// Store whose responses are released one at a time by the test
    struct GatedStore {
        posts: Vec<Post>,
        gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentStore for GatedStore {
        async fn get_all_posts(&self) -> Result<Vec<Post>, ContentError> {
            let gate = self.gates.lock().unwrap().pop_front();
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(self.posts.clone())
        }
    }

    async fn wait_for_calls(store: &GatedStore, n: usize) {
        while store.calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_late_response_for_previous_slug_never_shows() {
        let (release_a, gate_a) = oneshot::channel();
        let (release_b, gate_b) = oneshot::channel();
        let store = Arc::new(GatedStore {
            posts: fixture_posts(),
            gates: Mutex::new(VecDeque::from([gate_a, gate_b])),
            calls: AtomicUsize::new(0),
        });

        let (view, ticket_a) = PostDetailView::mount("my-first-bot");
        let view = Arc::new(tokio::sync::Mutex::new(view));

        let load_a = {
            let (store, view) = (Arc::clone(&store), Arc::clone(&view));
            tokio::spawn(async move {
                let result = store.get_all_posts().await;
                view.lock().await.apply(&ticket_a, result)
            })
        };
        wait_for_calls(&store, 1).await;

        let ticket_b = view.lock().await.navigate("learning-rust");
        let load_b = {
            let (store, view) = (Arc::clone(&store), Arc::clone(&view));
            tokio::spawn(async move {
                let result = store.get_all_posts().await;
                view.lock().await.apply(&ticket_b, result)
            })
        };
        wait_for_calls(&store, 2).await;

        // The newer request resolves first, then the old one arrives late
        release_b.send(()).unwrap();
        assert!(load_b.await.unwrap());
        release_a.send(()).unwrap();
        assert!(!load_a.await.unwrap());

        let view = view.lock().await;
        match view.state() {
            DetailState::Ready(post) => assert_eq!(post.slug, "learning-rust"),
            other => panic!("expected Ready for the second slug, got {:?}", other),
        }
    }
}
