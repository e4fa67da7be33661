//! Content module - post model, loading, and the content store boundary

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod store;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{find_by_slug, Post};
pub use store::{ContentStore, FileStore, MemoryStore};
