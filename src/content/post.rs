//! Post model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique URL-safe identifier
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// Free-text classification label
    pub category: String,

    /// Display string such as "5 min read"
    pub read_time: String,

    /// Highlighted on the blog listing
    pub featured: bool,

    /// Rendered HTML body
    pub content: String,
}

impl Post {
    /// Create a new post with an empty body
    pub fn new(slug: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            date,
            category: "General".to_string(),
            read_time: "1 min read".to_string(),
            featured: false,
            content: String::new(),
        }
    }

    /// Path of the post detail page
    pub fn path(&self) -> String {
        format!("/posts/{}", crate::helpers::encode_segment(&self.slug))
    }
}

/// Find the post with the given slug
pub fn find_by_slug<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    posts.iter().find(|p| p.slug == slug)
}
