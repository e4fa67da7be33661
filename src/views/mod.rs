//! Post list and post detail views
//!
//! Views own the load state machines; they know nothing about HTML. The
//! server and the static generator hand their results to the templates.

mod detail;
mod list;

pub use detail::{DetailState, LoadTicket, PostDetailView};
pub use list::{ListPage, ListState, PostListView};

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{date_iso, excerpt, format_date, url_for};

/// What a listing shows for one post
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub date: String,
    pub date_iso: String,
    pub read_time: String,
    pub category: String,
    pub featured: bool,
    pub excerpt: String,
}

impl PostSummary {
    pub fn new(post: &Post, config: &SiteConfig, budget: usize) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            url: url_for(config, &post.path()),
            date: format_date(&post.date, &config.date_format),
            date_iso: date_iso(&post.date),
            read_time: post.read_time.clone(),
            category: post.category.clone(),
            featured: post.featured,
            excerpt: excerpt(&post.content, budget),
        }
    }
}
