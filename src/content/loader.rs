//! Content loader - loads posts from the content directory

use anyhow::Result;
use chrono::Local;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Post};
use crate::config::SiteConfig;
use crate::error::ContentError;

/// Loads posts from a directory of markdown and HTML files
pub struct ContentLoader {
    content_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new<P: AsRef<Path>>(content_dir: P, config: &SiteConfig) -> Self {
        let renderer =
            MarkdownRenderer::with_options(&config.highlight.theme, config.highlight.line_number);
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            renderer,
        }
    }

    /// Load every published post, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>, ContentError> {
        if !self.content_dir.is_dir() {
            return Err(ContentError::MissingSource(self.content_dir.clone()));
        }

        let mut posts = Vec::new();
        let mut seen = HashSet::new();

        for entry in WalkDir::new(&self.content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() || !is_content_file(path) {
                continue;
            }

            match self.load_post(path) {
                Ok(Some(post)) => {
                    if seen.insert(post.slug.clone()) {
                        posts.push(post);
                    } else {
                        tracing::warn!(
                            "Skipping {:?}: slug '{}' is already taken",
                            path,
                            post.slug
                        );
                    }
                }
                Ok(None) => tracing::debug!("Skipping draft {:?}", path),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.content_dir);
        Ok(posts)
    }

    /// Load a single post from a file; drafts yield `None`
    fn load_post(&self, path: &Path) -> Result<Option<Post>> {
        let raw = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&raw)?;

        if fm.draft {
            return Ok(None);
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");

        let date = match fm.parse_date() {
            Some(date) => date,
            None => {
                let modified = fs::metadata(path)?.modified()?;
                chrono::DateTime::<Local>::from(modified).date_naive()
            }
        };

        let slug = fm
            .slug
            .as_deref()
            .map(slug::slugify)
            .unwrap_or_else(|| slug::slugify(stem));

        let content = if is_html_file(path) {
            body.to_string()
        } else {
            self.renderer.render(body)?
        };

        let mut post = Post::new(slug, fm.title.unwrap_or_else(|| stem.to_string()), date);
        if let Some(category) = fm.category {
            post.category = category;
        }
        if let Some(read_time) = fm.read_time {
            post.read_time = read_time;
        }
        post.featured = fm.featured;
        post.content = content;

        Ok(Some(post))
    }
}

/// Check if a file holds a post body
fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "markdown" | "html" | "htm"))
        .unwrap_or(false)
}

fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "html" || e == "htm")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_posts() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "my-first-bot.md",
            "---\ntitle: My First Bot\ndate: 2024-01-15\ncategory: AI\nreadTime: 5 min read\nfeatured: true\n---\n\nHello **bot**.\n",
        );
        write(
            tmp.path(),
            "raw.html",
            "---\ntitle: Raw\ndate: 2024-02-01\n---\n<p>Already <em>HTML</em></p>",
        );
        write(tmp.path(), "notes.txt", "ignored");

        let loader = ContentLoader::new(tmp.path(), &SiteConfig::default());
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts.len(), 2);
        // Newest first
        assert_eq!(posts[0].slug, "raw");
        assert_eq!(posts[0].content, "<p>Already <em>HTML</em></p>");

        let bot = &posts[1];
        assert_eq!(bot.slug, "my-first-bot");
        assert_eq!(bot.title, "My First Bot");
        assert_eq!(bot.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bot.category, "AI");
        assert_eq!(bot.read_time, "5 min read");
        assert!(bot.featured);
        assert!(bot.content.contains("<strong>bot</strong>"));
    }

    #[test]
    fn test_defaults_and_drafts() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Plain Post.md", "Just text.");
        write(
            tmp.path(),
            "wip.md",
            "---\ntitle: Work in progress\ndraft: true\n---\nsoon",
        );

        let loader = ContentLoader::new(tmp.path(), &SiteConfig::default());
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "plain-post");
        assert_eq!(posts[0].title, "Plain Post");
        assert_eq!(posts[0].category, "General");
        assert_eq!(posts[0].read_time, "1 min read");
        assert!(!posts[0].featured);
    }

    #[test]
    fn test_duplicate_slug_keeps_first_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "---\ntitle: First\nslug: same\n---\none");
        write(tmp.path(), "b.md", "---\ntitle: Second\nslug: same\n---\ntwo");

        let loader = ContentLoader::new(tmp.path(), &SiteConfig::default());
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "First");
    }

    #[test]
    fn test_missing_directory_is_load_failure() {
        let tmp = TempDir::new().unwrap();
        let loader = ContentLoader::new(tmp.path().join("nope"), &SiteConfig::default());
        assert!(matches!(
            loader.load_posts(),
            Err(ContentError::MissingSource(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.md", "---\ntitle: Good\n---\nstill here");
        std::os::unix::fs::symlink(tmp.path().join("gone.md"), tmp.path().join("broken.md"))
            .unwrap();

        let loader = ContentLoader::new(tmp.path(), &SiteConfig::default());
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Good");
    }
}
