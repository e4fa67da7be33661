//! Generator module - exports the site as static HTML using the built-in Tera templates

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::content::Post;
use crate::templates::{PageMeta, SubscribeForm, TemplateRenderer};
use crate::views::{DetailState, PostListView};
use crate::Site;

/// Number of featured posts shown on the landing page
const HOME_FEATURED: usize = 3;

/// Static site generator
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site, returning the number of pages written
    pub fn generate(&self, posts: &[Post]) -> Result<usize> {
        fs::create_dir_all(&self.site.public_dir)?;

        self.copy_static_assets()?;

        let config = &self.site.config;
        let mut view = PostListView::new();
        view.apply(Ok(posts.to_vec()));
        let page = view.page(config);

        let mut written = 0;

        let featured: Vec<_> = page.featured.iter().take(HOME_FEATURED).cloned().collect();
        let html = self.renderer.render_home(&self.meta("/"), &featured)?;
        self.write_page("/", &html)?;
        written += 1;

        let html = self.renderer.render_about(&self.meta("/about"))?;
        self.write_page("/about", &html)?;
        written += 1;

        let html = self.renderer.render_blog(&self.meta("/blog"), &page)?;
        self.write_page("/blog", &html)?;
        written += 1;

        let html = self
            .renderer
            .render_subscribe(&self.meta("/subscribe"), &SubscribeForm::default())?;
        self.write_page("/subscribe", &html)?;
        written += 1;

        for post in view.posts() {
            let route = post.path();
            let html = self
                .renderer
                .render_post(&self.meta(&route), &DetailState::Ready(post.clone()))?;
            self.write_page(&format!("/posts/{}", post.slug), &html)?;
            tracing::debug!("Generated: {}", route);
            written += 1;
        }

        let html = self.renderer.render_not_found(&self.meta("/404"))?;
        fs::write(self.site.public_dir.join("404.html"), html)?;
        written += 1;

        Ok(written)
    }

    fn meta<'a>(&'a self, path: &'a str) -> PageMeta<'a> {
        PageMeta {
            config: &self.site.config,
            path,
            theme: self.site.config.default_theme,
        }
    }

    /// Write a page as `index.html` under the directory named by its route
    fn write_page(&self, route: &str, html: &str) -> Result<()> {
        let dest = self.page_path(route);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, html)?;
        Ok(())
    }

    fn page_path(&self, route: &str) -> PathBuf {
        let relative = route.trim_matches('/');
        if relative.is_empty() {
            self.site.public_dir.join("index.html")
        } else {
            self.site.public_dir.join(relative).join("index.html")
        }
    }

    /// Copy the static directory into the public directory as-is
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::tests::fixture_posts;
    use tempfile::TempDir;

    #[test]
    fn test_generate_writes_every_page() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();
        fs::create_dir_all(site.static_dir.join("img")).unwrap();
        fs::write(site.static_dir.join("style.css"), "body {}").unwrap();
        fs::write(site.static_dir.join("img/logo.svg"), "<svg/>").unwrap();

        let posts = fixture_posts();
        let written = Generator::new(&site).unwrap().generate(&posts).unwrap();
        assert_eq!(written, 5 + posts.len());

        let public = &site.public_dir;
        for page in [
            "index.html",
            "about/index.html",
            "blog/index.html",
            "subscribe/index.html",
            "404.html",
            "style.css",
            "img/logo.svg",
        ] {
            assert!(public.join(page).exists(), "missing {}", page);
        }

        let post = fs::read_to_string(public.join("posts/my-first-bot/index.html")).unwrap();
        assert!(post.contains("<h2>Wiring it up</h2>"));
        assert!(post.contains(r#"data-theme="system""#));

        let blog = fs::read_to_string(public.join("blog/index.html")).unwrap();
        assert!(blog.contains(r#"href="/posts/learning-rust""#));
    }

    #[test]
    fn test_generate_without_posts() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path()).unwrap();

        let written = Generator::new(&site).unwrap().generate(&[]).unwrap();
        assert_eq!(written, 5);
        assert!(!site.public_dir.join("posts").exists());
    }
}
