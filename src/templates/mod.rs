//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded in the binary. Autoescaping is off: post bodies
//! are trusted markup, and templates escape request-derived values explicitly.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::{full_url_for, is_active, sanitize_html, url_for};
use crate::theme::ThemeMode;
use crate::views::{DetailState, ListPage, PostSummary};

/// Per-request inputs shared by every page
#[derive(Debug, Clone, Copy)]
pub struct PageMeta<'a> {
    pub config: &'a SiteConfig,
    /// Request path, used for the active nav item and canonical URL
    pub path: &'a str,
    pub theme: ThemeMode,
}

/// State of the signup form on the subscribe page
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubscribeForm {
    pub email: String,
    pub error: Option<String>,
    pub message: Option<String>,
    pub subscribed: bool,
}

#[derive(Debug, Clone, Serialize)]
struct SiteData<'a> {
    title: &'a str,
    subtitle: &'a str,
    description: &'a str,
    author: &'a str,
    email: &'a str,
    newsletter: bool,
}

#[derive(Debug, Clone, Serialize)]
struct NavItem {
    name: String,
    href: String,
    active: bool,
}

#[derive(Debug, Clone, Serialize)]
struct ThemeData {
    mode: &'static str,
    label: &'static str,
    action: String,
}

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("about.html", include_str!("site/about.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("post_missing.html", include_str!("site/post_missing.html")),
            ("subscribe.html", include_str!("site/subscribe.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            ("partials/nav.html", include_str!("site/partials/nav.html")),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
            (
                "partials/newsletter.html",
                include_str!("site/partials/newsletter.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Landing page with the featured posts
    pub fn render_home(&self, meta: &PageMeta, featured: &[PostSummary]) -> Result<String> {
        let mut context = self.base_context(meta);
        context.insert("home", &meta.config.home);
        context.insert("featured", featured);
        self.render("home.html", &context)
    }

    pub fn render_about(&self, meta: &PageMeta) -> Result<String> {
        let mut context = self.base_context(meta);
        context.insert("about", &meta.config.about);
        self.render("about.html", &context)
    }

    /// Blog listing: one highlighted block per featured post, then the grid
    pub fn render_blog(&self, meta: &PageMeta, page: &ListPage) -> Result<String> {
        let mut context = self.base_context(meta);
        context.insert("featured", &page.featured);
        context.insert("regular", &page.regular);
        self.render("blog.html", &context)
    }

    /// Post detail page for any detail state
    pub fn render_post(&self, meta: &PageMeta, state: &DetailState) -> Result<String> {
        let mut context = self.base_context(meta);
        match state {
            DetailState::Ready(post) => {
                let content = if meta.config.sanitize_content {
                    sanitize_html(&post.content)
                } else {
                    post.content.clone()
                };
                context.insert(
                    "post",
                    &PostSummary::new(post, meta.config, meta.config.excerpt_length),
                );
                context.insert("content", &content);
                self.render("post.html", &context)
            }
            DetailState::NotFound | DetailState::Failed => {
                context.insert("heading", "Post Not Found");
                context.insert("message", &state.message());
                self.render("post_missing.html", &context)
            }
            DetailState::Loading => {
                context.insert("heading", "Loading");
                context.insert("message", "Loading post...");
                self.render("post_missing.html", &context)
            }
        }
    }

    pub fn render_subscribe(&self, meta: &PageMeta, form: &SubscribeForm) -> Result<String> {
        let mut context = self.base_context(meta);
        context.insert("form", form);
        self.render("subscribe.html", &context)
    }

    pub fn render_not_found(&self, meta: &PageMeta) -> Result<String> {
        let context = self.base_context(meta);
        self.render("not_found.html", &context)
    }

    /// Render a template with given context
    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    fn base_context(&self, meta: &PageMeta) -> Context {
        let config = meta.config;
        let mut context = Context::new();

        context.insert(
            "site",
            &SiteData {
                title: &config.title,
                subtitle: &config.subtitle,
                description: &config.description,
                author: &config.author,
                email: &config.email,
                newsletter: config.newsletter.enable,
            },
        );

        let nav: Vec<NavItem> = config
            .menu
            .iter()
            .map(|item| NavItem {
                name: item.name.clone(),
                href: url_for(config, &item.path),
                active: is_active(meta.path, &item.path),
            })
            .collect();
        context.insert("nav", &nav);

        context.insert(
            "theme",
            &ThemeData {
                mode: meta.theme.as_str(),
                label: meta.theme.label(),
                action: url_for(config, "/theme"),
            },
        );

        context.insert("root", &url_for(config, "/"));
        context.insert("blog_url", &url_for(config, "/blog"));
        context.insert("subscribe_url", &url_for(config, "/subscribe"));
        context.insert("canonical", &full_url_for(config, meta.path));
        context.insert("path", meta.path);
        context.insert("year", &chrono::Local::now().year());
        context.insert("version", env!("CARGO_PKG_VERSION"));

        context
    }
}
