//! codeflare: a personal blog and newsletter site
//!
//! Posts live as markdown or HTML files in a content directory. They are
//! served by an axum development server that re-reads the content store on
//! every request, or exported to static HTML with the built-in Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod newsletter;
pub mod server;
pub mod templates;
pub mod theme;
pub mod views;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentLoader, FileStore};

/// A site directory and its configuration
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Post source directory
    pub content_dir: PathBuf,
    /// Assets copied or served as-is
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site directory, falling back to the default configuration
    /// when there is no `_config.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self {
            content_dir: base_dir.join(&config.content_dir),
            static_dir: base_dir.join(&config.static_dir),
            public_dir: base_dir.join(&config.public_dir),
            config,
            base_dir,
        })
    }

    pub fn content_loader(&self) -> ContentLoader {
        ContentLoader::new(&self.content_dir, &self.config)
    }

    /// Content store re-reading the content directory on every call
    pub fn store(&self) -> FileStore {
        FileStore::new(self.content_loader())
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post, returning its path
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title)
    }
}
