//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::theme::ThemeMode;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub email: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Display
    pub date_format: String,
    pub featured_excerpt_length: usize,
    pub excerpt_length: usize,
    pub default_theme: ThemeMode,

    /// Strip scripts and event handlers from post bodies before rendering
    pub sanitize_content: bool,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default = "default_menu")]
    pub menu: Vec<MenuItem>,

    #[serde(default)]
    pub home: HomeConfig,

    #[serde(default)]
    pub about: AboutConfig,

    #[serde(default)]
    pub newsletter: NewsletterConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "CodeFlare".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "Rayan".to_string(),
            email: String::new(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            content_dir: "posts".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            date_format: "M/D/YYYY".to_string(),
            featured_excerpt_length: 200,
            excerpt_length: 150,
            default_theme: ThemeMode::System,

            sanitize_content: false,

            highlight: HighlightConfig::default(),
            menu: default_menu(),
            home: HomeConfig::default(),
            about: AboutConfig::default(),
            newsletter: NewsletterConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

fn default_menu() -> Vec<MenuItem> {
    [
        ("Home", "/"),
        ("About", "/about"),
        ("Blog", "/blog"),
        ("Subscribe", "/subscribe"),
    ]
    .into_iter()
    .map(|(name, path)| MenuItem {
        name: name.to_string(),
        path: path.to_string(),
    })
    .collect()
}

/// Navigation menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Landing page copy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    pub headline: String,
    pub tagline: String,
    pub cards: Vec<HomeCard>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            headline: "Learn to code in the AI era".to_string(),
            tagline: "Real stories, honest experiences, and practical tips from my coding journey."
                .to_string(),
            cards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeCard {
    pub title: String,
    pub description: String,
    pub link: String,
}

/// About page copy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutConfig {
    pub intro: String,
    pub stats: Vec<AboutStat>,
    pub story: Vec<String>,
    pub values: Vec<AboutValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutStat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutValue {
    pub title: String,
    pub description: String,
}

/// Newsletter signup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub enable: bool,
    /// JSON file (relative to the site directory) holding subscriber addresses
    pub store: Option<String>,
    pub welcome_message: String,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            enable: true,
            store: Some("subscribers.json".to_string()),
            welcome_message: "Welcome to the CodeFlare community!".to_string(),
        }
    }
}
