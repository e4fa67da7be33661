//! Newsletter signup
//!
//! Subscribers are kept in memory and, when a store file is configured,
//! written back as a JSON array after every new signup.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::config::NewsletterConfig;
use crate::error::NewsletterError;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Result of a successful signup request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
}

pub struct Newsletter {
    enabled: bool,
    welcome_message: String,
    store_path: Option<PathBuf>,
    subscribers: Mutex<BTreeSet<String>>,
}

impl Newsletter {
    /// Create the signup service, reading existing subscribers if a store file is configured
    pub fn open(config: &NewsletterConfig, base_dir: &Path) -> anyhow::Result<Self> {
        let store_path = config.store.as_ref().map(|s| base_dir.join(s));

        let subscribers = match &store_path {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(path)?;
                let list: Vec<String> = serde_json::from_str(&content)?;
                tracing::debug!("Loaded {} subscribers from {:?}", list.len(), path);
                list.into_iter().map(|e| e.trim().to_lowercase()).collect()
            }
            _ => BTreeSet::new(),
        };

        Ok(Self {
            enabled: config.enable,
            welcome_message: config.welcome_message.clone(),
            store_path,
            subscribers: Mutex::new(subscribers),
        })
    }

    /// In-memory signup list with no backing file
    pub fn in_memory(config: &NewsletterConfig) -> Self {
        Self {
            enabled: config.enable,
            welcome_message: config.welcome_message.clone(),
            store_path: None,
            subscribers: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn welcome_message(&self) -> &str {
        &self.welcome_message
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Register an email address
    pub async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome, NewsletterError> {
        if !self.enabled {
            return Err(NewsletterError::Disabled);
        }

        let email = email.trim();
        if email.is_empty() {
            return Err(NewsletterError::EmptyEmail);
        }
        if !EMAIL.is_match(email) {
            return Err(NewsletterError::InvalidEmail(email.to_string()));
        }

        let email = email.to_lowercase();
        let mut subscribers = self.subscribers.lock().await;
        if subscribers.contains(&email) {
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        // The address only counts as subscribed once it is on disk
        if let Some(path) = &self.store_path {
            let list: Vec<&String> = subscribers.iter().chain([&email]).collect();
            let json = serde_json::to_string_pretty(&list)
                .map_err(|e| NewsletterError::Storage(e.to_string()))?;
            tokio::fs::write(path, json)
                .await
                .map_err(|e| NewsletterError::Storage(e.to_string()))?;
        }
        subscribers.insert(email);

        tracing::info!("New newsletter subscriber ({} total)", subscribers.len());
        Ok(SubscribeOutcome::Subscribed)
    }
}
