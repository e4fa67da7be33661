//! Display theme state
//!
//! A single process-wide container holding the current [`ThemeMode`].
//! Presentation code reads the current mode or subscribes to changes;
//! updates go through [`ThemeState::set`] or [`ThemeState::toggle`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// Display mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    /// The mode following this one in the toggle cycle (light -> dark -> system -> light)
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::System,
            ThemeMode::System => ThemeMode::Light,
        }
    }

    /// Accessible label for the toggle control
    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Light => "Light mode",
            ThemeMode::Dark => "Dark mode",
            ThemeMode::System => "System theme",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => anyhow::bail!("Unknown theme mode: {}. Available: light, dark, system", other),
        }
    }
}

/// Shared theme container with subscribe/notify semantics
#[derive(Debug, Clone)]
pub struct ThemeState {
    tx: Arc<watch::Sender<ThemeMode>>,
}

impl ThemeState {
    /// Create the container with an initial mode
    pub fn new(initial: ThemeMode) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Current mode
    pub fn current(&self) -> ThemeMode {
        *self.tx.borrow()
    }

    /// Replace the mode, notifying subscribers only when it actually changes
    pub fn set(&self, mode: ThemeMode) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == mode {
                false
            } else {
                *current = mode;
                true
            }
        });
        if changed {
            tracing::debug!("Theme changed to {}", mode);
        }
    }

    /// Advance to the next mode in the cycle and return it
    pub fn toggle(&self) -> ThemeMode {
        let mut next = self.current();
        self.tx.send_modify(|current| {
            *current = current.next();
            next = *current;
        });
        tracing::debug!("Theme toggled to {}", next);
        next
    }

    /// Receive notifications for every subsequent change
    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.tx.subscribe()
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}
