//! docshow
//!
//! A headless engine for single-page documentation presentations: sections
//! of markdown loaded live with a bundled fallback, a modal reader, a scroll
//! spy for the navigation bar, a decorative connector drawn between cards and
//! a button that pings a local launcher process.
//!
//! The browser document is modelled by [`page::Page`], parsed from the
//! presentation's HTML shell. Components mutate that model the way the page
//! script would mutate the DOM.
//!
//! # Example
//!
//! ```no_run
//! use docshow::{Presenter, PresenterConfig};
//! use docshow::store::ContentStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let html = std::fs::read_to_string("index.html")?;
//! let config = PresenterConfig {
//!     base_url: Some("http://localhost:8000/".to_string()),
//!     ..Default::default()
//! };
//!
//! let presenter = Presenter::new(config, &html, ContentStore::bundled())?;
//! presenter.start();
//! presenter.scroll_to(0.0, 900.0);
//! println!("{}", presenter.snapshot());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod error;
pub use error::{Error, Result};

pub mod connector;
pub mod debounce;
pub mod launch;
pub mod loader;
pub mod markdown;
pub mod modal;
pub mod page;
pub mod presenter;
pub mod scroll_spy;
pub mod store;

pub use presenter::{PageSnapshot, Presenter};

/// The stock presentation shell.
pub const DEFAULT_SHELL: &str = include_str!("../assets/index.html");

/// A section document and the display area it is rendered into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSource {
    /// Id of the display area element
    pub target_id: String,
    /// Document name, relative to `base_url`
    pub filename: String,
}

impl SectionSource {
    pub fn new(target_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            filename: filename.into(),
        }
    }
}

/// Settings for the launch button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Endpoint that receives the POST
    pub endpoint: String,
    /// How long the control stays busy after the request settles
    pub restore_delay_ms: u64,
    /// Control markup while the request is in flight
    pub busy_label: String,
    pub timeout_ms: u64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/launch".to_string(),
            restore_delay_ms: 3000,
            busy_label: launch::BUSY_LABEL.to_string(),
            timeout_ms: 10000,
        }
    }
}

/// Configuration for a [`Presenter`]
///
/// Defaults describe the stock pipeline presentation: five scroll-spy
/// sections, five content documents, a 200px lookahead and a 200ms resize
/// debounce. With no `base_url` every section resolves from the bundled
/// store.
///
/// # Examples
///
/// ```
/// let cfg = docshow::PresenterConfig::default();
/// assert_eq!(cfg.scroll_threshold, 200.0);
/// assert!(cfg.base_url.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// Where section documents are fetched from
    pub base_url: Option<String>,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Timeout for content fetches in milliseconds
    pub timeout_ms: u64,
    /// Viewport dimensions
    pub viewport: Viewport,
    /// Lookahead subtracted from each section's top
    pub scroll_threshold: f64,
    /// Section ids in scroll-spy priority order
    pub scroll_sections: Vec<String>,
    /// Section documents, loaded in this order
    pub sources: Vec<SectionSource>,
    /// Quiet period before a resize recomputes the connector
    pub resize_debounce_ms: u64,
    pub launch: LaunchConfig,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: concat!("docshow/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_ms: 30000,
            viewport: Viewport::default(),
            scroll_threshold: scroll_spy::DEFAULT_THRESHOLD,
            scroll_sections: ["prompt", "tasks", "plan", "walkthrough", "application"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sources: vec![
                SectionSource::new("prompt-content", "prompt.md"),
                SectionSource::new("tasks-content", "tasks.md"),
                SectionSource::new("walkthrough-content", "walkthrough.md"),
                SectionSource::new("versions-content", "versions.md"),
                SectionSource::new("defis-content", "challenges.md"),
            ],
            resize_debounce_ms: 200,
            launch: LaunchConfig::default(),
        }
    }
}

impl PresenterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Target ids of every configured source.
    pub fn area_ids(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.target_id.as_str()).collect()
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}
