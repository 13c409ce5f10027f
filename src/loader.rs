//! Content loading: live fetch first, bundled store second.
//!
//! Resolution is a two-step policy, [`resolve_content`], kept separate from
//! the display side effects so it can be tested on its own. Each section is
//! resolved independently; one section failing never affects another.

use crate::markdown::render_markdown;
use crate::page::{strip_class, ContentOrigin, DisplayArea, Page, PLACEHOLDER_CLASS};
use crate::store::ContentStore;
use crate::{Error, PresenterConfig, Result, SectionSource};
use reqwest::blocking::Client;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use url::Url;

/// Somewhere section documents can be fetched from.
pub trait ContentSource: Send + Sync {
    /// Fetch the document at `location` as text. Any non-success status is
    /// an error.
    fn fetch(&self, location: &str) -> Result<String>;
}

/// Fetches documents over HTTP, resolving relative names against a base URL.
pub struct HttpContentSource {
    client: Client,
    base: Option<Url>,
    user_agent: String,
}

impl HttpContentSource {
    pub fn new(config: &PresenterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        let base = config
            .base_url
            .as_deref()
            .map(|b| Url::parse(b).map_err(|e| Error::ConfigError(format!("invalid base_url {}: {}", b, e))))
            .transpose()?;
        Ok(Self {
            client,
            base,
            user_agent: config.user_agent.clone(),
        })
    }

    fn resolve_url(&self, location: &str) -> Result<Url> {
        match &self.base {
            Some(base) => base
                .join(location)
                .map_err(|e| Error::NetworkError(format!("cannot resolve {}: {}", location, e))),
            None => Url::parse(location)
                .map_err(|e| Error::NetworkError(format!("no base url for {}: {}", location, e))),
        }
    }
}

impl ContentSource for HttpContentSource {
    fn fetch(&self, location: &str) -> Result<String> {
        let url = self.resolve_url(location)?;
        let res = self
            .client
            .get(url.clone())
            .header("User-Agent", self.user_agent.clone())
            .send()?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(res.text()?)
    }
}

/// A source with no network: every fetch fails and resolution falls through
/// to the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSource;

impl ContentSource for OfflineSource {
    fn fetch(&self, location: &str) -> Result<String> {
        Err(Error::NetworkError(format!("offline: {}", location)))
    }
}

/// Text obtained for a section and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub text: String,
    pub origin: ContentOrigin,
}

/// Fetch `location`; on any failure look `target_id` up in `store`.
///
/// Exactly one fetch attempt is made. Returns
/// [`Error::ContentUnavailable`] naming `location` when both steps miss.
pub fn resolve_content(
    target_id: &str,
    location: &str,
    source: &dyn ContentSource,
    store: &ContentStore,
) -> Result<ResolvedContent> {
    match source.fetch(location) {
        Ok(text) => {
            log::info!("Loaded {} via fetch", location);
            Ok(ResolvedContent { text, origin: ContentOrigin::Live })
        }
        Err(err) => {
            log::warn!("Fetch failed for {} ({}), trying fallback", location, err);
            match store.get(target_id) {
                Some(text) => {
                    log::info!("Loaded {} from bundled store", location);
                    Ok(ResolvedContent {
                        text: text.to_string(),
                        origin: ContentOrigin::Fallback,
                    })
                }
                None => {
                    log::error!("Fallback failed for {}", location);
                    Err(Error::ContentUnavailable {
                        source_name: location.to_string(),
                    })
                }
            }
        }
    }
}

/// Inline block shown when a section has no content at all.
pub fn error_block(source_name: &str) -> String {
    format!(
        "<div class=\"{}\">Error: unable to load {}.<br><small>File not found and no fallback content available.</small></div>",
        PLACEHOLDER_CLASS, source_name
    )
}

/// Write `content` into `area`: keep the raw text for the modal, render it,
/// and drop any placeholder.
pub fn display_content(area: &mut DisplayArea, content: &ResolvedContent) {
    area.full_content = Some(content.text.clone());
    area.inner_html = strip_class(&render_markdown(&content.text), PLACEHOLDER_CLASS);
    area.origin = content.origin;
}

/// Outcome of one section load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub target_id: String,
    pub origin: ContentOrigin,
}

/// Loads section content into a [`Page`].
pub struct ContentLoader {
    source: Box<dyn ContentSource>,
    store: ContentStore,
}

impl ContentLoader {
    pub fn new(source: Box<dyn ContentSource>, store: ContentStore) -> Self {
        Self { source, store }
    }

    /// Loader for `config`: HTTP when a base URL is set, offline otherwise.
    pub fn from_config(config: &PresenterConfig, store: ContentStore) -> Result<Self> {
        let source: Box<dyn ContentSource> = if config.base_url.is_some() {
            Box::new(HttpContentSource::new(config)?)
        } else {
            Box::new(OfflineSource)
        };
        Ok(Self::new(source, store))
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn resolve(&self, target_id: &str, location: &str) -> Result<ResolvedContent> {
        resolve_content(target_id, location, self.source.as_ref(), &self.store)
    }

    fn apply(page: &mut Page, target_id: &str, location: &str, resolved: Result<ResolvedContent>) -> Option<LoadReport> {
        let area = page.area_mut(target_id)?;
        match resolved {
            Ok(content) => display_content(area, &content),
            Err(_) => {
                area.inner_html = error_block(location);
                area.origin = ContentOrigin::Unavailable;
            }
        }
        Some(LoadReport {
            target_id: target_id.to_string(),
            origin: area.origin,
        })
    }

    /// Load one section. A missing display area is a silent no-op and no
    /// fetch is made. Loading the same section twice overwrites the first
    /// result.
    pub fn load(&self, page: &mut Page, target_id: &str, location: &str) -> Option<LoadReport> {
        if page.area(target_id).is_none() {
            log::debug!("no display area #{}; skipping {}", target_id, location);
            return None;
        }
        let resolved = self.resolve(target_id, location);
        Self::apply(page, target_id, location, resolved)
    }

    /// Like [`load`](ContentLoader::load) on a shared page. The page is only
    /// locked to check for the area and to write the result, never while
    /// the fetch is in flight.
    pub fn load_shared(&self, page: &Mutex<Page>, target_id: &str, location: &str) -> Option<LoadReport> {
        if lock(page).area(target_id).is_none() {
            log::debug!("no display area #{}; skipping {}", target_id, location);
            return None;
        }
        let resolved = self.resolve(target_id, location);
        Self::apply(&mut lock(page), target_id, location, resolved)
    }

    /// Load every section concurrently. Each section is written to the page
    /// as soon as its own fetch settles, so a slow source holds back nothing
    /// but itself. Reports come back in the order of `sources`.
    pub fn load_all(&self, page: &Mutex<Page>, sources: &[SectionSource]) -> Vec<LoadReport> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|s| scope.spawn(move || self.load_shared(page, &s.target_id, &s.filename)))
                .collect();
            handles
                .into_iter()
                .zip(sources)
                .filter_map(|(h, s)| {
                    h.join().unwrap_or_else(|_| {
                        log::error!("section loader for #{} panicked", s.target_id);
                        None
                    })
                })
                .collect()
        })
    }
}

fn lock(page: &Mutex<Page>) -> MutexGuard<'_, Page> {
    page.lock().unwrap_or_else(|e| e.into_inner())
}
