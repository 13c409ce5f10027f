//! The presenter: owns the page and wires every component to its events.

use crate::connector::{self, ConnectorPath};
use crate::debounce::Debouncer;
use crate::launch::{LaunchActivation, LaunchTrigger, LogNotifier, Notifier};
use crate::loader::{ContentLoader, LoadReport};
use crate::modal::{CloseTrigger, ModalPresenter};
use crate::page::{layout_page, parse_page, ContentOrigin, Page};
use crate::scroll_spy::ScrollSpy;
use crate::store::ContentStore;
use crate::{PresenterConfig, Result, Viewport};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock(page: &Mutex<Page>) -> MutexGuard<'_, Page> {
    page.lock().unwrap_or_else(|e| e.into_inner())
}

/// A running presentation.
///
/// Content loading is blocking and must not run on an async worker thread.
/// [`resize`](Presenter::resize) and [`launch`](Presenter::launch) need a
/// tokio runtime.
pub struct Presenter {
    config: PresenterConfig,
    page: Arc<Mutex<Page>>,
    loader: ContentLoader,
    modal: ModalPresenter,
    spy: ScrollSpy,
    resize: Debouncer,
    launcher: LaunchTrigger,
}

impl Presenter {
    pub fn new(config: PresenterConfig, html: &str, store: ContentStore) -> Result<Self> {
        Self::with_notifier(config, html, store, Arc::new(LogNotifier))
    }

    pub fn with_notifier(
        config: PresenterConfig,
        html: &str,
        store: ContentStore,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let loader = ContentLoader::from_config(&config, store)?;
        Self::with_loader(config, html, loader, notifier)
    }

    pub fn with_loader(
        config: PresenterConfig,
        html: &str,
        loader: ContentLoader,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let mut page = parse_page(html, &config.area_ids())?;
        let layout = layout_page(&page, config.viewport);
        page.set_layout(layout);
        let page = Arc::new(Mutex::new(page));

        let spy = ScrollSpy::new(config.scroll_sections.clone(), config.scroll_threshold);
        let launcher = LaunchTrigger::new(config.launch.clone(), notifier)?;

        let target = Arc::clone(&page);
        let resize = Debouncer::new(Duration::from_millis(config.resize_debounce_ms), move || {
            connector::recompute(&mut lock(&target));
        });

        Ok(Self {
            config,
            page,
            loader,
            modal: ModalPresenter::new(),
            spy,
            resize,
            launcher,
        })
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    /// Shared handle to the page model.
    pub fn page(&self) -> Arc<Mutex<Page>> {
        Arc::clone(&self.page)
    }

    pub fn modal(&self) -> &ModalPresenter {
        &self.modal
    }

    /// Page-ready handler: load every section, lay the page out again for
    /// the new content, then draw the connector once.
    ///
    /// Sections appear on the page one by one as their fetches settle. The
    /// other handlers stay usable while loading runs.
    pub fn start(&self) -> Vec<LoadReport> {
        let reports = self.loader.load_all(&self.page, &self.config.sources);
        let mut page = lock(&self.page);
        let layout = layout_page(&page, self.config.viewport);
        page.set_layout(layout);
        connector::recompute(&mut page);
        reports
    }

    /// Load (or reload) a single section.
    pub fn load(&self, target_id: &str, location: &str) -> Option<LoadReport> {
        self.loader.load_shared(&self.page, target_id, location)
    }

    /// Scroll handler. Returns the active section, if any.
    pub fn scroll_to(&self, x: f64, y: f64) -> Option<String> {
        let mut page = lock(&self.page);
        page.scroll_to(x, y);
        self.spy.on_scroll(&mut page)
    }

    /// "Read more" click.
    pub fn open(&mut self, target_id: &str) -> bool {
        self.modal.open(&mut lock(&self.page), target_id)
    }

    /// Click anywhere while the modal is up; `on_overlay` tells whether the
    /// click landed on the background overlay.
    pub fn click_modal(&mut self, on_overlay: bool) -> bool {
        self.modal.close(&mut lock(&self.page), CloseTrigger::Pointer { on_overlay })
    }

    pub fn close(&mut self) -> bool {
        self.modal.close(&mut lock(&self.page), CloseTrigger::Programmatic)
    }

    pub fn key(&mut self, key: &str) -> bool {
        self.modal.on_key(&mut lock(&self.page), key)
    }

    /// Window resize. Layout follows immediately; the connector is redrawn
    /// once the resize burst has been quiet for the debounce delay.
    pub fn resize(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
        {
            let mut page = lock(&self.page);
            let layout = layout_page(&page, viewport);
            page.set_layout(layout);
        }
        self.resize.schedule();
    }

    /// Redraw the connector right away.
    pub fn recompute_connector(&self) -> Option<ConnectorPath> {
        connector::recompute(&mut lock(&self.page))
    }

    /// Launch button click.
    pub async fn launch(&self) -> Option<LaunchActivation> {
        self.launcher.activate(&self.page).await
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let page = lock(&self.page);
        PageSnapshot::of(&page)
    }
}

/// Textual view of the page for tests and the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub title: String,
    /// Target id and origin of every display area
    pub sections: Vec<(String, ContentOrigin)>,
    pub active_nav: Vec<String>,
    /// Title of the open modal
    pub modal: Option<String>,
    pub connector: Option<String>,
    pub body_overflow: String,
}

impl PageSnapshot {
    pub fn of(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            sections: page.areas().iter().map(|a| (a.id.clone(), a.origin)).collect(),
            active_nav: page.active_nav_targets().into_iter().map(str::to_string).collect(),
            modal: page.modal.as_ref().filter(|m| m.open).map(|m| m.title.clone()),
            connector: page.connector.as_ref().map(|c| c.d.trim_end().to_string()),
            body_overflow: page.body_overflow.clone(),
        }
    }
}

impl fmt::Display for PageSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "title: {}", self.title)?;
        for (id, origin) in &self.sections {
            writeln!(f, "section {}: {:?}", id, origin)?;
        }
        writeln!(f, "active nav: {}", self.active_nav.join(", "))?;
        match &self.modal {
            Some(title) => writeln!(f, "modal: open ({})", title)?,
            None => writeln!(f, "modal: closed")?,
        }
        if let Some(d) = &self.connector {
            writeln!(f, "connector: {}", d)?;
        }
        Ok(())
    }
}
