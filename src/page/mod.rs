//! In-memory page model.
//!
//! A [`Page`] is built once from the presentation's HTML shell (see
//! [`parse`]) and then mutated by the loader, modal, scroll spy, connector and
//! launch components. Every element the browser version would touch has a
//! field here; an element missing from the shell is `None` and the
//! operations that need it do nothing.

pub mod layout;
pub mod parse;

pub use layout::{layout_page, PageLayout, Rect};
pub use parse::parse_page;

use scraper::{Html, Selector};

/// Class carried by placeholder and error blocks inside a display area.
pub const PLACEHOLDER_CLASS: &str = "placeholder-text";

/// Where the text currently shown in a display area came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Still showing the shell's placeholder
    Placeholder,
    /// Fetched from the content server
    Live,
    /// Served from the bundled content store
    Fallback,
    /// Fetch failed and no fallback existed
    Unavailable,
}

/// The element a section's content is rendered into.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayArea {
    /// Element id (the section's target id)
    pub id: String,
    /// Text of the enclosing card's `.card-title`, if any
    pub card_title: Option<String>,
    /// Current inner HTML
    pub inner_html: String,
    /// Raw markdown kept for the modal (`data-full-content`)
    pub full_content: Option<String>,
    pub origin: ContentOrigin,
}

impl DisplayArea {
    pub fn has_placeholder(&self) -> bool {
        has_class(&self.inner_html, PLACEHOLDER_CLASS)
    }

    /// Rendered text of the area with markup stripped (`innerText`).
    pub fn plain_text(&self) -> String {
        let fragment = Html::parse_fragment(&self.inner_html);
        fragment.root_element().text().collect::<String>()
    }
}

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub href: String,
    pub active: bool,
}

impl NavEntry {
    /// The fragment the link points at, without the leading `#`.
    pub fn target(&self) -> Option<&str> {
        self.href.split_once('#').map(|(_, frag)| frag).filter(|f| !f.is_empty())
    }
}

/// A visual card, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Id of the `<section>` the card sits in
    pub section_id: Option<String>,
    pub title: String,
    /// Id of the display area inside the card
    pub area_id: Option<String>,
}

/// The modal overlay (`#markdown-modal`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: String,
    pub body_html: String,
    pub open: bool,
    pub aria_hidden: bool,
}

impl Default for ModalView {
    fn default() -> Self {
        Self {
            title: String::new(),
            body_html: String::new(),
            open: false,
            aria_hidden: true,
        }
    }
}

/// The decorative SVG (`#circuit-svg` with its `#circuit-path`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectorView {
    pub width: f64,
    pub height: f64,
    /// The path's `d` attribute
    pub d: String,
}

/// The launch button (`.btn-primary`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub label_html: String,
    pub disabled: bool,
}

/// Scroll offset of the window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

/// Headless stand-in for the presentation document.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub title: String,
    pub(crate) areas: Vec<DisplayArea>,
    /// Ids of `<section>` elements in document order
    pub(crate) sections: Vec<String>,
    pub(crate) nav: Vec<NavEntry>,
    pub(crate) cards: Vec<Card>,
    pub modal: Option<ModalView>,
    pub connector: Option<ConnectorView>,
    pub launch_control: Option<ControlView>,
    /// Inline `overflow` style of `<body>`
    pub body_overflow: String,
    pub scroll: ScrollPosition,
    pub(crate) layout: PageLayout,
}

impl Page {
    pub fn area(&self, id: &str) -> Option<&DisplayArea> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn area_mut(&mut self, id: &str) -> Option<&mut DisplayArea> {
        self.areas.iter_mut().find(|a| a.id == id)
    }

    pub fn areas(&self) -> &[DisplayArea] {
        &self.areas
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn has_section(&self, id: &str) -> bool {
        self.sections.iter().any(|s| s == id)
    }

    pub fn nav(&self) -> &[NavEntry] {
        &self.nav
    }

    pub(crate) fn nav_mut(&mut self) -> &mut [NavEntry] {
        &mut self.nav
    }

    /// Targets of the nav entries currently marked active.
    pub fn active_nav_targets(&self) -> Vec<&str> {
        self.nav.iter().filter(|n| n.active).filter_map(|n| n.target()).collect()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Replace the measured layout. Callers with real measurements use this
    /// instead of [`layout_page`].
    pub fn set_layout(&mut self, layout: PageLayout) {
        self.layout = layout;
    }

    /// Card rectangles relative to the viewport (`getBoundingClientRect`).
    pub fn card_client_rects(&self) -> Vec<Rect> {
        self.layout
            .cards
            .iter()
            .map(|r| Rect {
                x: r.x - self.scroll.x,
                y: r.y - self.scroll.y,
                ..*r
            })
            .collect()
    }

    /// `offsetTop` of a section element.
    pub fn section_top(&self, id: &str) -> Option<f64> {
        if !self.has_section(id) {
            return None;
        }
        self.layout.section_tops.get(id).copied()
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll = ScrollPosition { x, y };
    }
}

pub(crate) fn has_class(html: &str, class: &str) -> bool {
    let Ok(sel) = Selector::parse(&format!(".{}", class)) else {
        return false;
    };
    Html::parse_fragment(html).select(&sel).next().is_some()
}

/// Remove every element carrying `class` from an HTML fragment.
pub(crate) fn strip_class(html: &str, class: &str) -> String {
    let Ok(sel) = Selector::parse(&format!(".{}", class)) else {
        return html.to_string();
    };
    let mut fragment = Html::parse_fragment(html);
    let ids: Vec<_> = fragment.select(&sel).map(|e| e.id()).collect();
    if ids.is_empty() {
        return html.to_string();
    }
    for id in ids {
        if let Some(mut node) = fragment.tree.get_mut(id) {
            node.detach();
        }
    }
    fragment.root_element().inner_html()
}
