//! Modal presenter: shows one section's full content in an overlay.
//!
//! Two states only, closed and open. Opening while already open simply
//! replaces the content; nothing is queued.

use crate::markdown::render_markdown;
use crate::page::Page;

/// What asked the modal to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    /// A click; only honoured when it landed on the overlay itself
    Pointer { on_overlay: bool },
    /// The Escape key
    Escape,
    /// A direct call from code
    Programmatic,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open { target_id: String },
}

/// Tracks which section, if any, the modal is showing.
#[derive(Debug, Clone, Default)]
pub struct ModalPresenter {
    state: ModalState,
}

impl ModalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    /// Open the modal on `target_id`.
    ///
    /// Uses the raw text kept by the loader when present; otherwise whatever
    /// text the display area currently shows, placeholder included. Does
    /// nothing if the area or the modal element is missing.
    pub fn open(&mut self, page: &mut Page, target_id: &str) -> bool {
        let Some(area) = page.area(target_id) else {
            log::debug!("open: no display area #{}", target_id);
            return false;
        };
        let content = area.full_content.clone().unwrap_or_else(|| area.plain_text());
        let title = area.card_title.clone().unwrap_or_default();

        let Some(modal) = page.modal.as_mut() else {
            log::debug!("open: page has no modal");
            return false;
        };
        modal.title = title;
        modal.body_html = render_markdown(&content);
        modal.open = true;
        modal.aria_hidden = false;
        page.body_overflow = "hidden".to_string();

        self.state = ModalState::Open {
            target_id: target_id.to_string(),
        };
        log::debug!("modal opened on #{}", target_id);
        true
    }

    /// Close the modal. Pointer clicks inside the modal body are ignored.
    /// Closing an already closed modal changes nothing visible.
    pub fn close(&mut self, page: &mut Page, trigger: CloseTrigger) -> bool {
        if let CloseTrigger::Pointer { on_overlay: false } = trigger {
            return false;
        }
        let Some(modal) = page.modal.as_mut() else {
            return false;
        };
        modal.open = false;
        modal.aria_hidden = true;
        page.body_overflow.clear();
        if self.is_open() {
            log::debug!("modal closed ({:?})", trigger);
        }
        self.state = ModalState::Closed;
        true
    }

    /// Keyboard handler: Escape closes an open modal, anything else is ignored.
    pub fn on_key(&mut self, page: &mut Page, key: &str) -> bool {
        let showing = page.modal.as_ref().is_some_and(|m| m.open);
        if key == "Escape" && showing {
            self.close(page, CloseTrigger::Escape)
        } else {
            false
        }
    }
}
