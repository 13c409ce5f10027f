//! Scroll spy: keeps the navigation highlight in step with the scroll position.

use crate::page::Page;

/// Default lookahead subtracted from each section's top offset.
pub const DEFAULT_THRESHOLD: f64 = 200.0;

/// A section as the scroll spy sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOffset<'a> {
    pub id: &'a str,
    pub top: f64,
}

/// Compute the active section for `scroll_y`.
///
/// `sections` are scanned in the order given. Every section whose
/// `top - threshold` is at or above `scroll_y` overwrites the previous
/// candidate, so the last qualifying section wins even when an earlier one
/// also qualifies.
pub fn compute_active_section<'a>(
    sections: &[SectionOffset<'a>],
    scroll_y: f64,
    threshold: f64,
) -> Option<&'a str> {
    let mut current = None;
    for section in sections {
        if scroll_y >= section.top - threshold {
            current = Some(section.id);
        }
    }
    current
}

/// Clear every nav entry, then mark the ones pointing at `active`.
///
/// Runs unconditionally on every call; there is no diffing against the
/// previous state.
pub fn mark_active(page: &mut Page, active: Option<&str>) {
    for entry in page.nav_mut() {
        entry.active = false;
        if let Some(id) = active {
            if entry.target() == Some(id) {
                entry.active = true;
            }
        }
    }
}

/// The scroll handler: a fixed section priority order plus a threshold.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
    order: Vec<String>,
    threshold: f64,
}

impl ScrollSpy {
    pub fn new(order: Vec<String>, threshold: f64) -> Self {
        Self { order, threshold }
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Handle a scroll event: recompute the active section from the page's
    /// current scroll offset and update the nav highlight. Sections absent
    /// from the page are skipped.
    pub fn on_scroll(&self, page: &mut Page) -> Option<String> {
        let offsets: Vec<SectionOffset<'_>> = self
            .order
            .iter()
            .filter_map(|id| page.section_top(id).map(|top| SectionOffset { id: id.as_str(), top }))
            .collect();
        let active = compute_active_section(&offsets, page.scroll.y, self.threshold).map(str::to_string);
        mark_active(page, active.as_deref());
        log::debug!("scroll y={} active={:?}", page.scroll.y, active);
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{NavEntry, PageLayout};

    fn offsets() -> Vec<SectionOffset<'static>> {
        vec![
            SectionOffset { id: "prompt", top: 100.0 },
            SectionOffset { id: "tasks", top: 600.0 },
            SectionOffset { id: "plan", top: 1200.0 },
        ]
    }

    #[test]
    fn nothing_qualifies_above_first_threshold() {
        assert_eq!(compute_active_section(&[SectionOffset { id: "a", top: 500.0 }], 0.0, 200.0), None);
    }

    #[test]
    fn exact_threshold_qualifies() {
        assert_eq!(compute_active_section(&offsets(), 400.0, 200.0), Some("tasks"));
        assert_eq!(compute_active_section(&offsets(), 399.0, 200.0), Some("prompt"));
    }

    #[test]
    fn later_section_wins_ties() {
        let tied = [SectionOffset { id: "a", top: 300.0 }, SectionOffset { id: "b", top: 300.0 }];
        assert_eq!(compute_active_section(&tied, 100.0, 200.0), Some("b"));

        // Priority order, not document order, decides
        let out_of_order = [SectionOffset { id: "late", top: 900.0 }, SectionOffset { id: "early", top: 100.0 }];
        assert_eq!(compute_active_section(&out_of_order, 1000.0, 200.0), Some("early"));
    }

    fn nav_page() -> Page {
        let mut page = Page::default();
        page.sections = vec!["prompt".into(), "tasks".into()];
        page.nav = vec![
            NavEntry { href: "#prompt".into(), active: true },
            NavEntry { href: "#tasks".into(), active: false },
            NavEntry { href: "page.html#tasks".into(), active: false },
        ];
        let mut layout = PageLayout::default();
        layout.section_tops.insert("prompt".into(), 100.0);
        layout.section_tops.insert("tasks".into(), 800.0);
        page.set_layout(layout);
        page
    }

    #[test]
    fn on_scroll_marks_every_matching_entry() {
        let mut page = nav_page();
        let spy = ScrollSpy::new(vec!["prompt".into(), "tasks".into(), "plan".into()], 200.0);
        page.scroll_to(0.0, 650.0);
        assert_eq!(spy.on_scroll(&mut page).as_deref(), Some("tasks"));
        assert_eq!(page.active_nav_targets(), vec!["tasks", "tasks"]);
    }

    #[test]
    fn on_scroll_clears_everything_when_nothing_qualifies() {
        let mut page = nav_page();
        let spy = ScrollSpy::new(vec!["tasks".into()], 200.0);
        page.scroll_to(0.0, 0.0);
        assert_eq!(spy.on_scroll(&mut page), None);
        assert!(page.active_nav_targets().is_empty());
    }
}
