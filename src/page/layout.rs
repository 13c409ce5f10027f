/// Block layout estimate for the presentation page

use super::Page;
use crate::Viewport;
use std::collections::HashMap;

/// Fixed header band above the first card.
const HEADER_HEIGHT: f64 = 120.0;
const CARD_MARGIN: f64 = 48.0;
const CARD_PADDING: f64 = 24.0;
const TITLE_HEIGHT: f64 = 32.0;
const LINE_HEIGHT: f64 = 16.0;
const CHAR_WIDTH: f64 = 8.0;
/// Collapsed previews never grow past this many lines.
const PREVIEW_MAX_LINES: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Element geometry in page coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub body_width: f64,
    pub body_height: f64,
    /// `offsetTop` per section id
    pub section_tops: HashMap<String, f64>,
    /// One rect per card, in document order
    pub cards: Vec<Rect>,
}

/// Count wrapped lines for `text` in a column `width` pixels wide.
fn wrapped_lines(text: &str, width: f64) -> usize {
    let chars_per_line = ((width / CHAR_WIDTH) as usize).max(1);
    let mut lines = 0usize;
    for para in text.lines() {
        let mut cur = 0usize;
        let mut para_lines = 1usize;
        for word in para.split_whitespace() {
            let w = word.chars().count();
            if cur > 0 && cur + 1 + w > chars_per_line {
                para_lines += 1;
                cur = w;
            } else {
                cur += if cur > 0 { w + 1 } else { w };
            }
        }
        lines += para_lines;
    }
    lines.max(1)
}

/// Estimate a layout for `page` in `viewport`.
///
/// Cards are stacked vertically and alternate between the left and right
/// side of the page; a section starts where its first card starts. Card
/// height follows the collapsed preview of its display area.
pub fn layout_page(page: &Page, viewport: Viewport) -> PageLayout {
    let page_width = f64::from(viewport.width);
    let card_width = (page_width * 0.6).max(1.0);
    let content_width = (card_width - CARD_PADDING * 2.0).max(CHAR_WIDTH);

    let mut y = HEADER_HEIGHT;
    let mut section_tops = HashMap::new();
    let mut cards = Vec::with_capacity(page.cards.len());

    for (index, card) in page.cards.iter().enumerate() {
        if let Some(section) = &card.section_id {
            section_tops.entry(section.clone()).or_insert(y);
        }

        let lines = card
            .area_id
            .as_deref()
            .and_then(|id| page.area(id))
            .map(|a| wrapped_lines(&a.plain_text(), content_width))
            .unwrap_or(1)
            .min(PREVIEW_MAX_LINES);
        let height = CARD_PADDING * 2.0 + TITLE_HEIGHT + lines as f64 * LINE_HEIGHT;

        let x = if index % 2 == 0 {
            CARD_MARGIN.min(page_width)
        } else {
            (page_width - card_width - CARD_MARGIN).max(0.0)
        };
        cards.push(Rect { x, y, width: card_width, height });
        y += height + CARD_MARGIN;
    }

    // Sections without cards sit at the current bottom
    for id in &page.sections {
        section_tops.entry(id.clone()).or_insert(y);
    }

    PageLayout {
        body_width: page_width,
        body_height: y.max(f64::from(viewport.height)),
        section_tops,
        cards,
    }
}
