//! Connector: the decorative S-curve path linking card centers.

use crate::page::{Page, Rect};
use std::fmt::{self, Write as _};

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One cubic curve from the previous waypoint to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub control1: Point,
    pub control2: Point,
    pub to: Point,
}

impl CurveSegment {
    /// Curve from `from` to `to` with both control points on the vertical
    /// midpoint, each at its own endpoint's x.
    pub fn between(from: Point, to: Point) -> Self {
        let mid_y = from.y + (to.y - from.y) / 2.0;
        Self {
            control1: Point::new(from.x, mid_y),
            control2: Point::new(to.x, mid_y),
            to,
        }
    }
}

/// The full connector path. Always rebuilt as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    pub start: Point,
    pub segments: Vec<CurveSegment>,
}

impl ConnectorPath {
    /// Build a path through `centers`. Fewer than two centers give `None`.
    pub fn through(centers: &[Point]) -> Option<Self> {
        let (first, rest) = centers.split_first()?;
        if rest.is_empty() {
            return None;
        }
        let mut prev = *first;
        let segments = rest
            .iter()
            .map(|&to| {
                let seg = CurveSegment::between(prev, to);
                prev = to;
                seg
            })
            .collect();
        Some(Self { start: *first, segments })
    }

    /// Waypoints in order: the start then every segment end.
    pub fn waypoints(&self) -> Vec<Point> {
        std::iter::once(self.start).chain(self.segments.iter().map(|s| s.to)).collect()
    }

    /// SVG path data (`d` attribute).
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConnectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = String::new();
        write!(d, "M {} {} ", self.start.x, self.start.y)?;
        for s in &self.segments {
            write!(
                d,
                "C {} {}, {} {}, {} {} ",
                s.control1.x, s.control1.y, s.control2.x, s.control2.y, s.to.x, s.to.y
            )?;
        }
        f.write_str(&d)
    }
}

/// Center of a viewport-relative rect in page coordinates.
pub fn card_center(client_rect: &Rect, scroll_x: f64, scroll_y: f64) -> Point {
    let (cx, cy) = client_rect.center();
    Point::new(cx + scroll_x, cy + scroll_y)
}

/// Recompute the connector on `page`.
///
/// Does nothing when there are fewer than two cards or the page has no
/// connector element. Otherwise resizes the canvas to the body and replaces
/// the path data in one assignment.
pub fn recompute(page: &mut Page) -> Option<ConnectorPath> {
    let rects = page.card_client_rects();
    if rects.len() < 2 {
        return None;
    }
    let centers: Vec<Point> = rects
        .iter()
        .map(|r| card_center(r, page.scroll.x, page.scroll.y))
        .collect();
    let path = ConnectorPath::through(&centers)?;

    let (width, height) = (page.layout().body_width, page.layout().body_height);
    let Some(view) = page.connector.as_mut() else {
        log::debug!("connector element missing; skipping path update");
        return None;
    };
    view.width = width;
    view.height = height;
    view.d = path.to_svg();
    log::debug!("connector recomputed through {} cards", centers.len());
    Some(path)
}
