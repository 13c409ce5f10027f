//! Build a [`Page`] from the presentation's HTML shell.

use super::{Card, ContentOrigin, ControlView, ConnectorView, DisplayArea, ModalView, NavEntry, Page};
use crate::{Error, Result};
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::RenderError(format!("bad selector {}: {:?}", css, e)))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn enclosing<'a>(el: ElementRef<'a>, pred: impl Fn(&ElementRef<'a>) -> bool) -> Option<ElementRef<'a>> {
    el.ancestors().filter_map(ElementRef::wrap).find(|e| pred(e))
}

fn by_id<'a>(document: &'a Html, id: &str) -> Result<Option<ElementRef<'a>>> {
    Ok(document.select(&selector(&format!("#{}", id))?).next())
}

fn card_title(card: ElementRef<'_>, title_sel: &Selector) -> String {
    card.select(title_sel).next().map(text_of).unwrap_or_default()
}

/// Parse `html` into a page model.
///
/// `area_ids` are the ids of the elements section content is rendered into.
/// Ids that do not appear in the document are skipped; loading them later is
/// a silent no-op.
pub fn parse_page<S: AsRef<str>>(html: &str, area_ids: &[S]) -> Result<Page> {
    let document = Html::parse_document(html);

    let title_sel = selector("title")?;
    let section_sel = selector("section[id]")?;
    let card_sel = selector(".card")?;
    let card_title_sel = selector(".card-title")?;
    let nav_sel = selector(".nav-link")?;

    let title = document.select(&title_sel).next().map(text_of).unwrap_or_default();

    let sections = document
        .select(&section_sel)
        .filter_map(|s| s.value().attr("id").map(str::to_string))
        .collect();

    let mut areas = Vec::new();
    for id in area_ids {
        let id = id.as_ref();
        let sel = selector(&format!("[id=\"{}\"]", id))?;
        let Some(el) = document.select(&sel).next() else {
            log::debug!("display area #{} not found in page", id);
            continue;
        };
        let card = enclosing(el, |e| has_class(e, "card"));
        areas.push(DisplayArea {
            id: id.to_string(),
            card_title: card.map(|c| card_title(c, &card_title_sel)),
            inner_html: el.inner_html(),
            full_content: el.value().attr("data-full-content").map(str::to_string),
            origin: ContentOrigin::Placeholder,
        });
    }

    let cards = document
        .select(&card_sel)
        .map(|card| {
            let section_id = enclosing(card, |e| e.value().name() == "section")
                .and_then(|s| s.value().attr("id"))
                .map(str::to_string);
            let area_id = areas
                .iter()
                .find(|a| {
                    selector(&format!("[id=\"{}\"]", a.id))
                        .map(|sel| card.select(&sel).next().is_some())
                        .unwrap_or(false)
                })
                .map(|a| a.id.clone());
            Card {
                section_id,
                title: card_title(card, &card_title_sel),
                area_id,
            }
        })
        .collect();

    let nav = document
        .select(&nav_sel)
        .map(|link| NavEntry {
            href: link.value().attr("href").unwrap_or_default().to_string(),
            active: has_class(&link, "active"),
        })
        .collect();

    let modal = match (by_id(&document, "markdown-modal")?, by_id(&document, "modal-title-text")?, by_id(&document, "modal-body")?) {
        (Some(modal), Some(title), Some(body)) => {
            let open = has_class(&modal, "open");
            Some(ModalView {
                title: text_of(title),
                body_html: body.inner_html(),
                open,
                aria_hidden: modal.value().attr("aria-hidden") != Some("false"),
            })
        }
        _ => None,
    };

    let connector = match (by_id(&document, "circuit-svg")?, by_id(&document, "circuit-path")?) {
        (Some(svg), Some(path)) => {
            let dim = |name: &str| svg.value().attr(name).and_then(|v| v.parse().ok()).unwrap_or(0.0);
            Some(ConnectorView {
                width: dim("width"),
                height: dim("height"),
                d: path.value().attr("d").unwrap_or_default().to_string(),
            })
        }
        _ => None,
    };

    let launch_control = document.select(&selector(".btn-primary")?).next().map(|btn| ControlView {
        label_html: btn.inner_html(),
        disabled: btn.value().attr("disabled").is_some(),
    });

    Ok(Page {
        title,
        areas,
        sections,
        nav,
        cards,
        modal,
        connector,
        launch_control,
        ..Default::default()
    })
}
