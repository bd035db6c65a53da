//! Lecture index scraping.

use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Container holding the resource anchors of one lecture.
pub const RESOURCE_ITEM_SELECTOR: &str = "div.course-lecture-item-resource";

fn resource_items() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse(RESOURCE_ITEM_SELECTOR).expect("static selector"))
}

fn anchors() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("a").expect("static selector"))
}

/// Collects the `href` of every anchor inside each lecture resource item, in document order.
///
/// Anchors without an `href` are ignored. No filtering happens here; forum links are
/// dropped by the session.
pub fn extract_resource_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for item in document.select(resource_items()) {
        for anchor in item.select(anchors()) {
            if let Some(href) = anchor.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }
    links
}
