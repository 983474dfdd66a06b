//! Smooth scrolling for same-page anchors.

use super::Document;

/// Anchors whose `href` is a fragment.
pub const ANCHOR_LINKS: &str = r##"a[href^="#"]"##;

/// What the browser should do with the click after the handler ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorClick {
    /// Let the default navigation happen (bare `#`).
    Default,
    /// Default navigation must be suppressed.
    Handled,
}

pub fn anchor_links<D: Document>(doc: &D) -> Vec<D::Element> {
    doc.query_all(ANCHOR_LINKS)
}

/// Handle a click on a fragment anchor.
///
/// Any fragment longer than `#` suppresses the jump; if it names an
/// element, that element is scrolled smoothly to the top of the viewport.
pub fn on_anchor_click<D: Document>(doc: &D, anchor: &D::Element) -> AnchorClick {
    let Some(href) = doc.attribute(anchor, "href") else {
        return AnchorClick::Default;
    };
    if href.len() <= 1 {
        return AnchorClick::Default;
    }
    match doc.query(&href) {
        Some(target) => doc.scroll_into_view(&target),
        None => log::debug!("anchor target {} not found", href),
    }
    AnchorClick::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryDocument;

    #[test]
    fn bare_hash_keeps_default() {
        let doc = MemoryDocument::new();
        let a = doc.insert("a", &[], &[("href", "#")]);
        assert_eq!(on_anchor_click(&doc, &a), AnchorClick::Default);
    }

    #[test]
    fn fragment_scrolls_target() {
        let doc = MemoryDocument::new();
        let a = doc.insert("a", &[], &[("href", "#work")]);
        let section = doc.insert("section", &[], &[("id", "work")]);
        assert_eq!(on_anchor_click(&doc, &a), AnchorClick::Handled);
        assert_eq!(doc.scroll_count(section), 1);
    }

    #[test]
    fn missing_target_still_suppresses_jump() {
        let doc = MemoryDocument::new();
        let a = doc.insert("a", &[], &[("href", "#nowhere")]);
        assert_eq!(on_anchor_click(&doc, &a), AnchorClick::Handled);
    }

    #[test]
    fn only_fragment_links_are_bound() {
        let doc = MemoryDocument::new();
        let inner = doc.insert("a", &[], &[("href", "#top")]);
        doc.insert("a", &[], &[("href", "https://example.com")]);
        assert_eq!(anchor_links(&doc), vec![inner]);
    }
}
