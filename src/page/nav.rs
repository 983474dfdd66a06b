//! Mobile navigation toggle.

use super::Document;

pub const NAV_TOGGLE: &str = ".nav-toggle";
pub const NAV_LINKS: &str = ".nav-links";
pub const OPEN_CLASS: &str = "open";

/// The toggle button and the panel it opens.
#[derive(Clone, Debug)]
pub struct NavToggle<E> {
    toggle: E,
    panel: E,
}

impl<E: Clone + PartialEq> NavToggle<E> {
    /// Look up both elements; `None` if either is missing.
    pub fn install<D: Document<Element = E>>(doc: &D) -> Option<Self> {
        let toggle = doc.query(NAV_TOGGLE)?;
        let panel = doc.query(NAV_LINKS)?;
        Some(Self { toggle, panel })
    }

    pub fn toggle(&self) -> &E {
        &self.toggle
    }

    pub fn panel(&self) -> &E {
        &self.panel
    }

    pub fn is_open<D: Document<Element = E>>(&self, doc: &D) -> bool {
        doc.has_class(&self.panel, OPEN_CLASS)
    }

    /// Click on the toggle button. Returns whether the panel is now open.
    pub fn on_toggle_click<D: Document<Element = E>>(&self, doc: &D) -> bool {
        doc.toggle_class(&self.panel, OPEN_CLASS)
    }

    /// Click anywhere inside the panel; following a link closes it.
    pub fn on_panel_click<D: Document<Element = E>>(&self, doc: &D, target: &E) {
        if doc.tag_name(target).eq_ignore_ascii_case("a") {
            doc.remove_class(&self.panel, OPEN_CLASS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryDocument;

    #[test]
    fn missing_panel_skips_install() {
        let doc = MemoryDocument::new();
        doc.insert("button", &["nav-toggle"], &[]);
        assert!(NavToggle::install(&doc).is_none());
    }

    #[test]
    fn click_on_non_link_keeps_panel_open() {
        let doc = MemoryDocument::new();
        doc.insert("button", &["nav-toggle"], &[]);
        doc.insert("ul", &["nav-links"], &[]);
        let item = doc.insert("li", &[], &[]);
        let nav = NavToggle::install(&doc).unwrap();

        assert!(nav.on_toggle_click(&doc));
        nav.on_panel_click(&doc, &item);
        assert!(nav.is_open(&doc));
        assert!(!nav.on_toggle_click(&doc));
    }
}
