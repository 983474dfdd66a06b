//! [`Document`] over the live DOM.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::page::Document;

/// The page document. Cheap to clone; every clone refers to the same DOM.
#[derive(Clone, Debug)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    pub fn inner(&self) -> &web_sys::Document {
        &self.document
    }

    pub fn is_hidden(&self) -> bool {
        self.document.hidden()
    }
}

impl Document for WebDocument {
    type Element = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn tag_name(&self, element: &Element) -> String {
        element.tag_name().to_ascii_uppercase()
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&self, element: &Element, class: &str) {
        if let Err(e) = element.class_list().add_1(class) {
            log::warn!("classList.add({}) failed: {:?}", class, e);
        }
    }

    fn remove_class(&self, element: &Element, class: &str) {
        if let Err(e) = element.class_list().remove_1(class) {
            log::warn!("classList.remove({}) failed: {:?}", class, e);
        }
    }

    fn toggle_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().toggle(class).unwrap_or_else(|e| {
            log::warn!("classList.toggle({}) failed: {:?}", class, e);
            self.has_class(element, class)
        })
    }

    fn style(&self, element: &Element, property: &str) -> Option<String> {
        let value = element
            .dyn_ref::<HtmlElement>()?
            .style()
            .get_property_value(property)
            .ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            if let Err(e) = html.style().set_property(property, value) {
                log::warn!("style {}: {} rejected: {:?}", property, value, e);
            }
        }
    }

    fn clear_style(&self, element: &Element, property: &str) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            let _ = html.style().remove_property(property);
        }
    }

    fn set_text(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn scroll_into_view(&self, element: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }
}
