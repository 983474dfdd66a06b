//! The slice of the DOM the page behaviours touch.

/// Element lookup and presentation-state mutation.
///
/// Mirrors the browser DOM: every method takes `&self` because the
/// document is shared by every event handler. Absent elements come back
/// as `None`; mutations on detached elements are silently dropped.
pub trait Document {
    type Element: Clone + PartialEq;

    /// First element matching a CSS selector.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// Every element matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Upper-case tag name, e.g. `A`.
    fn tag_name(&self, element: &Self::Element) -> String;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    fn add_class(&self, element: &Self::Element, class: &str);

    fn remove_class(&self, element: &Self::Element, class: &str);

    /// Flip a class; returns whether it is now present.
    fn toggle_class(&self, element: &Self::Element, class: &str) -> bool;

    /// Inline style value, `None` when unset.
    fn style(&self, element: &Self::Element, property: &str) -> Option<String>;

    fn set_style(&self, element: &Self::Element, property: &str, value: &str);

    /// Remove an inline style so stylesheet rules apply again.
    fn clear_style(&self, element: &Self::Element, property: &str);

    fn set_text(&self, element: &Self::Element, text: &str);

    /// Smoothly scroll the viewport so the element's top edge is aligned
    /// with the top of the viewport.
    fn scroll_into_view(&self, element: &Self::Element);
}
