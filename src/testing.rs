//! In-memory stand-ins for the host, the drawing surface and the DOM.
//!
//! These drive the animator and the page behaviours without a browser or
//! a window, with a manual clock so timing can be stepped exactly.

use crate::host::{FrameHandle, Host, TimerHandle, Viewport};
use crate::page::Document;
use crate::surface::Surface;
use crate::visuals::Rgba;
use glam::{UVec2, Vec2};
use std::cell::RefCell;
use std::time::Duration;

// ============================================================================
// Host
// ============================================================================

/// A host whose clock only moves when [`ManualHost::advance`] is called.
///
/// Frames are never fired automatically; tests pull them with
/// [`ManualHost::take_frame`] and hand them to the animator.
#[derive(Debug)]
pub struct ManualHost {
    viewport: Viewport,
    reduced_motion: bool,
    now: Duration,
    next_handle: u32,
    frames: Vec<FrameHandle>,
    frames_requested: usize,
    timers: Vec<(Duration, TimerHandle)>,
}

impl ManualHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height, 1.0),
            reduced_motion: false,
            now: Duration::ZERO,
            next_handle: 1,
            frames: Vec::new(),
            frames_requested: 0,
            timers: Vec::new(),
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.viewport.device_pixel_ratio = ratio;
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Frames requested and not yet taken or cancelled, oldest first.
    pub fn pending_frames(&self) -> &[FrameHandle] {
        &self.frames
    }

    /// Total number of frame requests ever made.
    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    /// Fire the oldest pending frame, returning its handle.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and return the timers that fired, in the
    /// order they became due.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        self.now += dt;
        let now = self.now;
        let mut fired: Vec<(Duration, TimerHandle)> =
            self.timers.iter().copied().filter(|(due, _)| *due <= now).collect();
        self.timers.retain(|(due, _)| *due > now);
        fired.sort_by_key(|(due, handle)| (*due, handle.0));
        fired.into_iter().map(|(_, handle)| handle).collect()
    }

    fn next(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }
}

impl Host for ManualHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next());
        self.frames.push(handle);
        self.frames_requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|h| *h != handle);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next());
        self.timers.push((self.now + delay, handle));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|(_, h)| *h != handle);
    }
}

// ============================================================================
// Surface
// ============================================================================

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Resize { backing: UVec2, css: UVec2 },
    Transform(f32),
    Clear { width: f32, height: f32 },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    Circle { center: Vec2, radius: f32, color: Rgba },
    Present,
}

/// Records every drawing call instead of rasterising.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn frames_presented(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Present))
            .count()
    }

    pub fn is_untouched(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, backing: UVec2, css: UVec2) {
        self.commands.push(DrawCommand::Resize { backing, css });
    }

    fn set_transform(&mut self, scale: f32) {
        self.commands.push(DrawCommand::Transform(scale));
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}

// ============================================================================
// Document
// ============================================================================

/// Index of a node inside a [`MemoryDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    text: Option<String>,
    scrolls: usize,
}

/// A flat list of elements in document order.
///
/// Selectors are limited to one compound selector: an optional tag
/// followed by any mix of `#id`, `.class`, `[attr]`, `[attr="v"]` and
/// `[attr^="v"]`. Anything else matches nothing.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: RefCell<Vec<Node>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element; `id` is an ordinary attribute.
    pub fn insert(&self, tag: &str, classes: &[&str], attributes: &[(&str, &str)]) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Node::default()
        });
        NodeId(nodes.len() - 1)
    }

    pub fn classes(&self, id: NodeId) -> Vec<String> {
        self.read(id, |n| n.classes.clone()).unwrap_or_default()
    }

    pub fn text(&self, id: NodeId) -> Option<String> {
        self.read(id, |n| n.text.clone()).flatten()
    }

    /// How many times the element was scrolled into view.
    pub fn scroll_count(&self, id: NodeId) -> usize {
        self.read(id, |n| n.scrolls).unwrap_or(0)
    }

    fn read<T>(&self, id: NodeId, f: impl FnOnce(&Node) -> T) -> Option<T> {
        self.nodes.borrow().get(id.0).map(f)
    }

    fn write(&self, id: NodeId, f: impl FnOnce(&mut Node)) {
        if let Some(node) = self.nodes.borrow_mut().get_mut(id.0) {
            f(node);
        }
    }

    fn matching(&self, selector: &str) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, node)| selector.matches(node))
            .map(|(i, _)| NodeId(i))
            .collect()
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.matching(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.matching(selector)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.read(*element, |n| attribute(n, name).map(str::to_string))
            .flatten()
    }

    fn tag_name(&self, element: &NodeId) -> String {
        self.read(*element, |n| n.tag.to_ascii_uppercase())
            .unwrap_or_default()
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.read(*element, |n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&self, element: &NodeId, class: &str) {
        self.write(*element, |n| {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, element: &NodeId, class: &str) {
        self.write(*element, |n| n.classes.retain(|c| c != class));
    }

    fn toggle_class(&self, element: &NodeId, class: &str) -> bool {
        if self.has_class(element, class) {
            self.remove_class(element, class);
            false
        } else {
            self.add_class(element, class);
            self.has_class(element, class)
        }
    }

    fn style(&self, element: &NodeId, property: &str) -> Option<String> {
        self.read(*element, |n| {
            n.styles
                .iter()
                .find(|(p, _)| p == property)
                .map(|(_, v)| v.clone())
        })
        .flatten()
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) {
        self.write(*element, |n| {
            match n.styles.iter_mut().find(|(p, _)| p == property) {
                Some(entry) => entry.1 = value.to_string(),
                None => n.styles.push((property.to_string(), value.to_string())),
            }
        });
    }

    fn clear_style(&self, element: &NodeId, property: &str) {
        self.write(*element, |n| n.styles.retain(|(p, _)| p != property));
    }

    fn set_text(&self, element: &NodeId, text: &str) {
        self.write(*element, |n| n.text = Some(text.to_string()));
    }

    fn scroll_into_view(&self, element: &NodeId) {
        self.write(*element, |n| n.scrolls += 1);
    }
}

fn attribute<'a>(node: &'a Node, name: &str) -> Option<&'a str> {
    node.attributes
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

#[derive(Debug)]
enum AttrMatch {
    Present(String),
    Equals(String, String),
    Prefix(String, String),
}

#[derive(Debug, Default)]
struct Selector {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<AttrMatch>,
}

impl Selector {
    fn parse(source: &str) -> Option<Self> {
        let mut rest = source.trim();
        if rest.is_empty() {
            return None;
        }
        let mut selector = Selector::default();

        let tag_len = ident_len(rest);
        if tag_len > 0 {
            selector.tag = Some(rest[..tag_len].to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while let Some(c) = rest.chars().next() {
            match c {
                '#' | '.' => {
                    let len = ident_len(&rest[1..]);
                    if len == 0 {
                        return None;
                    }
                    let name = rest[1..1 + len].to_string();
                    if c == '#' {
                        selector.ids.push(name);
                    } else {
                        selector.classes.push(name);
                    }
                    rest = &rest[1 + len..];
                }
                '[' => {
                    let end = rest.find(']')?;
                    selector.attributes.push(parse_attr(&rest[1..end])?);
                    rest = &rest[end + 1..];
                }
                _ => return None,
            }
        }
        Some(selector)
    }

    fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != node.tag {
                return false;
            }
        }
        let ids_ok = self
            .ids
            .iter()
            .all(|id| attribute(node, "id") == Some(id.as_str()));
        let classes_ok = self
            .classes
            .iter()
            .all(|class| node.classes.iter().any(|c| c == class));
        let attrs_ok = self.attributes.iter().all(|m| match m {
            AttrMatch::Present(name) => attribute(node, name).is_some(),
            AttrMatch::Equals(name, value) => attribute(node, name) == Some(value.as_str()),
            AttrMatch::Prefix(name, value) => {
                attribute(node, name).is_some_and(|v| v.starts_with(value.as_str()))
            }
        });
        ids_ok && classes_ok && attrs_ok
    }
}

fn ident_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len())
}

fn parse_attr(body: &str) -> Option<AttrMatch> {
    if let Some((name, value)) = body.split_once("^=") {
        return Some(AttrMatch::Prefix(attr_name(name)?, unquote(value)?));
    }
    if let Some((name, value)) = body.split_once('=') {
        return Some(AttrMatch::Equals(attr_name(name)?, unquote(value)?));
    }
    Some(AttrMatch::Present(attr_name(body)?))
}

fn attr_name(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty() && ident_len(name) == name.len()).then(|| name.to_string())
}

fn unquote(value: &str) -> Option<String> {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return Some(inner.to_string());
        }
    }
    attr_name(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_cover_page_lookups() {
        let doc = MemoryDocument::new();
        let a = doc.insert("a", &["link"], &[("href", "#about")]);
        let panel = doc.insert("div", &["project-category", "active"], &[]);
        let year = doc.insert("span", &[], &[("id", "year")]);

        assert_eq!(doc.query(r##"a[href^="#"]"##), Some(a));
        assert_eq!(doc.query(".project-category.active"), Some(panel));
        assert_eq!(doc.query("#year"), Some(year));
        assert_eq!(doc.query("a[href='#about']"), Some(a));
        assert_eq!(doc.query("#"), None);
        assert_eq!(doc.query("div > a"), None);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut host = ManualHost::new(10.0, 10.0);
        let keep = host.set_timeout(Duration::from_millis(20));
        let drop = host.set_timeout(Duration::from_millis(10));
        host.clear_timeout(drop);
        assert_eq!(host.advance(Duration::from_millis(30)), vec![keep]);
    }
}
