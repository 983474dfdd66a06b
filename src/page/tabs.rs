//! Category tabs with slide transitions.
//!
//! Selecting a tab slides the current panel out, then brings the chosen
//! panel in from the right:
//!
//! ```text
//! t = 0            old panel gets slide-out-left / slide-out-right
//! t = 400ms        old panel hidden; new panel shown at translateX(100px), opacity 0
//! t = 400ms + 2f   new panel animates to translateX(0), opacity 1
//! t = +600ms       inline transform / opacity cleared
//! ```
//!
//! The deferred steps live in a [`Timeline`]; the host wakes the switcher
//! at the delays returned by [`CategoryTabs::select`] and calls
//! [`CategoryTabs::advance`].

use super::timeline::Timeline;
use super::Document;
use std::time::Duration;

pub const CATEGORY_TABS: &str = ".category-tab";
pub const CATEGORY_PANELS: &str = ".project-category";
pub const ACTIVE_PANEL: &str = ".project-category.active";
pub const CATEGORY_ATTR: &str = "data-category";
pub const ACTIVE_CLASS: &str = "active";

/// How long the outgoing panel slides before it is hidden.
pub const SLIDE_OUT: Duration = Duration::from_millis(400);
/// Two display frames: lets the browser commit the off-screen start
/// position before the transition to rest begins.
pub const SETTLE_DELAY: Duration = Duration::from_millis(32);
/// Time the incoming transition runs before inline overrides are removed.
pub const CLEANUP_DELAY: Duration = Duration::from_millis(600);

const ENTER_TRANSFORM: &str = "translateX(100px)";
const REST_TRANSFORM: &str = "translateX(0)";

/// Which way the outgoing panel leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    /// A later category was chosen.
    Left,
    /// An earlier category was chosen.
    Right,
}

impl SlideDirection {
    pub fn class(&self) -> &'static str {
        match self {
            SlideDirection::Left => "slide-out-left",
            SlideDirection::Right => "slide-out-right",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum TabStep<E> {
    /// Hide the outgoing panel.
    Retire(E),
    /// Show the incoming panel at its off-screen start.
    Enter(E),
    /// Move the incoming panel to rest.
    Settle(E),
    /// Drop the inline overrides on the incoming panel.
    Cleanup(E),
}

/// Tab buttons, their panels, and any transition in flight.
#[derive(Debug)]
pub struct CategoryTabs<E> {
    tabs: Vec<E>,
    panels: Vec<E>,
    timeline: Timeline<TabStep<E>>,
}

impl<E: Clone + PartialEq> CategoryTabs<E> {
    pub fn install<D: Document<Element = E>>(doc: &D) -> Self {
        Self {
            tabs: doc.query_all(CATEGORY_TABS),
            panels: doc.query_all(CATEGORY_PANELS),
            timeline: Timeline::new(),
        }
    }

    pub fn tabs(&self) -> &[E] {
        &self.tabs
    }

    pub fn panels(&self) -> &[E] {
        &self.panels
    }

    pub fn is_transitioning(&self) -> bool {
        !self.timeline.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeline.next_deadline()
    }

    /// Pin the panel marked active in the markup to its visible rest state.
    /// Runs once the document is ready.
    pub fn show_initial<D: Document<Element = E>>(&self, doc: &D) {
        if let Some(panel) = doc.query(ACTIVE_PANEL) {
            doc.set_style(&panel, "display", "block");
            doc.set_style(&panel, "opacity", "1");
            doc.set_style(&panel, "transform", REST_TRANSFORM);
        }
    }

    /// A tab was clicked at page time `now`.
    ///
    /// Returns the delays, relative to `now`, at which the host should call
    /// [`CategoryTabs::advance`]. Empty when nothing was scheduled. A
    /// transition still in flight is completed immediately first.
    pub fn select<D: Document<Element = E>>(
        &mut self,
        doc: &D,
        tab: &E,
        now: Duration,
    ) -> Vec<Duration> {
        self.flush(doc);

        for t in &self.tabs {
            doc.remove_class(t, ACTIVE_CLASS);
        }
        doc.add_class(tab, ACTIVE_CLASS);

        let Some(current) = self.panels.iter().position(|p| doc.has_class(p, ACTIVE_CLASS)) else {
            return Vec::new();
        };
        let key = doc.attribute(tab, CATEGORY_ATTR);
        let Some(target) = self
            .panels
            .iter()
            .position(|p| key.is_some() && doc.attribute(p, CATEGORY_ATTR) == key)
        else {
            log::debug!("no panel for category {:?}", key);
            return Vec::new();
        };
        if target == current {
            return Vec::new();
        }

        let direction = if target > current {
            SlideDirection::Left
        } else {
            SlideDirection::Right
        };
        let outgoing = self.panels[current].clone();
        let incoming = self.panels[target].clone();
        doc.add_class(&outgoing, direction.class());

        let enter_at = SLIDE_OUT;
        let settle_at = enter_at + SETTLE_DELAY;
        let cleanup_at = settle_at + CLEANUP_DELAY;
        self.timeline.schedule(now + enter_at, TabStep::Retire(outgoing));
        self.timeline.schedule(now + enter_at, TabStep::Enter(incoming.clone()));
        self.timeline.schedule(now + settle_at, TabStep::Settle(incoming.clone()));
        self.timeline.schedule(now + cleanup_at, TabStep::Cleanup(incoming));

        vec![enter_at, settle_at, cleanup_at]
    }

    /// Apply every step due at page time `now`.
    pub fn advance<D: Document<Element = E>>(&mut self, doc: &D, now: Duration) {
        for step in self.timeline.due(now) {
            apply(doc, step);
        }
    }

    /// Apply every pending step at once.
    pub fn flush<D: Document<Element = E>>(&mut self, doc: &D) {
        for step in self.timeline.drain_all() {
            apply(doc, step);
        }
    }
}

fn apply<D: Document>(doc: &D, step: TabStep<D::Element>) {
    match step {
        TabStep::Retire(panel) => {
            doc.remove_class(&panel, ACTIVE_CLASS);
            doc.remove_class(&panel, SlideDirection::Left.class());
            doc.remove_class(&panel, SlideDirection::Right.class());
            doc.set_style(&panel, "display", "none");
        }
        TabStep::Enter(panel) => {
            doc.set_style(&panel, "display", "block");
            doc.set_style(&panel, "transform", ENTER_TRANSFORM);
            doc.set_style(&panel, "opacity", "0");
            doc.add_class(&panel, ACTIVE_CLASS);
        }
        TabStep::Settle(panel) => {
            doc.set_style(&panel, "transform", REST_TRANSFORM);
            doc.set_style(&panel, "opacity", "1");
        }
        TabStep::Cleanup(panel) => {
            doc.clear_style(&panel, "transform");
            doc.clear_style(&panel, "opacity");
        }
    }
}
