//! Page behaviours around the backdrop: navigation, anchors, reveal,
//! category tabs and the footer year.
//!
//! Each behaviour is written against [`Document`] and returns what the
//! host binding needs to finish the job (elements to observe, delays to
//! wake up at, whether to suppress a default action).

mod document;
pub mod nav;
pub mod reveal;
pub mod scroll;
pub mod tabs;
pub mod timeline;
pub mod year;

pub use document::Document;
pub use nav::NavToggle;
pub use reveal::{RevealVariant, ScrollReveal};
pub use scroll::{anchor_links, on_anchor_click, AnchorClick};
pub use tabs::{CategoryTabs, SlideDirection};
pub use timeline::Timeline;
pub use year::{current_year, stamp_year};

/// Id of the canvas the backdrop draws into.
pub const BACKDROP_CANVAS_ID: &str = "bg-particles";
