//! Footer copyright year.

use super::Document;
use chrono::Datelike;

pub const YEAR_SLOT: &str = "#year";

/// Current calendar year in the local time zone.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Write `year` into the footer slot. Returns `false` if the page has none.
pub fn stamp_year<D: Document>(doc: &D, year: i32) -> bool {
    match doc.query(YEAR_SLOT) {
        Some(slot) => {
            doc.set_text(&slot, &year.to_string());
            true
        }
        None => false,
    }
}
