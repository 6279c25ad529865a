//! HTML parsing for the photo grid and the name directory
//!
//! The browsing session hands back the rendered document; these parsers
//! pull out the pieces the engine cares about. Selectors are compiled
//! once and shared.

pub mod directory;
pub mod listing;

// Helper macro to parse selectors safely at startup
macro_rules! parse_selector {
    ($s:expr) => {
        scraper::Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}
pub(crate) use parse_selector;

pub use directory::{letter_links, person_names};
pub use listing::photo_ids;
