//! Photo grid extraction
//!
//! The listing renders one `.main__photo-item` element per record, each
//! carrying the record identifier in its `data-id` attribute. While the
//! surface is still loading it can yield an item without the attribute;
//! that null sentinel is surfaced as `None` so the collector can track
//! it for stability detection without ever persisting it.

use lazy_static::lazy_static;
use scraper::Html;
use scraper::Selector;

use crate::parser::parse_selector;

lazy_static! {
    static ref PHOTO_ITEM: Selector = parse_selector!(".main__photo-item");
}

/// Extract the record identifier of every rendered photo item
///
/// Returns one entry per item element, in document order; an item
/// without a `data-id` attribute yields `None`.
pub fn photo_ids(html: &str) -> Vec<Option<String>> {
    let document = Html::parse_document(html);

    document
        .select(&PHOTO_ITEM)
        .map(|item| item.value().attr("data-id").map(str::to_string))
        .collect()
}
