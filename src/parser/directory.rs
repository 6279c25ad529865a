//! Name directory extraction
//!
//! The directory page exposes one `.list_alphabet_item` entry per
//! letter, each wrapping an anchor to that letter's listing of
//! `.position_title` person names.

use lazy_static::lazy_static;
use scraper::Html;
use scraper::Selector;

use crate::parser::parse_selector;

lazy_static! {
    static ref LETTER_LINK: Selector = parse_selector!(".list_alphabet_item a");
    static ref NAME_ENTRY: Selector = parse_selector!(".position_title");
}

/// Extract the per-letter page links from the alphabet index
///
/// Hrefs are returned as written in the markup; the caller resolves
/// relative links against the directory URL.
pub fn letter_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&LETTER_LINK)
        .filter_map(|anchor| anchor.value().attr("href").map(str::to_string))
        .collect()
}

/// Extract person names from a letter page, in document order
pub fn person_names(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&NAME_ENTRY)
        .map(|entry| entry.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_links() {
        let html = r#"
            <ul>
                <li class="list_alphabet_item"><a href="/heroes?letter=А">А</a></li>
                <li class="list_alphabet_item"><a href="/heroes?letter=Б">Б</a></li>
                <li class="list_alphabet_item"><span>no anchor</span></li>
            </ul>"#;

        let links = letter_links(html);
        assert_eq!(links, vec!["/heroes?letter=А", "/heroes?letter=Б"]);
    }

    #[test]
    fn test_person_names_trimmed() {
        let html = r#"
            <div class="position_title">  Иванов Иван Иванович </div>
            <div class="position_title">Петров Пётр</div>
            <div class="position_title">   </div>"#;

        let names = person_names(html);
        assert_eq!(names, vec!["Иванов Иван Иванович", "Петров Пётр"]);
    }

    #[test]
    fn test_empty_page() {
        assert!(letter_links("<html></html>").is_empty());
        assert!(person_names("<html></html>").is_empty());
    }
}
