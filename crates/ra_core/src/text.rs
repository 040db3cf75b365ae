use scraper::Html;

/// Flattens an HTML fragment into whitespace-normalized text.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let raw = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    normalize_whitespace(&raw)
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
