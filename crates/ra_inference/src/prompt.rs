use ra_core::text::truncate_chars;
use ra_core::{Article, SummarizerConfig};

/// Prompt asking for a listenable summary of `article`, with the article
/// text capped at `max_input_chars` characters.
pub fn build_prompt(article: &Article, config: &SummarizerConfig) -> String {
    let text = truncate_chars(&article.text(), config.max_input_chars);
    let body = if text.is_empty() {
        "(No article text is available. Say in one or two sentences what the title suggests the piece is about.)".to_string()
    } else {
        text
    };

    format!(
        "Summarize this article in about {words} words for someone who will listen to it \
         rather than read it. Write plain, flowing sentences with no markdown, lists, headings \
         or preamble, and start directly with the substance.\n\n\
         Title: {title}\nSource: {source}\n\nContent:\n{body}",
        words = config.target_words,
        title = article.display_title(),
        source = article.source_label(),
        body = body,
    )
}
