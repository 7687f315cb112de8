//! Plain-text helpers for rendering feed descriptions into comment blocks.

use scraper::Html;

/// Extract plain text from HTML content, keeping paragraph breaks
pub fn strip_tags(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "div" | "li" | "h1" | "h2" | "h3" | "h4" | "blockquote" => {
                    text.push_str("\n\n")
                }
                "br" => text.push('\n'),
                _ => {}
            }
        }
        if let Some(text_node) = node.value().as_text() {
            text.push_str(text_node);
        }
    }

    text.trim().to_string()
}

/// Truncate to at most `max_chars` characters, marking the cut with "..."
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

/// Word-wrap `text` into lines of at most `width` columns, each starting with
/// `prefix`. Blank-line separated paragraphs are kept apart by a bare prefix line.
pub fn wrap_with_prefix(text: &str, prefix: &str, width: usize) -> Vec<String> {
    let budget = width.saturating_sub(prefix.chars().count()).max(1);
    let mut lines = Vec::new();

    for paragraph in paragraphs(text) {
        if !lines.is_empty() {
            lines.push(prefix.trim_end().to_string());
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > budget && !current.is_empty() {
                lines.push(format!("{}{}", prefix, current));
                current.clear();
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(format!("{}{}", prefix, current));
        }
    }

    lines
}

fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.trim().is_empty() {
                out.push(std::mem::take(&mut current));
            }
            current.clear();
        } else {
            current.push(' ');
            current.push_str(line);
        }
    }
    if !current.trim().is_empty() {
        out.push(current);
    }

    out
}
