use crate::domain::{Channel, Item};
use crate::text::{strip_tags, truncate_chars, wrap_with_prefix};

pub const PARAGRAPH_WIDTH: usize = 82;
pub const DESCRIPTION_MAX_CHARS: usize = 600;

/// Render a feed and its in-scope items as a commented download script block.
///
/// The three `##` preface lines are always present. The channel block, item
/// headers and `wget` directives only appear when there is something to
/// download.
pub fn render_feed(channel: &Channel, items: &[&Item]) -> String {
    let mut lines = vec![
        format!("## {}", channel.title.trim()),
        format!("## URL: {}", channel.link.trim()),
        format!("## {}", channel.last_build_date.trim()),
    ];

    if !items.is_empty() {
        lines.push("##".to_string());
        lines.push(format!("# {}", channel.title.trim()));
        lines.push(format!("# {}", channel.link.trim()));
        lines.extend(describe(&channel.description));
        lines.push("##".to_string());
    }

    for item in items {
        lines.push(format!("# Title: {}", item.title.trim()));
        lines.push(format!("# PubDate: {}", item.pub_date.trim()));
        lines.push(format!("# GUID: {}", item.guid.trim()));
        lines.extend(describe(&item.description));
        lines.push("#".to_string());

        for enclosure in &item.enclosures {
            let directive = enclosure.directive();
            if directive.target.is_empty() {
                tracing::warn!(url = %enclosure.url, "enclosure URL has no usable file name");
            }
            lines.push(directive.to_string());
            lines.push("#".to_string());
        }
    }

    lines.push("#\n".to_string());
    lines.join("\n")
}

fn describe(html: &str) -> Vec<String> {
    let text = truncate_chars(&strip_tags(html), DESCRIPTION_MAX_CHARS);
    wrap_with_prefix(&text, "# ", PARAGRAPH_WIDTH)
}
