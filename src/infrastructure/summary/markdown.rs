//! Markdown to plain text

use pulldown_cmark::{Event, Parser, Tag};

/// Flatten markdown into plain prose: markup, link targets and images are
/// dropped, block elements end up on their own lines.
pub fn flatten_markdown(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::Start(Tag::Paragraph)
            | Event::Start(Tag::Heading(..))
            | Event::Start(Tag::CodeBlock(_))
            | Event::Start(Tag::BlockQuote) => break_line(&mut text),
            Event::Start(Tag::Item) => {
                break_line(&mut text);
                text.push_str("- ");
            }
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::CodeBlock(_))
            | Event::End(Tag::Item) => break_line(&mut text),
            Event::Rule => break_line(&mut text),
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn break_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_inline_markup() {
        let text = flatten_markdown("**bold**, *italic* and `code`");
        assert_eq!(text, "bold, italic and code");
    }

    #[test]
    fn test_headings_and_paragraphs_on_own_lines() {
        let text = flatten_markdown("# Title\n\nFirst paragraph\nwraps here.\n\n## Next\n\nMore.");
        assert_eq!(text, "Title\nFirst paragraph wraps here.\nNext\nMore.");
    }

    #[test]
    fn test_links_keep_label_only() {
        let text = flatten_markdown("See [the docs](https://example.com/docs) and ![logo](a.png).");
        assert_eq!(text, "See the docs and logo.");
    }

    #[test]
    fn test_lists() {
        let text = flatten_markdown("- one\n- two");
        assert_eq!(text, "- one\n- two");
    }

    #[test]
    fn test_code_block_content_kept() {
        let text = flatten_markdown("Intro\n\n```rust\nlet x = 1;\n```");
        assert_eq!(text, "Intro\nlet x = 1;");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(flatten_markdown("Just words."), "Just words.");
        assert_eq!(flatten_markdown(""), "");
    }
}
