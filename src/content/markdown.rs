//! Live preview markdown rendering
//!
//! This is a small line/block rewriter, not a CommonMark parser. It handles
//! headings, emphasis, inline code, images, links and list items; code fences,
//! blockquotes and nesting come through as plain text. Output is inserted into
//! the preview as-is: the author is the only source of content.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Inline and line rules, applied in order
    static ref RULES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?m)^### (.+)$").unwrap(), "<h3>${1}</h3>"),
        (Regex::new(r"(?m)^## (.+)$").unwrap(), "<h2>${1}</h2>"),
        (Regex::new(r"\*\*(.+?)\*\*").unwrap(), "<strong>${1}</strong>"),
        (Regex::new(r"\*(.+?)\*").unwrap(), "<em>${1}</em>"),
        (Regex::new(r"`(.+?)`").unwrap(), "<code>${1}</code>"),
        (
            Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap(),
            r#"<img src="${2}" alt="${1}" />"#,
        ),
        (
            Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap(),
            r#"<a href="${2}" target="_blank">${1}</a>"#,
        ),
        (Regex::new(r"(?m)^- (.+)$").unwrap(), r#"<li class="list-disc">${1}</li>"#),
        (
            Regex::new(r"(?m)^(\d+)\. (.+)$").unwrap(),
            r#"<li class="list-decimal">${2}</li>"#,
        ),
    ];
}

/// Block prefixes that are never wrapped in a paragraph
const BLOCK_TAGS: [&str; 3] = ["<h", "<li", "<img"];

/// Render a post body to preview HTML
pub fn render_markdown(markdown: &str) -> String {
    let mut html = markdown.to_string();
    for (pattern, replacement) in RULES.iter() {
        html = pattern.replace_all(&html, *replacement).into_owned();
    }

    html.split("\n\n")
        .map(|block| {
            if BLOCK_TAGS.iter().any(|tag| block.starts_with(tag)) {
                block.to_string()
            } else if block.trim().is_empty() {
                String::new()
            } else {
                format!("<p>{}</p>", block)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_headings_and_paragraphs() {
        let html = render_markdown("## Hello\n\nThis is a test.\n\n### Sub");
        assert_eq!(html, "<h2>Hello</h2>\n<p>This is a test.</p>\n<h3>Sub</h3>");
    }

    #[test]
    fn test_render_inline() {
        let html = render_markdown("**bold** and *it* and `code`");
        assert_eq!(
            html,
            "<p><strong>bold</strong> and <em>it</em> and <code>code</code></p>"
        );
    }

    #[test]
    fn test_render_image_and_link() {
        let html = render_markdown("![cat](https://x/cat.png)\n\nsee [docs](https://docs.rs)");
        assert_eq!(
            html,
            "<img src=\"https://x/cat.png\" alt=\"cat\" />\n\
             <p>see <a href=\"https://docs.rs\" target=\"_blank\">docs</a></p>"
        );
    }

    #[test]
    fn test_list_items_are_not_grouped() {
        let html = render_markdown("- one\n- two\n\n1. first\n2. second");
        assert_eq!(
            html,
            "<li class=\"list-disc\">one</li>\n<li class=\"list-disc\">two</li>\n\
             <li class=\"list-decimal\">first</li>\n<li class=\"list-decimal\">second</li>"
        );
    }

    #[test]
    fn test_code_fence_is_plain_text() {
        let html = render_markdown("```\nlet x = 1;\n```");
        assert!(html.starts_with("<p>"));
        assert!(html.contains("\nlet x = 1;\n"));
        assert!(!html.contains("<pre>"));
    }

    #[test]
    fn test_blank_blocks_become_empty() {
        assert_eq!(render_markdown(""), "");
        assert_eq!(render_markdown("a\n\n\n\nb"), "<p>a</p>\n\n<p>b</p>");
    }

    #[test]
    fn test_html_passes_through() {
        let html = render_markdown("<b>trusted</b>");
        assert_eq!(html, "<p><b>trusted</b></p>");
    }
}
