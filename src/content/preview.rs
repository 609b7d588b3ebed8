//! Full preview page and search-result snippet

use chrono::NaiveDate;
use serde::Serialize;

use super::draft::Draft;
use super::markdown::render_markdown;
use crate::config::WriterConfig;
use crate::helpers::{count_words, display_url, extract_headings, Heading};

/// Shown where the title would be while it is still empty
pub const TITLE_PLACEHOLDER: &str = "Post title";

/// Shown where the description would be while it is still empty
pub const DESCRIPTION_PLACEHOLDER: &str = "Post description...";

/// Characters of the description shown in the search snippet
const SNIPPET_CHARS: usize = 60;

/// How the post would look in a search engine result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPreview {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl SearchPreview {
    pub fn new(config: &WriterConfig, draft: &Draft, slug: &str) -> Self {
        let title = if draft.title.is_empty() {
            TITLE_PLACEHOLDER
        } else {
            draft.title.as_str()
        };
        let snippet = if draft.description.is_empty() {
            String::new()
        } else {
            let head: String = draft.description.chars().take(SNIPPET_CHARS).collect();
            format!("{}...", head)
        };

        Self {
            title: format!("{} | {}", title, config.site_name),
            url: display_url(config, slug),
            snippet,
        }
    }
}

/// Table of contents; level 3 entries are indented
pub fn toc_html(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<nav class="toc"><div class="toc-title">Contents</div>"#);
    for heading in headings {
        let class = if heading.level == 3 {
            "toc-item toc-sub"
        } else {
            "toc-item"
        };
        html.push_str(&format!(r#"<div class="{}">{}</div>"#, class, heading.text));
    }
    html.push_str("</nav>");
    html
}

/// FAQ section listing only the complete entries
pub fn faq_html(draft: &Draft) -> String {
    let faqs = draft.valid_faqs();
    if faqs.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<section class="faq"><h2>FAQ</h2>"#);
    for faq in faqs {
        html.push_str(&format!(
            r#"<div class="faq-item"><div class="faq-q">Q: {}</div><div class="faq-a">A: {}</div></div>"#,
            faq.question, faq.answer
        ));
    }
    html.push_str("</section>");
    html
}

/// Render the whole article as the site would show it
pub fn render_preview_page(draft: &Draft, date: NaiveDate) -> String {
    let title = if draft.title.is_empty() {
        TITLE_PLACEHOLDER
    } else {
        draft.title.as_str()
    };
    let description = if draft.description.is_empty() {
        DESCRIPTION_PLACEHOLDER
    } else {
        draft.description.as_str()
    };

    let mut article = String::from("<article>\n");
    if let Some(cover) = draft.cover() {
        article.push_str(&format!(
            r#"<img class="cover" src="{}" alt="{}" />"#,
            cover, title
        ));
        article.push('\n');
    }
    article.push_str(&format!(
        r#"<div class="meta"><span class="category">{}</span> <span>{}</span> <span>{} words</span></div>"#,
        draft.category,
        date.format("%Y-%m-%d"),
        count_words(&draft.body)
    ));
    article.push('\n');
    article.push_str(&format!("<h1>{}</h1>\n", title));
    article.push_str(&format!(r#"<p class="description">{}</p>"#, description));
    article.push('\n');
    article.push_str(&toc_html(&extract_headings(&draft.body)));
    article.push('\n');
    article.push_str(&render_markdown(&draft.body));
    article.push('\n');
    article.push_str(&faq_html(draft));
    article.push_str("\n</article>");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        title, article
    )
}
