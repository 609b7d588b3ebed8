//! Editing session
//!
//! Everything the editor holds between keystrokes: the draft, its frozen slug,
//! the cursor, the category set and the outcome of the last publish. All
//! mutations are plain `&mut self` calls; publishing is driven from outside
//! by [`crate::publish::PublishClient`].

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::draft::{Draft, Faq};
use super::markdown::render_markdown;
use super::preview::SearchPreview;
use crate::categories::{CategoryError, CategoryStore, Storage};
use crate::config::WriterConfig;
use crate::helpers::{
    count_words, extract_headings, generate_slug, Heading, SeoReport, FALLBACK_SLUG,
    MARKDOWN_EXT,
};
use crate::publish::{ClientError, PublishReceipt, PublishRequest};

/// Notice shown after a successful publish
pub const PUBLISHED_NOTICE: &str = "Published! Deployment in progress...";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("at least one FAQ entry must remain")]
    LastFaq,

    #[error("no FAQ entry at index {0}")]
    FaqIndex(usize),

    #[error(transparent)]
    Category(#[from] CategoryError),
}

/// Which side of a FAQ entry to edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqField {
    Question,
    Answer,
}

/// Editor toolbar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Heading2,
    Heading3,
    Bold,
    Italic,
    Link,
    Image,
    List,
    CodeBlock,
}

impl ToolbarAction {
    pub const ALL: [ToolbarAction; 8] = [
        ToolbarAction::Heading2,
        ToolbarAction::Heading3,
        ToolbarAction::Bold,
        ToolbarAction::Italic,
        ToolbarAction::Link,
        ToolbarAction::Image,
        ToolbarAction::List,
        ToolbarAction::CodeBlock,
    ];

    /// Text inserted at the cursor
    pub fn snippet(&self) -> &'static str {
        match self {
            ToolbarAction::Heading2 => "\n## ",
            ToolbarAction::Heading3 => "\n### ",
            ToolbarAction::Bold => "****",
            ToolbarAction::Italic => "**",
            ToolbarAction::Link => "[text](https://)",
            ToolbarAction::Image => "![alt](image-url)",
            ToolbarAction::List => "\n- ",
            ToolbarAction::CodeBlock => "\n```\n\n```\n",
        }
    }
}

/// Cursor selection in the body, in characters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

/// Outcome of the last publish attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishNotice {
    pub ok: bool,
    pub message: String,
    pub url: Option<String>,
}

/// State of one editing session
#[derive(Debug)]
pub struct EditorSession<S: Storage> {
    config: WriterConfig,
    draft: Draft,
    slug: Option<String>,
    categories: CategoryStore<S>,
    selection: Selection,
    notice: Option<PublishNotice>,
}

impl<S: Storage> EditorSession<S> {
    /// Start a fresh post
    pub fn new(config: WriterConfig, storage: S) -> anyhow::Result<Self> {
        let categories = CategoryStore::load(storage, &config.default_categories)?;
        let draft = Self::blank_draft(&config, &categories);
        Ok(Self {
            config,
            draft,
            slug: None,
            categories,
            selection: Selection::default(),
            notice: None,
        })
    }

    /// Resume editing an existing draft
    ///
    /// Without a `slug` one is generated from the title, if there is one.
    pub fn from_draft(
        config: WriterConfig,
        storage: S,
        mut draft: Draft,
        slug: Option<String>,
    ) -> anyhow::Result<Self> {
        let categories = CategoryStore::load(storage, &config.default_categories)?;
        if draft.category.trim().is_empty() {
            draft.category = categories.first().to_string();
        }
        if draft.faqs.is_empty() {
            draft.faqs.push(Faq::default());
        }
        let slug = slug.or_else(|| {
            (!draft.title.trim().is_empty()).then(|| generate_slug(&draft.title))
        });

        Ok(Self {
            config,
            draft,
            slug,
            categories,
            selection: Selection::default(),
            notice: None,
        })
    }

    fn blank_draft(config: &WriterConfig, categories: &CategoryStore<S>) -> Draft {
        Draft {
            body: config.starter_body.clone(),
            category: categories.first().to_string(),
            faqs: vec![Faq::default()],
            ..Default::default()
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn categories(&self) -> &[String] {
        self.categories.categories()
    }

    /// Set the title; the first non-blank title fixes the slug for good
    pub fn set_title(&mut self, title: &str) {
        self.draft.title = title.to_string();
        if self.slug.is_none() && !title.trim().is_empty() {
            let slug = generate_slug(title);
            tracing::debug!("Slug fixed as {}", slug);
            self.slug = Some(slug);
        }
    }

    /// The slug, or `untitled` while no title has been entered
    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or(FALLBACK_SLUG)
    }

    pub fn has_slug(&self) -> bool {
        self.slug.is_some()
    }

    /// Filename the post is published under
    pub fn filename(&self) -> String {
        format!("{}{}", self.slug(), MARKDOWN_EXT)
    }

    pub fn set_description(&mut self, description: &str) {
        self.draft.description = description.to_string();
    }

    /// Replace the body; the cursor moves to the end
    pub fn set_body(&mut self, body: &str) {
        self.draft.body = body.to_string();
        self.selection = Selection::caret(body.chars().count());
    }

    /// Tags as typed, comma-separated
    pub fn set_tags(&mut self, tags: &str) {
        self.draft.tags = if tags.trim().is_empty() {
            Vec::new()
        } else {
            vec![tags.to_string()]
        };
    }

    pub fn set_cover_image(&mut self, url: &str) {
        self.draft.cover_image = if url.trim().is_empty() {
            None
        } else {
            Some(url.trim().to_string())
        };
    }

    pub fn select_category(&mut self, name: &str) -> Result<(), SessionError> {
        if !self.categories.contains(name) {
            return Err(CategoryError::Unknown(name.to_string()).into());
        }
        self.draft.category = name.to_string();
        Ok(())
    }

    /// Add a category to the persisted set; the selection is unchanged
    pub fn add_category(&mut self, name: &str) -> Result<bool, SessionError> {
        Ok(self.categories.add(name)?)
    }

    /// Remove a category; a draft filed under it moves to the first remaining one
    pub fn remove_category(&mut self, name: &str) -> Result<(), SessionError> {
        self.categories.remove(name)?;
        if self.draft.category == name {
            self.draft.category = self.categories.first().to_string();
        }
        Ok(())
    }

    pub fn add_faq(&mut self) {
        self.draft.faqs.push(Faq::default());
    }

    pub fn remove_faq(&mut self, index: usize) -> Result<Faq, SessionError> {
        if index >= self.draft.faqs.len() {
            return Err(SessionError::FaqIndex(index));
        }
        if self.draft.faqs.len() == 1 {
            return Err(SessionError::LastFaq);
        }
        Ok(self.draft.faqs.remove(index))
    }

    pub fn update_faq(
        &mut self,
        index: usize,
        field: FaqField,
        value: &str,
    ) -> Result<(), SessionError> {
        let faq = self
            .draft
            .faqs
            .get_mut(index)
            .ok_or(SessionError::FaqIndex(index))?;
        match field {
            FaqField::Question => faq.question = value.to_string(),
            FaqField::Answer => faq.answer = value.to_string(),
        }
        Ok(())
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Move the cursor; offsets past the end of the body are clamped
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.draft.body.chars().count();
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.selection = Selection {
            start: start.min(len),
            end: end.min(len),
        };
    }

    /// Replace the selection with `text` and put the caret after it
    pub fn insert_at_cursor(&mut self, text: &str) {
        let body = &self.draft.body;
        let start = byte_offset(body, self.selection.start);
        let end = byte_offset(body, self.selection.end);

        let mut updated = String::with_capacity(body.len() + text.len());
        updated.push_str(&body[..start]);
        updated.push_str(text);
        updated.push_str(&body[end..]);

        self.draft.body = updated;
        self.selection = Selection::caret(self.selection.start + text.chars().count());
    }

    pub fn apply(&mut self, action: ToolbarAction) {
        self.insert_at_cursor(action.snippet());
    }

    /// Start a new post: starter body, no slug, no notice
    ///
    /// The category set and the selected category are kept.
    pub fn reset(&mut self) {
        let category = std::mem::take(&mut self.draft.category);
        self.draft = Self::blank_draft(&self.config, &self.categories);
        if self.categories.contains(&category) {
            self.draft.category = category;
        }
        self.slug = None;
        self.selection = Selection::default();
        self.notice = None;
    }

    pub fn headings(&self) -> Vec<Heading> {
        extract_headings(&self.draft.body)
    }

    pub fn word_count(&self) -> usize {
        count_words(&self.draft.body)
    }

    pub fn preview_html(&self) -> String {
        render_markdown(&self.draft.body)
    }

    pub fn seo_report(&self) -> SeoReport {
        SeoReport::evaluate(
            &self.draft.title,
            &self.draft.description,
            &self.draft.body,
            &self.draft.faqs,
        )
    }

    pub fn markdown_document(&self, publish_date: NaiveDate) -> String {
        self.draft.to_markdown_document(publish_date)
    }

    pub fn structured_data_json(&self, publish_date: NaiveDate) -> String {
        self.draft
            .structured_data_json(&self.config.author, publish_date)
    }

    pub fn search_preview(&self) -> SearchPreview {
        SearchPreview::new(&self.config, &self.draft, self.slug())
    }

    /// The request the publish client sends for this draft
    pub fn publish_request(&self, publish_date: NaiveDate) -> Result<PublishRequest, ClientError> {
        if self.draft.title.trim().is_empty() {
            return Err(ClientError::MissingTitle);
        }
        Ok(PublishRequest {
            filename: self.filename(),
            content: self.markdown_document(publish_date),
            message: Some(self.config.commit_message_for_title(&self.draft.title)),
        })
    }

    /// Reflect a publish outcome into the notice
    pub fn record_publish(&mut self, outcome: &Result<PublishReceipt, ClientError>) {
        self.notice = Some(match outcome {
            Ok(receipt) => PublishNotice {
                ok: true,
                message: PUBLISHED_NOTICE.to_string(),
                url: Some(receipt.url.clone()),
            },
            Err(e) => PublishNotice {
                ok: false,
                message: e.to_string(),
                url: None,
            },
        });
    }

    pub fn notice(&self) -> Option<&PublishNotice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

/// Byte offset of the `chars`-th character, clamped to the end
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::MemoryStorage;

    fn session() -> EditorSession<MemoryStorage> {
        EditorSession::new(WriterConfig::default(), MemoryStorage::new()).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()
    }

    #[test]
    fn test_new_session_defaults() {
        let session = session();
        let config = WriterConfig::default();
        assert_eq!(session.draft().body, config.starter_body);
        assert_eq!(session.draft().category, "AI");
        assert_eq!(session.draft().faqs, vec![Faq::default()]);
        assert_eq!(session.slug(), "untitled");
        assert!(!session.has_slug());
    }

    #[test]
    fn test_slug_frozen_after_first_title() {
        let mut session = session();
        session.set_title("   ");
        assert!(!session.has_slug());

        session.set_title("Hello World");
        let slug = session.slug().to_string();
        assert!(slug.starts_with("hello-world-"));

        session.set_title("Completely different");
        assert_eq!(session.slug(), slug);
        session.set_title("");
        assert_eq!(session.slug(), slug);
        assert_eq!(session.filename(), format!("{}.md", slug));
    }

    #[test]
    fn test_reset_clears_slug_and_notice() {
        let mut session = session();
        session.set_title("First");
        session.set_body("changed");
        session.record_publish(&Err(ClientError::MissingTitle));
        session.reset();

        assert!(!session.has_slug());
        assert!(session.notice().is_none());
        assert_eq!(session.draft().title, "");
        assert_eq!(session.draft().body, WriterConfig::default().starter_body);
    }

    #[test]
    fn test_faq_operations() {
        let mut session = session();
        assert!(matches!(session.remove_faq(0), Err(SessionError::LastFaq)));

        session.add_faq();
        session.update_faq(1, FaqField::Question, "Q?").unwrap();
        session.update_faq(1, FaqField::Answer, "A.").unwrap();
        assert_eq!(session.draft().valid_faqs(), vec![&Faq::new("Q?", "A.")]);

        assert!(matches!(
            session.update_faq(5, FaqField::Answer, "x"),
            Err(SessionError::FaqIndex(5))
        ));
        assert_eq!(session.remove_faq(0).unwrap(), Faq::default());
        assert_eq!(session.draft().faqs.len(), 1);
    }

    #[test]
    fn test_category_operations() {
        let mut session = session();
        assert!(session.add_category("Rust").unwrap());
        assert_eq!(session.draft().category, "AI");

        session.select_category("Rust").unwrap();
        session.remove_category("Rust").unwrap();
        assert_eq!(session.draft().category, "AI");

        assert!(matches!(
            session.select_category("Nope"),
            Err(SessionError::Category(CategoryError::Unknown(_)))
        ));
    }

    #[test]
    fn test_toolbar_inserts_at_cursor() {
        let mut session = session();
        session.set_body("Hello world");
        session.set_selection(5, 5);
        session.apply(ToolbarAction::Bold);
        assert_eq!(session.draft().body, "Hello**** world");
        assert_eq!(session.selection(), Selection::caret(9));

        session.set_selection(0, 5);
        session.insert_at_cursor("Bye");
        assert_eq!(session.draft().body, "Bye**** world");
        assert_eq!(session.selection(), Selection::caret(3));
    }

    #[test]
    fn test_toolbar_handles_multibyte_body() {
        let mut session = session();
        session.set_body("中文內容");
        session.set_selection(2, 100);
        session.apply(ToolbarAction::Heading2);
        assert_eq!(session.draft().body, "中文\n## ");
    }

    #[test]
    fn test_tags_and_cover() {
        let mut session = session();
        session.set_tags("rust, seo");
        assert_eq!(session.draft().tag_list(), vec!["rust", "seo"]);
        session.set_tags("  ");
        assert!(session.draft().tags.is_empty());

        session.set_cover_image(" https://img/a.png ");
        assert_eq!(session.draft().cover(), Some("https://img/a.png"));
        session.set_cover_image("");
        assert_eq!(session.draft().cover_image, None);
    }

    #[test]
    fn test_publish_request_requires_title() {
        let mut session = session();
        assert!(matches!(
            session.publish_request(date()),
            Err(ClientError::MissingTitle)
        ));

        session.set_title("My Post");
        let request = session.publish_request(date()).unwrap();
        assert_eq!(request.filename, session.filename());
        assert!(request.content.starts_with("---\ntitle: \"My Post\"\n"));
        assert_eq!(request.message.as_deref(), Some("Add post: My Post"));
    }

    #[test]
    fn test_record_publish() {
        let mut session = session();
        session.record_publish(&Ok(PublishReceipt {
            success: true,
            path: "src/content/posts/a.md".to_string(),
            url: "https://example.com/posts/a/".to_string(),
        }));
        let notice = session.notice().unwrap();
        assert!(notice.ok);
        assert_eq!(notice.url.as_deref(), Some("https://example.com/posts/a/"));

        session.record_publish(&Err(ClientError::Rejected {
            status: 401,
            message: "Unauthorized".to_string(),
        }));
        let notice = session.notice().unwrap();
        assert!(!notice.ok);
        assert_eq!(notice.message, "Unauthorized");

        session.dismiss_notice();
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_from_draft_fills_gaps() {
        let draft = Draft {
            title: "Loaded".to_string(),
            ..Default::default()
        };
        let session = EditorSession::from_draft(
            WriterConfig::default(),
            MemoryStorage::new(),
            draft,
            Some("loaded-abcdefgh".to_string()),
        )
        .unwrap();
        assert_eq!(session.slug(), "loaded-abcdefgh");
        assert_eq!(session.draft().category, "AI");
        assert_eq!(session.draft().faqs.len(), 1);
    }

    #[test]
    fn test_derived_views() {
        let mut session = session();
        session.set_body("## One\n\nsome words here");
        assert_eq!(session.headings().len(), 1);
        assert_eq!(session.word_count(), 4);
        assert!(session.preview_html().contains("<h2>One</h2>"));
        assert!(session.seo_report().score <= 5);
        assert_eq!(session.search_preview().title, "Post title | Vega Note");
    }
}
