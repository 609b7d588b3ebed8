//! Content module - draft model, rendering and serialization

mod draft;
mod frontmatter;
mod markdown;
mod preview;
mod session;
mod structured;

pub use draft::{Draft, Faq};
pub use frontmatter::FrontMatter;
pub use markdown::render_markdown;
pub use preview::{
    faq_html, render_preview_page, toc_html, SearchPreview, DESCRIPTION_PLACEHOLDER,
    TITLE_PLACEHOLDER,
};
pub use session::{
    EditorSession, FaqField, PublishNotice, Selection, SessionError, ToolbarAction,
    PUBLISHED_NOTICE,
};
