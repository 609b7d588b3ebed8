//! Derived views of a draft
//!
//! Pure functions the editor recomputes on every keystroke: slug, headings,
//! word count, SEO score and URLs.

mod seo;
mod slug;
mod text;
mod url;

pub use seo::*;
pub use slug::*;
pub use text::*;
pub use url::*;
