//! Draft post model

use serde::{Deserialize, Serialize};

/// A question and answer pair shown in the FAQ section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(alias = "a")]
    pub answer: String,
}

impl Faq {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Both sides filled in
    pub fn is_valid(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

/// The in-progress post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Draft {
    /// Post title
    pub title: String,

    /// SEO description
    pub description: String,

    /// Markdown body
    pub body: String,

    /// Selected category
    pub category: String,

    /// Tags as typed; an entry may hold several comma-separated tags
    pub tags: Vec<String>,

    /// Cover image URL
    pub cover_image: Option<String>,

    /// FAQ entries, including incomplete ones
    pub faqs: Vec<Faq>,
}

impl Draft {
    /// Tags after splitting on commas, trimmed, empties dropped
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .iter()
            .flat_map(|t| t.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// FAQ entries eligible for serialization
    pub fn valid_faqs(&self) -> Vec<&Faq> {
        self.faqs.iter().filter(|f| f.is_valid()).collect()
    }

    /// Cover image, if one is set
    pub fn cover(&self) -> Option<&str> {
        self.cover_image
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
