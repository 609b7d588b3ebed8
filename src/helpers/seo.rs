//! On-page SEO heuristics
//!
//! Five independent pass/fail checks, one point each. The score is feedback
//! for the author and never blocks a publish.

use serde::Serialize;
use std::ops::RangeInclusive;

use super::text::{count_words, extract_headings};
use crate::content::Faq;

/// Accepted title length, in characters
pub const TITLE_RANGE: RangeInclusive<usize> = 10..=60;

/// Accepted description length, in characters
pub const DESCRIPTION_RANGE: RangeInclusive<usize> = 50..=160;

/// Minimum body length, in words
pub const MIN_WORDS: usize = 300;

/// Highest possible score
pub const MAX_SCORE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeoCheckKind {
    Title,
    Description,
    WordCount,
    Headings,
    Faq,
}

impl SeoCheckKind {
    pub fn label(&self) -> &'static str {
        match self {
            SeoCheckKind::Title => "Title",
            SeoCheckKind::Description => "Description",
            SeoCheckKind::WordCount => "Words",
            SeoCheckKind::Headings => "H2",
            SeoCheckKind::Faq => "FAQ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoCheck {
    pub kind: SeoCheckKind,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeoGrade {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoReport {
    pub checks: Vec<SeoCheck>,
    pub score: u8,
}

impl SeoReport {
    /// Score a post
    pub fn evaluate(title: &str, description: &str, body: &str, faqs: &[Faq]) -> Self {
        let title_len = title.chars().count();
        let description_len = description.chars().count();
        let words = count_words(body);
        let h2_count = extract_headings(body)
            .iter()
            .filter(|h| h.level == 2)
            .count();
        let faq_count = faqs.iter().filter(|f| !f.question.trim().is_empty()).count();

        let checks = vec![
            SeoCheck {
                kind: SeoCheckKind::Title,
                passed: TITLE_RANGE.contains(&title_len),
                detail: format!("{}/{}", title_len, TITLE_RANGE.end()),
            },
            SeoCheck {
                kind: SeoCheckKind::Description,
                passed: DESCRIPTION_RANGE.contains(&description_len),
                detail: format!("{}/{}", description_len, DESCRIPTION_RANGE.end()),
            },
            SeoCheck {
                kind: SeoCheckKind::WordCount,
                passed: words >= MIN_WORDS,
                detail: words.to_string(),
            },
            SeoCheck {
                kind: SeoCheckKind::Headings,
                passed: h2_count > 0,
                detail: h2_count.to_string(),
            },
            SeoCheck {
                kind: SeoCheckKind::Faq,
                passed: faq_count > 0,
                detail: faq_count.to_string(),
            },
        ];

        let score = checks.iter().filter(|c| c.passed).count() as u8;
        Self { checks, score }
    }

    pub fn grade(&self) -> SeoGrade {
        match self.score {
            s if s >= 4 => SeoGrade::Good,
            s if s >= 2 => SeoGrade::Fair,
            _ => SeoGrade::Poor,
        }
    }

    pub fn check(&self, kind: SeoCheckKind) -> Option<&SeoCheck> {
        self.checks.iter().find(|c| c.kind == kind)
    }
}
