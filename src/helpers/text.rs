//! Text metrics: headings and word counts

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^(#{2,3})\s+(.+)").unwrap();
    static ref LEADING_FRONT_MATTER: Regex = Regex::new(r"\A---[\s\S]*?---").unwrap();
    static ref MARKDOWN_NOISE: Regex = Regex::new(r"[#*\->`\[\]()]").unwrap();
}

/// A level 2 or 3 heading found in a post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// CJK unified ideographs count as words on their own
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Collect `##` and `###` headings in source order
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    markdown
        .split('\n')
        .filter_map(|line| {
            let caps = HEADING.captures(line)?;
            Some(Heading {
                level: caps[1].len() as u8,
                text: caps[2].trim().to_string(),
            })
        })
        .collect()
}

/// Count words, treating each CJK ideograph as one word
pub fn count_words(text: &str) -> usize {
    let clean = LEADING_FRONT_MATTER.replace(text, "");
    let clean = MARKDOWN_NOISE.replace_all(&clean, "");

    let ideographs = clean.chars().filter(|&c| is_cjk(c)).count();
    let words = clean
        .split_whitespace()
        .filter(|w| !w.chars().any(is_cjk))
        .count();

    ideographs + words
}
