//! Front-matter documents
//!
//! Writes a draft out as the markdown file the site builds from, and reads such
//! a file back into a draft.

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::draft::{Draft, Faq};

/// Front-matter delimiter line
pub const DELIMITER: &str = "---";

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter of a post document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "publishDate")]
    pub publish_date: Option<NaiveDate>,
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub faq: Vec<Faq>,

    /// Fields this tool does not manage
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split a document into front-matter and body
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        // The opening line must be exactly `---`; `------` is a horizontal rule
        let Some(rest) = content
            .strip_prefix(DELIMITER)
            .and_then(|r| r.strip_prefix('\n').or_else(|| r.strip_prefix("\r\n")))
        else {
            return Ok((FrontMatter::default(), content));
        };

        let Some(end_pos) = find_closing(rest) else {
            // No closing ---, treat as no front-matter
            return Ok((FrontMatter::default(), content));
        };

        let yaml_content = &rest[..end_pos];
        let after = &rest[end_pos..];
        let after = after.strip_prefix('\n').unwrap_or(after);
        let after = &after[DELIMITER.len()..];
        // The closing line, then the blank separator line
        let body = strip_newline(strip_newline(after));

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => Ok((fm, body)),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                Ok((FrontMatter::default(), content))
            }
        }
    }
}

/// Offset of the `\n---` line closing the block, or 0 when it follows immediately
fn find_closing(rest: &str) -> Option<usize> {
    let mut offset: usize = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == DELIMITER {
            return Some(offset.saturating_sub(1));
        }
        offset += line.len();
    }
    None
}

fn strip_newline(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}

/// Double-quoted YAML scalar
fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{}\"", escaped)
}

impl Draft {
    /// Render the draft as a front-matter + body markdown document
    pub fn to_markdown_document(&self, publish_date: NaiveDate) -> String {
        let mut md = String::from("---\n");
        md.push_str(&format!("title: {}\n", quote(&self.title)));
        md.push_str(&format!("description: {}\n", quote(&self.description)));
        md.push_str(&format!("publishDate: {}\n", publish_date.format("%Y-%m-%d")));
        md.push_str(&format!("category: {}\n", quote(&self.category)));

        let tags = self.tag_list();
        if !tags.is_empty() {
            let quoted: Vec<String> = tags.iter().map(|t| quote(t)).collect();
            md.push_str(&format!("tags: [{}]\n", quoted.join(", ")));
        }

        if let Some(cover) = self.cover() {
            md.push_str(&format!("image: {}\n", quote(cover)));
        }

        let faqs = self.valid_faqs();
        if !faqs.is_empty() {
            md.push_str("faq:\n");
            for faq in faqs {
                md.push_str(&format!("  - q: {}\n", quote(&faq.question)));
                md.push_str(&format!("    a: {}\n", quote(&faq.answer)));
            }
        }

        md.push_str("---\n\n");
        md.push_str(&self.body);
        md
    }

    /// Read a document written by [`Draft::to_markdown_document`]
    pub fn from_markdown_document(content: &str) -> Result<Self> {
        let (fm, body) = FrontMatter::parse(content)?;
        Ok(Self {
            title: fm.title.unwrap_or_default(),
            description: fm.description.unwrap_or_default(),
            body: body.to_string(),
            category: fm.category.unwrap_or_default(),
            tags: fm.tags,
            cover_image: fm.image.filter(|i| !i.trim().is_empty()),
            faqs: fm.faq,
        })
    }
}
