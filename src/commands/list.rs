//! List drafts

use anyhow::Result;
use walkdir::WalkDir;

use crate::content::Draft;
use crate::helpers::{count_words, SeoReport, MARKDOWN_EXT};
use crate::Writer;

/// One line of the draft listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftSummary {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub words: usize,
    pub score: u8,
}

/// Read every draft under the drafts directory, sorted by slug
pub fn collect(writer: &Writer) -> Result<Vec<DraftSummary>> {
    if !writer.drafts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut drafts = Vec::new();
    for entry in WalkDir::new(&writer.drafts_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(MARKDOWN_EXT))
    {
        let path = entry.path();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", path, e);
                continue;
            }
        };
        let draft = Draft::from_markdown_document(&content)?;
        let report =
            SeoReport::evaluate(&draft.title, &draft.description, &draft.body, &draft.faqs);

        drafts.push(DraftSummary {
            slug: path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
            words: count_words(&draft.body),
            score: report.score,
            title: draft.title,
            category: draft.category,
        });
    }

    drafts.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(drafts)
}

/// Print the draft listing
pub fn run(writer: &Writer) -> Result<()> {
    let drafts = collect(writer)?;
    println!("Drafts ({}):", drafts.len());
    for draft in drafts {
        println!(
            "  {} - {} [{}] {} words, SEO {}/5",
            draft.slug, draft.title, draft.category, draft.words, draft.score
        );
    }
    Ok(())
}
