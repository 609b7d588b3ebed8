//! Export a draft as publishable files

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Writer;

/// Files written by an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exported {
    pub markdown: PathBuf,
    pub structured_data: PathBuf,
}

/// Write the markdown document and JSON-LD of a draft into `out_dir`
pub fn run(writer: &Writer, draft: &Path, out_dir: &Path) -> Result<Exported> {
    let session = writer.open_draft(draft)?;
    let date = writer.config.today();

    fs::create_dir_all(out_dir)?;
    let markdown = out_dir.join(session.filename());
    let structured_data = out_dir.join(format!("{}.jsonld", session.slug()));

    fs::write(&markdown, session.markdown_document(date))?;
    fs::write(&structured_data, session.structured_data_json(date))?;

    println!("Exported: {}", markdown.display());
    println!("Exported: {}", structured_data.display());

    Ok(Exported {
        markdown,
        structured_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export() {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path()).unwrap();
        let draft = dir.path().join("my-post-ab12cd34.md");
        fs::write(
            &draft,
            "---\ntitle: \"My Post\"\nfaq:\n  - q: \"Why?\"\n    a: \"Because.\"\n---\n\nBody",
        )
        .unwrap();

        let out = dir.path().join("out");
        let exported = run(&writer, &draft, &out).unwrap();
        assert_eq!(exported.markdown, out.join("my-post-ab12cd34.md"));

        let md = fs::read_to_string(&exported.markdown).unwrap();
        assert!(md.starts_with("---\ntitle: \"My Post\"\n"));
        assert!(md.ends_with("---\n\nBody"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&exported.structured_data).unwrap()).unwrap();
        assert_eq!(json[0]["@type"], "Article");
        assert_eq!(json[1]["@type"], "FAQPage");
    }
}
