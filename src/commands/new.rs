//! Create a new draft

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Writer;

/// Create a draft file named after a fresh slug and return its path
pub fn create_draft(
    writer: &Writer,
    title: &str,
    category: Option<&str>,
    description: Option<&str>,
) -> Result<PathBuf> {
    if title.trim().is_empty() {
        anyhow::bail!("A draft needs a title");
    }

    let mut session = writer.new_session()?;
    session.set_title(title);
    if let Some(category) = category {
        session.select_category(category)?;
    }
    if let Some(description) = description {
        session.set_description(description);
    }

    fs::create_dir_all(&writer.drafts_dir)?;
    let path = writer.drafts_dir.join(session.filename());

    // Check if file already exists
    if path.exists() {
        anyhow::bail!("File already exists: {:?}", path);
    }

    fs::write(&path, session.markdown_document(writer.config.today()))?;
    tracing::info!("Created draft {:?}", path);
    println!("Created: {:?}", path);

    Ok(path)
}
