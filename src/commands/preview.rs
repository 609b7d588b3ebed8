//! Render a draft to a standalone HTML page

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::content::render_preview_page;
use crate::Writer;

/// Where the preview of `draft` is written when no output is given
pub fn default_output(draft: &Path) -> PathBuf {
    draft.with_extension("html")
}

/// Render the preview page of a draft file
pub fn render(writer: &Writer, draft: &Path, output: &Path) -> Result<()> {
    let session = writer.open_draft(draft)?;
    let html = render_preview_page(session.draft(), writer.config.today());

    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(output, html)?;
    tracing::info!("Rendered {:?} -> {:?}", draft, output);
    Ok(())
}

/// Whether any debounced event is for the draft file itself
fn touches_draft(events: &[DebouncedEvent], draft: &Path) -> bool {
    let Some(name) = draft.file_name() else {
        return false;
    };
    events.iter().any(|e| e.path.file_name() == Some(name))
}

/// Re-render the preview every time the draft changes
///
/// The draft's directory is watched rather than the file, since editors that
/// save through a rename replace the file the watch was attached to.
pub fn watch(writer: &Writer, draft: &Path, output: &Path) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let dir = match draft.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?} for {:?}", dir, draft);
    println!("Watching {} for changes. Press Ctrl+C to stop.", draft.display());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                if !touches_draft(&events, draft) {
                    continue;
                }
                match render(writer, draft, output) {
                    Ok(_) => println!("Preview updated: {}", output.display()),
                    Err(e) => println!("Preview failed: {}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}
