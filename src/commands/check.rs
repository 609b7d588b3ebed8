//! SEO check for a draft

use anyhow::Result;
use std::path::Path;

use crate::helpers::{SeoGrade, SeoReport, MAX_SCORE};
use crate::Writer;

/// Print the SEO report, outline and word count of a draft
pub fn run(writer: &Writer, path: &Path) -> Result<SeoReport> {
    let session = writer.open_draft(path)?;
    let report = session.seo_report();

    println!("{}", format_report(&report));
    println!("Words: {}", session.word_count());

    let headings = session.headings();
    if !headings.is_empty() {
        println!("Outline:");
        for heading in headings {
            let indent = if heading.level == 3 { "    " } else { "  " };
            println!("{}{}", indent, heading.text);
        }
    }

    let search = session.search_preview();
    println!("Search result:");
    println!("  {}", search.title);
    println!("  {}", search.url);
    if !search.snippet.is_empty() {
        println!("  {}", search.snippet);
    }

    Ok(report)
}

/// One line per check plus the overall score
pub fn format_report(report: &SeoReport) -> String {
    let grade = match report.grade() {
        SeoGrade::Good => "good",
        SeoGrade::Fair => "fair",
        SeoGrade::Poor => "poor",
    };
    let mut out = format!("SEO score: {}/{} ({})\n", report.score, MAX_SCORE, grade);
    for check in &report.checks {
        let mark = if check.passed { "✓" } else { "✗" };
        out.push_str(&format!("  {} {} ({})\n", mark, check.kind.label(), check.detail));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_report() {
        let report = SeoReport::evaluate("A title that fits", "", "## Heading\n\ntext", &[]);
        let out = format_report(&report);
        assert!(out.starts_with("SEO score: 2/5 (fair)"));
        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("✓"));
        assert!(out.contains("✗"));
    }

    #[test]
    fn test_run_on_draft() {
        let dir = TempDir::new().unwrap();
        let writer = Writer::new(dir.path()).unwrap();
        let path = dir.path().join("post.md");
        fs::write(&path, "---\ntitle: \"Short\"\n---\n\n## One\n\nbody").unwrap();

        let report = run(&writer, &path).unwrap();
        assert_eq!(report.score, 1);
    }
}
