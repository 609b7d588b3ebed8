//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::WriterConfig;

/// Characters left alone inside a repository path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Markdown extension stripped from post filenames
pub const MARKDOWN_EXT: &str = ".md";

/// Site-relative path of a post
///
/// # Examples
/// ```ignore
/// post_path(&config, "hello-ab12cd34") // -> "/posts/hello-ab12cd34/"
/// ```
pub fn post_path(config: &WriterConfig, stem: &str) -> String {
    let dir = config.posts_dir.trim_matches('/');
    if dir.is_empty() {
        format!("/{}/", stem)
    } else {
        format!("/{}/{}/", dir, stem)
    }
}

/// Public URL of a published post file
///
/// # Examples
/// ```ignore
/// post_url(&config, "hello-ab12cd34.md") // -> "https://example.com/posts/hello-ab12cd34/"
/// ```
pub fn post_url(config: &WriterConfig, filename: &str) -> String {
    let stem = filename.strip_suffix(MARKDOWN_EXT).unwrap_or(filename);
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, post_path(config, stem))
}

/// Post URL without the scheme, as search results print it
pub fn display_url(config: &WriterConfig, stem: &str) -> String {
    let host = config
        .url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!("{}{}", host, post_path(config, stem))
}

/// Percent-encode each segment of a repository path
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
