//! Post slug generation
//!
//! A slug is the stem of the published filename. It is derived from the title
//! and carries a random suffix so two posts with the same title never collide.

use rand::Rng;

use super::text::is_cjk;

/// Slug used when the title leaves nothing to work with
pub const FALLBACK_SLUG: &str = "untitled";

/// Length of the random suffix
pub const SUFFIX_LEN: usize = 8;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a unique slug for a title
///
/// # Examples
/// ```ignore
/// generate_slug("Hello, World!") // -> "hello-world-k3x9a0qz"
/// ```
pub fn generate_slug(title: &str) -> String {
    format!("{}-{}", slug_base(title), random_suffix())
}

/// The deterministic part of a slug
pub fn slug_base(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|&c| is_slug_char(c) || c.is_whitespace())
        .collect();

    let base = kept
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if base.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        base
    }
}

/// ASCII word characters, CJK ideographs and hyphens survive slugging
fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || is_cjk(c)
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn assert_shape(slug: &str) {
        let re = Regex::new(r"^[\w\x{4e00}-\x{9fff}-]+-[0-9a-z]{8}$").unwrap();
        assert!(re.is_match(slug), "bad slug shape: {}", slug);
    }

    #[test]
    fn test_slug_base() {
        assert_eq!(slug_base("Hello, World!"), "hello-world");
        assert_eq!(slug_base("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slug_base("a - b -- c"), "a-b-c");
        assert_eq!(slug_base("-leading and trailing-"), "leading-and-trailing");
        assert_eq!(slug_base("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slug_keeps_cjk() {
        assert_eq!(slug_base("Rust 入門 指南"), "rust-入門-指南");
    }

    #[test]
    fn test_slug_fallback() {
        assert_eq!(slug_base(""), FALLBACK_SLUG);
        assert_eq!(slug_base("!!! ???"), FALLBACK_SLUG);
        assert_eq!(slug_base("café"), "caf");
    }

    #[test]
    fn test_generate_slug_shape() {
        for title in ["Hello World", "", "中文 標題", "???", "--x--", "Ünïcödé"] {
            let slug = generate_slug(title);
            assert!(!slug.is_empty());
            assert_shape(&slug);
        }
    }

    #[test]
    fn test_generate_slug_is_random() {
        let a = generate_slug("Same Title");
        let b = generate_slug("Same Title");
        assert!(a.starts_with("same-title-"));
        assert!(b.starts_with("same-title-"));
        assert_ne!(a, b);
    }
}
