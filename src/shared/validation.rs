use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slug fields (categories, tags, users)
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "breaking-news", "tech", "tamil-nadu-2024"
    /// - Invalid: "-news", "news-", "news--flash", "News", "news_flash"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Characters that are unsafe in stored object keys
    static ref UNSAFE_KEY_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

/// Derive a slug from a human-readable title.
///
/// Lowercases, maps runs of non-alphanumeric characters to single hyphens,
/// and trims leading/trailing hyphens. The result always matches
/// `SLUG_REGEX` unless the input contains no alphanumeric characters at
/// all, in which case an empty string is returned.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress leading hyphen

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Sanitize an uploaded filename into a safe object key component.
///
/// Keeps alphanumerics, dots, hyphens, and underscores; collapses
/// everything else (spaces, path separators, unicode) into single hyphens.
/// Falls back to "file" when nothing survives.
pub fn sanitize_filename(filename: &str) -> String {
    let trimmed = filename.trim().trim_matches('/');
    let safe = UNSAFE_KEY_CHARS.replace_all(trimmed, "-");
    let safe = safe.trim_matches(|c| c == '-' || c == '.');

    if safe.is_empty() {
        "file".to_string()
    } else {
        safe.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("breaking-news"));
        assert!(SLUG_REGEX.is_match("tech"));
        assert!(SLUG_REGEX.is_match("tamil-nadu-2024"));
        assert!(SLUG_REGEX.is_match("a"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-news")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("news-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("news--flash")); // double hyphen
        assert!(!SLUG_REGEX.is_match("News")); // uppercase
        assert!(!SLUG_REGEX.is_match("news_flash")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Breaking News!"), "breaking-news");
        assert_eq!(slugify("  Tamil Nadu -- 2024  "), "tamil-nadu-2024");
        assert_eq!(slugify("tech"), "tech");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_slugify_output_matches_slug_regex() {
        for title in ["Hello World", "A--B", "Política Hoy", "x1 y2 z3"] {
            let slug = slugify(title);
            assert!(SLUG_REGEX.is_match(&slug), "bad slug for {:?}: {:?}", title, slug);
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("cat.png"), "cat.png");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my-photo-1-.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc-passwd");
        assert_eq!(sanitize_filename("   "), "file");
    }
}
