use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slugs (category slugs, etc.)
    /// Must be lowercase alphanumeric with single hyphens between segments
    /// - Valid: "mens-shoes", "sale2024", "a-b-c"
    /// - Invalid: "-shoes", "shoes-", "mens--shoes", "Shoes", "mens_shoes"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Derive a slug from a display name: lowercase ASCII alphanumerics joined by single hyphens
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
