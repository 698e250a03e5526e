//! Business-name sanitizing.
//!
//! A slug names both the generated site directory (`sites/<slug>/`) and the
//! prefix of every stored upload. It is a pure function of the business
//! name: lowercase, trim, then every character outside `[a-zA-Z0-9_-]`
//! becomes `_`.
//!
//! ```text
//! "Joe's Café!"   → "joe_s_caf__"
//! "  Green Leaf " → "green_leaf"
//! ```
//!
//! Slugs are not unique. Two names that sanitize identically share one site
//! directory and the later generation overwrites the earlier one.

/// Convert a business name into a filesystem- and URL-safe identifier.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .trim()
        .chars()
        .map(|c| if is_slug_char(c) { c } else { '_' })
        .collect()
}

/// Whether `value` is already in slug form (non-empty, `[a-z0-9_-]` only).
///
/// Used by the serving layer to refuse slugs that could escape the sites root.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Build the stored filename for an upload: `<slug>_<category>_<original>`.
///
/// Only the final path component of `original` is kept, and any character
/// outside `[A-Za-z0-9._-]` becomes `_`. Leading dots are stripped so the
/// result can never be a hidden file or a `..` segment.
///
/// ```text
/// ("joe_s_caf__", "logo", "My Logo.PNG")        → "joe_s_caf___logo_My_Logo.PNG"
/// ("shop", "product_0", "C:\\photos\\mug.jpg")  → "shop_product_0_mug.jpg"
/// ```
pub fn upload_filename(slug: &str, category: &str, original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);
    let cleaned: String = format!("{slug}_{category}_{base}")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}
