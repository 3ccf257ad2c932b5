//! Storage paths for uploaded profile images.
//!
//! Paths look like `uploads/profile-images/{first}-{last}-{uuid}{ext}`. The random
//! token makes every derived path unique, so uploads never overwrite each other.

use model::entities::user;
use uuid::Uuid;

/// Logical directory every avatar path is rooted at.
pub const AVATAR_DIR: &str = "uploads/profile-images";

/// Derives a fresh blob path for an avatar uploaded by `owner`.
pub fn derive_avatar_path(owner: &user::Model, original_filename: &str) -> String {
    compose_avatar_path(
        &owner.first_name,
        &owner.last_name,
        original_filename,
        Uuid::new_v4(),
    )
}

/// Builds an avatar path from its parts. [`derive_avatar_path`] calls this with a
/// random v4 token.
pub fn compose_avatar_path(
    first_name: &str,
    last_name: &str,
    original_filename: &str,
    token: Uuid,
) -> String {
    format!(
        "{}/{}-{}-{}{}",
        AVATAR_DIR,
        slugify(first_name),
        slugify(last_name),
        token.hyphenated(),
        file_extension(original_filename)
    )
}

/// Lowercases `value` and collapses every run of non-alphanumeric characters into a
/// single `-`. Leading and trailing separators are dropped.
///
/// This differs from Django's `slugify` on purpose: apostrophes and `_` separate words
/// instead of being dropped or kept, and non-ASCII letters are kept as they are instead
/// of being transliterated or removed.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_separator = false;

    for c in value.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Returns the extension of the last path component, dot included, exactly as written.
/// Empty when there is none. Leading dots of a hidden file (`.bashrc`) are not an extension.
pub fn file_extension(filename: &str) -> &str {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => &name[dot..],
        _ => "",
    }
}
