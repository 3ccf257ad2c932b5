//! Email normalization used for the uniqueness key of accounts.

use crate::error::{IdentityError, Result};

/// Normalizes an email address.
///
/// Surrounding whitespace is trimmed and the domain part (after the last `@`) is
/// lowercased. The local part keeps its case, so `John@Example.COM` and
/// `john@example.com` are distinct addresses.
///
/// Fails with [`IdentityError::Validation`] when the address is blank, has no `@`,
/// or has an empty local or domain part.
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(IdentityError::Validation("email required".to_string()));
    }

    let (local, domain) = email
        .rsplit_once('@')
        .ok_or_else(|| IdentityError::Validation(format!("invalid email '{}'", email)))?;
    if local.is_empty() || domain.is_empty() {
        return Err(IdentityError::Validation(format!("invalid email '{}'", email)));
    }

    Ok(format!("{}@{}", local, domain.to_lowercase()))
}
