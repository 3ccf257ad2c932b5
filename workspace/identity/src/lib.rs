//! User accounts keyed by email, their profiles, and the follow graph between profiles.
//!
//! * [`manager`]: account creation (regular and superuser), lookup, update and cascading delete
//! * [`profile`]: one profile per account, avatar uploads
//! * [`graph`]: directed follow edges, queried in both directions
//! * [`avatar`]: collision-free avatar paths
//!
//! Storage goes through SeaORM; password hashing and blob storage sit behind the
//! [`CredentialHasher`] and [`BlobStore`] traits.

pub mod avatar;
pub mod blob;
pub mod email;
pub mod error;
pub mod graph;
pub mod manager;
pub mod password;
pub mod profile;

#[cfg(test)]
pub(crate) mod test_utils;

pub use blob::{BlobStore, FsBlobStore};
pub use error::{IdentityError, Result};
pub use manager::{AccountManager, AccountUpdate, ExtraFields};
pub use password::{Argon2Hasher, CredentialHasher};
pub use profile::ProfileUpdate;

/// Returns the account manager used outside of tests: Argon2id password hashing.
pub fn default_manager() -> AccountManager<Argon2Hasher> {
    AccountManager::default()
}
