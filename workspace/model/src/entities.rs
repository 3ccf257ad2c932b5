//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for user accounts, profiles and the follow graph here.
//! The structure follows the original Django `user` app models but is
//! adapted for Rust's type system and the SeaORM framework.

pub mod profile;
pub mod profile_follow;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::profile::Entity as Profile;
    pub use super::profile_follow::Entity as ProfileFollow;
    pub use super::user::Entity as User;
}
