use sea_orm::entity::prelude::*;

/// Represents an account of the system, identified by email.
/// Corresponds to Django's custom `User` model (`username` removed, `email` as the login field).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Normalized email (domain part lowercased). Unique across all users.
    #[sea_orm(unique)]
    pub email: String,
    /// Opaque one-way hash of the password.
    /// `None` means no usable credential was ever set.
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(default_value = "false")]
    pub is_staff: bool,
    #[sea_orm(default_value = "false")]
    pub is_superuser: bool,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub date_joined: DateTimeUtc,
    pub last_login: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Every user owns at most one profile.
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns true if a password hash is stored for this user.
    pub fn has_usable_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// First and last name joined by a space, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
