//! Account creation and maintenance.
//!
//! [`AccountManager`] is the only way accounts should be created: it owns the email
//! normalization, the privilege defaults and the password hashing that the `users`
//! table alone cannot enforce.

use chrono::Utc;
use model::entities::{profile, profile_follow, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, trace, warn};

use crate::email::normalize_email;
use crate::error::{IdentityError, Result};
use crate::password::{Argon2Hasher, CredentialHasher};

/// Optional attributes accepted at account creation.
///
/// A `None` flag means "use the default of the creation path": `false` for
/// [`AccountManager::create_user`], `true` for the privilege flags in
/// [`AccountManager::create_superuser`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

impl ExtraFields {
    pub fn with_names(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            ..Default::default()
        }
    }
}

/// Changes applied by [`AccountManager::update_user`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

/// Creates, looks up, updates and deletes accounts.
#[derive(Debug, Clone)]
pub struct AccountManager<H = Argon2Hasher> {
    hasher: H,
}

impl Default for AccountManager<Argon2Hasher> {
    fn default() -> Self {
        Self::new(Argon2Hasher::new())
    }
}

impl<H: CredentialHasher> AccountManager<H> {
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    /// Creates a regular account.
    ///
    /// `is_staff` and `is_superuser` default to `false` unless `extra` sets them.
    /// A missing or empty password leaves the account without a usable credential.
    #[instrument(skip(self, db, password, extra))]
    pub async fn create_user<C: ConnectionTrait>(
        &self,
        db: &C,
        email: &str,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<user::Model> {
        let extra = ExtraFields {
            is_staff: Some(extra.is_staff.unwrap_or(false)),
            is_superuser: Some(extra.is_superuser.unwrap_or(false)),
            ..extra
        };
        self.insert_user(db, email, password, extra).await
    }

    /// Creates a superuser account.
    ///
    /// Both privilege flags default to `true`; explicitly passing `false` for either
    /// one is a validation error.
    #[instrument(skip(self, db, password, extra))]
    pub async fn create_superuser<C: ConnectionTrait>(
        &self,
        db: &C,
        email: &str,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<user::Model> {
        let is_staff = extra.is_staff.unwrap_or(true);
        let is_superuser = extra.is_superuser.unwrap_or(true);

        if !is_staff {
            warn!("Rejected superuser without staff flag");
            return Err(IdentityError::Validation(
                "superuser must have is_staff=True".to_string(),
            ));
        }
        if !is_superuser {
            warn!("Rejected superuser without superuser flag");
            return Err(IdentityError::Validation(
                "superuser must have is_superuser=True".to_string(),
            ));
        }

        let extra = ExtraFields {
            is_staff: Some(true),
            is_superuser: Some(true),
            ..extra
        };
        self.insert_user(db, email, password, extra).await
    }

    // Shared construction path of both creation entry points.
    async fn insert_user<C: ConnectionTrait>(
        &self,
        db: &C,
        email: &str,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<user::Model> {
        let email = normalize_email(email)?;
        debug!(%email, "Normalized email");

        let password_hash = self.hash_optional(password)?;
        if password_hash.is_none() {
            debug!(%email, "Creating account without a usable password");
        }

        let new_user = user::ActiveModel {
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            first_name: Set(extra.first_name.unwrap_or_default()),
            last_name: Set(extra.last_name.unwrap_or_default()),
            is_staff: Set(extra.is_staff.unwrap_or(false)),
            is_superuser: Set(extra.is_superuser.unwrap_or(false)),
            is_active: Set(extra.is_active.unwrap_or(true)),
            date_joined: Set(Utc::now()),
            last_login: Set(None),
            ..Default::default()
        };

        trace!("Attempting to insert new user into database");
        let created = new_user
            .insert(db)
            .await
            .map_err(|e| match IdentityError::from(e) {
                IdentityError::UniquenessViolation(_) => IdentityError::UniquenessViolation(
                    format!("email '{}' is already registered", email),
                ),
                other => other,
            })?;

        info!(
            "User created successfully with ID: {}, email: {}",
            created.id, created.email
        );
        Ok(created)
    }

    fn hash_optional(&self, password: Option<&str>) -> Result<Option<String>> {
        match password.filter(|p| !p.is_empty()) {
            Some(plaintext) => Ok(Some(self.hasher.hash(plaintext)?)),
            None => Ok(None),
        }
    }

    /// Fetches an account by id.
    pub async fn get<C: ConnectionTrait>(&self, db: &C, user_id: i32) -> Result<user::Model> {
        user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| IdentityError::not_found("user", user_id))
    }

    /// Fetches an account by its natural key. The given email is normalized first.
    #[instrument(skip(self, db))]
    pub async fn get_by_email<C: ConnectionTrait>(
        &self,
        db: &C,
        email: &str,
    ) -> Result<user::Model> {
        let email = normalize_email(email)?;
        user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .one(db)
            .await?
            .ok_or_else(|| IdentityError::not_found("user", email))
    }

    /// Replaces the stored credential. `None` or an empty password clears it.
    #[instrument(skip(self, db, password))]
    pub async fn set_password<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i32,
        password: Option<&str>,
    ) -> Result<user::Model> {
        let password_hash = self.hash_optional(password)?;
        let mut active = self.get(db, user_id).await?.into_active_model();
        active.password_hash = Set(password_hash);
        let updated = active.update(db).await?;
        info!(user_id, usable = updated.has_usable_password(), "Password updated");
        Ok(updated)
    }

    /// Verifies a plaintext password against the stored hash.
    /// Always false for accounts without a usable credential.
    pub fn check_password(&self, account: &user::Model, password: &str) -> bool {
        match &account.password_hash {
            Some(hash) => self.hasher.verify(password, hash),
            None => false,
        }
    }

    /// Stamps `last_login` with the current time.
    #[instrument(skip(self, db))]
    pub async fn record_login<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i32,
    ) -> Result<user::Model> {
        let mut active = self.get(db, user_id).await?.into_active_model();
        active.last_login = Set(Some(Utc::now()));
        Ok(active.update(db).await?)
    }

    /// Updates names and privilege flags of an account.
    #[instrument(skip(self, db))]
    pub async fn update_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i32,
        changes: AccountUpdate,
    ) -> Result<user::Model> {
        let current = self.get(db, user_id).await?;
        let mut active = current.clone().into_active_model();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(is_staff) = changes.is_staff {
            active.is_staff = Set(is_staff);
        }
        if let Some(is_superuser) = changes.is_superuser {
            active.is_superuser = Set(is_superuser);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }

        if !active.is_changed() {
            trace!(user_id, "Nothing to update");
            return Ok(current);
        }

        let updated = active.update(db).await?;
        info!(user_id, "User updated");
        Ok(updated)
    }

    /// Deletes an account together with its profile and every follow edge touching
    /// that profile, in one transaction.
    #[instrument(skip(self, db))]
    pub async fn delete_user<C: TransactionTrait>(&self, db: &C, user_id: i32) -> Result<()> {
        let txn = db.begin().await?;

        let account = self.get(&txn, user_id).await?;
        let owned_profile = profile::Entity::find()
            .filter(profile::Column::UserId.eq(account.id))
            .one(&txn)
            .await?;

        if let Some(owned_profile) = owned_profile {
            let edges = profile_follow::Entity::delete_many()
                .filter(
                    Condition::any()
                        .add(profile_follow::Column::FollowerId.eq(owned_profile.id))
                        .add(profile_follow::Column::FolloweeId.eq(owned_profile.id)),
                )
                .exec(&txn)
                .await?;
            debug!(
                profile_id = owned_profile.id,
                edges = edges.rows_affected,
                "Removed follow edges"
            );

            profile::Entity::delete_by_id(owned_profile.id)
                .exec(&txn)
                .await?;
        }

        user::Entity::delete_by_id(account.id).exec(&txn).await?;
        txn.commit().await?;

        info!(user_id, email = %account.email, "User deleted");
        Ok(())
    }
}
