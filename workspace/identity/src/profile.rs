//! Profile records, one per account.

use model::entities::profile::{self, Gender};
use model::entities::user;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use tracing::{debug, info, instrument, warn};

use crate::avatar::derive_avatar_path;
use crate::blob::BlobStore;
use crate::error::{IdentityError, Result};

/// Changes applied by [`update_profile`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub gender: Option<Gender>,
    pub info: Option<String>,
}

/// Parses a gender choice, reporting unknown values as validation errors.
pub fn parse_gender(value: &str) -> Result<Gender> {
    value
        .parse::<Gender>()
        .map_err(|e| IdentityError::Validation(e.to_string()))
}

/// Creates the profile of an existing user. The avatar starts out empty.
#[instrument(skip(db, info))]
pub async fn create_profile<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    gender: Gender,
    info: impl Into<String>,
) -> Result<profile::Model> {
    if user::Entity::find_by_id(user_id).one(db).await?.is_none() {
        warn!(user_id, "Cannot create profile for missing user");
        return Err(IdentityError::not_found("user", user_id));
    }

    let created = profile::ActiveModel {
        user_id: Set(user_id),
        gender: Set(gender),
        info: Set(info.into()),
        image: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| match IdentityError::from(e) {
        IdentityError::UniquenessViolation(_) => {
            IdentityError::UniquenessViolation(format!("user {} already has a profile", user_id))
        }
        other => other,
    })?;

    info!(profile_id = created.id, user_id, "Profile created");
    Ok(created)
}

pub async fn get_profile<C: ConnectionTrait>(db: &C, profile_id: i32) -> Result<profile::Model> {
    profile::Entity::find_by_id(profile_id)
        .one(db)
        .await?
        .ok_or_else(|| IdentityError::not_found("profile", profile_id))
}

/// Fetches the profile owned by `user_id`.
pub async fn profile_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<profile::Model> {
    profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| IdentityError::not_found("profile of user", user_id))
}

/// Fetches the account owning a profile.
pub async fn profile_owner<C: ConnectionTrait>(
    db: &C,
    profile: &profile::Model,
) -> Result<user::Model> {
    user::Entity::find_by_id(profile.user_id)
        .one(db)
        .await?
        .ok_or_else(|| IdentityError::not_found("user", profile.user_id))
}

#[instrument(skip(db))]
pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    profile_id: i32,
    changes: ProfileUpdate,
) -> Result<profile::Model> {
    let current = get_profile(db, profile_id).await?;
    let mut active = current.clone().into_active_model();

    if let Some(gender) = changes.gender {
        active.gender = Set(gender);
    }
    if let Some(info) = changes.info {
        active.info = Set(info);
    }

    if !active.is_changed() {
        return Ok(current);
    }

    let updated = active.update(db).await?;
    info!(profile_id, "Profile updated");
    Ok(updated)
}

/// Stores an uploaded avatar and points the profile at it.
///
/// The blob is written first; if that fails the profile keeps its previous image.
/// The previous blob is left in place.
#[instrument(skip(db, store, bytes), fields(size = bytes.len()))]
pub async fn upload_avatar<C, S>(
    db: &C,
    store: &S,
    profile_id: i32,
    original_filename: &str,
    bytes: &[u8],
) -> Result<profile::Model>
where
    C: ConnectionTrait,
    S: BlobStore + ?Sized,
{
    let current = get_profile(db, profile_id).await?;
    let owner = profile_owner(db, &current).await?;

    let path = derive_avatar_path(&owner, original_filename);
    debug!(%path, "Derived avatar path");
    store.put(&path, bytes).await?;

    let mut active = current.into_active_model();
    active.image = Set(Some(path));
    let updated = active.update(db).await?;

    info!(profile_id, image = ?updated.image, "Avatar uploaded");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::FsBlobStore;
    use crate::manager::ExtraFields;
    use crate::test_utils::{MemoryBlobStore, setup_test_db, test_manager};

    async fn create_account(db: &sea_orm::DatabaseConnection, email: &str) -> user::Model {
        test_manager()
            .create_user(db, email, None, ExtraFields::with_names("Jane", "Doe"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_profile() {
        let db = setup_test_db().await;
        let owner = create_account(&db, "jane@example.com").await;

        let created = create_profile(&db, owner.id, Gender::Female, "Hi there")
            .await
            .unwrap();

        assert_eq!(created.user_id, owner.id);
        assert_eq!(created.gender, Gender::Female);
        assert_eq!(created.info, "Hi there");
        assert_eq!(created.image, None);

        assert_eq!(get_profile(&db, created.id).await.unwrap(), created);
        assert_eq!(profile_for_user(&db, owner.id).await.unwrap(), created);
        assert_eq!(profile_owner(&db, &created).await.unwrap(), owner);
    }

    #[tokio::test]
    async fn test_one_profile_per_user() {
        let db = setup_test_db().await;
        let owner = create_account(&db, "jane@example.com").await;

        create_profile(&db, owner.id, Gender::Female, "").await.unwrap();
        let err = create_profile(&db, owner.id, Gender::Other, "")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::UniquenessViolation(_)));
    }

    #[tokio::test]
    async fn test_profile_requires_user() {
        let db = setup_test_db().await;
        let err = create_profile(&db, 99, Gender::Male, "").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(profile_for_user(&db, 99).await.unwrap_err().is_not_found());
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!(parse_gender("Male").unwrap(), Gender::Male);
        assert!(matches!(
            parse_gender("unknown"),
            Err(IdentityError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let db = setup_test_db().await;
        let owner = create_account(&db, "jane@example.com").await;
        let created = create_profile(&db, owner.id, Gender::Female, "old").await.unwrap();

        let same = update_profile(&db, created.id, ProfileUpdate::default())
            .await
            .unwrap();
        assert_eq!(same, created);

        let updated = update_profile(
            &db,
            created.id,
            ProfileUpdate {
                info: Some("new bio".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.info, "new bio");
        assert_eq!(updated.gender, Gender::Female);

        assert!(
            update_profile(&db, 1234, ProfileUpdate::default())
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_upload_avatar_writes_blob() {
        let db = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let owner = create_account(&db, "jane@example.com").await;
        let created = create_profile(&db, owner.id, Gender::Female, "").await.unwrap();

        let updated = upload_avatar(&db, &store, created.id, "Selfie.PNG", b"image")
            .await
            .unwrap();

        let path = updated.image.clone().expect("image must be set");
        assert!(path.starts_with("uploads/profile-images/jane-doe-"));
        assert!(path.ends_with(".PNG"));
        assert_eq!(std::fs::read(dir.path().join(&path)).unwrap(), b"image");
        assert_eq!(get_profile(&db, created.id).await.unwrap().image, Some(path.clone()));

        // A second upload gets its own path
        let again = upload_avatar(&db, &store, created.id, "Selfie.PNG", b"image2")
            .await
            .unwrap();
        assert_ne!(again.image, Some(path));
    }

    #[tokio::test]
    async fn test_upload_avatar_blob_failure_keeps_image() {
        let db = setup_test_db().await;
        let store = MemoryBlobStore::failing();

        let owner = create_account(&db, "jane@example.com").await;
        let created = create_profile(&db, owner.id, Gender::Female, "").await.unwrap();

        let err = upload_avatar(&db, &store, created.id, "a.png", b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Blob(_)));
        assert_eq!(get_profile(&db, created.id).await.unwrap().image, None);
    }

    #[tokio::test]
    async fn test_upload_avatar_through_trait_object() {
        let db = setup_test_db().await;
        let store = MemoryBlobStore::default();
        let dyn_store: &dyn BlobStore = &store;

        let owner = create_account(&db, "jane@example.com").await;
        let created = create_profile(&db, owner.id, Gender::Female, "").await.unwrap();

        let updated = upload_avatar(&db, dyn_store, created.id, "a.gif", b"gif")
            .await
            .unwrap();
        let path = updated.image.unwrap();
        assert_eq!(store.get(&path), Some(b"gif".to_vec()));
    }
}
