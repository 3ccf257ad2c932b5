use anyhow::{Context, Result};
use identity::{FsBlobStore, default_manager, profile};
use model::entities::profile::Model as Profile;
use sea_orm::DatabaseConnection;
use std::path::Path;
use tracing::debug;

pub async fn create_profile(
    db: &DatabaseConnection,
    email: &str,
    gender: &str,
    info: String,
) -> Result<Profile> {
    let gender = profile::parse_gender(gender)?;
    let account = default_manager().get_by_email(db, email).await?;
    let created = profile::create_profile(db, account.id, gender, info).await?;

    println!("Created profile {} for {}", created.id, account.email);
    Ok(created)
}

pub async fn upload_avatar(
    db: &DatabaseConnection,
    media_root: &Path,
    email: &str,
    file: &Path,
) -> Result<Profile> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file name: {}", file.display()))?;
    debug!(filename, size = bytes.len(), "Read avatar file");

    let account = default_manager().get_by_email(db, email).await?;
    let owned = profile::profile_for_user(db, account.id).await?;
    let store = FsBlobStore::new(media_root);
    let updated = profile::upload_avatar(db, &store, owned.id, filename, &bytes).await?;

    if let Some(image) = &updated.image {
        println!("Stored avatar at {}", store.root().join(image).display());
    }
    Ok(updated)
}
