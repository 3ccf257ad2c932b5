use anyhow::Result;
use identity::{ExtraFields, default_manager};
use model::entities::user;
use sea_orm::DatabaseConnection;
use tracing::info;

pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    password: Option<&str>,
    first_name: Option<String>,
    last_name: Option<String>,
    staff: bool,
) -> Result<user::Model> {
    let extra = ExtraFields {
        first_name,
        last_name,
        is_staff: staff.then_some(true),
        ..Default::default()
    };
    let created = default_manager().create_user(db, email, password, extra).await?;

    println!("Created user {} (id {})", created.email, created.id);
    Ok(created)
}

pub async fn create_superuser(
    db: &DatabaseConnection,
    email: &str,
    password: Option<&str>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<user::Model> {
    let extra = ExtraFields {
        first_name,
        last_name,
        ..Default::default()
    };
    let created = default_manager()
        .create_superuser(db, email, password, extra)
        .await?;

    println!("Created superuser {} (id {})", created.email, created.id);
    Ok(created)
}

pub async fn delete_user(db: &DatabaseConnection, email: &str) -> Result<()> {
    let manager = default_manager();
    let account = manager.get_by_email(db, email).await?;
    manager.delete_user(db, account.id).await?;

    info!(email = %account.email, "Deleted user");
    println!("Deleted user {}", account.email);
    Ok(())
}
