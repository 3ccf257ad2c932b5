use anyhow::Result;
use identity::{default_manager, graph, profile};
use model::entities::profile::Model as Profile;
use sea_orm::{ConnectionTrait, DatabaseConnection};

async fn profile_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Profile> {
    let account = default_manager().get_by_email(db, email).await?;
    Ok(profile::profile_for_user(db, account.id).await?)
}

// Renders profiles as "email (profile id)" lines.
async fn describe<C: ConnectionTrait>(db: &C, profiles: Vec<Profile>) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(profiles.len());
    for p in profiles {
        let owner = profile::profile_owner(db, &p).await?;
        lines.push(format!("{} (profile {})", owner.email, p.id));
    }
    Ok(lines)
}

pub async fn follow(db: &DatabaseConnection, follower: &str, followee: &str) -> Result<bool> {
    let a = profile_by_email(db, follower).await?;
    let b = profile_by_email(db, followee).await?;
    let created = graph::follow(db, a.id, b.id).await?;

    if created {
        println!("{} now follows {}", follower, followee);
    } else {
        println!("{} already follows {}", follower, followee);
    }
    Ok(created)
}

pub async fn unfollow(db: &DatabaseConnection, follower: &str, followee: &str) -> Result<bool> {
    let a = profile_by_email(db, follower).await?;
    let b = profile_by_email(db, followee).await?;
    let removed = graph::unfollow(db, a.id, b.id).await?;

    if removed {
        println!("{} no longer follows {}", follower, followee);
    } else {
        println!("{} did not follow {}", follower, followee);
    }
    Ok(removed)
}

pub async fn followers(db: &DatabaseConnection, email: &str) -> Result<Vec<String>> {
    let p = profile_by_email(db, email).await?;
    describe(db, graph::followers(db, p.id).await?).await
}

pub async fn following(db: &DatabaseConnection, email: &str) -> Result<Vec<String>> {
    let p = profile_by_email(db, email).await?;
    describe(db, graph::followees(db, p.id).await?).await
}
