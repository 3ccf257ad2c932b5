pub mod entities;

#[cfg(test)]
mod test {
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, JoinType, ModelTrait, QueryFilter, QuerySelect, RelationTrait, Set,
    };

    use super::*;
    use entities::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    async fn insert_user(db: &DatabaseConnection, email: &str) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(None),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            is_staff: Set(false),
            is_superuser: Set(false),
            is_active: Set(true),
            date_joined: Set(Utc::now()),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn insert_profile(
        db: &DatabaseConnection,
        user_id: i32,
        gender: profile::Gender,
    ) -> Result<profile::Model, DbErr> {
        profile::ActiveModel {
            user_id: Set(user_id),
            gender: Set(gender),
            info: Set("hello".to_string()),
            image: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let alice = insert_user(&db, "alice@example.com").await?;
        let bob = insert_user(&db, "bob@example.com").await?;

        let alice_profile = insert_profile(&db, alice.id, profile::Gender::Female).await?;
        let bob_profile = insert_profile(&db, bob.id, profile::Gender::Male).await?;

        // alice follows bob
        profile_follow::ActiveModel {
            follower_id: Set(alice_profile.id),
            followee_id: Set(bob_profile.id),
        }
        .insert(&db)
        .await?;

        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| !u.is_staff && !u.is_superuser && u.is_active));

        // One-to-one relation from the user side
        let found = alice.find_related(Profile).one(&db).await?;
        assert_eq!(found.map(|p| p.id), Some(alice_profile.id));

        // Profiles followed by alice
        let followees = Profile::find()
            .join(JoinType::InnerJoin, profile_follow::Relation::Followee.def().rev())
            .filter(profile_follow::Column::FollowerId.eq(alice_profile.id))
            .all(&db)
            .await?;
        assert_eq!(followees.len(), 1);
        assert_eq!(followees[0].id, bob_profile.id);

        // Profiles following bob
        let followers = Profile::find()
            .join(JoinType::InnerJoin, profile_follow::Relation::Follower.def().rev())
            .filter(profile_follow::Column::FolloweeId.eq(bob_profile.id))
            .all(&db)
            .await?;
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, alice_profile.id);

        // Nobody follows alice
        let alice_followers = Profile::find()
            .join(JoinType::InnerJoin, profile_follow::Relation::Follower.def().rev())
            .filter(profile_follow::Column::FolloweeId.eq(alice_profile.id))
            .all(&db)
            .await?;
        assert!(alice_followers.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() -> Result<(), DbErr> {
        let db = setup_db().await?;

        insert_user(&db, "carol@example.com").await?;
        let duplicate = insert_user(&db, "carol@example.com").await;
        assert!(duplicate.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_second_profile_rejected() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let dave = insert_user(&db, "dave@example.com").await?;
        insert_profile(&db, dave.id, profile::Gender::Other).await?;
        let second = insert_profile(&db, dave.id, profile::Gender::Other).await;
        assert!(second.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_user_delete_cascades() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let erin = insert_user(&db, "erin@example.com").await?;
        let frank = insert_user(&db, "frank@example.com").await?;
        let erin_profile = insert_profile(&db, erin.id, profile::Gender::Female).await?;
        let frank_profile = insert_profile(&db, frank.id, profile::Gender::Male).await?;

        for (follower, followee) in [
            (erin_profile.id, frank_profile.id),
            (frank_profile.id, erin_profile.id),
        ] {
            profile_follow::ActiveModel {
                follower_id: Set(follower),
                followee_id: Set(followee),
            }
            .insert(&db)
            .await?;
        }

        User::delete_by_id(erin.id).exec(&db).await?;

        assert!(Profile::find_by_id(erin_profile.id).one(&db).await?.is_none());
        assert!(Profile::find_by_id(frank_profile.id).one(&db).await?.is_some());
        let edges = ProfileFollow::find().all(&db).await?;
        assert!(edges.is_empty());

        Ok(())
    }
}
