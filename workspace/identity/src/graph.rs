//! The follow graph between profiles.
//!
//! Edges are directed: `follow(a, b)` means "a follows b" and says nothing about
//! whether b follows a. Both query directions read the same `profiles_follows`
//! table, the reverse one through its `followee_id` index.

use model::entities::{profile, profile_follow};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{IdentityError, Result};

async fn ensure_profile<C: ConnectionTrait>(db: &C, profile_id: i32) -> Result<()> {
    match profile::Entity::find_by_id(profile_id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(IdentityError::not_found("profile", profile_id)),
    }
}

/// Makes `follower_id` follow `followee_id`.
///
/// Following twice leaves a single edge. Returns whether a new edge was created.
/// Following oneself is rejected.
#[instrument(skip(db))]
pub async fn follow<C: ConnectionTrait>(db: &C, follower_id: i32, followee_id: i32) -> Result<bool> {
    if follower_id == followee_id {
        warn!(follower_id, "Rejected self-follow");
        return Err(IdentityError::Validation(
            "a profile cannot follow itself".to_string(),
        ));
    }
    ensure_profile(db, follower_id).await?;
    ensure_profile(db, followee_id).await?;

    let edge = profile_follow::ActiveModel {
        follower_id: Set(follower_id),
        followee_id: Set(followee_id),
    };
    let inserted = profile_follow::Entity::insert(edge)
        .on_conflict(
            OnConflict::columns([
                profile_follow::Column::FollowerId,
                profile_follow::Column::FolloweeId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    if inserted > 0 {
        info!(follower_id, followee_id, "Follow edge created");
    } else {
        debug!(follower_id, followee_id, "Follow edge already present");
    }
    Ok(inserted > 0)
}

/// Removes the edge `follower_id -> followee_id`. A missing edge is ignored, a
/// missing profile is not. Returns whether an edge was removed.
#[instrument(skip(db))]
pub async fn unfollow<C: ConnectionTrait>(
    db: &C,
    follower_id: i32,
    followee_id: i32,
) -> Result<bool> {
    ensure_profile(db, follower_id).await?;
    ensure_profile(db, followee_id).await?;

    let deleted = profile_follow::Entity::delete_many()
        .filter(profile_follow::Column::FollowerId.eq(follower_id))
        .filter(profile_follow::Column::FolloweeId.eq(followee_id))
        .exec(db)
        .await?;

    if deleted.rows_affected > 0 {
        info!(follower_id, followee_id, "Follow edge removed");
    }
    Ok(deleted.rows_affected > 0)
}

/// Returns true if the edge `follower_id -> followee_id` exists.
pub async fn is_following<C: ConnectionTrait>(
    db: &C,
    follower_id: i32,
    followee_id: i32,
) -> Result<bool> {
    ensure_profile(db, follower_id).await?;
    ensure_profile(db, followee_id).await?;

    Ok(profile_follow::Entity::find_by_id((follower_id, followee_id))
        .one(db)
        .await?
        .is_some())
}

/// Profiles that `profile_id` follows, ordered by id.
#[instrument(skip(db))]
pub async fn followees<C: ConnectionTrait>(db: &C, profile_id: i32) -> Result<Vec<profile::Model>> {
    ensure_profile(db, profile_id).await?;

    let profiles = profile::Entity::find()
        .join(
            JoinType::InnerJoin,
            profile_follow::Relation::Followee.def().rev(),
        )
        .filter(profile_follow::Column::FollowerId.eq(profile_id))
        .order_by_asc(profile::Column::Id)
        .all(db)
        .await?;

    debug!(profile_id, count = profiles.len(), "Loaded followees");
    Ok(profiles)
}

/// Profiles following `profile_id`, ordered by id.
#[instrument(skip(db))]
pub async fn followers<C: ConnectionTrait>(db: &C, profile_id: i32) -> Result<Vec<profile::Model>> {
    ensure_profile(db, profile_id).await?;

    let profiles = profile::Entity::find()
        .join(
            JoinType::InnerJoin,
            profile_follow::Relation::Follower.def().rev(),
        )
        .filter(profile_follow::Column::FolloweeId.eq(profile_id))
        .order_by_asc(profile::Column::Id)
        .all(db)
        .await?;

    debug!(profile_id, count = profiles.len(), "Loaded followers");
    Ok(profiles)
}
