use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::{profile, profile_follow};
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create profiles_follows table (directed join table of the follow graph)
        manager
            .create_table(
                Table::create()
                    .table(ProfileFollow::table())
                    .if_not_exists()
                    .col(integer(ProfileFollow::column(
                        profile_follow::Column::FollowerId,
                    )))
                    .col(integer(ProfileFollow::column(
                        profile_follow::Column::FolloweeId,
                    )))
                    .primary_key(
                        Index::create()
                            .name("pk_profiles_follows")
                            .col(ProfileFollow::column(profile_follow::Column::FollowerId))
                            .col(ProfileFollow::column(profile_follow::Column::FolloweeId)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_follows_follower")
                            .from(
                                ProfileFollow::table(),
                                ProfileFollow::column(profile_follow::Column::FollowerId),
                            )
                            .to(Profile::table(), Profile::column(profile::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_follows_followee")
                            .from(
                                ProfileFollow::table(),
                                ProfileFollow::column(profile_follow::Column::FolloweeId),
                            )
                            .to(Profile::table(), Profile::column(profile::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reverse index for "who follows me" lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_follows_followee")
                    .table(ProfileFollow::table())
                    .col(ProfileFollow::column(profile_follow::Column::FolloweeId))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfileFollow::table()).to_owned())
            .await?;

        Ok(())
    }
}
