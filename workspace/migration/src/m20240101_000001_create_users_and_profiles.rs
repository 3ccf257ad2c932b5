use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::{profile, user};
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table. The normalized email is the natural key.
        manager
            .create_table(
                Table::create()
                    .table(User::table())
                    .if_not_exists()
                    .col(pk_auto(User::column(user::Column::Id)))
                    .col(string(User::column(user::Column::Email)).unique_key())
                    .col(string_null(User::column(user::Column::PasswordHash)))
                    .col(string(User::column(user::Column::FirstName)).default(""))
                    .col(string(User::column(user::Column::LastName)).default(""))
                    .col(boolean(User::column(user::Column::IsStaff)).default(false))
                    .col(boolean(User::column(user::Column::IsSuperuser)).default(false))
                    .col(boolean(User::column(user::Column::IsActive)).default(true))
                    .col(timestamp_with_time_zone(User::column(
                        user::Column::DateJoined,
                    )))
                    .col(timestamp_with_time_zone_null(User::column(
                        user::Column::LastLogin,
                    )))
                    .to_owned(),
            )
            .await?;

        // Create profiles table, one row per user
        manager
            .create_table(
                Table::create()
                    .table(Profile::table())
                    .if_not_exists()
                    .col(pk_auto(Profile::column(profile::Column::Id)))
                    .col(integer(Profile::column(profile::Column::UserId)).unique_key())
                    .col(string_len(Profile::column(profile::Column::Gender), 6))
                    .col(text(Profile::column(profile::Column::Info)))
                    .col(string_null(Profile::column(profile::Column::Image)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profile::table(), Profile::column(profile::Column::UserId))
                            .to(User::table(), User::column(user::Column::Id))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of creation
        manager
            .drop_table(Table::drop().table(Profile::table()).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::table()).to_owned())
            .await?;

        Ok(())
    }
}
