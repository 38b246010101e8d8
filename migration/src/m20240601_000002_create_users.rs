use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Role))
                    .to_owned(),
            )
            .await?;

        // Default accounts: 1 is the administrator, 2 a read-only user.
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Users::Table)
                    .columns([Users::Id, Users::Role])
                    .values_panic([1.into(), "admin".into()])
                    .values_panic([2.into(), "regular".into()])
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Role,
}
