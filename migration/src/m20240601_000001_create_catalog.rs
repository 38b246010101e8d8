use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_len(Movies::Title, 150))
                    .col(text(Movies::Description))
                    .col(big_integer(Movies::ReleaseDate))
                    .col(double(Movies::Rating))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(pk_auto(Actors::Id))
                    .col(string(Actors::FirstName))
                    .col(string(Actors::SecondName))
                    .col(string(Actors::Gender))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieActor::Table)
                    .if_not_exists()
                    .col(big_integer(MovieActor::MovieId))
                    .col(big_integer(MovieActor::ActorId))
                    .primary_key(Index::create().col(MovieActor::MovieId).col(MovieActor::ActorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_actor_movie")
                            .from(MovieActor::Table, MovieActor::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_actor_actor")
                            .from(MovieActor::Table, MovieActor::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_actor_actor_id")
                    .table(MovieActor::Table)
                    .col(MovieActor::ActorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_rating")
                    .table(Movies::Table)
                    .col(Movies::Rating)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MovieActor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Title,
    Description,
    ReleaseDate,
    Rating,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    FirstName,
    SecondName,
    Gender,
}

#[derive(DeriveIden)]
enum MovieActor {
    Table,
    MovieId,
    ActorId,
}
