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
                    .col(integer(Movies::MovieId).primary_key())
                    .col(string(Movies::Title))
                    .col(integer_null(Movies::Year))
                    .col(string(Movies::ImdbId))
                    .col(string(Movies::Director))
                    .col(text(Movies::Plot))
                    .col(string(Movies::BoxOffice))
                    .col(string(Movies::Runtime))
                    .col(string(Movies::Rated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .col(pk_auto(Genres::GenreId))
                    .col(string_uniq(Genres::GenreName))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenres::Table)
                    .col(integer(MovieGenres::MovieId))
                    .col(integer(MovieGenres::GenreId))
                    .primary_key(
                        Index::create().col(MovieGenres::MovieId).col(MovieGenres::GenreId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .col(pk_auto(Ratings::RatingId))
                    .col(integer(Ratings::MovieId))
                    .col(integer(Ratings::UserId))
                    .col(double(Ratings::Rating))
                    .col(big_integer(Ratings::Timestamp))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_movie_id")
                    .table(Ratings::Table)
                    .col(Ratings::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Ratings::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieGenres::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}

// Column names are read by downstream tools, so they keep the camelCase spelling.
#[derive(DeriveIden)]
enum Movies {
    Table,
    #[sea_orm(iden = "movieId")]
    MovieId,
    Title,
    Year,
    #[sea_orm(iden = "imdbId")]
    ImdbId,
    Director,
    Plot,
    #[sea_orm(iden = "boxoffice")]
    BoxOffice,
    Runtime,
    Rated,
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    #[sea_orm(iden = "genreId")]
    GenreId,
    #[sea_orm(iden = "genreName")]
    GenreName,
}

#[derive(DeriveIden)]
enum MovieGenres {
    Table,
    #[sea_orm(iden = "movieId")]
    MovieId,
    #[sea_orm(iden = "genreId")]
    GenreId,
}

#[derive(DeriveIden)]
enum Ratings {
    Table,
    #[sea_orm(iden = "ratingId")]
    RatingId,
    #[sea_orm(iden = "movieId")]
    MovieId,
    #[sea_orm(iden = "userId")]
    UserId,
    Rating,
    Timestamp,
}
