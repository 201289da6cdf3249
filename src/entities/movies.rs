use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "movieId")]
    pub movie_id: i32,
    pub title: String,
    pub year: Option<i32>,
    #[sea_orm(column_name = "imdbId")]
    pub imdb_id: String,
    pub director: String,
    pub plot: String,
    #[sea_orm(column_name = "boxoffice")]
    pub box_office: String,
    pub runtime: String,
    pub rated: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
