use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "ratingId")]
    pub rating_id: i32,
    #[sea_orm(column_name = "movieId")]
    pub movie_id: i32,
    #[sea_orm(column_name = "userId")]
    pub user_id: i32,
    pub rating: f64,
    pub timestamp: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
