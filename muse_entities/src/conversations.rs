use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Latest talk context per user. `context` holds the JSON-encoded history.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub personality: String,
    #[sea_orm(column_type = "Text")]
    pub context: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
