//! Decision entity - a free-text note attached to exactly one todo.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "decisions")]
pub struct Model {
    /// UUID assigned on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning todo
    pub todo_id: String,
    /// The recorded note
    pub text: String,
    /// Insert time, used for oldest-first ordering within a todo
    pub created_at: DateTimeUtc,
}

/// Defines the link from a decision to its todo
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each decision belongs to one todo
    #[sea_orm(
        belongs_to = "super::todo::Entity",
        from = "Column::TodoId",
        to = "super::todo::Column::Id"
    )]
    Todo,
}

impl Related<super::todo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Todo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
