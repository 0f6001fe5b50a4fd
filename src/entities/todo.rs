//! Todo entity - a planning task owned by one user.
//!
//! Decisions hang off a todo through `decisions.todo_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Todo database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    /// UUID assigned on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    /// Short task title
    pub title: String,
    /// Whether the task is done
    pub completed: bool,
    /// Insert time, used for newest-first ordering
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Todo and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One todo has many decisions
    #[sea_orm(has_many = "super::decision::Entity")]
    Decisions,
}

impl Related<super::decision::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Decisions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
