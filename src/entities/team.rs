//! Team entity - a named, colored group that participants may point at.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Team database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    /// UUID assigned on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    /// Team name shown in lists
    pub name: String,
    /// Optional blurb, empty when unset
    pub description: String,
    /// Palette name, e.g. `"Blue"`
    pub color: String,
    /// Insert time
    pub created_at: DateTimeUtc,
}

/// Participants reference teams through a nullable `team_id` without a
/// table-level constraint, so either side may live in local storage
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
