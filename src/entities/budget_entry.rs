//! Budget entry entity - one income or expense line.
//!
//! The direction is stored as text in the `type` column (`"income"` or `"expense"`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_entries")]
pub struct Model {
    /// UUID assigned on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    /// `"income"` or `"expense"`
    #[sea_orm(column_name = "type")]
    pub kind: String,
    /// What the money is for
    pub description: String,
    /// Always positive; direction comes from `kind`
    pub amount: f64,
    /// Free-form category such as `"Venue"`
    pub category: String,
    /// Insert time
    pub created_at: DateTimeUtc,
}

/// Budget entries have no relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
