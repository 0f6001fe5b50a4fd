//! Hardware entity - an inventory item with a total unit count.
//!
//! Available units are never stored; they are derived from active reservations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Hardware database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hardware")]
pub struct Model {
    /// UUID assigned on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    /// Item name
    pub name: String,
    /// Optional notes, empty when unset
    pub description: String,
    /// Total units owned
    pub quantity: u32,
    /// Insert time
    pub created_at: DateTimeUtc,
}

/// Reservations point at hardware by id only; no table-level constraint
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
