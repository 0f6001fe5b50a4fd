//! Participant entity - an attendee with skills, check-in state and an optional team.
//!
//! Skills are stored as a JSON array in a single column.

use sea_orm::{FromJsonQueryResult, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Skill tags stored as a JSON array
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SkillTags(pub Vec<String>);

/// Participant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    /// UUID assigned on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    /// Full name
    pub name: String,
    /// Contact email, empty when unset
    pub email: String,
    /// Skill tags
    #[sea_orm(column_type = "Json")]
    pub skills: SkillTags,
    /// Whether the participant has arrived
    pub checked_in: bool,
    /// Team membership, `None` when unassigned
    pub team_id: Option<String>,
    /// Insert time
    pub created_at: DateTimeUtc,
}

/// Team and reservation links are plain id columns
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
