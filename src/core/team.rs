//! Team table access.
//!
//! Deleting a team here only removes the team row. Clearing the members'
//! `team_id` is [`crate::core::participant::clear_team`], since participants may
//! be stored elsewhere.

use crate::{
    core::ensure_affected,
    entities::{Team, team},
    errors::Result,
    models::{self, TeamDraft},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

impl From<team::Model> for models::Team {
    fn from(row: team::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            color: row.color,
            created_at: row.created_at,
        }
    }
}

fn to_active(user_id: &str, record: &models::Team) -> team::ActiveModel {
    team::ActiveModel {
        id: Set(record.id.clone()),
        user_id: Set(user_id.to_string()),
        name: Set(record.name.clone()),
        description: Set(record.description.clone()),
        color: Set(record.color.clone()),
        created_at: Set(record.created_at),
    }
}

/// Retrieves the user's teams, newest first.
pub async fn get_all(db: &DatabaseConnection, user_id: &str) -> Result<Vec<models::Team>> {
    Ok(Team::find()
        .filter(team::Column::UserId.eq(user_id))
        .order_by_desc(team::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Inserts a new team; the id and timestamp are assigned here.
pub async fn create(db: &DatabaseConnection, user_id: &str, draft: TeamDraft) -> Result<models::Team> {
    let record = draft.into_team();
    Team::insert(to_active(user_id, &record))
        .exec_without_returning(db)
        .await?;
    Ok(record)
}

/// Overwrites name, description and color.
pub async fn update(db: &DatabaseConnection, user_id: &str, id: &str, draft: &TeamDraft) -> Result<()> {
    let result = Team::update_many()
        .col_expr(team::Column::Name, Expr::value(draft.name.as_str()))
        .col_expr(
            team::Column::Description,
            Expr::value(draft.description.as_str()),
        )
        .col_expr(team::Column::Color, Expr::value(draft.color.as_str()))
        .filter(team::Column::Id.eq(id))
        .filter(team::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "team", id)
}

/// Deletes one team. Members are unassigned separately with
/// [`crate::core::participant::clear_team`].
pub async fn delete(db: &DatabaseConnection, user_id: &str, id: &str) -> Result<()> {
    let result = Team::delete_many()
        .filter(team::Column::Id.eq(id))
        .filter(team::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "team", id)
}

/// Replaces every team the user owns.
pub async fn replace_all(db: &DatabaseConnection, user_id: &str, teams: &[models::Team]) -> Result<()> {
    let txn = db.begin().await?;
    Team::delete_many()
        .filter(team::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    if !teams.is_empty() {
        Team::insert_many(teams.iter().map(|record| to_active(user_id, record)))
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_team_crud() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create(
            &db,
            "user1",
            TeamDraft {
                name: "Rustaceans".to_string(),
                description: String::new(),
                color: "Orange".to_string(),
            },
        )
        .await?;

        update(
            &db,
            "user1",
            &created.id,
            &TeamDraft {
                name: "Crabs".to_string(),
                description: "Sideways".to_string(),
                color: "Red".to_string(),
            },
        )
        .await?;

        let teams = get_all(&db, "user1").await?;
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].name, "Crabs");
        assert_eq!(teams[0].color, "Red");

        delete(&db, "user1", &created.id).await?;
        assert!(get_all(&db, "user1").await?.is_empty());

        Ok(())
    }
}
