//! Decision table access.
//!
//! Decisions carry no `user_id` of their own; every call checks that the owning
//! todo belongs to the user first.

use crate::{
    core::{ensure_affected, todo::ensure_owned},
    entities::{Decision, decision},
    errors::Result,
    models,
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use std::collections::HashMap;

impl From<decision::Model> for models::Decision {
    fn from(row: decision::Model) -> Self {
        Self {
            id: row.id,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

fn to_active(todo_id: &str, record: &models::Decision) -> decision::ActiveModel {
    decision::ActiveModel {
        id: Set(record.id.clone()),
        todo_id: Set(todo_id.to_string()),
        text: Set(record.text.clone()),
        created_at: Set(record.created_at),
    }
}

/// Loads decisions for many todos at once, grouped by todo id, oldest first.
pub async fn get_for_todos<C>(
    db: &C,
    todo_ids: &[String],
) -> Result<HashMap<String, Vec<models::Decision>>>
where
    C: ConnectionTrait,
{
    let mut grouped: HashMap<String, Vec<models::Decision>> = HashMap::new();
    if todo_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = Decision::find()
        .filter(decision::Column::TodoId.is_in(todo_ids.iter().cloned()))
        .order_by_asc(decision::Column::CreatedAt)
        .all(db)
        .await?;

    for row in rows {
        grouped
            .entry(row.todo_id.clone())
            .or_default()
            .push(row.into());
    }
    Ok(grouped)
}

/// Records a decision on one of the user's todos.
pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    todo_id: &str,
    text: &str,
) -> Result<models::Decision> {
    ensure_owned(db, user_id, todo_id).await?;

    let record = models::Decision::new(text);
    Decision::insert(to_active(todo_id, &record))
        .exec_without_returning(db)
        .await?;
    Ok(record)
}

/// Replaces a decision's text.
pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    todo_id: &str,
    id: &str,
    text: &str,
) -> Result<()> {
    ensure_owned(db, user_id, todo_id).await?;

    let result = Decision::update_many()
        .col_expr(decision::Column::Text, Expr::value(text))
        .filter(decision::Column::Id.eq(id))
        .filter(decision::Column::TodoId.eq(todo_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "decision", id)
}

/// Deletes one decision.
pub async fn delete(db: &DatabaseConnection, user_id: &str, todo_id: &str, id: &str) -> Result<()> {
    ensure_owned(db, user_id, todo_id).await?;

    let result = Decision::delete_many()
        .filter(decision::Column::Id.eq(id))
        .filter(decision::Column::TodoId.eq(todo_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "decision", id)
}

/// Inserts already-identified decisions for one todo, used by bulk restore.
pub(crate) async fn insert_all<C>(db: &C, todo_id: &str, decisions: &[models::Decision]) -> Result<()>
where
    C: ConnectionTrait,
{
    if decisions.is_empty() {
        return Ok(());
    }
    Decision::insert_many(decisions.iter().map(|record| to_active(todo_id, record)))
        .exec_without_returning(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::todo, errors::Error, test_utils::setup_test_db};

    #[tokio::test]
    async fn test_create_update_delete_decision() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = todo::create(&db, "user1", "Choose caterer").await?;

        let first = create(&db, "user1", &owner.id, "Shortlist three").await?;
        let second = create(&db, "user1", &owner.id, "Ask for vegan options").await?;
        update(&db, "user1", &owner.id, &first.id, "Shortlist two").await?;

        let grouped = get_for_todos(&db, &[owner.id.clone()]).await?;
        let texts: Vec<&str> = grouped[&owner.id].iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts.len(), 2);
        assert!(texts.contains(&"Shortlist two"));
        assert!(texts.contains(&"Ask for vegan options"));

        delete(&db, "user1", &owner.id, &second.id).await?;
        let grouped = get_for_todos(&db, &[owner.id.clone()]).await?;
        assert_eq!(grouped[&owner.id].len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_decision_on_foreign_todo_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = todo::create(&db, "user1", "Choose caterer").await?;

        let result = create(&db, "user2", &owner.id, "Sneaky").await;
        assert!(matches!(result, Err(Error::NotFound { entity: "todo", .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_for_no_todos() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get_for_todos(&db, &[]).await?.is_empty());
        Ok(())
    }
}
