//! Todo table access.
//!
//! Todos are returned newest first with their decisions attached in the order
//! they were recorded. Deleting a todo deletes its decisions in the same
//! database transaction.

use crate::{
    core::{decision, ensure_affected},
    entities::{Decision, DecisionColumn, Todo, todo},
    errors::{Error, Result},
    models,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

fn to_record(row: todo::Model, decisions: Vec<models::Decision>) -> models::Todo {
    models::Todo {
        id: row.id,
        title: row.title,
        completed: row.completed,
        decisions,
        created_at: row.created_at,
    }
}

fn to_active(user_id: &str, record: &models::Todo) -> todo::ActiveModel {
    todo::ActiveModel {
        id: Set(record.id.clone()),
        user_id: Set(user_id.to_string()),
        title: Set(record.title.clone()),
        completed: Set(record.completed),
        created_at: Set(record.created_at),
    }
}

/// Retrieves all of the user's todos, newest first, with their decisions.
pub async fn get_all(db: &DatabaseConnection, user_id: &str) -> Result<Vec<models::Todo>> {
    let rows = Todo::find()
        .filter(todo::Column::UserId.eq(user_id))
        .order_by_desc(todo::Column::CreatedAt)
        .all(db)
        .await?;

    let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
    let mut decisions = decision::get_for_todos(db, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let attached = decisions.remove(&row.id).unwrap_or_default();
            to_record(row, attached)
        })
        .collect())
}

/// Returns `Ok(())` if the todo exists and belongs to the user.
pub(crate) async fn ensure_owned<C>(db: &C, user_id: &str, todo_id: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    Todo::find_by_id(todo_id.to_string())
        .filter(todo::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| Error::not_found("todo", todo_id))
}

/// Inserts a new incomplete todo; the id and timestamp are assigned here.
pub async fn create(db: &DatabaseConnection, user_id: &str, title: &str) -> Result<models::Todo> {
    let record = models::Todo::new(title);
    Todo::insert(to_active(user_id, &record))
        .exec_without_returning(db)
        .await?;
    Ok(record)
}

/// Sets the completed flag.
pub async fn set_completed(
    db: &DatabaseConnection,
    user_id: &str,
    id: &str,
    completed: bool,
) -> Result<()> {
    let result = Todo::update_many()
        .col_expr(todo::Column::Completed, Expr::value(completed))
        .filter(todo::Column::Id.eq(id))
        .filter(todo::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "todo", id)
}

/// Changes the title.
pub async fn rename(db: &DatabaseConnection, user_id: &str, id: &str, title: &str) -> Result<()> {
    let result = Todo::update_many()
        .col_expr(todo::Column::Title, Expr::value(title))
        .filter(todo::Column::Id.eq(id))
        .filter(todo::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "todo", id)
}

/// Deletes a todo and all of its decisions atomically.
pub async fn delete(db: &DatabaseConnection, user_id: &str, id: &str) -> Result<()> {
    let txn = db.begin().await?;

    ensure_owned(&txn, user_id, id).await?;
    Decision::delete_many()
        .filter(DecisionColumn::TodoId.eq(id))
        .exec(&txn)
        .await?;
    Todo::delete_many()
        .filter(todo::Column::Id.eq(id))
        .filter(todo::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(())
}

/// Replaces every todo and decision the user owns with `todos`.
pub async fn replace_all(
    db: &DatabaseConnection,
    user_id: &str,
    todos: &[models::Todo],
) -> Result<()> {
    let txn = db.begin().await?;

    let existing: Vec<String> = Todo::find()
        .filter(todo::Column::UserId.eq(user_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|row| row.id)
        .collect();
    if !existing.is_empty() {
        Decision::delete_many()
            .filter(DecisionColumn::TodoId.is_in(existing))
            .exec(&txn)
            .await?;
    }
    Todo::delete_many()
        .filter(todo::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    if !todos.is_empty() {
        Todo::insert_many(todos.iter().map(|record| to_active(user_id, record)))
            .exec_without_returning(&txn)
            .await?;
    }
    for record in todos {
        decision::insert_all(&txn, &record.id, &record.decisions).await?;
    }

    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_and_get_all_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create(&db, "user1", "Book venue").await?;
        let second = create(&db, "user1", "Order pizza").await?;
        create(&db, "user2", "Someone else's todo").await?;

        let todos = get_all(&db, "user1").await?;
        assert_eq!(todos.len(), 2);
        assert!(todos[0].created_at >= todos[1].created_at);
        let ids: Vec<&str> = todos.iter().map(|t| t.id.as_str()).collect();
        assert!(ids.contains(&first.id.as_str()));
        assert!(ids.contains(&second.id.as_str()));
        assert!(todos.iter().all(|t| !t.completed && t.decisions.is_empty()));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_completed_and_rename() -> Result<()> {
        let db = setup_test_db().await?;
        let todo = create(&db, "user1", "Book venue").await?;

        set_completed(&db, "user1", &todo.id, true).await?;
        rename(&db, "user1", &todo.id, "Book the big venue").await?;

        let todos = get_all(&db, "user1").await?;
        assert!(todos[0].completed);
        assert_eq!(todos[0].title, "Book the big venue");

        Ok(())
    }

    #[tokio::test]
    async fn test_updates_are_user_scoped() -> Result<()> {
        let db = setup_test_db().await?;
        let todo = create(&db, "user1", "Book venue").await?;

        let result = set_completed(&db, "intruder", &todo.id, true).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "todo", .. })));

        let result = delete(&db, "intruder", &todo.id).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert_eq!(get_all(&db, "user1").await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_removes_decisions() -> Result<()> {
        let db = setup_test_db().await?;
        let todo = create(&db, "user1", "Pick theme").await?;
        decision::create(&db, "user1", &todo.id, "Space theme").await?;

        delete(&db, "user1", &todo.id).await?;

        assert!(get_all(&db, "user1").await?.is_empty());
        let orphans = Decision::find().all(&db).await?;
        assert!(orphans.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_all() -> Result<()> {
        let db = setup_test_db().await?;
        create(&db, "user1", "Old todo").await?;
        create(&db, "user2", "Untouched").await?;

        let mut imported = models::Todo::new("Imported");
        imported.decisions.push(models::Decision::new("Keep it"));
        replace_all(&db, "user1", &[imported.clone()]).await?;

        let todos = get_all(&db, "user1").await?;
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, imported.id);
        assert_eq!(todos[0].title, "Imported");
        assert_eq!(todos[0].decisions.len(), 1);
        assert_eq!(todos[0].decisions[0].text, "Keep it");
        assert_eq!(get_all(&db, "user2").await?.len(), 1);

        Ok(())
    }
}
