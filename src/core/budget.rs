//! Budget entry table access.

use crate::{
    core::ensure_affected,
    entities::{BudgetEntry, budget_entry},
    errors::Result,
    models::{self, BudgetDraft, BudgetKind},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::warn;

fn to_record(row: budget_entry::Model) -> models::BudgetEntry {
    let kind = row.kind.parse().unwrap_or_else(|_| {
        warn!("Budget entry {} has unknown kind '{}'", row.id, row.kind);
        BudgetKind::Expense
    });
    models::BudgetEntry {
        id: row.id,
        kind,
        description: row.description,
        amount: row.amount,
        category: row.category,
        created_at: row.created_at,
    }
}

fn to_active(user_id: &str, record: &models::BudgetEntry) -> budget_entry::ActiveModel {
    budget_entry::ActiveModel {
        id: Set(record.id.clone()),
        user_id: Set(user_id.to_string()),
        kind: Set(record.kind.as_str().to_string()),
        description: Set(record.description.clone()),
        amount: Set(record.amount),
        category: Set(record.category.clone()),
        created_at: Set(record.created_at),
    }
}

/// Retrieves the user's budget entries, newest first.
pub async fn get_all(db: &DatabaseConnection, user_id: &str) -> Result<Vec<models::BudgetEntry>> {
    Ok(BudgetEntry::find()
        .filter(budget_entry::Column::UserId.eq(user_id))
        .order_by_desc(budget_entry::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(to_record)
        .collect())
}

/// Inserts a new entry; the id and timestamp are assigned here.
pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    draft: BudgetDraft,
) -> Result<models::BudgetEntry> {
    let record = draft.into_entry();
    BudgetEntry::insert(to_active(user_id, &record))
        .exec_without_returning(db)
        .await?;
    Ok(record)
}

/// Overwrites kind, description, amount and category.
pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    id: &str,
    draft: &BudgetDraft,
) -> Result<()> {
    let result = BudgetEntry::update_many()
        .col_expr(budget_entry::Column::Kind, Expr::value(draft.kind.as_str()))
        .col_expr(
            budget_entry::Column::Description,
            Expr::value(draft.description.as_str()),
        )
        .col_expr(budget_entry::Column::Amount, Expr::value(draft.amount))
        .col_expr(
            budget_entry::Column::Category,
            Expr::value(draft.category.as_str()),
        )
        .filter(budget_entry::Column::Id.eq(id))
        .filter(budget_entry::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "budget entry", id)
}

/// Deletes one entry.
pub async fn delete(db: &DatabaseConnection, user_id: &str, id: &str) -> Result<()> {
    let result = BudgetEntry::delete_many()
        .filter(budget_entry::Column::Id.eq(id))
        .filter(budget_entry::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "budget entry", id)
}

/// Replaces every budget entry the user owns.
pub async fn replace_all(
    db: &DatabaseConnection,
    user_id: &str,
    entries: &[models::BudgetEntry],
) -> Result<()> {
    let txn = db.begin().await?;
    BudgetEntry::delete_many()
        .filter(budget_entry::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    if !entries.is_empty() {
        BudgetEntry::insert_many(entries.iter().map(|record| to_active(user_id, record)))
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{errors::Error, test_utils::setup_test_db};

    fn draft(kind: BudgetKind, description: &str, amount: f64) -> BudgetDraft {
        BudgetDraft {
            kind,
            description: description.to_string(),
            amount,
            category: "Venue".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_update_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let entry = create(&db, "user1", draft(BudgetKind::Expense, "Hall rental", 800.0)).await?;

        update(
            &db,
            "user1",
            &entry.id,
            &draft(BudgetKind::Income, "Hall refund", 200.0),
        )
        .await?;

        let entries = get_all(&db, "user1").await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, BudgetKind::Income);
        assert_eq!(entries[0].description, "Hall refund");
        assert_eq!(entries[0].amount, 200.0);

        delete(&db, "user1", &entry.id).await?;
        assert!(get_all(&db, "user1").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_entry() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete(&db, "user1", "nope").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_all_is_user_scoped() -> Result<()> {
        let db = setup_test_db().await?;
        create(&db, "user1", draft(BudgetKind::Expense, "Old", 1.0)).await?;
        create(&db, "user2", draft(BudgetKind::Expense, "Other user", 2.0)).await?;

        let imported = draft(BudgetKind::Income, "Sponsor", 1000.0).into_entry();
        replace_all(&db, "user1", &[imported.clone()]).await?;

        let entries = get_all(&db, "user1").await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, imported.id);
        assert_eq!(get_all(&db, "user2").await?.len(), 1);

        Ok(())
    }
}
