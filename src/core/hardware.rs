//! Hardware table access.
//!
//! Only the total quantity is stored. Available units come from
//! [`crate::core::availability`].

use crate::{
    core::ensure_affected,
    entities::{Hardware, hardware},
    errors::Result,
    models::{self, HardwareDraft},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

impl From<hardware::Model> for models::Hardware {
    fn from(row: hardware::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

fn to_active(user_id: &str, record: &models::Hardware) -> hardware::ActiveModel {
    hardware::ActiveModel {
        id: Set(record.id.clone()),
        user_id: Set(user_id.to_string()),
        name: Set(record.name.clone()),
        description: Set(record.description.clone()),
        quantity: Set(record.quantity),
        created_at: Set(record.created_at),
    }
}

/// Retrieves the user's hardware, newest first.
pub async fn get_all(db: &DatabaseConnection, user_id: &str) -> Result<Vec<models::Hardware>> {
    Ok(Hardware::find()
        .filter(hardware::Column::UserId.eq(user_id))
        .order_by_desc(hardware::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Inserts a new item; the id and timestamp are assigned here.
pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    draft: HardwareDraft,
) -> Result<models::Hardware> {
    let record = draft.into_hardware();
    Hardware::insert(to_active(user_id, &record))
        .exec_without_returning(db)
        .await?;
    Ok(record)
}

/// Overwrites name, description and total quantity.
pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    id: &str,
    draft: &HardwareDraft,
) -> Result<()> {
    let result = Hardware::update_many()
        .col_expr(hardware::Column::Name, Expr::value(draft.name.as_str()))
        .col_expr(
            hardware::Column::Description,
            Expr::value(draft.description.as_str()),
        )
        .col_expr(hardware::Column::Quantity, Expr::value(draft.quantity))
        .filter(hardware::Column::Id.eq(id))
        .filter(hardware::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "hardware", id)
}

/// Deletes an item. Reservations that point at it are left alone.
pub async fn delete(db: &DatabaseConnection, user_id: &str, id: &str) -> Result<()> {
    let result = Hardware::delete_many()
        .filter(hardware::Column::Id.eq(id))
        .filter(hardware::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "hardware", id)
}

/// Replaces every hardware row the user owns.
pub async fn replace_all(
    db: &DatabaseConnection,
    user_id: &str,
    items: &[models::Hardware],
) -> Result<()> {
    let txn = db.begin().await?;
    Hardware::delete_many()
        .filter(hardware::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    if !items.is_empty() {
        Hardware::insert_many(items.iter().map(|record| to_active(user_id, record)))
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

    fn draft(name: &str, quantity: u32) -> HardwareDraft {
        HardwareDraft {
            name: name.to_string(),
            description: String::new(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_create_and_update_quantity() -> Result<()> {
        let db = setup_test_db().await?;
        let item = create(&db, "user1", draft("Raspberry Pi", 10)).await?;

        update(&db, "user1", &item.id, &draft("Raspberry Pi 5", 12)).await?;

        let items = get_all(&db, "user1").await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Raspberry Pi 5");
        assert_eq!(items[0].quantity, 12);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_is_user_scoped() -> Result<()> {
        let db = setup_test_db().await?;
        let item = create(&db, "user1", draft("Arduino", 4)).await?;

        assert!(delete(&db, "user2", &item.id).await.is_err());
        delete(&db, "user1", &item.id).await?;
        assert!(get_all(&db, "user1").await?.is_empty());

        Ok(())
    }
}
