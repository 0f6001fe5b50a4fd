//! Database configuration module for `HackathonBuddy`.
//!
//! This module handles the connection to the remote table store and table creation
//! using `SeaORM`. Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs.

use crate::entities::{BudgetEntry, Decision, Hardware, Participant, Reservation, Team, Todo};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::debug;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/hackathon_buddy.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates every planner table that does not exist yet.
///
/// `todos` is created before `decisions` because decisions reference it.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Todo),
        schema.create_table_from_entity(Decision),
        schema.create_table_from_entity(BudgetEntry),
        schema.create_table_from_entity(Hardware),
        schema.create_table_from_entity(Team),
        schema.create_table_from_entity(Participant),
        schema.create_table_from_entity(Reservation),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        budget_entry::Model as BudgetEntryModel, decision::Model as DecisionModel,
        hardware::Model as HardwareModel, participant::Model as ParticipantModel,
        reservation::Model as ReservationModel, team::Model as TeamModel,
        todo::Model as TodoModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<TodoModel> = Todo::find().limit(1).all(&db).await?;
        let _: Vec<DecisionModel> = Decision::find().limit(1).all(&db).await?;
        let _: Vec<BudgetEntryModel> = BudgetEntry::find().limit(1).all(&db).await?;
        let _: Vec<HardwareModel> = Hardware::find().limit(1).all(&db).await?;
        let _: Vec<TeamModel> = Team::find().limit(1).all(&db).await?;
        let _: Vec<ParticipantModel> = Participant::find().limit(1).all(&db).await?;
        let _: Vec<ReservationModel> = Reservation::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
