//! Participant table access.

use crate::{
    core::ensure_affected,
    entities::{
        Participant,
        participant::{self, SkillTags},
    },
    errors::Result,
    models::{self, ParticipantDraft},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

impl From<participant::Model> for models::Participant {
    fn from(row: participant::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            skills: row.skills.0,
            checked_in: row.checked_in,
            team_id: row.team_id,
            created_at: row.created_at,
        }
    }
}

fn to_active(user_id: &str, record: &models::Participant) -> participant::ActiveModel {
    participant::ActiveModel {
        id: Set(record.id.clone()),
        user_id: Set(user_id.to_string()),
        name: Set(record.name.clone()),
        email: Set(record.email.clone()),
        skills: Set(SkillTags(record.skills.clone())),
        checked_in: Set(record.checked_in),
        team_id: Set(record.team_id.clone()),
        created_at: Set(record.created_at),
    }
}

/// Retrieves the user's participants, newest first.
pub async fn get_all(db: &DatabaseConnection, user_id: &str) -> Result<Vec<models::Participant>> {
    Ok(Participant::find()
        .filter(participant::Column::UserId.eq(user_id))
        .order_by_desc(participant::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Inserts a new participant, not checked in.
pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    draft: ParticipantDraft,
) -> Result<models::Participant> {
    let record = draft.into_participant();
    Participant::insert(to_active(user_id, &record))
        .exec_without_returning(db)
        .await?;
    Ok(record)
}

/// Overwrites name, email, skills and team.
pub async fn update(
    db: &DatabaseConnection,
    user_id: &str,
    id: &str,
    draft: &ParticipantDraft,
) -> Result<()> {
    let active = participant::ActiveModel {
        name: Set(draft.name.clone()),
        email: Set(draft.email.clone()),
        skills: Set(SkillTags(draft.skills.clone())),
        team_id: Set(draft.team_id.clone()),
        ..Default::default()
    };

    let result = Participant::update_many()
        .set(active)
        .filter(participant::Column::Id.eq(id))
        .filter(participant::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "participant", id)
}

/// Sets the checked-in flag.
pub async fn set_checked_in(
    db: &DatabaseConnection,
    user_id: &str,
    id: &str,
    checked_in: bool,
) -> Result<()> {
    let result = Participant::update_many()
        .col_expr(participant::Column::CheckedIn, Expr::value(checked_in))
        .filter(participant::Column::Id.eq(id))
        .filter(participant::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "participant", id)
}

/// Points a participant at a team, or clears the membership with `None`.
pub async fn assign_team(
    db: &DatabaseConnection,
    user_id: &str,
    id: &str,
    team_id: Option<&str>,
) -> Result<()> {
    let result = Participant::update_many()
        .col_expr(
            participant::Column::TeamId,
            Expr::value(team_id.map(ToString::to_string)),
        )
        .filter(participant::Column::Id.eq(id))
        .filter(participant::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "participant", id)
}

/// Unassigns every member of a deleted team. Zero members is not an error.
pub async fn clear_team(db: &DatabaseConnection, user_id: &str, team_id: &str) -> Result<u64> {
    let result = Participant::update_many()
        .col_expr(participant::Column::TeamId, Expr::value(Option::<String>::None))
        .filter(participant::Column::TeamId.eq(team_id))
        .filter(participant::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Deletes one participant. Their reservations are left alone.
pub async fn delete(db: &DatabaseConnection, user_id: &str, id: &str) -> Result<()> {
    let result = Participant::delete_many()
        .filter(participant::Column::Id.eq(id))
        .filter(participant::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "participant", id)
}

/// Replaces every participant the user owns.
pub async fn replace_all(
    db: &DatabaseConnection,
    user_id: &str,
    participants: &[models::Participant],
) -> Result<()> {
    let txn = db.begin().await?;
    Participant::delete_many()
        .filter(participant::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    if !participants.is_empty() {
        Participant::insert_many(participants.iter().map(|record| to_active(user_id, record)))
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

    fn draft(name: &str, skills: &[&str]) -> ParticipantDraft {
        ParticipantDraft {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            skills: skills.iter().map(ToString::to_string).collect(),
            team_id: None,
        }
    }

    #[tokio::test]
    async fn test_skills_round_trip_through_json_column() -> Result<()> {
        let db = setup_test_db().await?;
        create(&db, "user1", draft("Ada", &["Backend", "AI/ML"])).await?;

        let participants = get_all(&db, "user1").await?;
        assert_eq!(participants[0].skills, vec!["Backend", "AI/ML"]);
        assert!(!participants[0].checked_in);

        Ok(())
    }

    #[tokio::test]
    async fn test_check_in_assign_and_clear_team() -> Result<()> {
        let db = setup_test_db().await?;
        let ada = create(&db, "user1", draft("Ada", &[])).await?;
        let bob = create(&db, "user1", draft("Bob", &[])).await?;

        set_checked_in(&db, "user1", &ada.id, true).await?;
        assign_team(&db, "user1", &ada.id, Some("team-1")).await?;
        assign_team(&db, "user1", &bob.id, Some("team-1")).await?;

        let cleared = clear_team(&db, "user1", "team-1").await?;
        assert_eq!(cleared, 2);

        let participants = get_all(&db, "user1").await?;
        assert!(participants.iter().all(|p| p.team_id.is_none()));
        assert!(participants.iter().any(|p| p.id == ada.id && p.checked_in));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_overwrites_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let ada = create(&db, "user1", draft("Ada", &["Design"])).await?;

        let mut edited = draft("Ada L.", &["Design", "Hardware"]);
        edited.team_id = Some("team-9".to_string());
        update(&db, "user1", &ada.id, &edited).await?;

        let participants = get_all(&db, "user1").await?;
        assert_eq!(participants[0].name, "Ada L.");
        assert_eq!(participants[0].skills, vec!["Design", "Hardware"]);
        assert_eq!(participants[0].team_id.as_deref(), Some("team-9"));

        Ok(())
    }
}
