//! Participants and the teams they belong to.
//!
//! The two lists may live on different backends. Team membership is a plain
//! `team_id` on the participant, so deleting a team also has to clear it from
//! every member.

use super::{Backend, position, required, settle};
use crate::{
    core::{participant, team},
    errors::{Error, Result},
    models::{Participant, ParticipantDraft, Team, TeamDraft},
    storage::{PARTICIPANTS_KEY, TEAMS_KEY, migrate_participants},
};
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// Trims skills and drops blanks and repeats, keeping first-seen order.
fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills.iter().map(|s| s.trim()) {
        if !skill.is_empty() && !kept.iter().any(|k| k == skill) {
            kept.push(skill.to_string());
        }
    }
    kept
}

/// Participants and teams, each newest first.
#[derive(Debug)]
pub struct Roster {
    participants: Vec<Participant>,
    teams: Vec<Team>,
    participant_backend: Backend,
    team_backend: Backend,
    palette: Vec<String>,
}

impl Roster {
    /// Loads both lists. `palette` holds the allowed team color names.
    pub async fn load(participant_backend: Backend, team_backend: Backend, palette: Vec<String>) -> Result<Self> {
        let participants = match &participant_backend {
            Backend::Local(storage) => {
                storage.load(PARTICIPANTS_KEY, Vec::new(), Some(migrate_participants))
            }
            Backend::Remote(remote) => participant::get_all(&remote.db, &remote.user.id).await?,
        };
        let teams = match &team_backend {
            Backend::Local(storage) => storage.load(TEAMS_KEY, Vec::new(), None),
            Backend::Remote(remote) => team::get_all(&remote.db, &remote.user.id).await?,
        };
        Ok(Self {
            participants,
            teams,
            participant_backend,
            team_backend,
            palette,
        })
    }

    /// Participants, newest first.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Teams, newest first.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Participant by id.
    #[must_use]
    pub fn find_participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Team by id.
    #[must_use]
    pub fn find_team(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Participants having `skill` (exact match) and the given check-in state.
    /// `None` skips that filter.
    #[must_use]
    pub fn filter(&self, skill: Option<&str>, checked_in: Option<bool>) -> Vec<&Participant> {
        self.participants
            .iter()
            .filter(|p| skill.is_none_or(|s| p.skills.iter().any(|k| k == s)))
            .filter(|p| checked_in.is_none_or(|c| p.checked_in == c))
            .collect()
    }

    /// Every skill any participant lists, sorted and deduplicated.
    #[must_use]
    pub fn all_skills(&self) -> Vec<String> {
        self.participants
            .iter()
            .flat_map(|p| p.skills.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Participants who have checked in.
    #[must_use]
    pub fn checked_in_count(&self) -> usize {
        self.participants.iter().filter(|p| p.checked_in).count()
    }

    /// Participants without a team.
    #[must_use]
    pub fn unassigned_count(&self) -> usize {
        self.participants.iter().filter(|p| p.team_id.is_none()).count()
    }

    /// Participants whose team is `team_id`.
    #[must_use]
    pub fn team_members(&self, team_id: &str) -> Vec<&Participant> {
        self.participants
            .iter()
            .filter(|p| p.team_id.as_deref() == Some(team_id))
            .collect()
    }

    /// The participant's team, if it still exists.
    #[must_use]
    pub fn team_of(&self, participant: &Participant) -> Option<&Team> {
        participant.team_id.as_deref().and_then(|id| self.find_team(id))
    }

    fn palette_color(&self, color: &str) -> Result<String> {
        self.palette
            .iter()
            .find(|name| name.eq_ignore_ascii_case(color.trim()))
            .cloned()
            .ok_or_else(|| {
                Error::validation(format!(
                    "Unknown team color '{color}', expected one of: {}",
                    self.palette.join(", ")
                ))
            })
    }

    fn ensure_team(&self, team_id: Option<&str>) -> Result<()> {
        match team_id {
            Some(id) if self.find_team(id).is_none() => Err(Error::not_found("team", id)),
            _ => Ok(()),
        }
    }

    /// Validated copy of `draft`. The team reference is only checked when it
    /// differs from `current_team`, so a stale reference does not block edits.
    fn participant_draft(&self, draft: ParticipantDraft, current_team: Option<&str>) -> Result<ParticipantDraft> {
        if draft.team_id.as_deref() != current_team {
            self.ensure_team(draft.team_id.as_deref())?;
        }
        Ok(ParticipantDraft {
            name: required(&draft.name, "Participant name")?,
            email: draft.email.trim().to_string(),
            skills: normalize_skills(&draft.skills),
            team_id: draft.team_id,
        })
    }

    /// Validated copy of `draft`. An unchanged color is kept as stored, since
    /// imported teams may carry colors outside the palette.
    fn team_draft(&self, draft: TeamDraft, current_color: Option<&str>) -> Result<TeamDraft> {
        let color = if current_color == Some(draft.color.as_str()) {
            draft.color
        } else {
            self.palette_color(&draft.color)?
        };
        Ok(TeamDraft {
            name: required(&draft.name, "Team name")?,
            description: draft.description.trim().to_string(),
            color,
        })
    }

    /// Registers a participant, not checked in and without a team.
    #[instrument(skip(self))]
    pub async fn add_participant(&mut self, draft: ParticipantDraft) -> Result<Participant> {
        let draft = self.participant_draft(
            ParticipantDraft {
                team_id: None,
                ..draft
            },
            None,
        )?;
        let snapshot = self.participants.clone();
        let provisional = draft.clone().into_participant();
        self.participants.insert(0, provisional.clone());

        let outcome = match &self.participant_backend {
            Backend::Local(storage) => storage
                .save(PARTICIPANTS_KEY, &self.participants)
                .map(|()| provisional),
            Backend::Remote(remote) => participant::create(&remote.db, &remote.user.id, draft).await,
        };
        let created = settle(&mut self.participants, snapshot, outcome, "add participant")?;
        self.participants[0] = created.clone();
        Ok(created)
    }

    /// Overwrites name, email, skills and team. Check-in state is kept.
    #[instrument(skip(self))]
    pub async fn edit_participant(&mut self, id: &str, draft: ParticipantDraft) -> Result<()> {
        let index = position(&self.participants, id, "participant", |p| p.id.as_str())?;
        let draft = self.participant_draft(draft, self.participants[index].team_id.as_deref())?;
        let snapshot = self.participants.clone();
        let record = &mut self.participants[index];
        record.name.clone_from(&draft.name);
        record.email.clone_from(&draft.email);
        record.skills.clone_from(&draft.skills);
        record.team_id.clone_from(&draft.team_id);

        let outcome = match &self.participant_backend {
            Backend::Local(storage) => storage.save(PARTICIPANTS_KEY, &self.participants),
            Backend::Remote(remote) => {
                participant::update(&remote.db, &remote.user.id, id, &draft).await
            }
        };
        settle(&mut self.participants, snapshot, outcome, "update participant")
    }

    /// Deletes a participant. Their reservations are left in place.
    #[instrument(skip(self))]
    pub async fn remove_participant(&mut self, id: &str) -> Result<Participant> {
        let index = position(&self.participants, id, "participant", |p| p.id.as_str())?;
        let snapshot = self.participants.clone();
        let removed = self.participants.remove(index);

        let outcome = match &self.participant_backend {
            Backend::Local(storage) => storage.save(PARTICIPANTS_KEY, &self.participants),
            Backend::Remote(remote) => participant::delete(&remote.db, &remote.user.id, id).await,
        };
        settle(&mut self.participants, snapshot, outcome, "delete participant")?;
        Ok(removed)
    }

    /// Flips the checked-in flag, returning the new value.
    #[instrument(skip(self))]
    pub async fn toggle_check_in(&mut self, id: &str) -> Result<bool> {
        let index = position(&self.participants, id, "participant", |p| p.id.as_str())?;
        let snapshot = self.participants.clone();
        let checked_in = !self.participants[index].checked_in;
        self.participants[index].checked_in = checked_in;

        let outcome = match &self.participant_backend {
            Backend::Local(storage) => storage.save(PARTICIPANTS_KEY, &self.participants),
            Backend::Remote(remote) => {
                participant::set_checked_in(&remote.db, &remote.user.id, id, checked_in).await
            }
        };
        settle(&mut self.participants, snapshot, outcome, "toggle check-in")?;
        Ok(checked_in)
    }

    /// Moves a participant into a team, or out of any team with `None`.
    #[instrument(skip(self))]
    pub async fn assign_team(&mut self, participant_id: &str, team_id: Option<&str>) -> Result<()> {
        self.ensure_team(team_id)?;
        let index = position(&self.participants, participant_id, "participant", |p| p.id.as_str())?;
        let snapshot = self.participants.clone();
        self.participants[index].team_id = team_id.map(ToString::to_string);

        let outcome = match &self.participant_backend {
            Backend::Local(storage) => storage.save(PARTICIPANTS_KEY, &self.participants),
            Backend::Remote(remote) => {
                participant::assign_team(&remote.db, &remote.user.id, participant_id, team_id).await
            }
        };
        settle(&mut self.participants, snapshot, outcome, "assign team")
    }

    /// Creates a team. The color must be a palette name.
    #[instrument(skip(self))]
    pub async fn add_team(&mut self, draft: TeamDraft) -> Result<Team> {
        let draft = self.team_draft(draft, None)?;
        let snapshot = self.teams.clone();
        let provisional = draft.clone().into_team();
        self.teams.insert(0, provisional.clone());

        let outcome = match &self.team_backend {
            Backend::Local(storage) => storage.save(TEAMS_KEY, &self.teams).map(|()| provisional),
            Backend::Remote(remote) => team::create(&remote.db, &remote.user.id, draft).await,
        };
        let created = settle(&mut self.teams, snapshot, outcome, "add team")?;
        self.teams[0] = created.clone();
        Ok(created)
    }

    /// Overwrites a team's name, color and description.
    #[instrument(skip(self))]
    pub async fn edit_team(&mut self, id: &str, draft: TeamDraft) -> Result<()> {
        let index = position(&self.teams, id, "team", |t| t.id.as_str())?;
        let draft = self.team_draft(draft, Some(self.teams[index].color.as_str()))?;
        let snapshot = self.teams.clone();
        let record = &mut self.teams[index];
        record.name.clone_from(&draft.name);
        record.description.clone_from(&draft.description);
        record.color.clone_from(&draft.color);

        let outcome = match &self.team_backend {
            Backend::Local(storage) => storage.save(TEAMS_KEY, &self.teams),
            Backend::Remote(remote) => team::update(&remote.db, &remote.user.id, id, &draft).await,
        };
        settle(&mut self.teams, snapshot, outcome, "update team")
    }

    /// Deletes a team and unassigns its members.
    ///
    /// The team is deleted first. If that fails neither list changes; if
    /// clearing the members fails afterwards, only the participant list is
    /// rolled back.
    #[instrument(skip(self))]
    pub async fn remove_team(&mut self, id: &str) -> Result<Team> {
        let index = position(&self.teams, id, "team", |t| t.id.as_str())?;
        let team_snapshot = self.teams.clone();
        let removed = self.teams.remove(index);

        let outcome = match &self.team_backend {
            Backend::Local(storage) => storage.save(TEAMS_KEY, &self.teams),
            Backend::Remote(remote) => team::delete(&remote.db, &remote.user.id, id).await,
        };
        settle(&mut self.teams, team_snapshot, outcome, "delete team")?;

        let member_snapshot = self.participants.clone();
        let mut unassigned = 0_u64;
        for member in self
            .participants
            .iter_mut()
            .filter(|p| p.team_id.as_deref() == Some(id))
        {
            member.team_id = None;
            unassigned += 1;
        }

        let outcome = match &self.participant_backend {
            Backend::Local(storage) => storage
                .save(PARTICIPANTS_KEY, &self.participants)
                .map(|()| unassigned),
            Backend::Remote(remote) => participant::clear_team(&remote.db, &remote.user.id, id).await,
        };
        let cleared = settle(&mut self.participants, member_snapshot, outcome, "unassign team members")?;
        info!("Deleted team '{}', unassigned {cleared} members", removed.name);
        Ok(removed)
    }

    /// Swaps in `participants` wholesale.
    pub async fn replace_participants(&mut self, participants: Vec<Participant>) -> Result<()> {
        let snapshot = std::mem::replace(&mut self.participants, participants);
        let outcome = match &self.participant_backend {
            Backend::Local(storage) => storage.save(PARTICIPANTS_KEY, &self.participants),
            Backend::Remote(remote) => {
                participant::replace_all(&remote.db, &remote.user.id, &self.participants).await
            }
        };
        settle(&mut self.participants, snapshot, outcome, "restore participants")
    }

    /// Swaps in `teams` wholesale.
    pub async fn replace_teams(&mut self, teams: Vec<Team>) -> Result<()> {
        let snapshot = std::mem::replace(&mut self.teams, teams);
        let outcome = match &self.team_backend {
            Backend::Local(storage) => storage.save(TEAMS_KEY, &self.teams),
            Backend::Remote(remote) => {
                team::replace_all(&remote.db, &remote.user.id, &self.teams).await
            }
        };
        settle(&mut self.teams, snapshot, outcome, "restore teams")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::planner::PlannerConfig, test_utils::*};

    fn palette() -> Vec<String> {
        PlannerConfig::default().color_names()
    }

    fn team_draft(name: &str, color: &str) -> TeamDraft {
        TeamDraft {
            name: name.to_string(),
            description: String::new(),
            color: color.to_string(),
        }
    }

    #[test]
    fn test_normalize_skills() {
        let raw: Vec<String> = ["  Rust ", "", "Design", "Rust", "   "]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(normalize_skills(&raw), vec!["Rust", "Design"]);
    }

    #[tokio::test]
    async fn test_participant_queries() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut roster =
            Roster::load(local_backend(dir.path()), local_backend(dir.path()), palette()).await?;

        let ada = roster
            .add_participant(participant_draft("Ada", &["Backend", " AI/ML ", "Backend"]))
            .await?;
        roster
            .add_participant(participant_draft("Grace", &["Frontend"]))
            .await?;
        assert_eq!(ada.skills, vec!["Backend", "AI/ML"]);
        assert!(!ada.checked_in);

        assert!(roster.toggle_check_in(&ada.id).await?);
        assert_eq!(roster.checked_in_count(), 1);
        assert_eq!(roster.all_skills(), vec!["AI/ML", "Backend", "Frontend"]);
        assert_eq!(roster.filter(Some("Backend"), None).len(), 1);
        assert_eq!(roster.filter(None, Some(false)).len(), 1);
        assert_eq!(roster.filter(Some("Frontend"), Some(true)).len(), 0);

        let reloaded =
            Roster::load(local_backend(dir.path()), local_backend(dir.path()), palette()).await?;
        assert_eq!(reloaded.participants().len(), 2);
        assert_eq!(reloaded.checked_in_count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_teams_and_membership_remote() -> Result<()> {
        let backend = remote_backend().await?;
        let mut roster = Roster::load(backend.clone(), backend.clone(), palette()).await?;

        let blue = roster.add_team(team_draft("Blue Shift", "blue")).await?;
        assert_eq!(blue.color, "Blue");
        let ada = roster.add_participant(participant_draft("Ada", &[])).await?;
        let bob = roster.add_participant(participant_draft("Bob", &[])).await?;

        roster.assign_team(&ada.id, Some(&blue.id)).await?;
        roster.assign_team(&bob.id, Some(&blue.id)).await?;
        assert_eq!(roster.team_members(&blue.id).len(), 2);
        assert_eq!(roster.unassigned_count(), 0);
        let member = roster
            .find_participant(&ada.id)
            .ok_or_else(|| Error::not_found("participant", &ada.id))?;
        assert_eq!(roster.team_of(member).map(|t| t.name.as_str()), Some("Blue Shift"));

        assert!(matches!(
            roster.assign_team(&ada.id, Some("missing")).await,
            Err(Error::NotFound { entity: "team", .. })
        ));

        roster.remove_team(&blue.id).await?;
        assert!(roster.teams().is_empty());
        assert_eq!(roster.unassigned_count(), 2);

        let reloaded = Roster::load(backend.clone(), backend, palette()).await?;
        assert!(reloaded.participants().iter().all(|p| p.team_id.is_none()));

        Ok(())
    }

    #[tokio::test]
    async fn test_team_validation() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut roster =
            Roster::load(local_backend(dir.path()), local_backend(dir.path()), palette()).await?;

        assert!(matches!(
            roster.add_team(team_draft("Night Owls", "Mauve")).await,
            Err(Error::Validation { .. })
        ));
        assert!(roster.add_team(team_draft(" ", "Red")).await.is_err());
        assert!(roster.add_participant(participant_draft("", &[])).await.is_err());
        assert!(roster.teams().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_team_delete_keeps_members() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let team = team_draft("Red Rockets", "Red").into_team();
        let mut member = participant_draft("Ada", &[]).into_participant();
        member.team_id = Some(team.id.clone());

        let mut roster = Roster {
            participants: vec![member.clone()],
            teams: vec![team.clone()],
            participant_backend: local_backend(dir.path()),
            team_backend: failing_remote_backend(),
            palette: palette(),
        };

        assert!(roster.remove_team(&team.id).await.is_err());
        assert_eq!(roster.teams().to_vec(), vec![team]);
        assert_eq!(roster.participants().to_vec(), vec![member]);

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_keeps_stale_team_reference() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut roster =
            Roster::load(local_backend(dir.path()), local_backend(dir.path()), palette()).await?;
        let mut ada = participant_draft("Ada", &[]).into_participant();
        ada.team_id = Some("deleted-team".to_string());
        roster.replace_participants(vec![ada.clone()]).await?;

        let rename = ParticipantDraft {
            name: "Ada Lovelace".to_string(),
            team_id: ada.team_id.clone(),
            ..participant_draft("Ada", &[])
        };
        roster.edit_participant(&ada.id, rename).await?;
        let edited = roster
            .find_participant(&ada.id)
            .ok_or_else(|| Error::not_found("participant", &ada.id))?;
        assert_eq!(edited.name, "Ada Lovelace");
        assert_eq!(edited.team_id.as_deref(), Some("deleted-team"));

        // Pointing at another missing team is still rejected
        let moved = ParticipantDraft {
            team_id: Some("other-missing".to_string()),
            ..participant_draft("Ada", &[])
        };
        assert!(matches!(
            roster.edit_participant(&ada.id, moved).await,
            Err(Error::NotFound { entity: "team", .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_rename_imported_team_keeps_its_color() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut roster =
            Roster::load(local_backend(dir.path()), local_backend(dir.path()), palette()).await?;
        let imported_color = "bg-red-500/20 text-red-400 border-red-500/30";
        let team = team_draft("Red Rockets", imported_color).into_team();
        roster.replace_teams(vec![team.clone()]).await?;

        roster
            .edit_team(&team.id, team_draft("Rocket Science", imported_color))
            .await?;
        assert_eq!(roster.teams()[0].name, "Rocket Science");
        assert_eq!(roster.teams()[0].color, imported_color);

        assert!(matches!(
            roster.edit_team(&team.id, team_draft("Rocket Science", "Mauve")).await,
            Err(Error::Validation { .. })
        ));
        roster
            .edit_team(&team.id, team_draft("Rocket Science", "green"))
            .await?;
        assert_eq!(roster.teams()[0].color, "Green");

        Ok(())
    }
}
