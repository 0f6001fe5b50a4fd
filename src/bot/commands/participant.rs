//! Participant Discord commands - the `participant` group.
//!
//! Registration, check-in, team assignment and the filtered roster listing.
//! Skills are given as a comma-separated list.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{resolve, respond, split_list},
            handlers::autocomplete,
        },
        errors::{Error, Result},
        models::ParticipantDraft,
        planner::Roster,
    };
    use poise::serenity_prelude as serenity;

    fn participant_id(roster: &Roster, key: &str) -> Result<String> {
        resolve(
            roster.participants(),
            key,
            "participant",
            |p| p.id.as_str(),
            |p| p.name.as_str(),
        )
        .map(|p| p.id.clone())
    }

    /// Parent command for event participants.
    #[poise::command(
        slash_command,
        subcommands(
            "participant_add",
            "participant_edit",
            "participant_delete",
            "participant_checkin",
            "participant_assign",
            "participant_list",
            "participant_skills"
        )
    )]
    pub async fn participant(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Participant commands. Available subcommands:\n\
            `/participant add` - Register a participant\n\
            `/participant edit` - Change a participant's details\n\
            `/participant delete` - Remove a participant\n\
            `/participant checkin` - Toggle check-in\n\
            `/participant assign` - Put a participant in a team, or take them out\n\
            `/participant list` - Show participants, optionally filtered\n\
            `/participant skills` - Show every skill on the roster";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers a participant.
    #[poise::command(slash_command, rename = "add")]
    pub async fn participant_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Full name"] name: String,
        #[description = "Contact email"] email: Option<String>,
        #[description = "Skills, comma-separated (e.g., 'Backend, AI/ML')"] skills: Option<String>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = {
            let mut planner = session.lock().await;
            planner
                .roster
                .add_participant(ParticipantDraft {
                    name,
                    email: email.unwrap_or_default(),
                    skills: split_list(skills.as_deref()),
                    team_id: None,
                })
                .await
                .map(|p| format!("✅ Registered **{}**.", p.name))
        };
        respond(ctx, outcome).await
    }

    /// Changes a participant's details. Omitted fields keep their current value.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn participant_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Participant to change"]
        #[autocomplete = "autocomplete::autocomplete_participant"]
        participant: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New email"] email: Option<String>,
        #[description = "Replacement skills, comma-separated"] skills: Option<String>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = participant_id(&planner.roster, &participant)?;
            let current = planner
                .roster
                .find_participant(&id)
                .ok_or_else(|| Error::not_found("participant", &id))?;
            let draft = ParticipantDraft {
                name: name.unwrap_or_else(|| current.name.clone()),
                email: email.unwrap_or_else(|| current.email.clone()),
                skills: skills.map_or_else(
                    || current.skills.clone(),
                    |raw| split_list(Some(&raw)),
                ),
                team_id: current.team_id.clone(),
            };
            planner.roster.edit_participant(&id, draft).await?;
            Ok::<_, Error>("✅ Participant updated.".to_string())
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Removes a participant. Their reservations are kept and show as "Unknown".
    #[poise::command(slash_command, rename = "delete")]
    pub async fn participant_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Participant to remove"]
        #[autocomplete = "autocomplete::autocomplete_participant"]
        participant: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = participant_id(&planner.roster, &participant)?;
            let removed = planner.roster.remove_participant(&id).await?;
            Ok::<_, Error>(format!("🗑️ Removed **{}**.", removed.name))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Checks a participant in, or out if they already were.
    #[poise::command(slash_command, rename = "checkin")]
    pub async fn participant_checkin(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Participant arriving or leaving"]
        #[autocomplete = "autocomplete::autocomplete_participant"]
        participant: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = participant_id(&planner.roster, &participant)?;
            let checked_in = planner.roster.toggle_check_in(&id).await?;
            let roster = &planner.roster;
            let status = if checked_in { "checked in" } else { "checked out" };
            Ok::<_, Error>(format!(
                "✅ Participant {status} ({} of {} present).",
                roster.checked_in_count(),
                roster.participants().len()
            ))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Puts a participant in a team. Leave `team` empty to unassign.
    #[poise::command(slash_command, rename = "assign")]
    pub async fn participant_assign(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Participant to move"]
        #[autocomplete = "autocomplete::autocomplete_participant"]
        participant: String,
        #[description = "Team to join (omit to leave the current team)"]
        #[autocomplete = "autocomplete::autocomplete_team"]
        team: Option<String>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = participant_id(&planner.roster, &participant)?;
            let target = match team.as_deref() {
                Some(key) => Some(
                    resolve(
                        planner.roster.teams(),
                        key,
                        "team",
                        |t| t.id.as_str(),
                        |t| t.name.as_str(),
                    )?
                    .clone(),
                ),
                None => None,
            };
            planner
                .roster
                .assign_team(&id, target.as_ref().map(|t| t.id.as_str()))
                .await?;
            Ok::<_, Error>(target.map_or_else(
                || "✅ Participant removed from their team.".to_string(),
                |t| format!("✅ Participant joined **{}**.", t.name),
            ))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Lists participants, optionally filtered by skill and check-in state.
    #[poise::command(slash_command, rename = "list")]
    pub async fn participant_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only participants with this skill"]
        #[autocomplete = "autocomplete::autocomplete_skill"]
        skill: Option<String>,
        #[description = "Only checked-in (true) or not checked-in (false) participants"]
        checked_in: Option<bool>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let planner = session.lock().await;
        let roster = &planner.roster;
        let matching = roster.filter(skill.as_deref(), checked_in);

        let summary = format!(
            "{} participants, {} checked in, {} without a team",
            roster.participants().len(),
            roster.checked_in_count(),
            roster.unassigned_count()
        );
        if matching.is_empty() {
            drop(planner);
            ctx.say(format!("{summary}\nNo participants match.")).await?;
            return Ok(());
        }

        let fields: Vec<(String, String, bool)> = matching
            .iter()
            .take(25)
            .map(|p| {
                let mark = if p.checked_in { "✅" } else { "⬜" };
                let team = roster.team_of(p).map_or("No team", |t| t.name.as_str());
                let skills = if p.skills.is_empty() {
                    "No skills listed".to_string()
                } else {
                    p.skills.join(", ")
                };
                let email = if p.email.is_empty() { "No email" } else { p.email.as_str() };
                (
                    format!("{mark} {}", p.name),
                    format!("{email}\n{team}\n{skills}"),
                    true,
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("**Participants**")
            .description(summary)
            .color(0x0058_65F2)
            .fields(fields);
        drop(planner);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows every skill listed by any participant.
    #[poise::command(slash_command, rename = "skills")]
    pub async fn participant_skills(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let skills = session.lock().await.roster.all_skills();

        let message = if skills.is_empty() {
            "No skills listed yet.".to_string()
        } else {
            format!("**Skills on the roster:** {}", skills.join(", "))
        };
        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
