//! Team Discord commands - the `team` group.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{resolve, respond},
            handlers::autocomplete,
        },
        errors::{Error, Result},
        models::TeamDraft,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for teams.
    #[poise::command(
        slash_command,
        subcommands("team_add", "team_edit", "team_delete", "team_list")
    )]
    pub async fn team(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Team commands. Available subcommands:\n\
            `/team add` - Create a team\n\
            `/team edit` - Change a team\n\
            `/team delete` - Delete a team and unassign its members\n\
            `/team list` - Show teams with their members\n\
            Use `/participant assign` to put people in a team.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Creates a team.
    #[poise::command(slash_command, rename = "add")]
    pub async fn team_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Team name"] name: String,
        #[description = "Team color"]
        #[autocomplete = "autocomplete::autocomplete_team_color"]
        color: String,
        #[description = "Optional description"] description: Option<String>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = {
            let mut planner = session.lock().await;
            planner
                .roster
                .add_team(TeamDraft {
                    name,
                    description: description.unwrap_or_default(),
                    color,
                })
                .await
                .map(|team| format!("✅ Created team **{}** ({}).", team.name, team.color))
        };
        respond(ctx, outcome).await
    }

    /// Changes a team. Omitted fields keep their current value.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn team_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Team to change"]
        #[autocomplete = "autocomplete::autocomplete_team"]
        team: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New color"]
        #[autocomplete = "autocomplete::autocomplete_team_color"]
        color: Option<String>,
        #[description = "New description"] description: Option<String>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let current = resolve(
                planner.roster.teams(),
                &team,
                "team",
                |t| t.id.as_str(),
                |t| t.name.as_str(),
            )?;
            let id = current.id.clone();
            let draft = TeamDraft {
                name: name.unwrap_or_else(|| current.name.clone()),
                description: description.unwrap_or_else(|| current.description.clone()),
                color: color.unwrap_or_else(|| current.color.clone()),
            };
            planner.roster.edit_team(&id, draft).await?;
            Ok::<_, Error>("✅ Team updated.".to_string())
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Deletes a team. Its members stay registered, without a team.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn team_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Team to delete"]
        #[autocomplete = "autocomplete::autocomplete_team"]
        team: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = resolve(
                planner.roster.teams(),
                &team,
                "team",
                |t| t.id.as_str(),
                |t| t.name.as_str(),
            )?
            .id
            .clone();
            let removed = planner.roster.remove_team(&id).await?;
            Ok::<_, Error>(format!("🗑️ Deleted team **{}**.", removed.name))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Shows every team with its members.
    #[poise::command(slash_command, rename = "list")]
    pub async fn team_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let session = data.session(ctx.author()).await?;
        let planner = session.lock().await;
        let roster = &planner.roster;

        if roster.teams().is_empty() {
            drop(planner);
            ctx.say("No teams yet. Use `/team add` to create one!").await?;
            return Ok(());
        }

        let mut embeds = Vec::new();
        for team in roster.teams().iter().take(10) {
            let members = roster.team_members(&team.id);
            let mut roll = String::new();
            for member in &members {
                let mark = if member.checked_in { "✅" } else { "⬜" };
                writeln!(roll, "{mark} {}", member.name)?;
            }
            if roll.is_empty() {
                roll.push_str("_No members yet_");
            }

            let mut embed = serenity::CreateEmbed::default()
                .title(format!("**{}** ({} members)", team.name, members.len()))
                .field("Members", roll, false)
                .color(data.config.color_hex(&team.color).unwrap_or(0x0099_AAB5));
            if !team.description.is_empty() {
                embed = embed.description(team.description.clone());
            }
            embeds.push(embed);
        }
        let unassigned = roster.unassigned_count();
        drop(planner);

        let mut reply = poise::CreateReply::default()
            .content(format!("{unassigned} participant(s) without a team"));
        for embed in embeds {
            reply = reply.embed(embed);
        }
        ctx.send(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
