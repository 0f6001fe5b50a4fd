//! Todo Discord commands - the `todo` group.
//!
//! Todos and the decisions recorded against them. Record parameters
//! autocomplete to ids but also accept a typed title.

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
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for the event todo list.
    #[poise::command(
        slash_command,
        subcommands(
            "todo_add",
            "todo_list",
            "todo_done",
            "todo_rename",
            "todo_delete",
            "todo_decide",
            "todo_decision_edit",
            "todo_decision_delete"
        )
    )]
    pub async fn todo(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Todo commands. Available subcommands:\n\
            `/todo add` - Add a todo\n\
            `/todo list` - Show all todos and their decisions\n\
            `/todo done` - Toggle a todo's completed state\n\
            `/todo rename` - Change a todo's title\n\
            `/todo delete` - Delete a todo and its decisions\n\
            `/todo decide` - Record a decision on a todo\n\
            `/todo decision_edit` - Change a decision\n\
            `/todo decision_delete` - Delete a decision";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a todo to the top of the list.
    #[poise::command(slash_command, rename = "add")]
    pub async fn todo_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What needs doing"] title: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = {
            let mut planner = session.lock().await;
            planner
                .todos
                .add(&title)
                .await
                .map(|todo| format!("✅ Added todo **{}**.", todo.title))
        };
        respond(ctx, outcome).await
    }

    /// Shows every todo with its decisions.
    #[poise::command(slash_command, rename = "list")]
    pub async fn todo_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let planner = session.lock().await;
        let todos = planner.todos.todos();

        if todos.is_empty() {
            drop(planner);
            ctx.say("No todos yet. Use `/todo add` to create one!").await?;
            return Ok(());
        }

        let mut fields = Vec::new();
        for todo in todos.iter().take(25) {
            let mark = if todo.completed { "✅" } else { "⬜" };
            let mut value = String::new();
            if todo.decisions.is_empty() {
                value.push_str("_No decisions yet_");
            }
            for decision in &todo.decisions {
                writeln!(value, "• {}", decision.text)?;
            }
            fields.push((format!("{mark} {}", todo.title), value, false));
        }

        let embed = serenity::CreateEmbed::default()
            .title("**Todo List**")
            .description(format!(
                "{} of {} completed",
                planner.todos.completed_count(),
                todos.len()
            ))
            .color(0x0058_65F2)
            .fields(fields);
        drop(planner);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Marks a todo completed, or open again if it already was.
    #[poise::command(slash_command, rename = "done")]
    pub async fn todo_done(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Todo to toggle"]
        #[autocomplete = "autocomplete::autocomplete_todo"]
        todo: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let found = resolve(planner.todos.todos(), &todo, "todo", |t| t.id.as_str(), |t| t.title.as_str())?;
            let (id, title) = (found.id.clone(), found.title.clone());
            let completed = planner.todos.toggle(&id).await?;
            Ok::<_, Error>(if completed {
                format!("✅ Completed **{title}**.")
            } else {
                format!("⬜ Reopened **{title}**.")
            })
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Changes a todo's title.
    #[poise::command(slash_command, rename = "rename")]
    pub async fn todo_rename(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Todo to rename"]
        #[autocomplete = "autocomplete::autocomplete_todo"]
        todo: String,
        #[description = "New title"] title: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = resolve(planner.todos.todos(), &todo, "todo", |t| t.id.as_str(), |t| t.title.as_str())?
                .id
                .clone();
            planner.todos.rename(&id, &title).await?;
            Ok::<_, Error>(format!("✅ Renamed todo to **{}**.", title.trim()))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Deletes a todo along with its decisions.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn todo_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Todo to delete"]
        #[autocomplete = "autocomplete::autocomplete_todo"]
        todo: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = resolve(planner.todos.todos(), &todo, "todo", |t| t.id.as_str(), |t| t.title.as_str())?
                .id
                .clone();
            let removed = planner.todos.remove(&id).await?;
            Ok::<_, Error>(format!(
                "🗑️ Deleted todo **{}** and {} decision(s).",
                removed.title,
                removed.decisions.len()
            ))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Records a decision on a todo.
    #[poise::command(slash_command, rename = "decide")]
    pub async fn todo_decide(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Todo the decision belongs to"]
        #[autocomplete = "autocomplete::autocomplete_todo"]
        todo: String,
        #[description = "What was decided"] text: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let found = resolve(planner.todos.todos(), &todo, "todo", |t| t.id.as_str(), |t| t.title.as_str())?;
            let (id, title) = (found.id.clone(), found.title.clone());
            let decision = planner.todos.add_decision(&id, &text).await?;
            Ok::<_, Error>(format!("📝 Recorded on **{title}**: {}", decision.text))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Changes the text of a decision.
    #[poise::command(slash_command, rename = "decision_edit")]
    pub async fn todo_decision_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Decision to change"]
        #[autocomplete = "autocomplete::autocomplete_decision"]
        decision: String,
        #[description = "New text"] text: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let todo_id = planner
                .todos
                .find_decision(&decision)
                .map(|(todo, _)| todo.id.clone())
                .ok_or_else(|| Error::not_found("decision", &decision))?;
            planner.todos.edit_decision(&todo_id, &decision, &text).await?;
            Ok::<_, Error>(format!("✅ Decision updated: {}", text.trim()))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Deletes a decision.
    #[poise::command(slash_command, rename = "decision_delete")]
    pub async fn todo_decision_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Decision to delete"]
        #[autocomplete = "autocomplete::autocomplete_decision"]
        decision: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let todo_id = planner
                .todos
                .find_decision(&decision)
                .map(|(todo, _)| todo.id.clone())
                .ok_or_else(|| Error::not_found("decision", &decision))?;
            planner.todos.remove_decision(&todo_id, &decision).await?;
            Ok::<_, Error>("🗑️ Decision deleted.".to_string())
        }
        .await;
        respond(ctx, outcome).await
    }
}

// Re-export all commands
pub use inner::*;
