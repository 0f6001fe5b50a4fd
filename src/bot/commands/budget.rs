//! Budget Discord commands - the `budget` group.
//!
//! Income and expense entries plus a summary with totals and a per-category
//! breakdown of expenses.

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
        models::{BudgetDraft, BudgetKind},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Income or expense, as offered in the command picker.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum EntryKind {
        Income,
        Expense,
    }

    impl From<EntryKind> for BudgetKind {
        fn from(kind: EntryKind) -> Self {
            match kind {
                EntryKind::Income => Self::Income,
                EntryKind::Expense => Self::Expense,
            }
        }
    }

    /// Parent command for the event budget.
    #[poise::command(
        slash_command,
        subcommands("budget_add", "budget_edit", "budget_delete", "budget_summary")
    )]
    pub async fn budget(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Budget commands. Available subcommands:\n\
            `/budget add` - Record income or an expense\n\
            `/budget edit` - Change an entry\n\
            `/budget delete` - Delete an entry\n\
            `/budget summary` - Totals, balance and recent entries";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Records income or an expense.
    #[poise::command(slash_command, rename = "add")]
    pub async fn budget_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Income or expense"] kind: EntryKind,
        #[description = "What it was for"] description: String,
        #[description = "Amount (e.g., 150.00)"] amount: f64,
        #[description = "Category"]
        #[autocomplete = "autocomplete::autocomplete_budget_category"]
        category: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = {
            let mut planner = session.lock().await;
            planner
                .budget
                .add(BudgetDraft {
                    kind: kind.into(),
                    description,
                    amount,
                    category,
                })
                .await
                .map(|entry| {
                    format!(
                        "✅ Recorded {} **{}** of **${:.2}** under {}.",
                        entry.kind, entry.description, entry.amount, entry.category
                    )
                })
        };
        respond(ctx, outcome).await
    }

    /// Changes an entry. Omitted fields keep their current value.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn budget_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Entry to change"]
        #[autocomplete = "autocomplete::autocomplete_budget_entry"]
        entry: String,
        #[description = "Income or expense"] kind: Option<EntryKind>,
        #[description = "What it was for"] description: Option<String>,
        #[description = "Amount"] amount: Option<f64>,
        #[description = "Category"]
        #[autocomplete = "autocomplete::autocomplete_budget_category"]
        category: Option<String>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let current = resolve(
                planner.budget.entries(),
                &entry,
                "budget entry",
                |e| e.id.as_str(),
                |e| e.description.as_str(),
            )?;
            let id = current.id.clone();
            let draft = BudgetDraft {
                kind: kind.map_or(current.kind, Into::into),
                description: description.unwrap_or_else(|| current.description.clone()),
                amount: amount.unwrap_or(current.amount),
                category: category.unwrap_or_else(|| current.category.clone()),
            };
            planner.budget.edit(&id, draft).await?;
            Ok::<_, Error>("✅ Budget entry updated.".to_string())
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Deletes an entry.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn budget_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Entry to delete"]
        #[autocomplete = "autocomplete::autocomplete_budget_entry"]
        entry: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = resolve(
                planner.budget.entries(),
                &entry,
                "budget entry",
                |e| e.id.as_str(),
                |e| e.description.as_str(),
            )?
            .id
            .clone();
            let removed = planner.budget.remove(&id).await?;
            Ok::<_, Error>(format!("🗑️ Deleted **{}**.", removed.description))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Shows income, expenses, balance, spending per category and recent entries.
    #[poise::command(slash_command, rename = "summary")]
    pub async fn budget_summary(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let planner = session.lock().await;
        let ledger = &planner.budget;

        let mut categories = String::new();
        for (category, total) in ledger.by_category() {
            writeln!(categories, "• {category}: ${total:.2}")?;
        }
        if categories.is_empty() {
            categories.push_str("_No expenses yet_");
        }

        let mut recent = String::new();
        for entry in ledger.entries().iter().take(10) {
            let sign = match entry.kind {
                BudgetKind::Income => '+',
                BudgetKind::Expense => '-',
            };
            writeln!(
                recent,
                "{sign}${:.2} {} ({})",
                entry.amount, entry.description, entry.category
            )?;
        }
        if recent.is_empty() {
            recent.push_str("_No entries yet. Use `/budget add` to record one!_");
        }

        let balance = ledger.balance();
        let embed = serenity::CreateEmbed::default()
            .title("**Budget Summary**")
            .color(if balance < 0.0 { 0x00ED_4245 } else { 0x0057_F287 })
            .field("Income", format!("${:.2}", ledger.total_income()), true)
            .field("Expenses", format!("${:.2}", ledger.total_expenses()), true)
            .field("Balance", format!("${balance:.2}"), true)
            .field("Expenses by category", categories, false)
            .field("Recent entries", recent, false);
        drop(planner);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
