//! Autocomplete handlers for Discord slash command parameters.
//!
//! Record pickers show a readable label and submit the record id, so commands
//! can resolve the exact record even when names repeat. Suggestions come from
//! the author's loaded planner session.

use crate::{
    bot::BotData,
    errors::Error,
    planner::{Planner, reservations},
};
use poise::serenity_prelude as serenity;

/// Discord's cap on autocomplete choices
const MAX_CHOICES: usize = 25;

/// Discord's cap on a choice's name and value, in characters
const MAX_CHOICE_LEN: usize = 100;

/// `label` cut to [`MAX_CHOICE_LEN`] characters, ending in an ellipsis if cut.
fn shorten(label: String) -> String {
    if label.chars().count() <= MAX_CHOICE_LEN {
        return label;
    }
    let mut short: String = label.chars().take(MAX_CHOICE_LEN - 1).collect();
    short.push('…');
    short
}

/// Keeps `(label, value)` pairs whose label contains `partial`, sorted by label.
///
/// Discord rejects the whole response if any choice is too long, so labels
/// are shortened and values too long to submit are dropped.
fn matching(entries: Vec<(String, String)>, partial: &str) -> Vec<(String, String)> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<(String, String)> = entries
        .into_iter()
        .filter(|(label, value)| {
            value.chars().count() <= MAX_CHOICE_LEN
                && label.to_lowercase().contains(&partial_lower)
        })
        .collect();
    matching.sort_by(|a, b| a.0.cmp(&b.0));
    matching.truncate(MAX_CHOICES);
    matching
        .into_iter()
        .map(|(label, value)| (shorten(label), value))
        .collect()
}

fn choices(entries: Vec<(String, String)>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    matching(entries, partial)
        .into_iter()
        .map(|(label, value)| serenity::AutocompleteChoice::new(label, value))
        .collect()
}

/// Suggestions that are plain strings, submitted as typed.
fn plain_choices<'a>(names: impl IntoIterator<Item = &'a String>, partial: &str) -> Vec<serenity::AutocompleteChoice> {
    choices(
        names.into_iter().map(|n| (n.clone(), n.clone())).collect(),
        partial,
    )
}

/// Runs `pick` against the author's planner, or yields nothing if it cannot load.
async fn from_planner<F>(ctx: poise::Context<'_, BotData, Error>, pick: F) -> Vec<(String, String)>
where
    F: FnOnce(&Planner) -> Vec<(String, String)>,
{
    let Ok(session) = ctx.data().session(ctx.author()).await else {
        return Vec::new();
    };
    let planner = session.lock().await;
    pick(&planner)
}

/// Suggests the author's todos, marking completed ones.
pub async fn autocomplete_todo(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let entries = from_planner(ctx, |planner| {
        planner
            .todos
            .todos()
            .iter()
            .map(|t| {
                let mark = if t.completed { "✅ " } else { "" };
                (format!("{mark}{}", t.title), t.id.clone())
            })
            .collect()
    })
    .await;
    choices(entries, partial)
}

/// Suggests decisions across all todos, labelled with their todo.
pub async fn autocomplete_decision(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let entries = from_planner(ctx, |planner| {
        planner
            .todos
            .todos()
            .iter()
            .flat_map(|t| {
                t.decisions
                    .iter()
                    .map(move |d| (format!("{}: {}", t.title, d.text), d.id.clone()))
            })
            .collect()
    })
    .await;
    choices(entries, partial)
}

/// Suggests budget entries with their amount.
pub async fn autocomplete_budget_entry(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let entries = from_planner(ctx, |planner| {
        planner
            .budget
            .entries()
            .iter()
            .map(|e| {
                (
                    format!("{} ({} ${:.2})", e.description, e.kind, e.amount),
                    e.id.clone(),
                )
            })
            .collect()
    })
    .await;
    choices(entries, partial)
}

/// Suggests the configured budget categories.
pub async fn autocomplete_budget_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    plain_choices(&ctx.data().config.budget_categories, partial)
}

/// Suggests hardware with current availability.
pub async fn autocomplete_hardware(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let entries = from_planner(ctx, |planner| {
        let held = planner.reservations.reservations();
        planner
            .hardware
            .items()
            .iter()
            .map(|h| {
                let free = planner.hardware.available(&h.id, held).unwrap_or(0);
                (
                    format!("{} ({free}/{} available)", h.name, h.quantity),
                    h.id.clone(),
                )
            })
            .collect()
    })
    .await;
    choices(entries, partial)
}

/// Suggests participants by name.
pub async fn autocomplete_participant(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let entries = from_planner(ctx, |planner| {
        planner
            .roster
            .participants()
            .iter()
            .map(|p| (p.name.clone(), p.id.clone()))
            .collect()
    })
    .await;
    choices(entries, partial)
}

/// Suggests teams by name.
pub async fn autocomplete_team(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let entries = from_planner(ctx, |planner| {
        planner
            .roster
            .teams()
            .iter()
            .map(|t| (t.name.clone(), t.id.clone()))
            .collect()
    })
    .await;
    choices(entries, partial)
}

/// Suggests the configured team colors.
pub async fn autocomplete_team_color(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    plain_choices(&ctx.data().config.color_names(), partial)
}

/// Suggests skills already in use plus the configured suggestions.
pub async fn autocomplete_skill(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let mut skills = from_planner(ctx, |planner| {
        planner
            .roster
            .all_skills()
            .into_iter()
            .map(|s| (s.clone(), s))
            .collect()
    })
    .await;
    for suggested in &ctx.data().config.suggested_skills {
        if !skills.iter().any(|(skill, _)| skill == suggested) {
            skills.push((suggested.clone(), suggested.clone()));
        }
    }
    choices(skills, partial)
}

/// Suggests reservations as "participant: quantity × hardware (status)".
pub async fn autocomplete_reservation(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let entries = from_planner(ctx, |planner| {
        let hardware = planner.hardware.items();
        let participants = planner.roster.participants();
        planner
            .reservations
            .reservations()
            .iter()
            .map(|r| {
                (
                    format!(
                        "{}: {} × {} ({})",
                        reservations::participant_name(participants, &r.participant_id),
                        r.quantity,
                        reservations::hardware_name(hardware, &r.hardware_id),
                        r.status
                    ),
                    r.id.clone(),
                )
            })
            .collect()
    })
    .await;
    choices(entries, partial)
}
