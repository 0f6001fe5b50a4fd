//! Discord command implementations organized by planner section.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Backup export and import commands
pub mod backup;

/// Budget ledger commands
pub mod budget;

/// General utility commands
pub mod general;

/// Hardware inventory commands
pub mod hardware;

/// Participant commands
pub mod participant;

/// Reservation commands
pub mod reservation;

/// Team commands
pub mod team;

/// Todo and decision commands
pub mod todo;

use crate::{
    bot::BotData,
    errors::{Error, Result},
};

// Export commands
pub use backup::*;
pub use budget::*;
pub use general::*;
pub use hardware::*;
pub use participant::*;
pub use reservation::*;
pub use team::*;
pub use todo::*;

/// Every top-level command, for framework registration.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        todo(),
        budget(),
        hardware(),
        participant(),
        team(),
        reservation(),
        backup(),
    ]
}

/// Sends the outcome of a planner action.
///
/// User-facing errors (bad input, unknown record, not enough hardware) become
/// a reply; anything else goes to the framework's error handler.
pub(crate) async fn respond(ctx: poise::Context<'_, BotData, Error>, outcome: Result<String>) -> Result<()> {
    match outcome {
        Ok(message) => {
            ctx.say(message).await?;
            Ok(())
        }
        Err(e) if e.is_user_facing() => {
            ctx.say(format!("❌ {e}")).await?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Finds a record by id, falling back to a case-insensitive name match.
///
/// Autocomplete fills in ids, but a typed name should work too.
pub(crate) fn resolve<'a, T>(
    items: &'a [T],
    key: &str,
    entity: &'static str,
    id_of: impl Fn(&T) -> &str,
    name_of: impl Fn(&T) -> &str,
) -> Result<&'a T> {
    let key = key.trim();
    items
        .iter()
        .find(|item| id_of(item) == key)
        .or_else(|| items.iter().find(|item| name_of(item).eq_ignore_ascii_case(key)))
        .ok_or_else(|| Error::not_found(entity, key))
}

/// Splits a comma-separated list.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| list.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        id: &'static str,
        name: &'static str,
    }

    #[test]
    fn test_resolve_by_id_then_name() {
        let items = [
            Named { id: "a1", name: "Arduino" },
            Named { id: "b2", name: "a1" },
        ];

        let by_id = resolve(&items, "a1", "hardware", |n| n.id, |n| n.name);
        assert_eq!(by_id.map(|n| n.name).ok(), Some("Arduino"));

        let by_name = resolve(&items, " arduino ", "hardware", |n| n.id, |n| n.name);
        assert_eq!(by_name.map(|n| n.id).ok(), Some("a1"));

        assert!(matches!(
            resolve(&items, "nope", "hardware", |n| n.id, |n| n.name),
            Err(Error::NotFound { entity: "hardware", .. })
        ));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("Rust, Design ,")), vec!["Rust", "Design", ""]);
        assert!(split_list(None).is_empty());
    }
}
