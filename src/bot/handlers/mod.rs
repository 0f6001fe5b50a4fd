//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions other than the
//! commands themselves, currently parameter autocomplete.

/// Autocomplete handlers for records, categories, colors and skills
pub mod autocomplete;
