//! Builders for structural validators.
//!
//! Rules are plain data plus a [`Messages`] lookup, so the same constraint
//! renders localized text. A [`ValidationSchema`] combines field rules with
//! conditional branches, cross-field refinements and an optional JSON Schema.

pub mod messages;
pub mod rules;
mod schema;

pub use messages::Messages;
pub use rules::{FieldRule, RuleType, is_blank_rich_text};
pub use schema::{BranchBuilder, FieldErrors, ValidationErrors, ValidationResult, ValidationSchema};
