use std::{fmt, sync::Arc};

pub const REQUIRED: &str = "validation.required";
pub const MIN_LENGTH: &str = "validation.min_length";
pub const MAX_LENGTH: &str = "validation.max_length";
pub const EMAIL: &str = "validation.email";
pub const PHONE: &str = "validation.phone";
pub const NUMBER: &str = "validation.number";
pub const INTEGER: &str = "validation.integer";
pub const MIN_VALUE: &str = "validation.min_value";
pub const MAX_VALUE: &str = "validation.max_value";
pub const ONE_OF: &str = "validation.one_of";
pub const PATTERN: &str = "validation.pattern";
pub const DATE: &str = "validation.date";
pub const COLOR: &str = "validation.color";
pub const BOOLEAN: &str = "validation.boolean";
pub const MISMATCH: &str = "validation.mismatch";
pub const DATE_ORDER: &str = "validation.date_order";
pub const INVALID: &str = "validation.invalid";

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Message lookup used by every rule so constraint logic renders localized text.
///
/// Templates may reference `{name}` style parameters. Keys missing from the
/// lookup fall back to the built-in English text.
#[derive(Clone, Default)]
pub struct Messages {
    lookup: Option<Lookup>,
}

impl Messages {
    pub fn english() -> Self {
        Self::default()
    }

    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Some(Arc::new(lookup)),
        }
    }

    pub fn get(&self, key: &str, params: &[(&str, String)]) -> String {
        let template = self
            .lookup
            .as_ref()
            .and_then(|lookup| lookup(key))
            .unwrap_or_else(|| english(key).to_string());
        interpolate(&template, params)
    }
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("custom", &self.lookup.is_some())
            .finish()
    }
}

fn english(key: &str) -> &str {
    match key {
        REQUIRED => "This field is required",
        MIN_LENGTH => "Must be at least {min} characters",
        MAX_LENGTH => "Must be at most {max} characters",
        EMAIL => "Enter a valid email address",
        PHONE => "Enter a valid phone number",
        NUMBER => "Must be a number",
        INTEGER => "Must be a whole number",
        MIN_VALUE => "Must be at least {min}",
        MAX_VALUE => "Must be at most {max}",
        ONE_OF => "Choose one of: {options}",
        PATTERN => "Invalid format",
        DATE => "Enter a date as YYYY-MM-DD",
        COLOR => "Enter a hex color such as #1a2b3c",
        BOOLEAN => "Must be true or false",
        MISMATCH => "Does not match {other}",
        DATE_ORDER => "Must not be before {other}",
        _ => "Invalid value",
    }
}

fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in params {
        rendered = rendered.replace(&format!("{{{name}}}"), value);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_and_interpolates() {
        let messages = Messages::english();
        assert_eq!(
            messages.get(MIN_LENGTH, &[("min", "2".into())]),
            "Must be at least 2 characters"
        );
    }

    #[test]
    fn custom_lookup_wins_when_key_known() {
        let messages = Messages::with_lookup(|key| match key {
            REQUIRED => Some("Champ obligatoire".to_string()),
            _ => None,
        });
        assert_eq!(messages.get(REQUIRED, &[]), "Champ obligatoire");
        assert_eq!(messages.get(EMAIL, &[]), "Enter a valid email address");
    }
}
