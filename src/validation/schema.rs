use std::{collections::HashSet, fmt, sync::Arc};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use jsonschema::Validator;
use regex::Regex;
use serde_json::Value;

use crate::domain::{
    FieldDescriptor, FieldKind, FieldPath, FormDescriptor, OptionSourceSpec, WidgetOptions,
    localized_name,
};

use super::{
    messages::{self as msg, Messages},
    rules::{self, DATE_FORMAT, FieldRule, loosely_equal},
};

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Field-level error messages keyed by field name, in schema order.
pub type FieldErrors = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub fields: FieldErrors,
    /// Errors that could not be attributed to a single field.
    pub form: Vec<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(Value),
    Invalid(ValidationErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }
}

#[derive(Debug, Clone)]
struct Branch {
    discriminant: String,
    equals: Value,
    fields: IndexMap<String, FieldRule>,
}

#[derive(Clone)]
struct Refinement {
    target: String,
    message_key: String,
    params: Vec<(String, String)>,
    predicate: Predicate,
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refinement")
            .field("target", &self.target)
            .field("message_key", &self.message_key)
            .finish()
    }
}

/// Whole-form validator: field rules, conditional branches, cross-field
/// refinements and an optional JSON Schema layer.
#[derive(Clone, Default)]
pub struct ValidationSchema {
    messages: Messages,
    fields: IndexMap<String, FieldRule>,
    branches: Vec<Branch>,
    refinements: Vec<Refinement>,
    json_schema: Option<Arc<Validator>>,
}

impl fmt::Debug for ValidationSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationSchema")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("branches", &self.branches.len())
            .field("refinements", &self.refinements)
            .field("json_schema", &self.json_schema.is_some())
            .finish()
    }
}

impl ValidationSchema {
    pub fn new(messages: Messages) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    /// One rule per locale under the expanded `name_locale` keys.
    pub fn multi_language<S: AsRef<str>>(mut self, name: &str, locales: &[S], rule: FieldRule) -> Self {
        for locale in locales {
            self.fields
                .insert(localized_name(name, locale.as_ref()), rule.clone());
        }
        self
    }

    /// Rules that only apply while `discriminant` equals `equals`.
    pub fn when<F>(mut self, discriminant: impl Into<String>, equals: impl Into<Value>, build: F) -> Self
    where
        F: FnOnce(BranchBuilder) -> BranchBuilder,
    {
        let branch = build(BranchBuilder::default());
        self.branches.push(Branch {
            discriminant: discriminant.into(),
            equals: equals.into(),
            fields: branch.fields,
        });
        self
    }

    /// Cross-field check reported against `target`; runs only after every
    /// field rule passed, against the normalized value object.
    pub fn refine<F>(mut self, target: impl Into<String>, message_key: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.refinements.push(Refinement {
            target: target.into(),
            message_key: message_key.into(),
            params: Vec::new(),
            predicate: Arc::new(predicate),
        });
        self
    }

    /// `target` must equal `other` (password confirmation).
    pub fn equals_field(mut self, target: &str, other: &str) -> Self {
        let target_path = FieldPath::parse(target).ok();
        let other_path = FieldPath::parse(other).ok();
        self.refinements.push(Refinement {
            target: target.to_string(),
            message_key: msg::MISMATCH.to_string(),
            params: vec![("other".to_string(), other.to_string())],
            predicate: Arc::new(move |values| {
                let (Some(target), Some(other)) = (&target_path, &other_path) else {
                    return false;
                };
                target.get(values) == other.get(values)
            }),
        });
        self
    }

    /// Date in `target` must not precede the date in `start`. Missing dates pass.
    pub fn not_before(mut self, target: &str, start: &str) -> Self {
        let target_path = FieldPath::parse(target).ok();
        let start_path = FieldPath::parse(start).ok();
        self.refinements.push(Refinement {
            target: target.to_string(),
            message_key: msg::DATE_ORDER.to_string(),
            params: vec![("other".to_string(), start.to_string())],
            predicate: Arc::new(move |values| {
                let read = |path: &Option<FieldPath>| {
                    path.as_ref()
                        .and_then(|path| path.get(values))
                        .and_then(Value::as_str)
                        .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
                };
                match (read(&target_path), read(&start_path)) {
                    (Some(end), Some(start)) => end >= start,
                    _ => true,
                }
            }),
        });
        self
    }

    /// Attach a JSON Schema checked against the normalized object.
    pub fn with_json_schema(mut self, schema: &Value) -> Result<Self> {
        let validator =
            jsonschema::validator_for(schema).context("failed to compile JSON schema")?;
        self.json_schema = Some(Arc::new(validator));
        Ok(self)
    }

    /// Derive rules from the validation hints carried by each descriptor.
    pub fn from_descriptor(descriptor: &FormDescriptor, messages: Messages) -> Result<Self> {
        let mut schema = Self::new(messages);
        for field in &descriptor.fields {
            let rule = rule_for_field(field)?;
            let condition = field.validation.required_when.clone();
            let names = field.expanded_names();
            match condition {
                Some(condition) => {
                    let mut branch = BranchBuilder::default();
                    for name in names {
                        branch = branch.field(name, rule.clone().required());
                    }
                    schema = schema.when(condition.field, condition.equals, |_| branch);
                }
                None => {
                    for name in names {
                        schema.fields.insert(name, rule.clone());
                    }
                }
            }
        }
        Ok(schema)
    }

    /// Names the schema has a rule for, base fields first.
    pub fn field_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.fields
            .keys()
            .chain(self.branches.iter().flat_map(|branch| branch.fields.keys()))
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn validate(&self, values: &Value) -> ValidationResult {
        let mut output = values.clone();
        let mut errors = ValidationErrors::default();
        let active = self.active_rules(values);

        for stale in self.inactive_branch_fields(&active) {
            if let Ok(path) = FieldPath::parse(stale) {
                path.remove(&mut output);
            }
        }

        for (name, rule) in &active {
            let path = match FieldPath::parse(name) {
                Ok(path) => path,
                Err(err) => {
                    errors.form.push(err.to_string());
                    continue;
                }
            };
            match rule.check(path.get(values), &self.messages) {
                Ok(Some(normalized)) => path.set(&mut output, normalized),
                Ok(None) => {}
                Err(message) => {
                    errors.fields.entry(name.to_string()).or_insert(message);
                }
            }
        }

        if errors.is_empty()
            && let Some(validator) = &self.json_schema
        {
            for error in validator.iter_errors(&output) {
                let pointer = error.instance_path.to_string();
                let owner = active.keys().find(|name| {
                    FieldPath::parse(name)
                        .map(|path| path.pointer() == pointer)
                        .unwrap_or(false)
                });
                match owner {
                    Some(name) => {
                        errors
                            .fields
                            .entry(name.to_string())
                            .or_insert_with(|| error.to_string());
                    }
                    None => {
                        let prefix = if pointer.is_empty() { "<root>" } else { &pointer };
                        errors.form.push(format!("{prefix}: {error}"));
                    }
                }
            }
        }

        if errors.is_empty() {
            for refinement in &self.refinements {
                if errors.fields.contains_key(&refinement.target) {
                    continue;
                }
                if !(refinement.predicate)(&output) {
                    let params = refinement
                        .params
                        .iter()
                        .map(|(name, value)| (name.as_str(), value.clone()))
                        .collect::<Vec<_>>();
                    errors.fields.insert(
                        refinement.target.clone(),
                        self.messages.get(&refinement.message_key, &params),
                    );
                }
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid(output)
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    /// Validate everything but keep only the errors attached to `name`.
    pub fn validate_field(&self, values: &Value, name: &str) -> Option<String> {
        match self.validate(values) {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(mut errors) => errors.fields.shift_remove(name),
        }
    }

    fn active_rules(&self, values: &Value) -> IndexMap<&str, &FieldRule> {
        let mut active: IndexMap<&str, &FieldRule> = self
            .fields
            .iter()
            .map(|(name, rule)| (name.as_str(), rule))
            .collect();
        for branch in &self.branches {
            if self.branch_matches(branch, values) {
                for (name, rule) in &branch.fields {
                    active.insert(name.as_str(), rule);
                }
            }
        }
        active
    }

    fn inactive_branch_fields<'a>(&'a self, active: &IndexMap<&str, &FieldRule>) -> Vec<&'a str> {
        self.branches
            .iter()
            .flat_map(|branch| branch.fields.keys())
            .map(String::as_str)
            .filter(|name| !active.contains_key(name))
            .collect()
    }

    fn branch_matches(&self, branch: &Branch, values: &Value) -> bool {
        FieldPath::parse(&branch.discriminant)
            .ok()
            .and_then(|path| path.get(values).cloned())
            .is_some_and(|current| loosely_equal(&branch.equals, &current))
    }
}

#[derive(Debug, Default)]
pub struct BranchBuilder {
    fields: IndexMap<String, FieldRule>,
}

impl BranchBuilder {
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }
}

fn rule_for_field(field: &FieldDescriptor) -> Result<FieldRule> {
    let kind = match (&field.kind, &field.widget_options) {
        (FieldKind::MultiLanguage, WidgetOptions::MultiLanguage { sub_kind, .. }) => *sub_kind,
        (kind, _) => *kind,
    };
    let mut rule = match kind {
        FieldKind::Text | FieldKind::Password => rules::string(),
        FieldKind::RichText => rules::rich_text(),
        FieldKind::Email => rules::email(),
        FieldKind::Phone => rules::phone(),
        FieldKind::Color => rules::color(),
        FieldKind::Date => rules::date(),
        FieldKind::Number => match field.widget_options {
            WidgetOptions::Number { integer: true, .. } => rules::integer(),
            _ => rules::number(),
        },
        FieldKind::Checkbox | FieldKind::Switch => rules::boolean(),
        FieldKind::Select | FieldKind::Radio => match &field.widget_options {
            WidgetOptions::Select { multiple: true, .. } => rules::list(),
            WidgetOptions::Select {
                source: OptionSourceSpec::Static(options),
                ..
            } if !options.is_empty() => {
                rules::one_of(options.iter().map(|option| option.value.clone()))
            }
            _ => rules::any(),
        },
        FieldKind::FileUpload | FieldKind::MapPosition | FieldKind::Custom => rules::any(),
        FieldKind::MultiLanguage => rules::string(),
    };

    let hints = &field.validation;
    if hints.required {
        rule = rule.required();
    }
    if let Some(min) = hints.min_length {
        rule = rule.min_len(min);
    }
    if let Some(max) = hints.max_length {
        rule = rule.max_len(max);
    }
    if let Some(min) = hints.min {
        rule = rule.min(min);
    }
    if let Some(max) = hints.max {
        rule = rule.max(max);
    }
    if let Some(pattern) = &hints.pattern {
        let regex = Regex::new(pattern)
            .with_context(|| format!("invalid pattern for field '{}'", field.name))?;
        rule = rule.pattern(regex);
    }
    Ok(rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::{email, integer, one_of, string};
    use serde_json::json;

    fn package_schema() -> ValidationSchema {
        ValidationSchema::new(Messages::english())
            .field("name", string().required())
            .field("type", one_of(["client", "provider"]).required())
            .when("type", "client", |branch| {
                branch.field("connection_count", integer().required().min(1.0))
            })
            .when("type", "provider", |branch| {
                branch
                    .field("duration", integer().required().min(1.0))
                    .field("duration_type", one_of(["day", "month", "year"]).required())
            })
    }

    #[test]
    fn two_field_errors_are_reported_together() {
        let schema = ValidationSchema::new(Messages::english())
            .field("name", string().required().min_len(2))
            .field("email", email().required());
        let ValidationResult::Invalid(errors) =
            schema.validate(&json!({"name": "A", "email": "not-an-email"}))
        else {
            panic!("expected errors");
        };
        assert_eq!(errors.fields.len(), 2);
        assert_eq!(errors.fields["name"], "Must be at least 2 characters");
        assert_eq!(errors.fields["email"], "Enter a valid email address");
    }

    #[test]
    fn inactive_branch_does_not_block_and_is_stripped() {
        let schema = package_schema();
        let result = schema.validate(&json!({
            "name": "Gold",
            "type": "provider",
            "duration": "12",
            "duration_type": "month",
            "connection_count": "not a number"
        }));
        assert_eq!(
            result,
            ValidationResult::Valid(json!({
                "name": "Gold",
                "type": "provider",
                "duration": 12,
                "duration_type": "month"
            }))
        );
    }

    #[test]
    fn active_branch_requires_its_fields_only() {
        let schema = package_schema();
        let ValidationResult::Invalid(errors) =
            schema.validate(&json!({"name": "Gold", "type": "client"}))
        else {
            panic!("expected errors");
        };
        assert_eq!(errors.fields.keys().collect::<Vec<_>>(), ["connection_count"]);
    }

    #[test]
    fn refinements_wait_for_field_rules_and_target_one_field() {
        let schema = ValidationSchema::new(Messages::english())
            .field("password", string().required().min_len(8))
            .field("password_confirmation", string().required())
            .equals_field("password_confirmation", "password");

        let ValidationResult::Invalid(errors) = schema.validate(&json!({
            "password": "short",
            "password_confirmation": "different"
        })) else {
            panic!("expected errors");
        };
        assert_eq!(errors.fields.keys().collect::<Vec<_>>(), ["password"]);

        let ValidationResult::Invalid(errors) = schema.validate(&json!({
            "password": "long enough",
            "password_confirmation": "different"
        })) else {
            panic!("expected errors");
        };
        assert_eq!(
            errors.fields["password_confirmation"],
            "Does not match password"
        );
    }

    #[test]
    fn end_date_must_not_precede_start_date() {
        let schema = ValidationSchema::new(Messages::english())
            .field("starts_at", rules::date().required())
            .field("ends_at", rules::date().required())
            .not_before("ends_at", "starts_at");
        assert!(
            schema
                .validate(&json!({"starts_at": "2024-05-01", "ends_at": "2024-05-01"}))
                .is_valid()
        );
        assert_eq!(
            schema.validate_field(
                &json!({"starts_at": "2024-05-02", "ends_at": "2024-05-01"}),
                "ends_at"
            ),
            Some("Must not be before starts_at".to_string())
        );
    }

    #[test]
    fn json_schema_errors_route_to_fields() {
        let schema = ValidationSchema::new(Messages::english())
            .field("code", string().required())
            .with_json_schema(&json!({
                "type": "object",
                "properties": {"code": {"type": "string", "maxLength": 3}},
                "additionalProperties": false
            }))
            .expect("schema");
        let ValidationResult::Invalid(errors) =
            schema.validate(&json!({"code": "ABCD", "extra": 1}))
        else {
            panic!("expected errors");
        };
        assert!(errors.fields.contains_key("code"));
        assert_eq!(errors.form.len(), 1);
    }

    #[test]
    fn descriptor_hints_become_rules() {
        let descriptor: FormDescriptor = serde_json::from_value(json!({
            "fields": [
                {"kind": "text", "name": "name", "validation": {"required": true, "min_length": 2}},
                {"kind": "multi-language", "name": "title",
                 "widgetOptions": {"type": "multi-language", "locales": ["en", "ar"]},
                 "validation": {"required": true}},
                {"kind": "number", "name": "duration",
                 "validation": {"required_when": {"field": "type", "equals": "provider"}}},
                {"kind": "select", "name": "type",
                 "widgetOptions": {"type": "select", "source": {"static": [
                    {"label": "Client", "value": "client"},
                    {"label": "Provider", "value": "provider"}
                 ]}}}
            ]
        }))
        .expect("descriptor");
        let schema = ValidationSchema::from_descriptor(&descriptor, Messages::english())
            .expect("schema");
        assert_eq!(
            schema.field_names(),
            ["name", "title_en", "title_ar", "type", "duration"]
        );
        let ValidationResult::Invalid(errors) = schema.validate(&json!({
            "name": "Al", "title_en": "Hello", "title_ar": " ", "type": "provider"
        })) else {
            panic!("expected errors");
        };
        assert_eq!(
            errors.fields.keys().collect::<Vec<_>>(),
            ["title_ar", "duration"]
        );
    }
}
