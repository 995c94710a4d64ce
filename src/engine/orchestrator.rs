use std::{collections::HashMap, sync::Arc};

use crossterm::event::KeyEvent;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{
    DescriptorError, FieldDescriptor, FieldKind, FormDescriptor, OptionSourceSpec, RemoteOptions,
    SelectOption, WidgetOptions,
};
use crate::form::{
    BoundField, FieldComponent, FieldEvent, FocusPoll, FocusRequest, FormStore,
    MultiLanguageState, ResolveError, TranslationJob, TranslationOutcome, WidgetResolver,
    apply_translation, plan_translations,
};
use crate::validation::{FieldErrors, ValidationResult, ValidationSchema};

use super::options::{FormOptions, ValidationMode};
use super::submit::{SubmitError, SubmitHandler, SubmitOutcome, SubmitStart};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// A remote select wants options for a new keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub field: String,
    pub keyword: String,
    pub remote: RemoteOptions,
}

/// What a key press did to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEffect {
    Changed,
    Search(SearchRequest),
    Moved,
    Ignored,
}

#[derive(Debug, Clone, Default)]
struct WidgetMemory {
    cursor: usize,
    keyword: String,
}

type ErrorHook = Arc<dyn Fn(&SubmitError) + Send + Sync>;

/// Owns one mounted form: values, errors, focus, tabs and the submit lifecycle.
pub struct FormOrchestrator {
    form: FormDescriptor,
    schema: ValidationSchema,
    options: FormOptions,
    components: IndexMap<String, Box<dyn FieldComponent>>,
    store: FormStore,
    tabs: IndexMap<String, MultiLanguageState>,
    widgets: HashMap<String, WidgetMemory>,
    remote_options: HashMap<String, Vec<SelectOption>>,
    focus: usize,
    focus_request: Option<FocusRequest>,
    form_errors: Vec<String>,
    busy: bool,
    attempted: bool,
    error_hook: Option<ErrorHook>,
}

impl std::fmt::Debug for FormOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormOrchestrator")
            .field("fields", &self.form.fields.len())
            .field("focus", &self.focus)
            .field("busy", &self.busy)
            .field("errors", self.store.errors())
            .finish_non_exhaustive()
    }
}

impl FormOrchestrator {
    pub fn new(
        form: FormDescriptor,
        schema: ValidationSchema,
        defaults: &Value,
        options: FormOptions,
    ) -> Result<Self, BuildError> {
        let resolver = WidgetResolver::new(options.component_palette());
        Self::with_resolver(form, schema, defaults, options, &resolver)
    }

    /// Build with a resolver that may carry custom widgets.
    pub fn with_resolver(
        form: FormDescriptor,
        schema: ValidationSchema,
        defaults: &Value,
        options: FormOptions,
        resolver: &WidgetResolver,
    ) -> Result<Self, BuildError> {
        form.validate_names()?;
        let components = resolver.resolve_all(&form)?;
        let store = FormStore::seed(&form, &components, defaults)?;
        let tabs = form
            .fields
            .iter()
            .filter(|field| field.kind == FieldKind::MultiLanguage)
            .map(|field| (field.name.clone(), MultiLanguageState::new(field)))
            .collect();
        let mut orchestrator = Self {
            form,
            schema,
            options,
            components,
            store,
            tabs,
            widgets: HashMap::new(),
            remote_options: HashMap::new(),
            focus: 0,
            focus_request: None,
            form_errors: Vec::new(),
            busy: false,
            attempted: false,
            error_hook: None,
        };
        orchestrator.focus = orchestrator.first_enabled().unwrap_or(0);
        Ok(orchestrator)
    }

    /// Called with every error a submit handler returns.
    pub fn on_error(mut self, hook: impl Fn(&SubmitError) + Send + Sync + 'static) -> Self {
        self.error_hook = Some(Arc::new(hook));
        self
    }

    pub fn descriptor(&self) -> &FormDescriptor {
        &self.form
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn values(&self) -> &Value {
        self.store.values()
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.store.get(name)
    }

    pub fn errors(&self) -> &FieldErrors {
        self.store.errors()
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.store.error(name)
    }

    pub fn banner(&self) -> Option<&str> {
        self.store.banner()
    }

    pub fn form_errors(&self) -> &[String] {
        &self.form_errors
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn component(&self, field: &str) -> Option<&dyn FieldComponent> {
        self.components.get(field).map(|component| component.as_ref())
    }

    pub fn tabs(&self, field: &str) -> Option<&MultiLanguageState> {
        self.tabs.get(field)
    }

    /// Filled/empty indicator per locale tab.
    pub fn completion(&self, field: &str) -> Vec<bool> {
        match (self.tabs.get(field), self.components.get(field)) {
            (Some(tabs), Some(component)) => tabs.completion(&self.store, component.as_ref()),
            _ => Vec::new(),
        }
    }

    pub fn focused_index(&self) -> usize {
        self.focus
    }

    pub fn focused_descriptor(&self) -> Option<&FieldDescriptor> {
        self.form.fields.get(self.focus)
    }

    /// Flat name of the focused input, resolving the active locale tab.
    pub fn focused_name(&self) -> Option<String> {
        let field = self.focused_descriptor()?;
        match self.tabs.get(&field.name) {
            Some(tabs) => tabs.active_name(),
            None => Some(field.name.clone()),
        }
    }

    pub fn pending_focus(&self) -> Option<&str> {
        self.focus_request.as_ref().map(FocusRequest::target)
    }

    /// Options currently offered by a select field.
    pub fn field_options<'a>(&'a self, field: &'a FieldDescriptor) -> &'a [SelectOption] {
        match &field.widget_options {
            WidgetOptions::Select {
                source: OptionSourceSpec::Static(options),
                ..
            } => options,
            WidgetOptions::Select {
                source: OptionSourceSpec::Remote(_),
                ..
            } => self
                .remote_options
                .get(&field.name)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Bind one descriptor (or one of its locale sub-entries) for rendering.
    pub fn bound<'a>(&'a self, field: &'a FieldDescriptor, name: &'a str) -> BoundField<'a> {
        static NULL: Value = Value::Null;
        let memory = self.widgets.get(name);
        BoundField::new(field, self.store.get(name).unwrap_or(&NULL))
            .named(name)
            .with_options(self.field_options(field))
            .invalid(self.store.error(name).is_some())
            .focused(self.focused_name().as_deref() == Some(name))
            .with_cursor(memory.map_or(0, |memory| memory.cursor))
            .with_keyword(memory.map_or("", |memory| memory.keyword.as_str()))
    }

    /// Display text of the field's visible input.
    pub fn display(&self, field: &FieldDescriptor) -> String {
        let name = match self.tabs.get(&field.name) {
            Some(tabs) => tabs.active_name().unwrap_or_else(|| field.name.clone()),
            None => field.name.clone(),
        };
        match self.components.get(&field.name) {
            Some(component) => component.display(&self.bound(field, &name)),
            None => String::new(),
        }
    }

    /// Write one value synchronously and re-validate per the validation mode.
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<(), DescriptorError> {
        self.store.set(name, value)?;
        let revalidate = match self.options.validation_mode {
            ValidationMode::OnChange => true,
            _ => self.attempted || self.store.error(name).is_some(),
        };
        if revalidate {
            self.validate_one(name);
        }
        Ok(())
    }

    /// Route a key press to the focused widget.
    pub fn handle_key(&mut self, key: &KeyEvent) -> InputEffect {
        let Some(field) = self.form.fields.get(self.focus) else {
            return InputEffect::Ignored;
        };
        if field.disabled || self.busy {
            return InputEffect::Ignored;
        }
        let Some(name) = self.focused_name() else {
            return InputEffect::Ignored;
        };
        let Some(component) = self.components.get(&field.name) else {
            return InputEffect::Ignored;
        };
        let event = component.handle_key(&self.bound(field, &name), key);
        match event {
            FieldEvent::Change(value) => match self.set_value(&name, value) {
                Ok(()) => InputEffect::Changed,
                Err(err) => {
                    warn!(field = %name, error = %err, "rejected field update");
                    InputEffect::Ignored
                }
            },
            FieldEvent::Cursor(cursor) => {
                self.widgets.entry(name).or_default().cursor = cursor;
                InputEffect::Moved
            }
            FieldEvent::Search(keyword) => {
                let remote = match &field.widget_options {
                    WidgetOptions::Select {
                        source: OptionSourceSpec::Remote(remote),
                        ..
                    } => remote.clone(),
                    _ => return InputEffect::Ignored,
                };
                let field_name = field.name.clone();
                self.widgets.entry(name).or_default().keyword = keyword.clone();
                if keyword.chars().count() < remote.min_chars {
                    return InputEffect::Changed;
                }
                InputEffect::Search(SearchRequest {
                    field: field_name,
                    keyword,
                    remote,
                })
            }
            FieldEvent::Ignored => InputEffect::Ignored,
        }
    }

    /// Move focus to the descriptor owning `name`; locale sub-names select their tab.
    pub fn focus(&mut self, name: &str) -> Vec<TranslationJob> {
        let Some((index, locale)) = self.locate(name) else {
            return Vec::new();
        };
        let switches_locale = locale.is_some_and(|locale| {
            self.tabs
                .get(&self.form.fields[index].name)
                .is_some_and(|tabs| tabs.active() != locale)
        });
        let jobs = if index != self.focus || switches_locale {
            self.blur()
        } else {
            Vec::new()
        };
        self.focus = index;
        if let Some(locale) = locale {
            let field = self.form.fields[index].name.clone();
            self.select_locale_tab(&field, locale);
        }
        jobs
    }

    pub fn focus_next(&mut self) -> Vec<TranslationJob> {
        self.step_focus(1)
    }

    pub fn focus_prev(&mut self) -> Vec<TranslationJob> {
        self.step_focus(-1)
    }

    /// Leave the focused input: mark it touched, validate in blur mode, and
    /// plan auto-translations for empty sibling locales.
    pub fn blur(&mut self) -> Vec<TranslationJob> {
        let Some(name) = self.focused_name() else {
            return Vec::new();
        };
        self.store.touch(&name);
        if self.options.validation_mode == ValidationMode::OnBlur || self.attempted {
            self.validate_one(&name);
        }
        let Some(field) = self.form.fields.get(self.focus) else {
            return Vec::new();
        };
        match self.components.get(&field.name) {
            Some(component) if field.kind == FieldKind::MultiLanguage => {
                plan_translations(field, &name, &self.store, component.as_ref())
            }
            _ => Vec::new(),
        }
    }

    /// Show locale `index` of `field` and ask for focus once its input is mounted.
    pub fn select_locale_tab(&mut self, field: &str, index: usize) -> bool {
        let Some(tabs) = self.tabs.get_mut(field) else {
            return false;
        };
        if !tabs.select_tab(index) {
            return false;
        }
        self.focus_request = tabs
            .active_name()
            .map(|target| FocusRequest::new(target, self.options.focus_retry_budget));
        true
    }

    /// Cycle the focused multi-language field's tabs.
    pub fn step_locale_tab(&mut self, delta: isize) -> Vec<TranslationJob> {
        let Some(field) = self.form.fields.get(self.focus).map(|field| field.name.clone()) else {
            return Vec::new();
        };
        let Some(tabs) = self.tabs.get(&field) else {
            return Vec::new();
        };
        let len = tabs.locales().len() as isize;
        if len == 0 {
            return Vec::new();
        }
        let next = (tabs.active() as isize + delta).rem_euclid(len) as usize;
        let jobs = self.blur();
        self.select_locale_tab(&field, next);
        jobs
    }

    /// Advance a pending focus request; `is_mounted` reports visible inputs.
    pub fn tick(&mut self, is_mounted: impl Fn(&str) -> bool) -> Option<FocusPoll> {
        let request = self.focus_request.as_mut()?;
        let poll = request.poll(is_mounted);
        if poll != FocusPoll::Pending {
            if poll == FocusPoll::GaveUp {
                debug!(input = request.target(), "focus request expired");
            }
            self.focus_request = None;
        }
        Some(poll)
    }

    /// Normalize and validate; on success the form becomes busy until
    /// [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.busy {
            debug!("submit ignored while busy");
            return SubmitStart::Ignored;
        }
        self.attempted = true;
        self.store.clear_banner();
        self.form_errors.clear();

        let (normalized, coercion_errors) = self.normalized_values();
        let result = if coercion_errors.is_empty() {
            self.schema.validate(&normalized)
        } else {
            ValidationResult::Invalid(crate::validation::ValidationErrors {
                fields: coercion_errors,
                form: Vec::new(),
            })
        };
        match result {
            ValidationResult::Valid(values) => {
                self.store.replace_errors(FieldErrors::new());
                self.busy = true;
                debug!("submitting form");
                SubmitStart::Ready(values)
            }
            ValidationResult::Invalid(errors) => {
                debug!(fields = errors.fields.len(), "submit blocked by validation");
                self.store.replace_errors(errors.fields.clone());
                if !errors.form.is_empty() {
                    self.store.set_banner(errors.form.join("\n"));
                }
                self.form_errors = errors.form;
                self.focus_first_invalid();
                SubmitStart::Invalid(errors.fields)
            }
        }
    }

    /// Record the handler's result. Entered values are kept either way.
    pub fn finish_submit(&mut self, values: Value, result: Result<(), SubmitError>) -> SubmitOutcome {
        self.busy = false;
        match result {
            Ok(()) => {
                debug!("submit accepted");
                SubmitOutcome::Submitted(values)
            }
            Err(err) => {
                let message = err
                    .user_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.options.generic_error.to_string());
                warn!(error = %err, "submit handler failed");
                self.store.set_banner(message.clone());
                if let Some(hook) = &self.error_hook {
                    hook(&err);
                }
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(&mut self, handler: &dyn SubmitHandler) -> SubmitOutcome {
        match self.begin_submit() {
            SubmitStart::Ignored => SubmitOutcome::Ignored,
            SubmitStart::Invalid(errors) => SubmitOutcome::Invalid(errors),
            SubmitStart::Ready(values) => {
                let result = handler.submit(values.clone()).await;
                self.finish_submit(values, result)
            }
        }
    }

    /// Restore the last-known defaults and clear field and form errors.
    pub fn reset(&mut self) {
        self.store.reset();
        self.after_reset();
    }

    /// Switch to new defaults, e.g. when another record is being edited.
    pub fn reset_with(&mut self, defaults: &Value) -> Result<(), DescriptorError> {
        let seeded = FormStore::seed(&self.form, &self.components, defaults)?;
        self.store.rebase(seeded.defaults().clone());
        self.after_reset();
        Ok(())
    }

    /// Apply a finished translation if its target is still empty.
    pub fn apply_translation(&mut self, outcome: &TranslationOutcome) -> bool {
        if let Err(err) = &outcome.result {
            debug!(input = %outcome.job.target, error = %err, "translation skipped");
            return false;
        }
        let Some(component) = self.components.get(&outcome.job.field) else {
            return false;
        };
        apply_translation(&mut self.store, component.as_ref(), outcome)
    }

    /// Install options fetched for `keyword`; responses for a superseded keyword are dropped.
    pub fn apply_remote_options(&mut self, field: &str, keyword: &str, options: Vec<SelectOption>) -> bool {
        let current = self
            .widgets
            .get(field)
            .map(|memory| memory.keyword.as_str())
            .unwrap_or("");
        if current != keyword {
            debug!(field, keyword, "discarding stale options");
            return false;
        }
        self.remote_options.insert(field.to_string(), options);
        true
    }

    fn after_reset(&mut self) {
        self.widgets.clear();
        self.form_errors.clear();
        self.focus_request = None;
        self.attempted = false;
        for tabs in self.tabs.values_mut() {
            tabs.select_tab(0);
        }
    }

    fn step_focus(&mut self, delta: isize) -> Vec<TranslationJob> {
        let len = self.form.fields.len() as isize;
        if len == 0 {
            return Vec::new();
        }
        let jobs = self.blur();
        let mut next = self.focus as isize;
        for _ in 0..len {
            next = (next + delta).rem_euclid(len);
            if !self.form.fields[next as usize].disabled {
                break;
            }
        }
        self.focus = next as usize;
        jobs
    }

    fn first_enabled(&self) -> Option<usize> {
        self.form.fields.iter().position(|field| !field.disabled)
    }

    fn locate(&self, name: &str) -> Option<(usize, Option<usize>)> {
        let (owner, locale) = self.form.owner_of(name)?;
        let index = self
            .form
            .fields
            .iter()
            .position(|field| field.name == owner.name)?;
        Some((index, locale))
    }

    /// Values reduced to each widget's output contract.
    fn normalized_values(&self) -> (Value, FieldErrors) {
        let mut values = self.store.values().clone();
        let mut errors = FieldErrors::new();
        for field in &self.form.fields {
            let Some(component) = self.components.get(&field.name) else {
                continue;
            };
            for name in field.expanded_names() {
                match component.normalize(&self.bound(field, &name)) {
                    Ok(value) => {
                        if let Ok(path) = crate::domain::FieldPath::parse(&name) {
                            path.set(&mut values, value);
                        }
                    }
                    Err(err) => {
                        errors.insert(name, err.message);
                    }
                }
            }
        }
        (values, errors)
    }

    fn validate_one(&mut self, name: &str) {
        let (values, coercion) = self.normalized_values();
        let message = coercion
            .get(name)
            .cloned()
            .or_else(|| self.schema.validate_field(&values, name));
        match message {
            Some(message) => self.store.set_error(name, message),
            None => self.store.clear_error(name),
        }
    }

    fn focus_first_invalid(&mut self) {
        let errors = self.store.errors().clone();
        let target = self.form.fields.iter().enumerate().find_map(|(index, field)| {
            field
                .expanded_names()
                .iter()
                .any(|name| errors.contains_key(name))
                .then_some(index)
        });
        let Some(index) = target else {
            return;
        };
        self.focus = index;
        let field = self.form.fields[index].name.clone();
        let invalid_tab = self
            .tabs
            .get(&field)
            .and_then(|tabs| tabs.first_invalid(&errors));
        if let Some(tab) = invalid_tab {
            self.select_locale_tab(&field, tab);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Messages, rules};
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    fn two_fields() -> FormOrchestrator {
        let form = FormDescriptor::new(vec![
            FieldDescriptor::new(FieldKind::Text, "name"),
            FieldDescriptor::new(FieldKind::Email, "email"),
        ]);
        let schema = ValidationSchema::new(Messages::english())
            .field("name", rules::string().required().min_len(2))
            .field("email", rules::email().required());
        FormOrchestrator::new(form, schema, &json!({}), FormOptions::default()).unwrap()
    }

    #[test]
    fn typing_updates_store_synchronously() {
        let mut form = two_fields();
        let key = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::NONE);
        assert_eq!(form.handle_key(&key), InputEffect::Changed);
        assert_eq!(form.value("name"), Some(&json!("A")));
    }

    #[test]
    fn invalid_submit_focuses_first_error_and_stays_idle() {
        let mut form = two_fields();
        form.focus("email");
        form.set_value("name", json!("A")).unwrap();
        form.set_value("email", json!("nope")).unwrap();
        let start = form.begin_submit();
        assert!(matches!(start, SubmitStart::Invalid(ref errors) if errors.len() == 2));
        assert_eq!(form.focused_name().as_deref(), Some("name"));
        assert!(!form.is_busy());
    }

    #[test]
    fn busy_form_ignores_second_submit() {
        let mut form = two_fields();
        form.set_value("name", json!("Alice")).unwrap();
        form.set_value("email", json!("a@b.com")).unwrap();
        assert!(matches!(form.begin_submit(), SubmitStart::Ready(_)));
        assert_eq!(form.begin_submit(), SubmitStart::Ignored);
        let outcome = form.finish_submit(json!({}), Err(SubmitError::message("")));
        assert_eq!(
            outcome,
            SubmitOutcome::Failed(crate::engine::GENERIC_SUBMIT_ERROR.to_string())
        );
        assert!(!form.is_busy());
    }

    #[test]
    fn edits_after_failed_submit_revalidate_that_field() {
        let mut form = two_fields();
        let _ = form.begin_submit();
        assert!(form.error("name").is_some());
        form.set_value("name", json!("Alice")).unwrap();
        assert_eq!(form.error("name"), None);
        assert!(form.error("email").is_some());
    }

    #[test]
    fn blur_validates_in_blur_mode() {
        let form = FormDescriptor::new(vec![FieldDescriptor::new(FieldKind::Text, "name")]);
        let schema = ValidationSchema::new(Messages::english())
            .field("name", rules::string().required());
        let mut form = FormOrchestrator::new(
            form,
            schema,
            &Value::Null,
            FormOptions::default().with_validation_mode(ValidationMode::OnBlur),
        )
        .unwrap();
        form.blur();
        assert_eq!(form.error("name"), Some("This field is required"));
    }

    #[test]
    fn unknown_custom_widget_is_a_build_error() {
        let form = FormDescriptor::new(vec![
            FieldDescriptor::new(FieldKind::Custom, "rating").with_options(WidgetOptions::Custom {
                widget: "stars".into(),
                config: Value::Null,
            }),
        ]);
        let schema = ValidationSchema::new(Messages::english());
        let err = FormOrchestrator::new(form, schema, &Value::Null, FormOptions::default())
            .unwrap_err();
        assert!(matches!(err, BuildError::Resolve(ResolveError::UnknownCustomWidget { .. })));
    }

    #[test]
    fn stale_remote_options_are_dropped() {
        let form = FormDescriptor::new(vec![
            FieldDescriptor::new(FieldKind::Select, "city").with_options(WidgetOptions::Select {
                source: OptionSourceSpec::Remote(RemoteOptions {
                    endpoint: "/cities".into(),
                    label_key: None,
                    value_key: None,
                    min_chars: 2,
                }),
                multiple: false,
            }),
        ]);
        let schema = ValidationSchema::new(Messages::english());
        let mut form =
            FormOrchestrator::new(form, schema, &Value::Null, FormOptions::default()).unwrap();
        let key = |ch| KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
        assert_eq!(form.handle_key(&key('B')), InputEffect::Changed);
        let InputEffect::Search(request) = form.handle_key(&key('e')) else {
            panic!("expected a search request");
        };
        assert_eq!(request.keyword, "Be");
        form.handle_key(&key('r'));
        assert!(!form.apply_remote_options("city", "Be", vec![SelectOption::new("Bern", 1)]));
        assert!(form.apply_remote_options("city", "Ber", vec![SelectOption::new("Berlin", 2)]));
        let city = form.descriptor().fields[0].clone();
        assert_eq!(form.field_options(&city).len(), 1);
    }
}
