use serde_json::Value;

use crate::domain::{FieldDescriptor, WidgetOptions, localized_name};
use crate::validation::FieldErrors;

use super::field::FieldComponent;
use super::store::FormStore;

/// Tab selection for one multi-language field. Sub-values live in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLanguageState {
    field: String,
    locales: Vec<String>,
    active: usize,
}

impl MultiLanguageState {
    pub fn new(descriptor: &FieldDescriptor) -> Self {
        Self {
            field: descriptor.name.clone(),
            locales: descriptor.locales().to_vec(),
            active: 0,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_locale(&self) -> Option<&str> {
        self.locales.get(self.active).map(String::as_str)
    }

    /// Activate tab `index`; out of range indices are ignored.
    pub fn select_tab(&mut self, index: usize) -> bool {
        if index >= self.locales.len() {
            return false;
        }
        self.active = index;
        true
    }

    /// Cycle through tabs, wrapping at both ends.
    pub fn step(&mut self, delta: isize) {
        let len = self.locales.len() as isize;
        if len == 0 {
            return;
        }
        self.active = (self.active as isize + delta).rem_euclid(len) as usize;
    }

    pub fn sub_name(&self, index: usize) -> Option<String> {
        self.locales
            .get(index)
            .map(|locale| localized_name(&self.field, locale))
    }

    pub fn active_name(&self) -> Option<String> {
        self.sub_name(self.active)
    }

    pub fn sub_names(&self) -> impl Iterator<Item = String> + '_ {
        self.locales
            .iter()
            .map(|locale| localized_name(&self.field, locale))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.sub_names().position(|sub| sub == name)
    }

    /// Filled/empty per tab, independent of validity.
    pub fn completion(&self, store: &FormStore, component: &dyn FieldComponent) -> Vec<bool> {
        self.sub_names()
            .map(|name| {
                store
                    .get(&name)
                    .is_some_and(|value| !component.is_empty(value))
            })
            .collect()
    }

    pub fn first_invalid(&self, errors: &FieldErrors) -> Option<usize> {
        self.sub_names().position(|name| errors.contains_key(&name))
    }
}

/// One pending request to fill an empty locale from another locale's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub field: String,
    pub source_locale: String,
    pub target_locale: String,
    /// Flat name of the sub-entry the result is written to.
    pub target: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    pub job: TranslationJob,
    pub result: Result<String, String>,
}

/// Jobs for every other locale that is empty when `source` loses focus.
pub fn plan_translations(
    descriptor: &FieldDescriptor,
    source: &str,
    store: &FormStore,
    component: &dyn FieldComponent,
) -> Vec<TranslationJob> {
    let WidgetOptions::MultiLanguage {
        locales,
        auto_translate: true,
        ..
    } = &descriptor.widget_options
    else {
        return Vec::new();
    };
    let Some(source_locale) = locales
        .iter()
        .find(|locale| localized_name(&descriptor.name, locale) == source)
    else {
        return Vec::new();
    };
    let text = match store.get(source) {
        Some(value) if !component.is_empty(value) => match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
        _ => return Vec::new(),
    };
    locales
        .iter()
        .filter(|locale| *locale != source_locale)
        .filter_map(|locale| {
            let target = localized_name(&descriptor.name, locale);
            let empty = store
                .get(&target)
                .is_none_or(|value| component.is_empty(value));
            empty.then(|| TranslationJob {
                field: descriptor.name.clone(),
                source_locale: source_locale.clone(),
                target_locale: locale.clone(),
                target,
                text: text.clone(),
            })
        })
        .collect()
}

/// Write a finished translation only if its target is still empty.
pub fn apply_translation(
    store: &mut FormStore,
    component: &dyn FieldComponent,
    outcome: &TranslationOutcome,
) -> bool {
    let Ok(translated) = &outcome.result else {
        return false;
    };
    let still_empty = store
        .get(&outcome.job.target)
        .is_none_or(|value| component.is_empty(value));
    if !still_empty {
        tracing::debug!(input = %outcome.job.target, "discarding late translation");
        return false;
    }
    store
        .set(&outcome.job.target, Value::String(translated.clone()))
        .is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPoll {
    Focused,
    Pending,
    GaveUp,
}

/// Move focus to a sub-input once it is mounted, retrying once per tick
/// for a bounded number of ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRequest {
    target: String,
    remaining: u32,
}

impl FocusRequest {
    pub fn new(target: impl Into<String>, budget: u32) -> Self {
        Self {
            target: target.into(),
            remaining: budget,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn poll(&mut self, is_mounted: impl Fn(&str) -> bool) -> FocusPoll {
        if is_mounted(&self.target) {
            return FocusPoll::Focused;
        }
        if self.remaining == 0 {
            return FocusPoll::GaveUp;
        }
        self.remaining -= 1;
        FocusPoll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldKind, FormDescriptor};
    use crate::form::resolver::WidgetResolver;
    use serde_json::json;

    fn setup(sub_kind: FieldKind) -> (FieldDescriptor, FormStore, Box<dyn FieldComponent>) {
        let descriptor = FieldDescriptor::new(FieldKind::MultiLanguage, "title").with_options(
            WidgetOptions::MultiLanguage {
                locales: vec!["en".into(), "ar".into(), "fr".into()],
                sub_kind,
                auto_translate: true,
            },
        );
        let form = FormDescriptor::new(vec![descriptor.clone()]);
        let components = WidgetResolver::default().resolve_all(&form).unwrap();
        let store = FormStore::seed(&form, &components, &Value::Null).unwrap();
        let component = components["title"].clone();
        (descriptor, store, component)
    }

    #[test]
    fn tab_selection_keeps_every_sub_entry() {
        let (descriptor, store, _) = setup(FieldKind::Text);
        let mut state = MultiLanguageState::new(&descriptor);
        assert!(state.select_tab(2));
        assert!(!state.select_tab(3));
        assert_eq!(state.active_locale(), Some("fr"));
        state.step(1);
        assert_eq!(state.active(), 0);
        let object = store.values().as_object().unwrap();
        assert_eq!(object.len(), 3);
    }

    #[test]
    fn plans_only_for_empty_targets() {
        let (descriptor, mut store, component) = setup(FieldKind::Text);
        store.set("title_en", json!("Hello")).unwrap();
        store.set("title_fr", json!("Bonjour")).unwrap();
        let jobs = plan_translations(&descriptor, "title_en", &store, component.as_ref());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].target, "title_ar");
        assert_eq!(jobs[0].text, "Hello");
    }

    #[test]
    fn rich_text_placeholder_does_not_trigger_translation() {
        let (descriptor, mut store, component) = setup(FieldKind::RichText);
        store.set("title_en", json!("<p></p>")).unwrap();
        assert!(plan_translations(&descriptor, "title_en", &store, component.as_ref()).is_empty());
    }

    #[test]
    fn late_translation_never_overwrites_typed_text() {
        let (descriptor, mut store, component) = setup(FieldKind::Text);
        store.set("title_en", json!("Hello")).unwrap();
        let jobs = plan_translations(&descriptor, "title_en", &store, component.as_ref());
        store.set("title_ar", json!("typed")).unwrap();
        let outcome = TranslationOutcome {
            job: jobs[0].clone(),
            result: Ok("مرحبا".into()),
        };
        assert!(!apply_translation(&mut store, component.as_ref(), &outcome));
        assert_eq!(store.get("title_ar"), Some(&json!("typed")));
    }

    #[test]
    fn focus_request_gives_up_after_budget() {
        let mut request = FocusRequest::new("title_ar", 2);
        assert_eq!(request.poll(|_| false), FocusPoll::Pending);
        assert_eq!(request.poll(|_| false), FocusPoll::Pending);
        assert_eq!(request.poll(|_| false), FocusPoll::GaveUp);
        let mut request = FocusRequest::new("title_ar", 2);
        assert_eq!(request.poll(|name| name == "title_ar"), FocusPoll::Focused);
    }
}
