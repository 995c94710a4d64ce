use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use crate::domain::{DescriptorError, FieldPath, FormDescriptor};
use crate::validation::FieldErrors;

use super::field::FieldComponent;

/// The form value object plus the bookkeeping the orchestrator keeps beside it.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    values: Value,
    defaults: Value,
    touched: IndexSet<String>,
    errors: FieldErrors,
    banner: Option<String>,
}

impl FormStore {
    /// Seed every field (and every locale sub-entry) from `supplied`, then
    /// the descriptor default, then the widget's empty value.
    pub fn seed(
        form: &FormDescriptor,
        components: &IndexMap<String, Box<dyn FieldComponent>>,
        supplied: &Value,
    ) -> Result<Self, DescriptorError> {
        let mut values = match supplied {
            Value::Object(_) => supplied.clone(),
            _ => Value::Object(Map::new()),
        };
        for field in &form.fields {
            let component = components.get(&field.name);
            let locales = field.locales();
            for (index, name) in field.expanded_names().into_iter().enumerate() {
                let path = FieldPath::parse(&name)?;
                if path.get(&values).is_some() {
                    continue;
                }
                let fallback = match (&field.default, locales.get(index)) {
                    (Some(Value::Object(per_locale)), Some(locale)) => per_locale.get(locale).cloned(),
                    (Some(default), _) => Some(default.clone()),
                    (None, _) => None,
                };
                let value = fallback
                    .or_else(|| component.map(|component| component.empty_value(field)))
                    .unwrap_or(Value::Null);
                path.set(&mut values, value);
            }
        }
        Ok(Self {
            defaults: values.clone(),
            values,
            ..Self::default()
        })
    }

    pub fn values(&self) -> &Value {
        &self.values
    }

    pub fn defaults(&self) -> &Value {
        &self.defaults
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        FieldPath::parse(name).ok()?.get(&self.values)
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<(), DescriptorError> {
        FieldPath::parse(name)?.set(&mut self.values, value);
        Ok(())
    }

    pub fn touch(&mut self, name: &str) {
        self.touched.insert(name.to_string());
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn set_error(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(name.into(), message.into());
    }

    pub fn clear_error(&mut self, name: &str) {
        self.errors.shift_remove(name);
    }

    pub fn replace_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn set_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Restore the last-known defaults and drop every error.
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.touched.clear();
        self.errors.clear();
        self.banner = None;
    }

    /// Adopt new defaults (e.g. another record is being edited) and reset to them.
    pub fn rebase(&mut self, defaults: Value) {
        self.defaults = defaults;
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldDescriptor, FieldKind, WidgetOptions};
    use crate::form::resolver::WidgetResolver;
    use serde_json::json;

    fn form() -> FormDescriptor {
        FormDescriptor::new(vec![
            FieldDescriptor::new(FieldKind::Text, "name"),
            FieldDescriptor::new(FieldKind::Switch, "active").with_default(true),
            FieldDescriptor::new(FieldKind::Text, "address.city"),
            FieldDescriptor::new(FieldKind::MultiLanguage, "title")
                .with_options(WidgetOptions::MultiLanguage {
                    locales: vec!["en".into(), "ar".into()],
                    sub_kind: FieldKind::Text,
                    auto_translate: false,
                })
                .with_default(json!({ "ar": "مرحبا" })),
        ])
    }

    #[test]
    fn seeds_supplied_then_default_then_empty() {
        let form = form();
        let components = WidgetResolver::default().resolve_all(&form).unwrap();
        let store = FormStore::seed(&form, &components, &json!({ "name": "Ada", "id": 7 })).unwrap();
        assert_eq!(
            store.values(),
            &json!({
                "name": "Ada",
                "id": 7,
                "active": true,
                "address": { "city": "" },
                "title_en": "",
                "title_ar": "مرحبا",
            })
        );
    }

    #[test]
    fn reset_restores_defaults_and_clears_errors() {
        let form = form();
        let components = WidgetResolver::default().resolve_all(&form).unwrap();
        let mut store = FormStore::seed(&form, &components, &Value::Null).unwrap();
        store.set("name", json!("changed")).unwrap();
        store.set_error("name", "bad");
        store.set_banner("boom");
        store.reset();
        assert_eq!(store.get("name"), Some(&json!("")));
        assert!(store.errors().is_empty());
        assert_eq!(store.banner(), None);
    }
}
