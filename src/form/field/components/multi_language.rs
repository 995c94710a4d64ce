use crossterm::event::KeyEvent;
use serde_json::Value;

use crate::domain::FieldDescriptor;
use crate::form::error::FieldCoercionError;
use crate::form::field::{BoundField, FieldEvent};

use super::{ComponentKind, FieldComponent};

/// One component per locale sub-entry; input is delegated to the sub-kind widget.
#[derive(Debug, Clone)]
pub struct MultiLanguageComponent {
    inner: Box<dyn FieldComponent>,
}

impl MultiLanguageComponent {
    pub fn new(inner: Box<dyn FieldComponent>) -> Self {
        Self { inner }
    }
}

impl FieldComponent for MultiLanguageComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::MultiLanguage
    }

    fn display(&self, field: &BoundField<'_>) -> String {
        self.inner.display(field)
    }

    fn handle_key(&self, field: &BoundField<'_>, key: &KeyEvent) -> FieldEvent {
        self.inner.handle_key(field, key)
    }

    fn empty_value(&self, descriptor: &FieldDescriptor) -> Value {
        self.inner.empty_value(descriptor)
    }

    fn is_empty(&self, value: &Value) -> bool {
        self.inner.is_empty(value)
    }

    fn locale_input(&self) -> Option<&dyn FieldComponent> {
        Some(self.inner.as_ref())
    }

    fn normalize(&self, field: &BoundField<'_>) -> Result<Value, FieldCoercionError> {
        self.inner.normalize(field)
    }
}
