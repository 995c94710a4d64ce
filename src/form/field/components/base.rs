use crossterm::event::KeyEvent;
use serde_json::Value;

use crate::domain::FieldDescriptor;
use crate::form::error::FieldCoercionError;
use crate::form::field::{BoundField, FieldEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    TextInput,
    Number,
    Toggle,
    Choice,
    FileUpload,
    MapPosition,
    MultiLanguage,
    Custom,
}

/// Render/input behaviour for one field kind.
///
/// Implementations are stateless: every call receives the bound value and
/// returns edits as [`FieldEvent`]s for the caller to apply synchronously.
pub trait FieldComponent: FieldComponentClone + std::fmt::Debug + Send + Sync {
    fn kind(&self) -> ComponentKind;

    fn display(&self, field: &BoundField<'_>) -> String;

    fn handle_key(&self, field: &BoundField<'_>, key: &KeyEvent) -> FieldEvent {
        let _ = (field, key);
        FieldEvent::Ignored
    }

    /// Value written when neither the caller nor the descriptor supplies a default.
    fn empty_value(&self, descriptor: &FieldDescriptor) -> Value {
        let _ = descriptor;
        Value::String(String::new())
    }

    fn is_empty(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(text) => text.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Widget behind each locale tab, for composites that fan out per locale.
    fn locale_input(&self) -> Option<&dyn FieldComponent> {
        None
    }

    /// Reduce the stored value to the kind's output contract.
    fn normalize(&self, field: &BoundField<'_>) -> Result<Value, FieldCoercionError> {
        Ok(field.value.clone())
    }
}

pub trait FieldComponentClone {
    fn clone_box(&self) -> Box<dyn FieldComponent>;
}

impl<T> FieldComponentClone for T
where
    T: 'static + FieldComponent + Clone,
{
    fn clone_box(&self) -> Box<dyn FieldComponent> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn FieldComponent> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
