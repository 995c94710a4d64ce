use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;

use crate::domain::{FieldDescriptor, FieldKind};
use crate::form::error::FieldCoercionError;
use crate::form::field::{BoundField, FieldEvent};

use super::{ComponentKind, ComponentPalette, FieldComponent};

/// Checkbox and switch. Both store a JSON boolean.
#[derive(Debug, Clone)]
pub struct ToggleComponent {
    switch: bool,
    palette: Arc<ComponentPalette>,
}

impl ToggleComponent {
    pub fn new(kind: FieldKind, palette: Arc<ComponentPalette>) -> Self {
        Self {
            switch: kind == FieldKind::Switch,
            palette,
        }
    }

    fn flag(value: &Value) -> bool {
        match value {
            Value::Bool(flag) => *flag,
            Value::String(text) => matches!(text.trim(), "true" | "1" | "on" | "yes"),
            Value::Number(num) => num.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        }
    }
}

impl FieldComponent for ToggleComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Toggle
    }

    fn display(&self, field: &BoundField<'_>) -> String {
        let on = Self::flag(field.value);
        let labels = &self.palette.toggles;
        match (self.switch, on) {
            (true, true) => labels.on.to_string(),
            (true, false) => labels.off.to_string(),
            (false, true) => labels.checked.to_string(),
            (false, false) => labels.unchecked.to_string(),
        }
    }

    fn handle_key(&self, field: &BoundField<'_>, key: &KeyEvent) -> FieldEvent {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right => {
                FieldEvent::Change(Value::Bool(!Self::flag(field.value)))
            }
            _ => FieldEvent::Ignored,
        }
    }

    fn empty_value(&self, _descriptor: &FieldDescriptor) -> Value {
        Value::Bool(false)
    }

    fn normalize(&self, field: &BoundField<'_>) -> Result<Value, FieldCoercionError> {
        Ok(Value::Bool(Self::flag(field.value)))
    }
}
