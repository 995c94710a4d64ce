use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;

use crate::domain::{FieldDescriptor, WidgetOptions};
use crate::form::error::FieldCoercionError;
use crate::form::field::convert::adjust_numeric_value;
use crate::form::field::{BoundField, FieldEvent};
use crate::validation::rules::number_value;

use super::helpers::edit_text;
use super::{ComponentKind, ComponentPalette, FieldComponent};

/// Numeric input. Typed text stays text while editing and becomes a JSON
/// number on normalize; range checks belong to the validation schema.
#[derive(Debug, Clone)]
pub struct NumberComponent {
    palette: Arc<ComponentPalette>,
}

impl NumberComponent {
    pub fn new(palette: Arc<ComponentPalette>) -> Self {
        Self { palette }
    }

    fn integer(descriptor: &FieldDescriptor) -> bool {
        matches!(
            descriptor.widget_options,
            WidgetOptions::Number { integer: true, .. }
        )
    }
}

impl FieldComponent for NumberComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Number
    }

    fn display(&self, field: &BoundField<'_>) -> String {
        field.text()
    }

    fn handle_key(&self, field: &BoundField<'_>, key: &KeyEvent) -> FieldEvent {
        let fast = key.modifiers.contains(KeyModifiers::SHIFT);
        let delta = match key.code {
            KeyCode::Left | KeyCode::Down => -1,
            KeyCode::Right | KeyCode::Up => 1,
            _ => {
                return match edit_text(&field.text(), key, |ch| {
                    ch.is_ascii_digit() || matches!(ch, '-' | '.' | ',')
                }) {
                    Some(next) => FieldEvent::Change(Value::String(next)),
                    None => FieldEvent::Ignored,
                };
            }
        };
        let mut tuning = self.palette.numeric.clone();
        if let WidgetOptions::Number {
            step: Some(step), ..
        } = field.descriptor.widget_options
        {
            tuning = tuning.with_float_step(step).with_integer_step(step as i64);
        }
        let next = adjust_numeric_value(
            &field.text(),
            Self::integer(field.descriptor),
            &tuning,
            delta,
            fast,
        );
        FieldEvent::Change(Value::String(next))
    }

    fn normalize(&self, field: &BoundField<'_>) -> Result<Value, FieldCoercionError> {
        let text = match field.value {
            Value::String(text) => text.trim().replace(',', "."),
            other => return Ok(other.clone()),
        };
        if text.is_empty() {
            return Ok(Value::Null);
        }
        text.parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite())
            .map(number_value)
            .ok_or_else(|| FieldCoercionError::new(field.name, "Must be a number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;
    use serde_json::json;

    #[test]
    fn arrows_step_by_configured_amount() {
        let descriptor = FieldDescriptor::new(FieldKind::Number, "count").with_options(
            WidgetOptions::Number {
                step: Some(5.0),
                integer: true,
            },
        );
        let component = NumberComponent::new(Arc::new(ComponentPalette::default()));
        let value = json!("10");
        let bound = BoundField::new(&descriptor, &value);
        let up = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(component.handle_key(&bound, &up), FieldEvent::Change(json!("15")));
    }

    #[test]
    fn letters_are_ignored_and_comma_normalizes() {
        let descriptor = FieldDescriptor::new(FieldKind::Number, "price");
        let component = NumberComponent::new(Arc::new(ComponentPalette::default()));
        let value = json!(" 2,5 ");
        let bound = BoundField::new(&descriptor, &value);
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(component.handle_key(&bound, &key), FieldEvent::Ignored);
        assert_eq!(component.normalize(&bound), Ok(json!(2.5)));
    }

    #[test]
    fn normalize_emits_numbers_or_null() {
        let descriptor = FieldDescriptor::new(FieldKind::Number, "count");
        let component = NumberComponent::new(Arc::new(ComponentPalette::default()));
        let normalize = |value: Value| component.normalize(&BoundField::new(&descriptor, &value));
        assert_eq!(normalize(json!("12")), Ok(json!(12)));
        assert_eq!(normalize(json!("  ")), Ok(Value::Null));
        assert_eq!(normalize(json!(7)), Ok(json!(7)));
        let err = normalize(json!("1.2.3")).unwrap_err();
        assert_eq!(err.name, "count");
    }
}
