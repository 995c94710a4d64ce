use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;

use crate::domain::{FieldDescriptor, OptionSourceSpec, SelectOption, WidgetOptions};
use crate::form::error::FieldCoercionError;
use crate::form::field::convert::{option_index, option_label, value_to_string};
use crate::form::field::{BoundField, FieldEvent};

use super::helpers::edit_text;
use super::{ComponentKind, ComponentPalette, FieldComponent};

/// Select and radio widgets.
///
/// Options come from the bound field, so static and remote lists are handled
/// the same way. Multiple selection stores an array of option values.
#[derive(Debug, Clone)]
pub struct ChoiceComponent {
    palette: Arc<ComponentPalette>,
}

impl ChoiceComponent {
    pub fn new(palette: Arc<ComponentPalette>) -> Self {
        Self { palette }
    }

    fn multiple(descriptor: &FieldDescriptor) -> bool {
        matches!(
            descriptor.widget_options,
            WidgetOptions::Select { multiple: true, .. }
        )
    }

    fn remote(descriptor: &FieldDescriptor) -> bool {
        matches!(
            descriptor.widget_options,
            WidgetOptions::Select {
                source: OptionSourceSpec::Remote(_),
                ..
            }
        )
    }

    fn step(&self, len: usize, current: Option<usize>, forward: bool) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(index), true) if index + 1 < len => index + 1,
            (Some(index), false) if index > 0 => index - 1,
            (Some(index), _) if !self.palette.wrap_choices => index,
            (Some(_), true) => 0,
            (Some(_), false) => len - 1,
        };
        Some(next)
    }

    fn toggle_member(selected: &Value, option: &SelectOption) -> Value {
        let mut items = match selected {
            Value::Array(items) => items.clone(),
            Value::Null => Vec::new(),
            other => vec![other.clone()],
        };
        if let Some(pos) = items.iter().position(|item| *item == option.value) {
            items.remove(pos);
        } else {
            items.push(option.value.clone());
        }
        Value::Array(items)
    }
}

impl FieldComponent for ChoiceComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Choice
    }

    fn display(&self, field: &BoundField<'_>) -> String {
        if Self::multiple(field.descriptor) {
            let labels: Vec<String> = match field.value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        option_label(field.options, item).unwrap_or_else(|| value_to_string(item))
                    })
                    .collect(),
                _ => Vec::new(),
            };
            if labels.is_empty() {
                return self.palette.empty_choice.to_string();
            }
            return labels.join(", ");
        }
        if field.value.is_null() || value_to_string(field.value).is_empty() {
            if !field.keyword.is_empty() {
                return format!("{}…", field.keyword);
            }
            return self.palette.empty_choice.to_string();
        }
        option_label(field.options, field.value).unwrap_or_else(|| field.text())
    }

    fn handle_key(&self, field: &BoundField<'_>, key: &KeyEvent) -> FieldEvent {
        let len = field.options.len();
        if Self::multiple(field.descriptor) {
            return match key.code {
                KeyCode::Up | KeyCode::Left => {
                    let current = (len > 0).then(|| field.cursor.min(len - 1));
                    self.step(len, current, false)
                        .map_or(FieldEvent::Ignored, FieldEvent::Cursor)
                }
                KeyCode::Down | KeyCode::Right => {
                    let current = (len > 0).then(|| field.cursor.min(len - 1));
                    self.step(len, current, true)
                        .map_or(FieldEvent::Ignored, FieldEvent::Cursor)
                }
                KeyCode::Char(' ') | KeyCode::Enter => match field.options.get(field.cursor) {
                    Some(option) => FieldEvent::Change(Self::toggle_member(field.value, option)),
                    None => FieldEvent::Ignored,
                },
                _ if Self::remote(field.descriptor) => {
                    edit_text(field.keyword, key, |_| true).map_or(FieldEvent::Ignored, FieldEvent::Search)
                }
                _ => FieldEvent::Ignored,
            };
        }
        let current = option_index(field.options, field.value);
        let forward = match key.code {
            KeyCode::Up | KeyCode::Left => false,
            KeyCode::Down | KeyCode::Right => true,
            KeyCode::Char(' ') if !Self::remote(field.descriptor) => true,
            _ if Self::remote(field.descriptor) => {
                return edit_text(field.keyword, key, |_| true)
                    .map_or(FieldEvent::Ignored, FieldEvent::Search);
            }
            _ => return FieldEvent::Ignored,
        };
        match self.step(len, current, forward) {
            Some(index) if Some(index) != current => {
                FieldEvent::Change(field.options[index].value.clone())
            }
            _ => FieldEvent::Ignored,
        }
    }

    fn empty_value(&self, descriptor: &FieldDescriptor) -> Value {
        if Self::multiple(descriptor) {
            Value::Array(Vec::new())
        } else {
            Value::Null
        }
    }

    fn normalize(&self, field: &BoundField<'_>) -> Result<Value, FieldCoercionError> {
        if Self::multiple(field.descriptor) {
            return Ok(match field.value {
                Value::Array(_) => field.value.clone(),
                Value::Null => Value::Array(Vec::new()),
                other => Value::Array(vec![other.clone()]),
            });
        }
        Ok(match field.value {
            Value::String(text) if text.trim().is_empty() => Value::Null,
            other => other.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn options() -> Vec<SelectOption> {
        vec![SelectOption::new("Red", "r"), SelectOption::new("Blue", "b")]
    }

    #[test]
    fn arrows_cycle_single_selection() {
        let descriptor = FieldDescriptor::new(FieldKind::Select, "color");
        let options = options();
        let component = ChoiceComponent::new(Arc::new(ComponentPalette::default()));
        let value = json!("b");
        let bound = BoundField::new(&descriptor, &value).with_options(&options);
        assert_eq!(component.display(&bound), "Blue");
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(component.handle_key(&bound, &down), FieldEvent::Change(json!("r")));
    }

    #[test]
    fn space_toggles_membership_at_cursor() {
        let descriptor = FieldDescriptor::new(FieldKind::Select, "tags").with_options(
            WidgetOptions::Select {
                source: OptionSourceSpec::Static(options()),
                multiple: true,
            },
        );
        let options = options();
        let component = ChoiceComponent::new(Arc::new(ComponentPalette::default()));
        let value = json!(["r"]);
        let bound = BoundField::new(&descriptor, &value)
            .with_options(&options)
            .with_cursor(1);
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(component.handle_key(&bound, &space), FieldEvent::Change(json!(["r", "b"])));
        let bound = bound.with_cursor(0);
        assert_eq!(component.handle_key(&bound, &space), FieldEvent::Change(json!([])));
    }

    #[test]
    fn typing_in_remote_select_emits_search() {
        let descriptor = FieldDescriptor::new(FieldKind::Select, "city").with_options(
            WidgetOptions::Select {
                source: OptionSourceSpec::Remote(crate::domain::RemoteOptions {
                    endpoint: "/cities".into(),
                    label_key: None,
                    value_key: None,
                    min_chars: 0,
                }),
                multiple: false,
            },
        );
        let component = ChoiceComponent::new(Arc::new(ComponentPalette::default()));
        let value = Value::Null;
        let bound = BoundField::new(&descriptor, &value).with_keyword("Be");
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(component.handle_key(&bound, &key), FieldEvent::Search("Ber".into()));
    }
}
