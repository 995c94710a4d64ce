use crossterm::event::KeyEvent;
use serde_json::Value;

use crate::domain::FieldKind;
use crate::form::field::{BoundField, FieldEvent};
use crate::validation::is_blank_rich_text;

use super::helpers::{edit_text, masked};
use super::{ComponentKind, FieldComponent};

/// Free-text input shared by every textual kind; the kind only changes
/// which characters are accepted and how the value is shown.
#[derive(Debug, Clone)]
pub struct TextComponent {
    kind: FieldKind,
}

impl TextComponent {
    pub fn new(kind: FieldKind) -> Self {
        Self { kind }
    }

    fn accepts(&self, ch: char) -> bool {
        match self.kind {
            FieldKind::Phone => ch.is_ascii_digit() || matches!(ch, '+' | ' ' | '-' | '(' | ')'),
            FieldKind::Date => ch.is_ascii_digit() || ch == '-',
            FieldKind::Color => ch.is_ascii_hexdigit() || ch == '#',
            FieldKind::Email => !ch.is_whitespace(),
            _ => true,
        }
    }
}

impl FieldComponent for TextComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::TextInput
    }

    fn display(&self, field: &BoundField<'_>) -> String {
        let text = field.text();
        match self.kind {
            FieldKind::Password => masked(&text),
            FieldKind::RichText if is_blank_rich_text(&text) => String::new(),
            _ => text,
        }
    }

    fn handle_key(&self, field: &BoundField<'_>, key: &KeyEvent) -> FieldEvent {
        match edit_text(&field.text(), key, |ch| self.accepts(ch)) {
            Some(next) => FieldEvent::Change(Value::String(next)),
            None => FieldEvent::Ignored,
        }
    }

    fn is_empty(&self, value: &Value) -> bool {
        match (self.kind, value) {
            (FieldKind::RichText, Value::String(text)) => is_blank_rich_text(text),
            (_, Value::String(text)) => text.trim().is_empty(),
            (_, Value::Null) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldDescriptor;
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    #[test]
    fn typing_appends_to_bound_value() {
        let descriptor = FieldDescriptor::new(FieldKind::Text, "name");
        let value = json!("Al");
        let component = TextComponent::new(FieldKind::Text);
        let key = KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(
            component.handle_key(&BoundField::new(&descriptor, &value), &key),
            FieldEvent::Change(json!("Ali"))
        );
    }

    #[test]
    fn password_is_masked_and_phone_filters_letters() {
        let descriptor = FieldDescriptor::new(FieldKind::Password, "secret");
        let value = json!("abc");
        let bound = BoundField::new(&descriptor, &value);
        assert_eq!(TextComponent::new(FieldKind::Password).display(&bound), "•••");

        let phone = TextComponent::new(FieldKind::Phone);
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(phone.handle_key(&bound, &key), FieldEvent::Ignored);
    }

    #[test]
    fn rich_text_placeholder_counts_as_empty() {
        let component = TextComponent::new(FieldKind::RichText);
        assert!(component.is_empty(&json!("<p></p>")));
        assert!(!component.is_empty(&json!("<p>Hi</p>")));
    }
}
