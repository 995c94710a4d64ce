use crossterm::event::KeyEvent;
use serde_json::{Value, json};

use crate::domain::FieldDescriptor;
use crate::form::error::FieldCoercionError;
use crate::form::field::{BoundField, FieldEvent};

use super::helpers::edit_text;
use super::{ComponentKind, FieldComponent};

/// Map position entered as `lat, lng`. Submits `{ "lat", "lng" }`.
#[derive(Debug, Clone, Default)]
pub struct MapPositionComponent;

impl MapPositionComponent {
    pub fn new() -> Self {
        Self
    }

    fn text_of(value: &Value) -> String {
        match value {
            Value::Object(map) => match (map.get("lat"), map.get("lng")) {
                (Some(lat), Some(lng)) => format!("{lat}, {lng}"),
                _ => String::new(),
            },
            Value::String(text) => text.clone(),
            _ => String::new(),
        }
    }

    fn parse(name: &str, text: &str) -> Result<(f64, f64), FieldCoercionError> {
        let invalid = || FieldCoercionError::new(name, "expected a position as `lat, lng`");
        let (lat, lng) = text.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(FieldCoercionError::new(name, "latitude must be within ±90"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(FieldCoercionError::new(name, "longitude must be within ±180"));
        }
        Ok((lat, lng))
    }
}

impl FieldComponent for MapPositionComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::MapPosition
    }

    fn display(&self, field: &BoundField<'_>) -> String {
        Self::text_of(field.value)
    }

    fn handle_key(&self, field: &BoundField<'_>, key: &KeyEvent) -> FieldEvent {
        let accept = |ch: char| ch.is_ascii_digit() || matches!(ch, '-' | '.' | ',' | ' ');
        match edit_text(&Self::text_of(field.value), key, accept) {
            Some(next) => FieldEvent::Change(Value::String(next)),
            None => FieldEvent::Ignored,
        }
    }

    fn empty_value(&self, _descriptor: &FieldDescriptor) -> Value {
        Value::Null
    }

    fn is_empty(&self, value: &Value) -> bool {
        Self::text_of(value).trim().is_empty()
    }

    fn normalize(&self, field: &BoundField<'_>) -> Result<Value, FieldCoercionError> {
        let text = Self::text_of(field.value);
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let (lat, lng) = Self::parse(field.name, &text)?;
        Ok(json!({ "lat": lat, "lng": lng }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;

    #[test]
    fn parses_pair_and_checks_ranges() {
        let descriptor = FieldDescriptor::new(FieldKind::MapPosition, "spot");
        let component = MapPositionComponent::new();
        let value = json!("52.5, 13.4");
        assert_eq!(
            component.normalize(&BoundField::new(&descriptor, &value)),
            Ok(json!({ "lat": 52.5, "lng": 13.4 }))
        );
        let value = json!("95, 0");
        assert!(component.normalize(&BoundField::new(&descriptor, &value)).is_err());
    }
}
