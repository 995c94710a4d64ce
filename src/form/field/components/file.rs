use std::path::Path;

use crossterm::event::KeyEvent;
use serde_json::{Map, Value};

use crate::domain::{FieldDescriptor, WidgetOptions};
use crate::form::error::FieldCoercionError;
use crate::form::field::{BoundField, FieldEvent};

use super::helpers::edit_text;
use super::{ComponentKind, FieldComponent};

/// File picker typed as a path. Submits `{ "name", "path" }`.
#[derive(Debug, Clone, Default)]
pub struct FileUploadComponent;

impl FileUploadComponent {
    pub fn new() -> Self {
        Self
    }

    fn path_of(value: &Value) -> Option<String> {
        match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Value::Object(map) => map.get("path").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }

    fn check_constraints(descriptor: &FieldDescriptor, path: &Path) -> Result<(), FieldCoercionError> {
        let WidgetOptions::FileUpload { accept, max_size } = &descriptor.widget_options else {
            return Ok(());
        };
        if !accept.is_empty() {
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
                .unwrap_or_default();
            let allowed = accept
                .iter()
                .any(|entry| entry.trim().to_ascii_lowercase() == extension);
            if !allowed {
                return Err(FieldCoercionError::new(
                    &descriptor.name,
                    format!("file type must be one of {}", accept.join(", ")),
                ));
            }
        }
        if let Some(limit) = max_size {
            let size = std::fs::metadata(path)
                .map_err(|err| FieldCoercionError::new(&descriptor.name, err.to_string()))?
                .len();
            if size > *limit {
                return Err(FieldCoercionError::new(
                    &descriptor.name,
                    format!("file is larger than {limit} bytes"),
                ));
            }
        }
        Ok(())
    }
}

impl FieldComponent for FileUploadComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::FileUpload
    }

    fn display(&self, field: &BoundField<'_>) -> String {
        Self::path_of(field.value).unwrap_or_default()
    }

    fn handle_key(&self, field: &BoundField<'_>, key: &KeyEvent) -> FieldEvent {
        let current = Self::path_of(field.value).unwrap_or_default();
        match edit_text(&current, key, |_| true) {
            Some(next) => FieldEvent::Change(Value::String(next)),
            None => FieldEvent::Ignored,
        }
    }

    fn empty_value(&self, _descriptor: &FieldDescriptor) -> Value {
        Value::Null
    }

    fn is_empty(&self, value: &Value) -> bool {
        Self::path_of(value).is_none()
    }

    fn normalize(&self, field: &BoundField<'_>) -> Result<Value, FieldCoercionError> {
        let Some(raw) = Self::path_of(field.value) else {
            return Ok(Value::Null);
        };
        let path = Path::new(&raw);
        Self::check_constraints(field.descriptor, path)?;

        // Keep caller metadata, minus transient keys.
        let mut out = match field.value {
            Value::Object(map) => map
                .iter()
                .filter(|(key, _)| !key.starts_with('_'))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            _ => Map::new(),
        };
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| raw.clone());
        out.entry("name").or_insert(Value::String(name));
        out.insert("path".into(), Value::String(raw));
        Ok(Value::Object(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;
    use serde_json::json;

    #[test]
    fn normalizes_to_name_and_path_and_drops_private_keys() {
        let descriptor = FieldDescriptor::new(FieldKind::FileUpload, "avatar");
        let value = json!({ "path": "/tmp/me.png", "_preview": "blob" });
        let out = FileUploadComponent::new()
            .normalize(&BoundField::new(&descriptor, &value))
            .unwrap();
        assert_eq!(out, json!({ "name": "me.png", "path": "/tmp/me.png" }));
    }

    #[test]
    fn rejects_extension_outside_accept_list() {
        let descriptor = FieldDescriptor::new(FieldKind::FileUpload, "doc").with_options(
            WidgetOptions::FileUpload {
                accept: vec![".pdf".into()],
                max_size: None,
            },
        );
        let value = json!("notes.txt");
        let err = FileUploadComponent::new()
            .normalize(&BoundField::new(&descriptor, &value))
            .unwrap_err();
        assert_eq!(err.name, "doc");
    }

    #[test]
    fn enforces_max_size_against_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        std::fs::write(&path, vec![0u8; 64]).unwrap();
        let descriptor = FieldDescriptor::new(FieldKind::FileUpload, "blob").with_options(
            WidgetOptions::FileUpload {
                accept: Vec::new(),
                max_size: Some(16),
            },
        );
        let value = json!(path.to_string_lossy());
        assert!(
            FileUploadComponent::new()
                .normalize(&BoundField::new(&descriptor, &value))
                .is_err()
        );
    }
}
