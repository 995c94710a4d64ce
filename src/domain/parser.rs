use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::Value;

use super::{DescriptorError, FieldDescriptor, FieldKind, FieldPath, FormDescriptor, WidgetOptions};

/// Parse a form descriptor document (already converted to JSON) and check it.
///
/// Accepts either `{ "title": .., "fields": [..] }` or a bare array of fields.
pub fn parse_form_descriptor(value: &Value) -> Result<FormDescriptor> {
    let descriptor = match value {
        Value::Array(_) => FormDescriptor::new(
            serde_json::from_value(value.clone()).context("failed to parse field descriptors")?,
        ),
        _ => serde_json::from_value(value.clone()).context("failed to parse form descriptor")?,
    };
    descriptor.validate_names()?;
    Ok(descriptor)
}

impl FormDescriptor {
    /// Enforce one kind per descriptor, parseable paths, and a collision free namespace.
    pub fn validate_names(&self) -> Result<(), DescriptorError> {
        let mut owners: HashMap<String, &str> = HashMap::new();
        for field in &self.fields {
            check_options(field)?;
            for name in field.expanded_names() {
                FieldPath::parse(&name)?;
                if let Some(first) = owners.insert(name.clone(), &field.name) {
                    return Err(DescriptorError::DuplicateName {
                        name,
                        first: first.to_string(),
                        second: field.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_options(field: &FieldDescriptor) -> Result<(), DescriptorError> {
    let mismatch = |found: &'static str| DescriptorError::MismatchedOptions {
        name: field.name.clone(),
        kind: field.kind.to_string(),
        found,
    };
    match (&field.kind, &field.widget_options) {
        (FieldKind::MultiLanguage, WidgetOptions::MultiLanguage { locales, sub_kind, .. }) => {
            if locales.is_empty() {
                return Err(DescriptorError::NoLocales(field.name.clone()));
            }
            if *sub_kind == FieldKind::MultiLanguage {
                return Err(mismatch("nested multi-language"));
            }
            Ok(())
        }
        (FieldKind::MultiLanguage, _) => Err(DescriptorError::NoLocales(field.name.clone())),
        (_, WidgetOptions::MultiLanguage { .. }) => Err(mismatch("multi-language")),
        (FieldKind::Select | FieldKind::Radio, WidgetOptions::Select { .. } | WidgetOptions::None) => {
            Ok(())
        }
        (_, WidgetOptions::Select { .. }) => Err(mismatch("select")),
        (FieldKind::Number, WidgetOptions::Number { .. } | WidgetOptions::None) => Ok(()),
        (_, WidgetOptions::Number { .. }) => Err(mismatch("number")),
        (FieldKind::FileUpload, WidgetOptions::FileUpload { .. } | WidgetOptions::None) => Ok(()),
        (_, WidgetOptions::FileUpload { .. }) => Err(mismatch("file-upload")),
        (FieldKind::Custom, WidgetOptions::Custom { .. }) => Ok(()),
        (FieldKind::Custom, _) => Err(mismatch("no custom widget")),
        (_, WidgetOptions::Custom { .. }) => Err(mismatch("custom")),
        _ => Ok(()),
    }
}
