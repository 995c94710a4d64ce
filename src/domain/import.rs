use anyhow::{Context, Result, anyhow, bail};
use percent_encoding::percent_decode_str;
use schemars::schema::{InstanceType, RootSchema, Schema, SchemaObject, SingleOrVec};
use serde_json::Value;

use super::{
    FieldDescriptor, FieldKind, FormDescriptor, OptionSourceSpec, SelectOption, ValidationHints,
    WidgetOptions,
};

/// Derive a form descriptor from a JSON Schema object.
///
/// Nested objects flatten into dotted field names; `$ref`s into
/// `definitions` or JSON pointers are followed.
pub fn descriptor_from_json_schema(schema_value: &Value) -> Result<FormDescriptor> {
    let root: RootSchema = serde_json::from_value(schema_value.clone())
        .context("schema is not a valid JSON Schema document")?;
    let resolver = SchemaResolver::new(schema_value, &root);
    let mut fields = Vec::new();
    collect_fields(&resolver, &root.schema, "", &mut fields)?;
    let title = root.schema.metadata.as_ref().and_then(|meta| meta.title.clone());
    let descriptor = FormDescriptor { title, fields };
    descriptor.validate_names()?;
    Ok(descriptor)
}

fn collect_fields(
    resolver: &SchemaResolver<'_>,
    schema: &SchemaObject,
    prefix: &str,
    fields: &mut Vec<FieldDescriptor>,
) -> Result<()> {
    let object = schema
        .object
        .as_ref()
        .ok_or_else(|| anyhow!("object schema must define properties"))?;
    for (name, property) in &object.properties {
        let resolved = resolver.resolve_schema(property)?;
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        if instance_type(&resolved) == Some(InstanceType::Object) && resolved.object.is_some() {
            collect_fields(resolver, &resolved, &path, fields)?;
            continue;
        }
        let mut field = field_from_schema(&resolved, path)?;
        field.validation.required = object.required.contains(name);
        fields.push(field);
    }
    Ok(())
}

fn field_from_schema(schema: &SchemaObject, name: String) -> Result<FieldDescriptor> {
    let kind = detect_kind(schema).with_context(|| format!("unsupported schema for field '{name}'"))?;
    let mut field = FieldDescriptor::new(kind, name);
    if let Some(meta) = schema.metadata.as_ref() {
        field.label = meta.title.clone();
        field.default = meta.default.clone();
    }

    if let Some(values) = schema.enum_values.as_ref() {
        let options = values
            .iter()
            .map(|value| {
                let label = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                SelectOption::new(label, value.clone())
            })
            .collect();
        field.widget_options = WidgetOptions::Select {
            source: OptionSourceSpec::Static(options),
            multiple: false,
        };
    }

    let mut hints = ValidationHints::default();
    if let Some(string) = schema.string.as_ref() {
        hints.min_length = string.min_length.map(|len| len as usize);
        hints.max_length = string.max_length.map(|len| len as usize);
        hints.pattern = string.pattern.clone();
    }
    if let Some(number) = schema.number.as_ref() {
        hints.min = number.minimum;
        hints.max = number.maximum;
    }
    if instance_type(schema) == Some(InstanceType::Integer) {
        field.widget_options = WidgetOptions::Number {
            step: Some(1.0),
            integer: true,
        };
    }
    field.validation = hints;
    Ok(field)
}

fn detect_kind(schema: &SchemaObject) -> Result<FieldKind> {
    if schema.enum_values.is_some() {
        return Ok(FieldKind::Select);
    }
    match instance_type(schema) {
        Some(InstanceType::String) | None => Ok(match schema.format.as_deref() {
            Some("email") => FieldKind::Email,
            Some("date") => FieldKind::Date,
            Some("password") => FieldKind::Password,
            Some("color") => FieldKind::Color,
            Some("phone") => FieldKind::Phone,
            Some("html") => FieldKind::RichText,
            _ => FieldKind::Text,
        }),
        Some(InstanceType::Integer) | Some(InstanceType::Number) => Ok(FieldKind::Number),
        Some(InstanceType::Boolean) => Ok(FieldKind::Switch),
        Some(other) => bail!("{other:?} properties have no widget"),
    }
}

fn instance_type(schema: &SchemaObject) -> Option<InstanceType> {
    schema.instance_type.as_ref().and_then(|kind| match kind {
        SingleOrVec::Single(single) => Some(**single),
        SingleOrVec::Vec(items) => items
            .iter()
            .cloned()
            .find(|item| *item != InstanceType::Null),
    })
}

struct SchemaResolver<'a> {
    raw: &'a Value,
    root: &'a RootSchema,
}

impl<'a> SchemaResolver<'a> {
    fn new(raw: &'a Value, root: &'a RootSchema) -> Self {
        Self { raw, root }
    }

    fn resolve_schema(&self, schema: &Schema) -> Result<SchemaObject> {
        match schema {
            Schema::Bool(value) => Ok(Schema::Bool(*value).into_object()),
            Schema::Object(object) => match &object.reference {
                Some(reference) => self.follow_reference(reference),
                None => Ok(object.clone()),
            },
        }
    }

    fn follow_reference(&self, reference: &str) -> Result<SchemaObject> {
        if let Some(key) = reference.strip_prefix("#/definitions/") {
            let target = self
                .root
                .definitions
                .get(key)
                .with_context(|| format!("definition '{key}' not found"))?;
            return self.resolve_schema(target);
        }

        if let Some(fragment) = reference.strip_prefix('#') {
            let decoded = percent_decode_str(fragment)
                .decode_utf8()
                .context("invalid percent-encoding in $ref")?;
            let pointer = if decoded.is_empty() || decoded.starts_with('/') {
                decoded.to_string()
            } else {
                format!("/{decoded}")
            };
            let target = self
                .raw
                .pointer(&pointer)
                .with_context(|| format!("reference '{reference}' not found"))?;
            let schema: Schema = serde_json::from_value(target.clone())
                .with_context(|| format!("reference '{reference}' is not a valid schema"))?;
            return self.resolve_schema(&schema);
        }

        bail!("unsupported reference {reference}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_formats_and_constraints() {
        let schema = json!({
            "type": "object",
            "required": ["email"],
            "properties": {
                "email": {"type": "string", "format": "email", "title": "E-mail"},
                "age": {"type": "integer", "minimum": 18},
                "active": {"type": "boolean"},
                "role": {"type": "string", "enum": ["admin", "editor"]},
                "address": {
                    "type": "object",
                    "properties": {"city": {"$ref": "#/definitions/city"}}
                }
            },
            "definitions": {"city": {"type": "string", "minLength": 2}}
        });
        let descriptor = descriptor_from_json_schema(&schema).expect("descriptor");
        let names: Vec<_> = descriptor.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["email", "age", "active", "role", "address.city"]);

        let email = &descriptor.fields[0];
        assert_eq!(email.kind, FieldKind::Email);
        assert!(email.validation.required);
        assert_eq!(email.label.as_deref(), Some("E-mail"));

        assert_eq!(descriptor.fields[1].kind, FieldKind::Number);
        assert_eq!(descriptor.fields[1].validation.min, Some(18.0));
        assert_eq!(descriptor.fields[2].kind, FieldKind::Switch);
        assert_eq!(descriptor.fields[3].kind, FieldKind::Select);
        assert_eq!(descriptor.fields[4].validation.min_length, Some(2));
    }
}
