use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::{FormDescriptor, descriptor_from_json_schema, parse_form_descriptor};

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Read a document, choosing the format from the file extension.
pub fn read_document(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document_str(&contents, DocumentFormat::from_path(path))
        .with_context(|| format!("in {}", path.display()))
}

pub fn load_form_descriptor(path: &Path) -> Result<FormDescriptor> {
    parse_form_descriptor(&read_document(path)?)
}

pub fn load_schema_descriptor(path: &Path) -> Result<FormDescriptor> {
    descriptor_from_json_schema(&read_document(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_descriptor_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(
            &path,
            r#"{ "title": "Country", "fields": [ { "kind": "text", "name": "code" } ] }"#,
        )
        .unwrap();
        let form = load_form_descriptor(&path).unwrap();
        assert_eq!(form.title.as_deref(), Some("Country"));
        assert_eq!(form.fields.len(), 1);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_document_str("{ nope", DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("JSON"));
        assert_eq!(parse_document_str("[1]", DocumentFormat::Json).unwrap(), json!([1]));
    }
}
