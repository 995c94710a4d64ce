use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{RemoteOptions, SelectOption};

/// Fetches raw option data for a remote select.
#[async_trait]
pub trait OptionSource: Send + Sync {
    async fn fetch(&self, endpoint: &str, keyword: &str) -> Result<Value>;
}

/// Turns a raw response into `{label, value}` pairs.
pub type OptionMapper = Arc<dyn Fn(&Value, &RemoteOptions) -> Vec<SelectOption> + Send + Sync>;

const LABEL_KEYS: [&str; 3] = ["label", "name", "title"];
const VALUE_KEYS: [&str; 2] = ["value", "id"];

/// Reads a `data` array (or a root array) and picks label/value keys,
/// preferring the ones named by the descriptor.
pub fn default_mapper(raw: &Value, remote: &RemoteOptions) -> Vec<SelectOption> {
    let items = match raw {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    items
        .iter()
        .filter_map(|item| {
            let Value::Object(map) = item else {
                let label = match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                return Some(SelectOption::new(label, item.clone()));
            };
            let pick = |explicit: &Option<String>, fallbacks: &[&str]| {
                explicit
                    .as_deref()
                    .and_then(|key| map.get(key))
                    .or_else(|| fallbacks.iter().find_map(|key| map.get(*key)))
                    .cloned()
            };
            let value = pick(&remote.value_key, &VALUE_KEYS)?;
            let label = match pick(&remote.label_key, &LABEL_KEYS) {
                Some(Value::String(text)) => text,
                Some(other) => other.to_string(),
                None => match &value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                },
            };
            Some(SelectOption::new(label, value))
        })
        .collect()
}

pub fn default_option_mapper() -> OptionMapper {
    Arc::new(default_mapper)
}

/// Fetch and map options for one keyword.
pub async fn fetch_options(
    source: &dyn OptionSource,
    remote: &RemoteOptions,
    keyword: &str,
    mapper: &OptionMapper,
) -> Result<Vec<SelectOption>> {
    let raw = source
        .fetch(&remote.endpoint, keyword)
        .await
        .with_context(|| format!("failed to load options from {}", remote.endpoint))?;
    Ok(mapper(&raw, remote))
}

/// In-memory source that filters a fixed list by keyword.
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
    endpoints: indexmap::IndexMap<String, Value>,
}

impl StaticOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>, response: Value) -> Self {
        self.endpoints.insert(endpoint.into(), response);
        self
    }
}

#[async_trait]
impl OptionSource for StaticOptions {
    async fn fetch(&self, endpoint: &str, keyword: &str) -> Result<Value> {
        let response = self
            .endpoints
            .get(endpoint)
            .with_context(|| format!("unknown endpoint {endpoint}"))?;
        let needle = keyword.to_lowercase();
        let matches = |item: &Value| needle.is_empty() || item.to_string().to_lowercase().contains(&needle);
        Ok(match response {
            Value::Array(items) => Value::Array(items.iter().filter(|item| matches(item)).cloned().collect()),
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(items)) => serde_json::json!({
                    "data": items.iter().filter(|item| matches(item)).cloned().collect::<Vec<_>>()
                }),
                _ => response.clone(),
            },
            other => other.clone(),
        })
    }
}
