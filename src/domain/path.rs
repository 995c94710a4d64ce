use serde_json::{Map, Value};

use super::DescriptorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A parsed `a.b[0]["c d"]` style path into a nested value object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self, DescriptorError> {
        let invalid = |reason: &str| DescriptorError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };
        if raw.trim().is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut after_bracket = false;
        let mut chars = raw.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if current.is_empty() {
                        if !after_bracket {
                            return Err(invalid("empty segment"));
                        }
                    } else {
                        segments.push(Segment::Key(std::mem::take(&mut current)));
                    }
                    after_bracket = false;
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut current)));
                    }
                    let mut inner = String::new();
                    let mut closed = false;
                    for next in chars.by_ref() {
                        if next == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(next);
                    }
                    if !closed {
                        return Err(invalid("unterminated bracket"));
                    }
                    let inner = inner.trim();
                    if let Some(quoted) = strip_quotes(inner) {
                        segments.push(Segment::Key(quoted.to_string()));
                    } else if let Ok(index) = inner.parse::<usize>() {
                        segments.push(Segment::Index(index));
                    } else if inner.is_empty() {
                        return Err(invalid("empty bracket"));
                    } else {
                        segments.push(Segment::Key(inner.to_string()));
                    }
                    after_bracket = true;
                }
                ']' => return Err(invalid("unbalanced bracket")),
                other => {
                    after_bracket = false;
                    current.push(other);
                }
            }
        }
        if !current.is_empty() {
            segments.push(Segment::Key(current));
        } else if raw.ends_with('.') {
            return Err(invalid("trailing dot"));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// JSON pointer equivalent, as reported by JSON Schema validators.
    pub fn pointer(&self) -> String {
        let mut pointer = String::new();
        for segment in &self.segments {
            pointer.push('/');
            match segment {
                Segment::Key(key) => pointer.push_str(&key.replace('~', "~0").replace('/', "~1")),
                Segment::Index(index) => pointer.push_str(&index.to_string()),
            }
        }
        pointer
    }

    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get(key)?,
                (Segment::Index(index), Value::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn set(&self, root: &mut Value, value: Value) {
        insert_segments(root, &self.segments, value);
    }

    pub fn remove(&self, root: &mut Value) -> Option<Value> {
        let (last, parents) = self.segments.split_last()?;
        let mut current = root;
        for segment in parents {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get_mut(key)?,
                (Segment::Index(index), Value::Array(items)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        match (last, current) {
            (Segment::Key(key), Value::Object(map)) => map.shift_remove(key),
            (Segment::Index(index), Value::Array(items)) if *index < items.len() => {
                Some(std::mem::replace(&mut items[*index], Value::Null))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn strip_quotes(raw: &str) -> Option<&str> {
    raw.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| raw.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')))
}

fn insert_segments(root: &mut Value, path: &[Segment], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        *root = value;
        return;
    };

    match head {
        Segment::Key(key) => {
            if !root.is_object() {
                *root = Value::Object(Map::new());
            }
            if let Value::Object(obj) = root {
                if rest.is_empty() {
                    obj.insert(key.clone(), value);
                    return;
                }
                let entry = obj.entry(key.clone()).or_insert(Value::Null);
                insert_segments(entry, rest, value);
            }
        }
        Segment::Index(index) => {
            if !root.is_array() {
                *root = Value::Array(Vec::new());
            }
            if let Value::Array(items) = root {
                if items.len() <= *index {
                    items.resize(*index + 1, Value::Null);
                }
                insert_segments(&mut items[*index], rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_dotted_and_bracket_segments() {
        let path = FieldPath::parse("items[0].name").expect("path");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("items".into()),
                Segment::Index(0),
                Segment::Key("name".into())
            ]
        );
        let quoted = FieldPath::parse("meta[\"display name\"]").expect("quoted");
        assert_eq!(quoted.segments()[1], Segment::Key("display name".into()));
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse("a[0").is_err());
        assert!(FieldPath::parse("a.").is_err());
    }

    #[test]
    fn set_creates_intermediate_containers() {
        let mut root = json!({});
        FieldPath::parse("position.lat").expect("path").set(&mut root, json!(1.5));
        FieldPath::parse("tags[1]").expect("path").set(&mut root, json!("b"));
        assert_eq!(root, json!({"position": {"lat": 1.5}, "tags": [null, "b"]}));
        let path = FieldPath::parse("position.lat").expect("path");
        assert_eq!(path.get(&root), Some(&json!(1.5)));
        assert_eq!(path.pointer(), "/position/lat");
    }

    #[test]
    fn remove_drops_object_keys() {
        let mut root = json!({"a": {"b": 1, "c": 2}});
        let removed = FieldPath::parse("a.b").expect("path").remove(&mut root);
        assert_eq!(removed, Some(json!(1)));
        assert_eq!(root, json!({"a": {"c": 2}}));
    }
}
