use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Number, Value};

use super::messages::{self as msg, Messages};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").expect("phone regex"));
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("color regex")
});

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub enum RuleType {
    String,
    RichText,
    Email,
    Phone,
    Color,
    Date,
    Number { integer: bool },
    Boolean,
    OneOf(Vec<Value>),
    List,
    Any,
}

/// Structural constraint for a single value.
#[derive(Debug, Clone)]
pub struct FieldRule {
    ty: RuleType,
    required: bool,
    min_len: Option<usize>,
    max_len: Option<usize>,
    min: Option<f64>,
    max: Option<f64>,
    pattern: Option<Regex>,
}

pub fn string() -> FieldRule {
    FieldRule::new(RuleType::String)
}

pub fn rich_text() -> FieldRule {
    FieldRule::new(RuleType::RichText)
}

pub fn email() -> FieldRule {
    FieldRule::new(RuleType::Email)
}

pub fn password() -> FieldRule {
    FieldRule::new(RuleType::String)
}

pub fn phone() -> FieldRule {
    FieldRule::new(RuleType::Phone)
}

pub fn color() -> FieldRule {
    FieldRule::new(RuleType::Color)
}

pub fn date() -> FieldRule {
    FieldRule::new(RuleType::Date)
}

pub fn number() -> FieldRule {
    FieldRule::new(RuleType::Number { integer: false })
}

pub fn integer() -> FieldRule {
    FieldRule::new(RuleType::Number { integer: true })
}

pub fn boolean() -> FieldRule {
    FieldRule::new(RuleType::Boolean)
}

pub fn one_of<I, V>(options: I) -> FieldRule
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    FieldRule::new(RuleType::OneOf(options.into_iter().map(Into::into).collect()))
}

pub fn list() -> FieldRule {
    FieldRule::new(RuleType::List)
}

pub fn any() -> FieldRule {
    FieldRule::new(RuleType::Any)
}

impl FieldRule {
    pub fn new(ty: RuleType) -> Self {
        Self {
            ty,
            required: false,
            min_len: None,
            max_len: None,
            min: None,
            max: None,
            pattern: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn rule_type(&self) -> &RuleType {
        &self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Check one value, returning its normalized form.
    ///
    /// `Ok(None)` means the value is absent and allowed to be.
    pub fn check(&self, value: Option<&Value>, messages: &Messages) -> Result<Option<Value>, String> {
        let value = value.filter(|value| !value.is_null());
        if self.is_missing(value) {
            return if self.required {
                Err(messages.get(msg::REQUIRED, &[]))
            } else {
                Ok(value.map(|value| self.blank_output(value)))
            };
        }
        let Some(value) = value else {
            return Ok(None);
        };

        match &self.ty {
            RuleType::String | RuleType::RichText => self.check_text(value, messages),
            RuleType::Email => self.check_format(value, &EMAIL_RE, msg::EMAIL, messages),
            RuleType::Phone => self.check_format(value, &PHONE_RE, msg::PHONE, messages),
            RuleType::Color => self.check_format(value, &COLOR_RE, msg::COLOR, messages),
            RuleType::Date => {
                let text = self.check_text(value, messages)?;
                let raw = text.as_ref().and_then(Value::as_str).unwrap_or_default();
                NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                    .map(|date| Some(Value::String(date.format(DATE_FORMAT).to_string())))
                    .map_err(|_| messages.get(msg::DATE, &[]))
            }
            RuleType::Number { integer } => self.check_number(value, *integer, messages),
            RuleType::Boolean => match value {
                Value::Bool(_) => Ok(Some(value.clone())),
                Value::String(text) if text == "true" || text == "false" => {
                    Ok(Some(Value::Bool(text == "true")))
                }
                _ => Err(messages.get(msg::BOOLEAN, &[])),
            },
            RuleType::OneOf(options) => {
                if options.iter().any(|option| loosely_equal(option, value)) {
                    Ok(Some(value.clone()))
                } else {
                    let listed = options
                        .iter()
                        .map(display_scalar)
                        .collect::<Vec<_>>()
                        .join(", ");
                    Err(messages.get(msg::ONE_OF, &[("options", listed)]))
                }
            }
            RuleType::List => {
                let items = match value {
                    Value::Array(items) => items.len(),
                    _ => return Err(messages.get(msg::INVALID, &[])),
                };
                if let Some(min) = self.min_len
                    && items < min
                {
                    return Err(messages.get(msg::MIN_LENGTH, &[("min", min.to_string())]));
                }
                Ok(Some(value.clone()))
            }
            RuleType::Any => Ok(Some(value.clone())),
        }
    }

    /// What an optional blank submits: typed kinds have no empty string form.
    fn blank_output(&self, value: &Value) -> Value {
        match self.ty {
            RuleType::Number { .. } | RuleType::Date | RuleType::Boolean => Value::Null,
            _ => value.clone(),
        }
    }

    fn is_missing(&self, value: Option<&Value>) -> bool {
        match value {
            None => true,
            Some(Value::String(text)) => match self.ty {
                RuleType::RichText => is_blank_rich_text(text),
                _ => text.trim().is_empty(),
            },
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        }
    }

    fn check_text(&self, value: &Value, messages: &Messages) -> Result<Option<Value>, String> {
        let text = match value {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            _ => return Err(messages.get(msg::INVALID, &[])),
        };
        let length = text.trim().chars().count();
        if let Some(min) = self.min_len
            && length < min
        {
            return Err(messages.get(msg::MIN_LENGTH, &[("min", min.to_string())]));
        }
        if let Some(max) = self.max_len
            && length > max
        {
            return Err(messages.get(msg::MAX_LENGTH, &[("max", max.to_string())]));
        }
        if let Some(pattern) = &self.pattern
            && !pattern.is_match(text.trim())
        {
            return Err(messages.get(msg::PATTERN, &[]));
        }
        Ok(Some(Value::String(text)))
    }

    fn check_format(
        &self,
        value: &Value,
        format: &Regex,
        key: &str,
        messages: &Messages,
    ) -> Result<Option<Value>, String> {
        let checked = self.check_text(value, messages)?;
        match checked.as_ref().and_then(Value::as_str) {
            Some(text) if format.is_match(text.trim()) => Ok(checked),
            _ => Err(messages.get(key, &[])),
        }
    }

    fn check_number(
        &self,
        value: &Value,
        integer: bool,
        messages: &Messages,
    ) -> Result<Option<Value>, String> {
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(parsed) = parsed.filter(|number| number.is_finite()) else {
            return Err(messages.get(msg::NUMBER, &[]));
        };
        if integer && parsed.fract() != 0.0 {
            return Err(messages.get(msg::INTEGER, &[]));
        }
        if let Some(min) = self.min
            && parsed < min
        {
            return Err(messages.get(msg::MIN_VALUE, &[("min", trim_float(min))]));
        }
        if let Some(max) = self.max
            && parsed > max
        {
            return Err(messages.get(msg::MAX_VALUE, &[("max", trim_float(max))]));
        }
        Ok(Some(number_value(parsed)))
    }
}

/// Rich-text editors emit an empty paragraph for an empty document.
pub fn is_blank_rich_text(raw: &str) -> bool {
    static TAGS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]*>|&nbsp;").expect("tag regex"));
    TAGS.replace_all(raw, "").trim().is_empty()
}

pub(crate) fn number_value(parsed: f64) -> Value {
    if parsed.fract() == 0.0 && parsed.abs() < i64::MAX as f64 {
        Value::Number(Number::from(parsed as i64))
    } else {
        Number::from_f64(parsed)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

pub(crate) fn loosely_equal(expected: &Value, actual: &Value) -> bool {
    expected == actual || display_scalar(expected) == display_scalar(actual)
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages() -> Messages {
        Messages::english()
    }

    #[test]
    fn whitespace_only_is_reported_like_empty() {
        let rule = string().required().min_len(2);
        let blank = rule.check(Some(&json!("   ")), &messages());
        let empty = rule.check(Some(&json!("")), &messages());
        let absent = rule.check(None, &messages());
        assert_eq!(blank, empty);
        assert_eq!(empty, absent);
        assert_eq!(blank, Err("This field is required".to_string()));
    }

    #[test]
    fn optional_typed_blanks_submit_null() {
        assert_eq!(number().check(Some(&json!(" ")), &messages()), Ok(Some(Value::Null)));
        assert_eq!(date().check(Some(&json!("")), &messages()), Ok(Some(Value::Null)));
        assert_eq!(number().check(None, &messages()), Ok(None));
        assert_eq!(string().check(None, &messages()), Ok(None));
        assert_eq!(string().check(Some(&json!("")), &messages()), Ok(Some(json!(""))));
    }

    #[test]
    fn numeric_input_is_coerced_and_bounds_are_distinct() {
        let rule = number().required().range(1.0, 10.0);
        assert_eq!(rule.check(Some(&json!(" 7 ")), &messages()), Ok(Some(json!(7))));
        assert_eq!(
            rule.check(Some(&json!("seven")), &messages()),
            Err("Must be a number".to_string())
        );
        assert_eq!(
            rule.check(Some(&json!("12")), &messages()),
            Err("Must be at most 10".to_string())
        );
        assert_eq!(rule.check(Some(&json!(2.5)), &messages()), Ok(Some(json!(2.5))));
        assert_eq!(
            integer().check(Some(&json!("2.5")), &messages()),
            Err("Must be a whole number".to_string())
        );
    }

    #[test]
    fn formats_are_checked() {
        assert!(email().check(Some(&json!("not-an-email")), &messages()).is_err());
        assert!(email().check(Some(&json!("a@b.com")), &messages()).is_ok());
        assert!(color().check(Some(&json!("#12ab")), &messages()).is_err());
        assert!(color().check(Some(&json!("#12abef")), &messages()).is_ok());
        assert_eq!(
            date().check(Some(&json!("2024-02-30")), &messages()),
            Err("Enter a date as YYYY-MM-DD".to_string())
        );
        assert!(phone().check(Some(&json!("+20 100 123 4567")), &messages()).is_ok());
    }

    #[test]
    fn one_of_accepts_stringly_equal_values() {
        let rule = one_of(["client", "provider"]).required();
        assert!(rule.check(Some(&json!("client")), &messages()).is_ok());
        assert_eq!(
            rule.check(Some(&json!("other")), &messages()),
            Err("Choose one of: client, provider".to_string())
        );
        assert!(one_of([1, 2]).check(Some(&json!("2")), &messages()).is_ok());
    }

    #[test]
    fn empty_paragraph_counts_as_blank_rich_text() {
        assert!(is_blank_rich_text("<p></p>"));
        assert!(is_blank_rich_text("<p><br></p>"));
        assert!(is_blank_rich_text("<p>&nbsp;</p>"));
        assert!(!is_blank_rich_text("<p>Hello</p>"));
        assert!(rich_text().required().check(Some(&json!("<p></p>")), &messages()).is_err());
    }
}
