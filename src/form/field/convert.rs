use serde_json::Value;

use crate::domain::SelectOption;

use super::components::NumericTuning;

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

pub(crate) fn option_index(options: &[SelectOption], value: &Value) -> Option<usize> {
    options.iter().position(|option| {
        option.value == *value || value_to_string(&option.value) == value_to_string(value)
    })
}

pub(crate) fn option_label(options: &[SelectOption], value: &Value) -> Option<String> {
    option_index(options, value).map(|index| options[index].label.clone())
}

/// Step the numeric text in `buffer`; non-numeric text restarts from zero.
pub(crate) fn adjust_numeric_value(
    buffer: &str,
    integer: bool,
    tuning: &NumericTuning,
    delta: i64,
    fast: bool,
) -> String {
    if integer {
        let current = buffer.trim().parse::<i64>().unwrap_or(0);
        let step = tuning.step_i64(fast);
        current.saturating_add(delta.saturating_mul(step)).to_string()
    } else {
        let current = buffer.trim().parse::<f64>().unwrap_or(0.0);
        let next = current + delta as f64 * tuning.step_f64(fast);
        if next.fract() == 0.0 {
            format!("{}", next as i64)
        } else {
            format!("{next}")
        }
    }
}
