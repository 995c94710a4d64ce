use chrono::NaiveDate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::validation::rules::DATE_FORMAT;

use super::state::{FilterDef, FilterKind, FilterValue, SortKey, TableConfig, TableState};

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const PAGE_KEY: &str = "page";
pub const LIMIT_KEY: &str = "limit";
pub const SORT_KEY: &str = "sort";

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Render state as a query string, filters in declaration order.
pub fn to_query(state: &TableState, config: &TableConfig, filters: &[FilterDef]) -> String {
    let mut pairs: Vec<(String, String)> = vec![
        (PAGE_KEY.into(), state.page.to_string()),
        (LIMIT_KEY.into(), state.limit.to_string()),
    ];
    if !state.sorting.is_empty() {
        let sort = state
            .sorting
            .iter()
            .map(SortKey::to_query)
            .collect::<Vec<_>>()
            .join(",");
        pairs.push((SORT_KEY.into(), sort));
    }
    if !state.search.is_empty() {
        pairs.push((config.search_key.clone(), state.search.clone()));
    }
    for def in filters {
        match state.filters.get(&def.id) {
            Some(FilterValue::Text(text)) if !text.is_empty() => {
                pairs.push((def.id.clone(), text.clone()));
            }
            Some(FilterValue::Many(values)) => {
                pairs.extend(values.iter().map(|value| (def.id.clone(), value.clone())));
            }
            Some(FilterValue::Date(date)) => {
                pairs.push((def.id.clone(), date.format(DATE_FORMAT).to_string()));
            }
            _ => {}
        }
    }
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Rebuild state from a query string. Unknown keys and malformed values are skipped.
pub fn from_query(query: &str, config: &TableConfig, filters: &[FilterDef]) -> TableState {
    let mut state = TableState::new(config.default_limit);
    let pairs = query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode(key), decode(value)),
            None => (decode(pair), String::new()),
        });
    for (key, value) in pairs {
        match key.as_str() {
            PAGE_KEY => state.page = value.parse::<usize>().ok().filter(|page| *page > 0).unwrap_or(1),
            LIMIT_KEY => {
                if let Ok(limit) = value.parse::<usize>()
                    && limit > 0
                {
                    state.limit = limit;
                }
            }
            SORT_KEY => state.sorting = value.split(',').filter_map(SortKey::parse).collect(),
            _ if key == config.search_key => state.search = value,
            _ => {
                let Some(def) = filters.iter().find(|def| def.id == key) else {
                    continue;
                };
                match def.kind {
                    FilterKind::Text | FilterKind::Select => {
                        state.filters.insert(key, FilterValue::Text(value));
                    }
                    FilterKind::MultiSelect => {
                        let entry = state
                            .filters
                            .entry(key)
                            .or_insert_with(|| FilterValue::Many(Vec::new()));
                        if let FilterValue::Many(values) = entry {
                            values.push(value);
                        }
                    }
                    FilterKind::Date => {
                        if let Ok(date) = NaiveDate::parse_from_str(&value, DATE_FORMAT) {
                            state.filters.insert(key, FilterValue::Date(date));
                        }
                    }
                }
            }
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters() -> Vec<FilterDef> {
        vec![
            FilterDef::new("status", "status", FilterKind::MultiSelect),
            FilterDef::new("joined", "created_at", FilterKind::Date),
            FilterDef::new("city", "city", FilterKind::Select),
        ]
    }

    #[test]
    fn encodes_repeated_multi_values_and_dates() {
        let mut state = TableState::new(20);
        state.page = 3;
        state.sorting = vec![SortKey::desc("name"), SortKey::asc("id")];
        state.search = "ali ce".into();
        state
            .filters
            .insert("status".into(), FilterValue::Many(vec!["a".into(), "b".into()]));
        state.filters.insert(
            "joined".into(),
            FilterValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
        );
        let config = TableConfig::default().with_search_key("q");
        assert_eq!(
            to_query(&state, &config, &filters()),
            "page=3&limit=20&sort=-name%2Cid&q=ali%20ce&status=a&status=b&joined=2024-01-05"
        );
    }

    #[test]
    fn decodes_what_it_encodes_and_skips_garbage() {
        let config = TableConfig::default();
        let state = from_query(
            "?page=0&limit=x&sort=-name&search=caf%C3%A9&status=a&status=b&joined=bad&city=Giza&other=1",
            &config,
            &filters(),
        );
        assert_eq!(state.page, 1);
        assert_eq!(state.limit, config.default_limit);
        assert_eq!(state.sorting, vec![SortKey::desc("name")]);
        assert_eq!(state.search, "café");
        assert_eq!(
            state.filters.get("status"),
            Some(&FilterValue::Many(vec!["a".into(), "b".into()]))
        );
        assert_eq!(state.filters.get("joined"), None);
        assert_eq!(state.filters.get("city"), Some(&FilterValue::Text("Giza".into())));
    }
}
