use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Apply a plain editing key to `buffer`; `accept` filters typed characters.
pub(crate) fn edit_text(buffer: &str, key: &KeyEvent, accept: impl Fn(char) -> bool) -> Option<String> {
    let mut next = buffer.to_string();
    match key.code {
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) || !accept(ch) {
                return None;
            }
            next.push(ch);
        }
        KeyCode::Backspace => {
            next.pop()?;
        }
        KeyCode::Delete => {
            if next.is_empty() {
                return None;
            }
            next.clear();
        }
        _ => return None,
    }
    Some(next)
}

pub(crate) fn masked(text: &str) -> String {
    "•".repeat(text.chars().count())
}
