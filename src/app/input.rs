use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Submit,
    Reset,
    Quit,
    NextField,
    PrevField,
    SwitchLocale(isize),
    Dismiss,
    Edit(KeyEvent),
    None,
}

pub fn classify(key: &KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => KeyCommand::Submit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyCommand::Reset,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyCommand::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => KeyCommand::Quit,
            KeyCode::Left => KeyCommand::SwitchLocale(-1),
            KeyCode::Right => KeyCommand::SwitchLocale(1),
            _ => KeyCommand::None,
        };
    }

    match key.code {
        KeyCode::Tab => KeyCommand::NextField,
        KeyCode::BackTab => KeyCommand::PrevField,
        KeyCode::Esc => KeyCommand::Dismiss,
        _ => KeyCommand::Edit(*key),
    }
}
