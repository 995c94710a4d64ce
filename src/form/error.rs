use crate::domain::FieldKind;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldCoercionError {
    pub name: String,
    pub message: String,
}

impl FieldCoercionError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldCoercionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for FieldCoercionError {}

/// A descriptor could not be bound to a widget.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("field '{field}' uses custom widget '{widget}' which is not registered")]
    UnknownCustomWidget { field: String, widget: String },
    #[error("field '{field}' has kind '{kind}' but no widget is registered for it")]
    UnsupportedKind { field: String, kind: FieldKind },
}
