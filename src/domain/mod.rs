mod descriptor;
mod import;
mod parser;
mod path;

pub use descriptor::{
    Condition, FieldDescriptor, FieldKind, FormDescriptor, OptionSourceSpec, RemoteOptions,
    SelectOption, ValidationHints, WidgetOptions, localized_name,
};
pub use import::descriptor_from_json_schema;
pub use parser::parse_form_descriptor;
pub use path::{FieldPath, Segment};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DescriptorError {
    #[error("invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("field name '{name}' is used by both '{first}' and '{second}'")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },
    #[error("multi-language field '{0}' must declare at least one locale")]
    NoLocales(String),
    #[error("field '{name}' is a {kind} field but carries {found} options")]
    MismatchedOptions {
        name: String,
        kind: String,
        found: &'static str,
    },
}
