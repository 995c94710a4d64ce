pub(crate) mod components;
pub(crate) mod convert;

use serde_json::Value;

use crate::domain::{FieldDescriptor, SelectOption};

pub use components::{ComponentKind, ComponentPalette, FieldComponent, NumericTuning, ToggleLabels};

/// What a widget sees of one field while rendering or handling input.
///
/// The value is borrowed from the form store on every call, so widgets never
/// hold a copy that could go stale.
#[derive(Debug, Clone, Copy)]
pub struct BoundField<'a> {
    pub descriptor: &'a FieldDescriptor,
    /// Flat name in the value object; differs from the descriptor name for locale sub-fields.
    pub name: &'a str,
    pub value: &'a Value,
    pub invalid: bool,
    pub focused: bool,
    pub options: &'a [SelectOption],
    pub cursor: usize,
    pub keyword: &'a str,
}

impl<'a> BoundField<'a> {
    pub fn new(descriptor: &'a FieldDescriptor, value: &'a Value) -> Self {
        Self {
            descriptor,
            name: &descriptor.name,
            value,
            invalid: false,
            focused: false,
            options: &[],
            cursor: 0,
            keyword: "",
        }
    }

    pub fn named(mut self, name: &'a str) -> Self {
        self.name = name;
        self
    }

    pub fn with_options(mut self, options: &'a [SelectOption]) -> Self {
        self.options = options;
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn with_cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_keyword(mut self, keyword: &'a str) -> Self {
        self.keyword = keyword;
        self
    }

    pub fn text(&self) -> String {
        convert::value_to_string(self.value)
    }
}

/// Result of a widget handling one key press.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// New value to write to the store right away.
    Change(Value),
    /// Remote search keyword changed.
    Search(String),
    /// Widget-internal cursor moved.
    Cursor(usize),
    Ignored,
}
