use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of widget kinds a descriptor may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Password,
    Checkbox,
    Switch,
    Select,
    Radio,
    Date,
    Phone,
    MultiLanguage,
    RichText,
    FileUpload,
    MapPosition,
    Color,
    Custom,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Number => "number",
            FieldKind::Password => "password",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Switch => "switch",
            FieldKind::Select => "select",
            FieldKind::Radio => "radio",
            FieldKind::Date => "date",
            FieldKind::Phone => "phone",
            FieldKind::MultiLanguage => "multi-language",
            FieldKind::RichText => "rich-text",
            FieldKind::FileUpload => "file-upload",
            FieldKind::MapPosition => "map-position",
            FieldKind::Color => "color",
            FieldKind::Custom => "custom",
        }
    }

    /// Kinds whose value is free text typed character by character.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldKind::Text
                | FieldKind::Email
                | FieldKind::Password
                | FieldKind::Phone
                | FieldKind::RichText
                | FieldKind::Color
                | FieldKind::Date
        )
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteOptions {
    pub endpoint: String,
    #[serde(default)]
    pub label_key: Option<String>,
    #[serde(default)]
    pub value_key: Option<String>,
    /// Keystrokes shorter than this do not trigger a fetch.
    #[serde(default)]
    pub min_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionSourceSpec {
    Static(Vec<SelectOption>),
    Remote(RemoteOptions),
}

impl Default for OptionSourceSpec {
    fn default() -> Self {
        OptionSourceSpec::Static(Vec::new())
    }
}

/// Kind-specific widget configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WidgetOptions {
    #[default]
    None,
    Select {
        #[serde(default)]
        source: OptionSourceSpec,
        #[serde(default)]
        multiple: bool,
    },
    MultiLanguage {
        locales: Vec<String>,
        #[serde(default = "default_sub_kind")]
        sub_kind: FieldKind,
        #[serde(default)]
        auto_translate: bool,
    },
    Number {
        #[serde(default)]
        step: Option<f64>,
        #[serde(default)]
        integer: bool,
    },
    FileUpload {
        #[serde(default)]
        accept: Vec<String>,
        #[serde(default)]
        max_size: Option<u64>,
    },
    Custom {
        widget: String,
        #[serde(default)]
        config: Value,
    },
}

fn default_sub_kind() -> FieldKind {
    FieldKind::Text
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub equals: Value,
}

/// Constraint hints a validation schema can be derived from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationHints {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub required_when: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub span: Option<u16>,
    #[serde(default, rename = "widgetOptions", alias = "widget_options")]
    pub widget_options: WidgetOptions,
    #[serde(default)]
    pub validation: ValidationHints,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub disabled: bool,
}

impl FieldDescriptor {
    pub fn new(kind: FieldKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            label: None,
            span: None,
            widget_options: WidgetOptions::None,
            validation: ValidationHints::default(),
            placeholder: None,
            default: None,
            disabled: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_span(mut self, span: u16) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_options(mut self, options: WidgetOptions) -> Self {
        self.widget_options = options;
        self
    }

    pub fn with_validation(mut self, hints: ValidationHints) -> Self {
        self.validation = hints;
        self
    }

    pub fn required(mut self) -> Self {
        self.validation.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.name.clone())
    }

    pub fn locales(&self) -> &[String] {
        match &self.widget_options {
            WidgetOptions::MultiLanguage { locales, .. } => locales,
            _ => &[],
        }
    }

    /// Names this descriptor occupies in the flat value namespace.
    pub fn expanded_names(&self) -> Vec<String> {
        if self.kind == FieldKind::MultiLanguage {
            self.locales()
                .iter()
                .map(|locale| localized_name(&self.name, locale))
                .collect()
        } else {
            vec![self.name.clone()]
        }
    }
}

pub fn localized_name(name: &str, locale: &str) -> String {
    format!("{name}_{locale}")
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormDescriptor {
    #[serde(default)]
    pub title: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: None,
            fields,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Descriptor owning a flat name, resolving multi-language sub-names.
    pub fn owner_of(&self, name: &str) -> Option<(&FieldDescriptor, Option<usize>)> {
        for field in &self.fields {
            if field.name == name && field.kind != FieldKind::MultiLanguage {
                return Some((field, None));
            }
            if field.kind == FieldKind::MultiLanguage
                && let Some(index) = field
                    .locales()
                    .iter()
                    .position(|locale| localized_name(&field.name, locale) == name)
            {
                return Some((field, Some(index)));
            }
        }
        None
    }
}
