pub mod error;
pub mod field;
mod layout;
mod multi_language;
mod resolver;
mod store;

pub use error::{FieldCoercionError, ResolveError};
pub use field::{
    BoundField, ComponentKind, ComponentPalette, FieldComponent, FieldEvent, NumericTuning,
    ToggleLabels,
};
pub use layout::{DEFAULT_COLUMNS, GridCell, GridRow, layout_rows};
pub use multi_language::{
    FocusPoll, FocusRequest, MultiLanguageState, TranslationJob, TranslationOutcome,
    apply_translation, plan_translations,
};
pub use resolver::WidgetResolver;
pub use store::FormStore;
