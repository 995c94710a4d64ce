mod base;
mod choice;
mod file;
pub(crate) mod helpers;
mod multi_language;
mod number;
mod palette;
mod position;
mod text;
mod toggle;

pub use base::{ComponentKind, FieldComponent};
pub use choice::ChoiceComponent;
pub use file::FileUploadComponent;
pub use multi_language::MultiLanguageComponent;
pub use number::NumberComponent;
pub use palette::{ComponentPalette, NumericTuning, ToggleLabels};
pub use position::MapPositionComponent;
pub use text::TextComponent;
pub use toggle::ToggleComponent;
