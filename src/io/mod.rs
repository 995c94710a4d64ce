mod format;
pub mod input;
pub mod output;

pub use format::DocumentFormat;
pub use input::{load_form_descriptor, load_schema_descriptor, parse_document_str, read_document};
pub use output::{OutputDestination, OutputOptions, emit};
