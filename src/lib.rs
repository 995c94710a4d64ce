#![deny(rust_2018_idioms)]
//! Declarative admin forms: field descriptors, per-kind widgets, multi-language
//! fields, validation schemas, a headless orchestrator and data-table state.
//! The `tui` feature adds an interactive terminal runtime.

pub mod domain;
pub mod engine;
pub mod form;
pub mod io;
pub mod presentation;
pub mod remote;
pub mod table;
pub mod validation;

#[cfg(feature = "tui")]
mod app;

#[cfg(feature = "tui")]
pub use app::FormUI;
pub use domain::{FieldDescriptor, FieldKind, FormDescriptor, WidgetOptions};
pub use engine::{FormOptions, FormOrchestrator, SubmitError, SubmitHandler, SubmitOutcome};
pub use io::{DocumentFormat, OutputDestination, OutputOptions};

pub mod prelude {
    #[cfg(feature = "tui")]
    pub use super::FormUI;
    pub use super::domain::{FieldDescriptor, FieldKind, FormDescriptor, WidgetOptions};
    pub use super::engine::{
        FormOptions, FormOrchestrator, SubmitError, SubmitHandler, SubmitOutcome, ValidationMode,
        submit_fn,
    };
    pub use super::validation::{Messages, ValidationSchema, rules};
}
