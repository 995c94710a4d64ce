//! The form orchestrator: one mounted form's state and submit lifecycle.

mod options;
mod orchestrator;
mod submit;

pub use options::{FormOptions, GENERIC_SUBMIT_ERROR, ValidationMode};
pub use orchestrator::{BuildError, FormOrchestrator, InputEffect, SearchRequest};
pub use submit::{SubmitError, SubmitFn, SubmitHandler, SubmitOutcome, SubmitStart, submit_fn};
