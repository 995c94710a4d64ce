mod form_ui;
mod input;
mod runtime;
mod status;
mod terminal;

pub use form_ui::FormUI;
