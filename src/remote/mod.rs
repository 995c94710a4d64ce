//! Collaborators reached over the network: option sources and translators.

mod debounce;
mod options;
mod translate;

pub use debounce::Debouncer;
pub use options::{
    OptionMapper, OptionSource, StaticOptions, default_mapper, default_option_mapper,
    fetch_options,
};
pub use translate::{Translator, spawn_translations, translate_all};
