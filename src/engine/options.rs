use std::{borrow::Cow, sync::Arc, time::Duration};

use crate::form::{ComponentPalette, DEFAULT_COLUMNS, NumericTuning};

/// When field errors are computed outside of submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    #[default]
    OnSubmit,
    OnBlur,
    OnChange,
}

pub const GENERIC_SUBMIT_ERROR: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone)]
pub struct FormOptions {
    pub validation_mode: ValidationMode,
    /// Banner text used when a submission error carries no message.
    pub generic_error: Cow<'static, str>,
    pub columns: u16,
    /// Ticks spent waiting for a locale sub-input to mount before giving up.
    pub focus_retry_budget: u32,
    pub search_debounce: Duration,
    pub tick_rate: Duration,
    pub show_help: bool,
    pub confirm_exit: bool,
    pub(crate) component_palette: Arc<ComponentPalette>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::default(),
            generic_error: Cow::Borrowed(GENERIC_SUBMIT_ERROR),
            columns: DEFAULT_COLUMNS,
            focus_retry_budget: 10,
            search_debounce: Duration::from_millis(300),
            tick_rate: Duration::from_millis(100),
            show_help: true,
            confirm_exit: true,
            component_palette: Arc::new(ComponentPalette::default()),
        }
    }
}

impl FormOptions {
    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    pub fn with_generic_error(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.generic_error = message.into();
        self
    }

    pub fn with_columns(mut self, columns: u16) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn with_focus_retry_budget(mut self, budget: u32) -> Self {
        self.focus_retry_budget = budget;
        self
    }

    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_component_palette(mut self, palette: ComponentPalette) -> Self {
        self.component_palette = Arc::new(palette);
        self
    }

    pub fn with_numeric_tuning(self, tuning: NumericTuning) -> Self {
        self.map_palette(|mut palette| {
            palette.numeric = tuning;
            palette
        })
    }

    pub fn with_switch_labels(
        self,
        on: impl Into<Cow<'static, str>>,
        off: impl Into<Cow<'static, str>>,
    ) -> Self {
        let (on, off) = (on.into(), off.into());
        self.map_palette(|mut palette| {
            palette.toggles = palette.toggles.clone().with_switch_labels(on, off);
            palette
        })
    }

    pub fn with_choice_wrap(self, wrap: bool) -> Self {
        self.map_palette(|mut palette| {
            palette.wrap_choices = wrap;
            palette
        })
    }

    pub fn component_palette(&self) -> Arc<ComponentPalette> {
        Arc::clone(&self.component_palette)
    }

    fn map_palette(mut self, map: impl FnOnce(ComponentPalette) -> ComponentPalette) -> Self {
        let updated = map((*self.component_palette).clone());
        self.component_palette = Arc::new(updated);
        self
    }
}
