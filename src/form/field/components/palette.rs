use std::borrow::Cow;

/// Numeric stepping behaviour for number widgets.
#[derive(Debug, Clone)]
pub struct NumericTuning {
    pub integer_step: i64,
    pub integer_fast_step: Option<i64>,
    pub float_step: f64,
    pub float_fast_step: Option<f64>,
}

impl NumericTuning {
    #[inline]
    pub fn step_i64(&self, fast: bool) -> i64 {
        if fast {
            self.integer_fast_step.unwrap_or(self.integer_step)
        } else {
            self.integer_step
        }
    }

    #[inline]
    pub fn step_f64(&self, fast: bool) -> f64 {
        if fast {
            self.float_fast_step.unwrap_or(self.float_step)
        } else {
            self.float_step
        }
    }

    pub fn with_integer_step(mut self, step: i64) -> Self {
        self.integer_step = step.max(1);
        self
    }

    pub fn with_float_step(mut self, step: f64) -> Self {
        self.float_step = step.max(f64::EPSILON);
        self
    }
}

impl Default for NumericTuning {
    fn default() -> Self {
        Self {
            integer_step: 1,
            integer_fast_step: Some(10),
            float_step: 1.0,
            float_fast_step: Some(10.0),
        }
    }
}

/// Labels shown by checkbox and switch widgets.
#[derive(Debug, Clone)]
pub struct ToggleLabels {
    pub on: Cow<'static, str>,
    pub off: Cow<'static, str>,
    pub checked: Cow<'static, str>,
    pub unchecked: Cow<'static, str>,
}

impl ToggleLabels {
    pub fn with_switch_labels(
        mut self,
        on: impl Into<Cow<'static, str>>,
        off: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.on = on.into();
        self.off = off.into();
        self
    }
}

impl Default for ToggleLabels {
    fn default() -> Self {
        Self {
            on: Cow::Borrowed("On"),
            off: Cow::Borrowed("Off"),
            checked: Cow::Borrowed("[x]"),
            unchecked: Cow::Borrowed("[ ]"),
        }
    }
}

/// Shared presentation knobs handed to every widget factory.
#[derive(Debug, Clone)]
pub struct ComponentPalette {
    pub numeric: NumericTuning,
    pub toggles: ToggleLabels,
    /// Cycling past the last option returns to the first.
    pub wrap_choices: bool,
    pub empty_choice: Cow<'static, str>,
}

impl Default for ComponentPalette {
    fn default() -> Self {
        Self {
            numeric: NumericTuning::default(),
            toggles: ToggleLabels::default(),
            wrap_choices: true,
            empty_choice: Cow::Borrowed("<none>"),
        }
    }
}
