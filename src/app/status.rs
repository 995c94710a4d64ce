#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Press Ctrl+S to submit.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn submitting(&mut self) {
        self.message = "Submitting…".to_string();
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = format!("{count} issue(s) to fix before submitting");
    }

    pub fn failed(&mut self) {
        self.message = "Submit failed; values were kept".to_string();
    }

    pub fn reset(&mut self) {
        self.message = "Form reset to defaults".to_string();
    }

    pub fn searching(&mut self, keyword: &str) {
        self.message = format!("Searching \"{keyword}\"");
    }

    pub fn translated(&mut self, locale: &str) {
        self.message = format!("Filled {locale} from translation");
    }

    pub fn pending_exit(&mut self) {
        self.message = "Unsaved changes. Press Ctrl+Q again to quit without submitting.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
