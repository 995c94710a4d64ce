use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::SelectOption;
use crate::engine::{
    FormOrchestrator, InputEffect, SearchRequest, SubmitError, SubmitHandler, SubmitOutcome,
    SubmitStart,
};
use crate::form::{TranslationJob, TranslationOutcome};
use crate::presentation::{self, RenderReport, UiContext};
use crate::remote::{
    Debouncer, OptionMapper, OptionSource, Translator, fetch_options, spawn_translations,
};

use super::{
    input::{self, KeyCommand},
    status::StatusLine,
    terminal::TerminalSession,
};

const HELP_TEXT: &str =
    "Tab/Shift+Tab move • Ctrl+←/→ language • Ctrl+S submit • Ctrl+R reset • Ctrl+Q quit";

pub(crate) struct Collaborators {
    pub handler: Arc<dyn SubmitHandler>,
    pub translator: Option<Arc<dyn Translator>>,
    pub option_source: Option<Arc<dyn OptionSource>>,
    pub mapper: OptionMapper,
}

enum Background {
    Options {
        field: String,
        keyword: String,
        result: Result<Vec<SelectOption>, String>,
    },
    Submitted {
        values: Value,
        result: Result<(), SubmitError>,
    },
}

pub(crate) struct App {
    form: FormOrchestrator,
    title: String,
    collaborators: Collaborators,
    status: StatusLine,
    report: RenderReport,
    debouncer: Debouncer,
    background_tx: mpsc::UnboundedSender<Background>,
    background_rx: mpsc::UnboundedReceiver<Background>,
    translations_tx: mpsc::UnboundedSender<TranslationOutcome>,
    translations_rx: mpsc::UnboundedReceiver<TranslationOutcome>,
    exit_armed: bool,
    should_quit: bool,
    result: Option<Value>,
}

impl App {
    pub fn new(form: FormOrchestrator, title: String, collaborators: Collaborators) -> Self {
        let (background_tx, background_rx) = mpsc::unbounded_channel();
        let (translations_tx, translations_rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(form.options().search_debounce);
        Self {
            form,
            title,
            collaborators,
            status: StatusLine::new(),
            report: RenderReport::default(),
            debouncer,
            background_tx,
            background_rx,
            translations_tx,
            translations_rx,
            exit_armed: false,
            should_quit: false,
            result: None,
        }
    }

    /// Drive the form until it is submitted (`Some`) or abandoned (`None`).
    pub fn run(&mut self) -> Result<Option<Value>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let _context = runtime.enter();
        let mut terminal = TerminalSession::enter()?;
        let tick_rate = self.form.options().tick_rate;

        while !self.should_quit {
            let mut report = RenderReport::default();
            terminal.draw(|frame| report = self.render(frame))?;
            self.report = report;
            self.drain_background();
            self.form.tick(|name| self.report.is_mounted(name));
            if !event::poll(tick_rate)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }

        self.debouncer.cancel();
        Ok(self.result.take())
    }

    fn render(&self, frame: &mut ratatui::Frame<'_>) -> RenderReport {
        let help = self.form.options().show_help.then_some(HELP_TEXT);
        presentation::draw(
            frame,
            UiContext {
                form: &self.form,
                title: &self.title,
                status_message: self.status.message(),
                help,
                enable_cursor: true,
            },
        )
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let command = input::classify(&key);
        if command != KeyCommand::Quit {
            self.exit_armed = false;
        }
        match command {
            KeyCommand::Submit => self.on_submit(),
            KeyCommand::Reset => {
                self.debouncer.cancel();
                self.form.reset();
                self.status.reset();
            }
            KeyCommand::Quit => self.on_exit(),
            KeyCommand::NextField => {
                let jobs = self.form.focus_next();
                self.translate(jobs);
                self.status.ready();
            }
            KeyCommand::PrevField => {
                let jobs = self.form.focus_prev();
                self.translate(jobs);
                self.status.ready();
            }
            KeyCommand::SwitchLocale(delta) => {
                let jobs = self.form.step_locale_tab(delta);
                self.translate(jobs);
            }
            KeyCommand::Dismiss => self.status.ready(),
            KeyCommand::Edit(key) => match self.form.handle_key(&key) {
                InputEffect::Changed => {
                    if let Some(field) = self.form.focused_descriptor() {
                        self.status.editing(&field.display_label());
                    }
                }
                InputEffect::Search(request) => self.search(request),
                InputEffect::Moved | InputEffect::Ignored => {}
            },
            KeyCommand::None => {}
        }
    }

    fn on_submit(&mut self) {
        match self.form.begin_submit() {
            SubmitStart::Ignored => {}
            SubmitStart::Invalid(errors) => self.status.issues_remaining(errors.len()),
            SubmitStart::Ready(values) => {
                self.status.submitting();
                let handler = Arc::clone(&self.collaborators.handler);
                let sender = self.background_tx.clone();
                tokio::spawn(async move {
                    let result = handler.submit(values.clone()).await;
                    let _ = sender.send(Background::Submitted { values, result });
                });
            }
        }
    }

    fn on_exit(&mut self) {
        let dirty = self.form.store().values() != self.form.store().defaults();
        if self.form.options().confirm_exit && dirty && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }

    fn search(&mut self, request: SearchRequest) {
        let Some(source) = self.collaborators.option_source.clone() else {
            debug!(field = %request.field, "no option source configured");
            return;
        };
        self.status.searching(&request.keyword);
        let mapper = Arc::clone(&self.collaborators.mapper);
        let sender = self.background_tx.clone();
        self.debouncer.schedule(async move {
            let result = fetch_options(source.as_ref(), &request.remote, &request.keyword, &mapper)
                .await
                .map_err(|err| format!("{err:#}"));
            let _ = sender.send(Background::Options {
                field: request.field,
                keyword: request.keyword,
                result,
            });
        });
    }

    fn translate(&self, jobs: Vec<TranslationJob>) {
        if jobs.is_empty() {
            return;
        }
        match &self.collaborators.translator {
            Some(translator) => {
                spawn_translations(Arc::clone(translator), jobs, self.translations_tx.clone())
            }
            None => debug!(jobs = jobs.len(), "auto-translate requested without a translator"),
        }
    }

    fn drain_background(&mut self) {
        while let Ok(event) = self.background_rx.try_recv() {
            match event {
                Background::Options {
                    field,
                    keyword,
                    result,
                } => match result {
                    Ok(options) => {
                        self.form.apply_remote_options(&field, &keyword, options);
                    }
                    Err(err) => warn!(%field, %keyword, error = %err, "failed to load options"),
                },
                Background::Submitted { values, result } => {
                    match self.form.finish_submit(values, result) {
                        SubmitOutcome::Submitted(values) => {
                            self.result = Some(values);
                            self.should_quit = true;
                        }
                        SubmitOutcome::Failed(_) => self.status.failed(),
                        SubmitOutcome::Invalid(_) | SubmitOutcome::Ignored => {}
                    }
                }
            }
        }
        while let Ok(outcome) = self.translations_rx.try_recv() {
            if self.form.apply_translation(&outcome) {
                self.status.translated(&outcome.job.target_locale);
            }
        }
    }
}
