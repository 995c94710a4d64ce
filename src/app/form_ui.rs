use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::{
    domain::FormDescriptor,
    engine::{FormOptions, FormOrchestrator, SubmitHandler},
    form::WidgetResolver,
    remote::{OptionMapper, OptionSource, Translator, default_option_mapper},
    validation::{Messages, ValidationSchema},
};

use super::runtime::{App, Collaborators};

/// Interactive terminal front-end for one form.
pub struct FormUI {
    form: FormDescriptor,
    schema: Option<ValidationSchema>,
    json_schema: Option<Value>,
    defaults: Value,
    title: Option<String>,
    options: FormOptions,
    resolver: Option<WidgetResolver>,
    translator: Option<Arc<dyn Translator>>,
    option_source: Option<Arc<dyn OptionSource>>,
    mapper: OptionMapper,
}

impl std::fmt::Debug for FormUI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormUI")
            .field("fields", &self.form.fields.len())
            .field("title", &self.title)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FormUI {
    pub fn new(form: FormDescriptor) -> Self {
        Self {
            form,
            schema: None,
            json_schema: None,
            defaults: Value::Object(Default::default()),
            title: None,
            options: FormOptions::default(),
            resolver: None,
            translator: None,
            option_source: None,
            mapper: default_option_mapper(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Use an explicit schema instead of deriving one from the descriptor.
    pub fn with_schema(mut self, schema: ValidationSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Layer a JSON Schema document over the field rules.
    pub fn with_json_schema(mut self, schema: Value) -> Self {
        self.json_schema = Some(schema);
        self
    }

    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolver(mut self, resolver: WidgetResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Some(Arc::new(translator));
        self
    }

    pub fn with_option_source(mut self, source: impl OptionSource + 'static) -> Self {
        self.option_source = Some(Arc::new(source));
        self
    }

    pub fn with_option_mapper(mut self, mapper: OptionMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Build the orchestrator without entering the terminal.
    pub fn build(&self) -> Result<FormOrchestrator> {
        let mut schema = match &self.schema {
            Some(schema) => schema.clone(),
            None => ValidationSchema::from_descriptor(&self.form, Messages::english())?,
        };
        if let Some(document) = &self.json_schema {
            schema = schema.with_json_schema(document)?;
        }
        let resolver = match &self.resolver {
            Some(resolver) => resolver.clone(),
            None => WidgetResolver::new(self.options.component_palette()),
        };
        FormOrchestrator::with_resolver(
            self.form.clone(),
            schema,
            &self.defaults,
            self.options.clone(),
            &resolver,
        )
        .context("failed to build form")
    }

    /// Run until the form is submitted; `None` when the user quits first.
    pub fn run(self, handler: impl SubmitHandler + 'static) -> Result<Option<Value>> {
        let orchestrator = self.build()?;
        let title = self
            .title
            .or_else(|| self.form.title.clone())
            .unwrap_or_else(|| "Form".to_string());
        let collaborators = Collaborators {
            handler: Arc::new(handler),
            translator: self.translator,
            option_source: self.option_source,
            mapper: self.mapper,
        };
        App::new(orchestrator, title, collaborators).run()
    }
}
