use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use adminform::{
    DocumentFormat, FormUI, OutputDestination, OutputOptions,
    engine::submit_fn,
    io::{emit, load_form_descriptor, load_schema_descriptor, read_document},
};

#[derive(Debug, Parser)]
#[command(
    name = "adminform",
    version,
    about = "Fill in declarative admin forms in the terminal"
)]
struct Cli {
    /// Form descriptor file (json, yaml or toml)
    #[arg(short = 'f', long = "form", value_name = "PATH")]
    form: Option<PathBuf>,

    /// Initial values for the form
    #[arg(short = 'd', long = "defaults", value_name = "PATH")]
    defaults: Option<PathBuf>,

    /// JSON Schema checked on submit; builds the form when --form is absent
    #[arg(short = 's', long = "schema", value_name = "PATH")]
    schema: Option<PathBuf>,

    /// Title shown above the form
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Output destinations ("-" writes to stdout)
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact output rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Write logs to this file; the form owns the terminal
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    let (form, json_schema) = match (&cli.form, &cli.schema) {
        (Some(form), schema) => {
            let descriptor = load_form_descriptor(form).map_err(Report::msg)?;
            let schema = schema
                .as_deref()
                .map(read_document)
                .transpose()
                .map_err(Report::msg)?;
            (descriptor, schema)
        }
        (None, Some(schema)) => {
            let descriptor = load_schema_descriptor(schema).map_err(Report::msg)?;
            (descriptor, Some(read_document(schema).map_err(Report::msg)?))
        }
        (None, None) => return Err(eyre!("provide --form or --schema")),
    };
    let defaults = match cli.defaults.as_deref() {
        Some(path) => read_document(path).map_err(Report::msg)?,
        None => Value::Object(Default::default()),
    };
    let output = output_options(&cli);

    let mut ui = FormUI::new(form).with_defaults(defaults);
    if let Some(schema) = json_schema {
        ui = ui.with_json_schema(schema);
    }
    if let Some(title) = cli.title.as_ref() {
        ui = ui.with_title(title.clone());
    }

    let submitted = ui
        .run(submit_fn(|_values| async { Ok(()) }))
        .map_err(Report::msg)?;
    match submitted {
        Some(values) => {
            info!("form submitted");
            emit(&values, &output)
                .map_err(Report::msg)
                .wrap_err("failed to write submitted values")?;
        }
        None => info!("form closed without submitting"),
    }
    Ok(())
}

fn output_options(cli: &Cli) -> OutputOptions {
    let destinations: Vec<OutputDestination> = if cli.outputs.is_empty() {
        vec![OutputDestination::Stdout]
    } else {
        cli.outputs
            .iter()
            .map(|raw| OutputDestination::parse(raw))
            .collect()
    };
    OutputOptions::new(DocumentFormat::Json)
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("adminform=debug")),
        )
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
