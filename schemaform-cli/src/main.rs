use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::{Map, Value};

use schemaform::theme::{ComponentState, SlotOverrides, Variant};
use schemaform::{
    Backend, DocumentFormat, FormController, FormOptions, FormSchema, FormValidator, Theme,
    ValueBag, form_schema_from_str, generate_defaults, render_document, resolve_slots,
    theme_from_str, values_from_str,
};

#[derive(Debug, Parser)]
#[command(
    name = "schemaform",
    version,
    about = "Evaluate declarative form schemas: defaults, validation, rules and theme slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log rule and validation diagnostics to stderr
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format (json, yaml, toml)
    #[arg(long = "format", global = true, value_name = "FORMAT", value_parser = parse_format)]
    format: Option<DocumentFormat>,

    /// Emit compact output rather than pretty formatting
    #[arg(long = "compact", global = true)]
    compact: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the default value bag of a form schema
    Defaults(SchemaArgs),
    /// Validate a value bag against a form schema; exits non-zero on errors
    Validate {
        #[command(flatten)]
        schema: SchemaArgs,
        #[command(flatten)]
        values: ValuesArgs,
        /// Validator backend
        #[arg(short = 'b', long = "backend", value_enum, default_value_t = BackendArg::Native)]
        backend: BackendArg,
    },
    /// Print the render decision of every field for a value bag
    Inspect {
        #[command(flatten)]
        schema: SchemaArgs,
        #[command(flatten)]
        values: ValuesArgs,
        /// Evaluate as if a submit was attempted, so errors are displayed
        #[arg(long = "submitted")]
        submitted: bool,
    },
    /// Resolve theme slot classes for a component in a given state
    Slots(SlotArgs),
    /// Print the JSON Schema of form schema documents
    Schema,
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Form schema spec: file path, inline payload, or "-" for stdin
    #[arg(short = 's', long = "schema", value_name = "SPEC")]
    schema: String,
}

#[derive(Debug, Args)]
struct ValuesArgs {
    /// Value bag spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'd', long = "values", alias = "data", value_name = "SPEC")]
    values: Option<String>,
}

#[derive(Debug, Args)]
struct SlotArgs {
    /// Theme spec: file path, inline payload, or "-" for stdin
    #[arg(short = 't', long = "theme", value_name = "SPEC")]
    theme: String,

    /// Component key, e.g. textInput or select
    #[arg(short = 'c', long = "component", value_name = "KEY")]
    component: String,

    /// Extra classes appended last, as SLOT=CLASSES
    #[arg(short = 'o', long = "override", value_name = "SLOT=CLASSES", value_parser = parse_override)]
    overrides: Vec<(String, String)>,

    #[arg(long = "error")]
    error: bool,

    #[arg(long = "disabled")]
    disabled: bool,

    #[arg(long = "focused")]
    focused: bool,

    #[arg(long = "checked")]
    checked: bool,

    #[arg(long = "variant", value_enum)]
    variant: Option<VariantArg>,

    /// Skip the theme's global layer
    #[arg(long = "no-global")]
    no_global: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Native,
    JsonSchema,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Native => Backend::Native,
            BackendArg::JsonSchema => Backend::JsonSchema,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    Outline,
    Filled,
    Standard,
    Floating,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Outline => Variant::Outline,
            VariantArg::Filled => Variant::Filled,
            VariantArg::Standard => Variant::Standard,
            VariantArg::Floating => Variant::Floating,
        }
    }
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = Output {
        format: cli.format.unwrap_or_default(),
        pretty: !cli.compact,
    };

    match cli.command {
        Command::Defaults(args) => {
            let schema = load_schema(&args.schema)?;
            output.print(&generate_defaults(&schema))
        }
        Command::Validate {
            schema,
            values,
            backend,
        } => {
            let schema = load_schema(&schema.schema)?;
            let values = load_values(values.values.as_deref(), &schema)?;
            let validator = FormValidator::compile(&schema, backend.into());
            let errors = validator.validate(&values);
            output.print(&errors)?;
            if errors.is_empty() {
                Ok(())
            } else {
                Err(eyre!("{} field(s) failed validation", errors.len()))
            }
        }
        Command::Inspect {
            schema,
            values,
            submitted,
        } => {
            let schema = load_schema(&schema.schema)?;
            let values = load_values(values.values.as_deref(), &schema)?;
            let mut form =
                FormController::new(schema, FormOptions::default().with_initial_values(values));
            if submitted {
                form.handle_submit();
            }
            let mut report = Map::new();
            for (field, decision) in form.render_decisions() {
                let entry = serde_json::to_value(&decision)
                    .wrap_err_with(|| format!("failed to encode decision for {}", field.name))?;
                report.insert(field.name.clone(), entry);
            }
            output.print(&report)
        }
        Command::Slots(args) => {
            let theme = load_theme(&args.theme)?;
            let mut state = ComponentState::default()
                .with_error(args.error)
                .with_disabled(args.disabled)
                .with_focused(args.focused)
                .with_checked(args.checked);
            if let Some(variant) = args.variant {
                state = state.with_variant(variant.into());
            }
            let overrides = build_overrides(&args.overrides)?;
            let resolved = resolve_slots(
                &theme,
                &args.component,
                &state,
                overrides.as_ref(),
                !args.no_global,
            );
            output.print(&resolved)
        }
        Command::Schema => {
            let document = schemaform::document_schema().wrap_err("failed to build schema")?;
            output.print(&document)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Output {
    format: DocumentFormat,
    pretty: bool,
}

impl Output {
    fn print<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let rendered = render_document(value, self.format, self.pretty).map_err(Report::msg)?;
        println!("{rendered}");
        Ok(())
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => return,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn load_schema(spec: &str) -> Result<FormSchema> {
    load_document(spec, "schema", form_schema_from_str)
}

/// Values default to the schema's defaults; provided keys are layered on top.
fn load_values(spec: Option<&str>, schema: &FormSchema) -> Result<ValueBag> {
    let mut values = generate_defaults(schema);
    if let Some(spec) = spec {
        values.extend(load_document(spec, "values", values_from_str)?);
    }
    Ok(values)
}

fn load_theme(spec: &str) -> Result<Theme> {
    load_document(spec, "theme", theme_from_str)
}

fn build_overrides(raw: &[(String, String)]) -> Result<Option<SlotOverrides>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let mut overrides = SlotOverrides::new();
    for (slot, classes) in raw {
        let slot = serde_json::from_value(Value::String(slot.clone()))
            .map_err(|_| eyre!("unknown slot '{slot}'"))?;
        overrides.insert(slot, classes.clone());
    }
    Ok(Some(overrides))
}

fn load_document<T, E>(
    spec: &str,
    label: &str,
    parse: impl Fn(&str, DocumentFormat) -> Result<T, E>,
) -> Result<T>
where
    E: fmt::Display,
{
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, DocumentFormat::default(), label, parse);
    }

    let path = PathBuf::from(spec);
    let format = format_from_path(&path);
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => parse_contents(&contents, format, label, parse),
        Err(err) if is_not_found(&err) => {
            parse_contents(spec, format, &format!("inline {label}"), parse)
        }
        Err(err) => Err(err.wrap_err(format!("failed to load {label} from {}", path.display()))),
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

/// Try the hinted format first, then every other compiled-in format.
fn parse_contents<T, E>(
    contents: &str,
    format: DocumentFormat,
    label: &str,
    parse: impl Fn(&str, DocumentFormat) -> Result<T, E>,
) -> Result<T>
where
    E: fmt::Display,
{
    let primary = match parse(contents, format) {
        Ok(parsed) => return Ok(parsed),
        Err(err) => err,
    };
    DocumentFormat::available_formats()
        .into_iter()
        .filter(|candidate| *candidate != format)
        .find_map(|candidate| parse(contents, candidate).ok())
        .ok_or_else(|| eyre!("failed to parse {label}: tried {} ({primary:#})", format_list()))
}

fn format_from_path(path: &Path) -> DocumentFormat {
    path.extension()
        .and_then(|ext| DocumentFormat::from_extension(&ext.to_string_lossy()))
        .unwrap_or_default()
}

fn format_list() -> String {
    DocumentFormat::available_formats()
        .into_iter()
        .map(|format| format.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_format(raw: &str) -> Result<DocumentFormat, String> {
    DocumentFormat::from_extension(raw)
        .ok_or_else(|| format!("unsupported format '{raw}'; available: {}", format_list()))
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(slot, classes)| (slot.trim().to_string(), classes.trim().to_string()))
        .ok_or_else(|| format!("expected SLOT=CLASSES, got '{raw}'"))
}
