//! Command-line renderer for mobiledoc documents.
//!
//! # Responsibility
//! - Render one mobiledoc JSON file with host-component placeholders.
//! - Print the rendered HTML, or HTML plus the card/atom descriptors as JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;

use clap::{Parser, ValueEnum};
use log::{error, info};
use render_mobiledoc_core::{
    default_log_level, init_logging, unknown_entity_handler, EntityDescriptor, EntityKind,
    MobiledocView, SimpleDocument, UnknownEntityHandler, ViewConfig,
};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

/// Render a mobiledoc with component placeholders.
#[derive(Debug, Parser)]
#[command(name = "render-mobiledoc", version, about = "Render a mobiledoc to HTML")]
struct Cli {
    /// Path to the mobiledoc JSON file
    file: PathBuf,

    /// Card name rendered as a component placeholder (repeatable)
    #[arg(long = "card-name")]
    card_names: Vec<String>,

    /// Atom name rendered as a component placeholder (repeatable)
    #[arg(long = "atom-name")]
    atom_names: Vec<String>,

    /// JSON object file forwarded to every card and atom renderer
    #[arg(long)]
    card_options: Option<PathBuf>,

    /// Render unknown cards and atoms as empty elements instead of failing
    #[arg(long)]
    lenient: bool,

    /// Output format
    #[arg(long, default_value = "html", value_enum)]
    output: OutputFormat,

    /// Log level (trace|debug|info|warn|error|off)
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when omitted
    #[arg(long)]
    log_dir: Option<String>,
}

#[derive(Debug, Serialize)]
struct JsonReport {
    html: String,
    cards: Vec<EntityDescriptor>,
    atoms: Vec<EntityDescriptor>,
}

fn main() {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, cli.log_dir.as_deref()) {
        eprintln!("error: {err}");
        process::exit(2);
    }

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            error!("event=cli_render module=cli status=error");
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let mobiledoc = read_json(&cli.file)?;
    let card_options = match &cli.card_options {
        Some(path) => match read_json(path)? {
            Value::Object(map) => map,
            _ => return Err(format!("{}: card options must be a JSON object", path.display())),
        },
        None => Map::new(),
    };

    let mut config = ViewConfig::new(mobiledoc)
        .with_card_names(cli.card_names.iter().cloned())
        .with_atom_names(cli.atom_names.iter().cloned())
        .with_card_options(card_options);
    if cli.lenient {
        config = config
            .with_unknown_card_handler(empty_element_handler(EntityKind::Card))
            .with_unknown_atom_handler(empty_element_handler(EntityKind::Atom));
    }

    let mut view = MobiledocView::new(config, Rc::new(SimpleDocument::new()))
        .map_err(|err| err.to_string())?;
    let html = view.render().map_err(|err| err.to_string())?.to_html();
    let applied = view.flush_updates();
    info!(
        "event=cli_render module=cli status=ok updates={} format={:?}",
        applied, cli.output
    );

    match cli.output {
        OutputFormat::Html => Ok(html),
        OutputFormat::Json => {
            let report = JsonReport {
                html,
                cards: view.card_registry().snapshot(),
                atoms: view.atom_registry().snapshot(),
            };
            serde_json::to_string_pretty(&report).map_err(|err| err.to_string())
        }
    }
}

/// Stands in for an unregistered entity with an empty, marked element.
fn empty_element_handler(kind: EntityKind) -> UnknownEntityHandler {
    unknown_entity_handler(move |args| {
        let element = args.env.dom().create_element(kind.tag_name())?;
        element.set_attribute("data-unknown", args.env.name());
        Ok(Some(element.into()))
    })
}

fn read_json(path: &Path) -> Result<Value, String> {
    let source = fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    serde_json::from_str(&source).map_err(|err| format!("{}: invalid JSON: {err}", path.display()))
}
