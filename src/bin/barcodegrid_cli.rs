//! CLI tool for barcodegrid - lays out barcodes and outputs layout JSON or a print document
//!
//! Usage:
//!   barcodegrid_cli <input.csv|input.xlsx> [options]
//!   barcodegrid_cli --generate LOC-:1:40 [options]
//!
//! Options:
//!   --column NAME         data column (default: detected location column)
//!   --generate P:S:N      generate N codes `P` + zero-padded counter from S
//!   --preset FILE         apply an exported preset (data included)
//!   --config-preset FILE  apply an exported configuration preset (data kept)
//!   --columns N, --rows N, --format A4|A1, --margin MM
//!   --html                emit the print document instead of layout JSON
//!   --pages EXPR          pages to print, e.g. "1,3-4"
//!   --bw                  black & white output
//!   -o FILE               write to FILE instead of stdout

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use barcodegrid::editor::ConfigPatch;
use barcodegrid::generate::Sequence;
use barcodegrid::import::import_path;
use barcodegrid::render::ColorMode;
use barcodegrid::{BarcodeGrid, BarcodeGridError, ConfigPreset, Preset, Result};
use tracing::{info, warn};

const USAGE: &str = "Usage: barcodegrid_cli <input.csv|input.xlsx> | --generate PREFIX:START:COUNT \
[--column NAME] [--preset FILE] [--config-preset FILE] [--columns N] [--rows N] [--format A4|A1] \
[--margin MM] [--html] [--pages EXPR] [--bw] [-o FILE]";

#[derive(Debug, Default)]
struct Args {
    input: Option<PathBuf>,
    column: Option<String>,
    generate: Option<Sequence>,
    preset: Option<PathBuf>,
    config_preset: Option<PathBuf>,
    patch: ConfigPatch,
    html: bool,
    pages: Option<String>,
    bw: bool,
    output: Option<PathBuf>,
}

fn main() {
    init_logging();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    let invalid = |msg: String| BarcodeGridError::InvalidInput(msg);

    while let Some(arg) = argv.next() {
        let mut value = |flag: &str| {
            argv.next()
                .ok_or_else(|| invalid(format!("{flag} needs a value")))
        };
        match arg.as_str() {
            "--column" => args.column = Some(value("--column")?),
            "--generate" => args.generate = Some(parse_sequence(&value("--generate")?)?),
            "--preset" => args.preset = Some(value("--preset")?.into()),
            "--config-preset" => args.config_preset = Some(value("--config-preset")?.into()),
            "--columns" => args.patch.columns = Some(parse_number(&value("--columns")?)?),
            "--rows" => args.patch.rows = Some(parse_number(&value("--rows")?)?),
            "--format" => args.patch.page_format = Some(value("--format")?),
            "--margin" => args.patch.margin = Some(parse_number(&value("--margin")?)?),
            "--pages" => args.pages = Some(value("--pages")?),
            "-o" | "--output" => args.output = Some(value("-o")?.into()),
            "--html" => args.html = true,
            "--bw" => args.bw = true,
            flag if flag.starts_with('-') => return Err(invalid(format!("unknown option {flag}"))),
            _ if args.input.is_none() => args.input = Some(PathBuf::from(&arg)),
            _ => return Err(invalid(format!("unexpected argument {arg}"))),
        }
    }

    if args.input.is_none() && args.generate.is_none() && args.preset.is_none() {
        return Err(invalid("no input file, --generate or --preset given".into()));
    }
    Ok(args)
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| BarcodeGridError::InvalidInput(format!("not a number: {text:?}")))
}

/// `PREFIX:START:COUNT`; the prefix may itself contain `:`.
fn parse_sequence(text: &str) -> Result<Sequence> {
    let mut parts = text.rsplitn(3, ':');
    let count = parts.next().unwrap_or_default();
    let start = parts.next();
    let prefix = parts.next();
    match (prefix, start) {
        (Some(prefix), Some(start)) => Ok(Sequence::new(
            prefix,
            parse_number(start)?,
            parse_number(count)?,
        )),
        _ => Err(BarcodeGridError::InvalidInput(format!(
            "--generate expects PREFIX:START:COUNT, got {text:?}"
        ))),
    }
}

fn run(args: &Args) -> Result<()> {
    let mut grid = BarcodeGrid::new();

    if let Some(path) = &args.preset {
        let json = fs::read_to_string(path)?;
        let preset: Preset = serde_json::from_str(&json)
            .map_err(|e| BarcodeGridError::Preset(format!("{}: {e}", path.display())))?;
        info!(name = %preset.name, "applying preset");
        grid.editor_mut().load_preset(&preset)?;
    }

    if let Some(path) = &args.input {
        let table = import_path(path)?;
        let column = match &args.column {
            Some(column) => column.clone(),
            None => table
                .default_column()
                .map(ToString::to_string)
                .ok_or_else(|| BarcodeGridError::EmptyImport("no columns".into()))?,
        };
        info!(file = %path.display(), column, rows = table.row_count(), "importing");
        let items = table.items(&column, barcodegrid::time::now_ms())?;
        grid.editor_mut().set_data(items);
    } else if let Some(sequence) = &args.generate {
        grid.generate(sequence)?;
    }

    if let Some(path) = &args.config_preset {
        let json = fs::read_to_string(path)?;
        let preset: ConfigPreset = serde_json::from_str(&json)
            .map_err(|e| BarcodeGridError::Preset(format!("{}: {e}", path.display())))?;
        info!(name = %preset.name, "applying configuration preset");
        grid.editor_mut().load_config_preset(&preset)?;
    }

    if !args.patch.is_empty() {
        grid.editor_mut().update_config(&args.patch)?;
    }
    if args.bw {
        grid.set_color_mode(ColorMode::Bw);
    }

    let report = grid.validate();
    for warning in &report.warnings {
        warn!("{warning}");
    }
    if !report.is_valid {
        return Err(BarcodeGridError::InvalidInput(report.errors.join("; ")));
    }

    let output = if args.html {
        grid.print_html(args.pages.as_deref())?
    } else {
        serde_json::to_string_pretty(&grid.layout())?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output)?;
            eprintln!("Written: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
