//! AML namespace dump tool.
//!
//! Loads a DSDT and any SSDTs into one namespace, in the order given, and
//! prints the objects or devices it finds.
//!
//! Pipeline: read settings → load tables → decode deferred bodies → report.

mod cli;
mod config;
mod logger;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use hadron_aml::{AmlContext, DecoderConfig, MethodBodies};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logger::init(cli.quiet, cli.verbose)?;

    let decoder = match &cli.config {
        Some(path) => config::DumpConfig::load(path)?.decoder_config(),
        None => DecoderConfig::default(),
    };
    let deferred = decoder.method_bodies == MethodBodies::Deferred;
    let mut context = AmlContext::with_config(decoder);

    for path in &cli.tables {
        load(&mut context, path, cli.skip)
            .with_context(|| format!("loading {}", path.display()))?;
    }
    if deferred {
        context.parse_deferred_methods();
    }
    if !context.redefinitions().is_empty() {
        log::warn!(
            "{} paths were defined more than once",
            context.redefinitions().len()
        );
    }

    print!("{}", report(&context, &cli.command)?);
    Ok(())
}

/// Decodes one file into `context`.
fn load(context: &mut AmlContext, path: &Path, skip: Option<usize>) -> Result<()> {
    let bytes = fs::read(path).context("reading table")?;
    let terms = match skip {
        Some(skip) => {
            let body = bytes
                .get(skip..)
                .with_context(|| format!("file is shorter than {skip} bytes"))?;
            context.decode(body)?
        }
        None => context.load_table(&bytes)?,
    };
    log::info!("{}: {} top-level terms", path.display(), terms.len());
    Ok(())
}

/// Renders the output of `command`.
fn report(context: &AmlContext, command: &cli::Command) -> Result<String> {
    let mut out = String::new();
    match command {
        cli::Command::Objects => context.dump_objects(&mut out)?,
        cli::Command::Devices => context.dump_devices(&mut out)?,
        cli::Command::Lookup { path } => match context.lookup(path) {
            Some(object) => writeln!(out, "{path} = {object:#?}")?,
            None => bail!("{path} is not bound"),
        },
        cli::Command::Walk { root } => {
            let mut entries = Vec::new();
            context.walk(root, |path, object| {
                entries.push((path.as_string(), object.kind_name()));
            })?;
            for (path, kind) in entries {
                writeln!(out, "{path}\t{kind}")?;
            }
        }
    }
    Ok(out)
}
