//! `xsplice` - compose an XML configuration document and its includes.
//!
//! Reads the root document, splices every include marker in place and writes
//! the composed document to a file or stdout. Nothing is written unless the
//! whole composition succeeds.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use splice_core::{Composer, SpliceConfig, XmlWriter};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "xsplice", version, about = "Compose XML configuration documents from their includes")]
struct Cli {
    /// Root document to compose
    root: PathBuf,

    /// Write the composed document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// TOML file with composition options
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Local name of the include marker element
    #[arg(long)]
    marker: Option<String>,

    /// Attribute on the marker holding the reference
    #[arg(long)]
    ref_attribute: Option<String>,

    /// Maximum include nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Fail when a document includes itself through any chain
    #[arg(long)]
    detect_cycles: bool,

    /// Spaces per indentation level (0 writes compact output)
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Omit the XML declaration
    #[arg(long)]
    no_declaration: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("Arguments: {:?}", cli);

    if let Err(err) = run(&cli) {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let composed = compose(&cli.root, config, cli.indent, !cli.no_declaration)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &composed).with_context(|| format!("Cannot write {}", path.display()))?;
            info!(output = %path.display(), bytes = composed.len(), "composed document written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&composed).context("Cannot write to stdout")?;
            stdout.flush().context("Cannot write to stdout")?;
        }
    }
    Ok(())
}

/// Options from the config file, if any, with command-line flags on top.
fn resolve_config(cli: &Cli) -> Result<SpliceConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SpliceConfig::default(),
    };
    if let Some(marker) = &cli.marker {
        config = config.with_marker(marker.as_str());
    }
    if let Some(attribute) = &cli.ref_attribute {
        config = config.with_ref_attribute(attribute.as_str());
    }
    if let Some(depth) = cli.max_depth {
        config = config.with_max_depth(depth);
    }
    if cli.detect_cycles {
        config = config.with_cycle_detection(true);
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<SpliceConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("Cannot read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Compose `root` into a buffer of serialized XML.
fn compose(root: &Path, config: SpliceConfig, indent: usize, declaration: bool) -> Result<Vec<u8>> {
    let composer = Composer::files().with_config(config);
    let resource = composer.resolver().root(root);

    let writer = if indent == 0 {
        XmlWriter::new(Vec::new())
    } else {
        XmlWriter::indented(Vec::new(), indent)
    };
    let mut writer = writer.with_declaration(declaration);
    composer.compose(&resource, &mut writer)?;
    Ok(writer.into_inner())
}
