use anyhow::Context;
use clap::{Parser, Subcommand};
use deck_core::{
    parse_fragments, Assembler, DeckConfig, FragmentStore, IntegrityReport, Skeleton, Validator,
};
use deck_files::{read_text, write_atomic};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming a config file when `--config` is not given.
const CONFIG_ENV_VAR: &str = "DECK_CONFIG";

const EXIT_INVALID: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "deck")]
#[command(about = "Assemble numbered slide fragments into one deck and check its structure")]
struct Cli {
    /// YAML config file (defaults to $DECK_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Splice fragment sources into a skeleton and write the deck
    Assemble {
        /// Skeleton document containing the splice marker once
        #[arg(long)]
        skeleton: PathBuf,
        /// Deck to create or replace
        #[arg(long, short)]
        output: PathBuf,
        /// Fragment sources, each holding one or more marked slides
        fragments: Vec<PathBuf>,
        /// Splice marker (overrides config)
        #[arg(long)]
        splice_marker: Option<String>,
        /// Keep the splice marker text after the spliced slides
        #[arg(long)]
        retain_marker: bool,
        /// Deck size (overrides config)
        #[arg(long)]
        deck_size: Option<u32>,
        /// Validate the written deck and fail if it is invalid
        #[arg(long)]
        check: bool,
    },
    /// Check a deck for missing, duplicate, unbalanced and misplaced slides
    Validate {
        /// Deck document
        document: PathBuf,
        /// Expected slide count (overrides config)
        #[arg(long)]
        expected: Option<u32>,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("deck=info,deck_core=info,deck_files=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = resolve_config(cli.config)?;

    match cli.command {
        Commands::Assemble {
            skeleton,
            output,
            fragments,
            splice_marker,
            retain_marker,
            deck_size,
            check,
        } => {
            let mut config = config;
            if let Some(marker) = splice_marker {
                config = config.with_splice_marker(marker)?;
            }
            if let Some(size) = deck_size {
                config = config.with_deck_size(size)?;
            }
            if retain_marker {
                config = config.with_retain_marker(true);
            }
            assemble(&config, &skeleton, &fragments, &output, check, cli.json)
        }
        Commands::Validate { document, expected } => {
            let config = match expected {
                Some(n) => config.with_deck_size(n)?,
                None => config,
            };
            let text = read_text(&document)?;
            let report = Validator::new(config.layout()).validate(&text);
            print_report(&report, cli.json)?;
            Ok(exit_for(&report))
        }
    }
}

fn resolve_config(flag: Option<PathBuf>) -> anyhow::Result<DeckConfig> {
    let path = flag.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
    match path {
        Some(path) => DeckConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(DeckConfig::default()),
    }
}

fn assemble(
    config: &DeckConfig,
    skeleton_path: &Path,
    sources: &[PathBuf],
    output: &Path,
    check: bool,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let skeleton_text = read_text(skeleton_path)?;
    let skeleton = Skeleton::parse_with(
        &skeleton_text,
        config.splice_marker(),
        config.marker_disposition(),
    )
    .with_context(|| format!("skeleton {}", skeleton_path.display()))?;

    let mut store = FragmentStore::new();
    for source in sources {
        let text = read_text(source)?;
        let origin = source.display().to_string();
        let batch = parse_fragments(&text, &origin)?;
        tracing::info!("{origin}: {} fragments", batch.len());
        store
            .extend(batch)
            .with_context(|| format!("fragment source {origin}"))?;
    }

    let document = Assembler::new(config.deck_size()).assemble(&skeleton, &store)?;
    let written = write_atomic(output, document.as_str())?;

    let report = check.then(|| Validator::new(config.layout()).validate(document.as_str()));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "ok": report.as_ref().map_or(true, IntegrityReport::is_valid),
                "data": {
                    "path": written.path.display().to_string(),
                    "fragments": store.len(),
                    "spans": document.fragments(),
                    "sha256": written.sha256.as_str(),
                    "size_bytes": written.size_bytes,
                    "report": report,
                }
            }))?
        );
    } else {
        println!(
            "assembled {} fragments into {} (sha256 {})",
            store.len(),
            written.path.display(),
            written.sha256
        );
        if let Some(report) = &report {
            print_report(report, false)?;
        }
    }

    Ok(report.as_ref().map_or(ExitCode::SUCCESS, exit_for))
}

fn print_report(report: &IntegrityReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "ok": report.is_valid(),
                "data": report,
            }))?
        );
    } else if report.is_valid() {
        println!("{}", report.summary());
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

fn exit_for(report: &IntegrityReport) -> ExitCode {
    if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    }
}
