//! papermeta CLI - Batch metadata extraction for research papers
//!
//! Usage:
//!   papermeta extract <path>...
//!   papermeta interactive
//!   papermeta inspect <path>
//!
//! Author: hephaex@gmail.com

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use papermeta_core::{AppConfig, EngineConfig, EngineKind, LoggingConfig, SinkFormat};
use papermeta_extractor::{EntityEngine, RecordAssembler, RuleBasedEngine};
use papermeta_parser::ParserRegistry;

mod batch;
mod interactive;

use batch::BatchDriver;

#[derive(Parser)]
#[command(name = "papermeta")]
#[command(about = "Extract title, authors, date, conclusion, code link and topics from papers")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// File records are appended to
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Output format: csv or jsonl
    #[arg(short, long, global = true)]
    format: Option<SinkFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata from the given PDF or DOCX files
    Extract {
        /// Paths to documents
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Ask for a document count, then read one path per document from stdin
    Interactive,
    /// Print the record for one document as JSON without storing it
    Inspect {
        /// Path to the document
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_tracing(&config.logging);

    let assembler = RecordAssembler::new(build_engine(&config.engine))
        .with_config(config.extraction.clone());

    match cli.command {
        Commands::Inspect { path } => {
            // inspect never touches the sink
            let driver = BatchDriver::new(
                ParserRegistry::with_defaults(),
                assembler,
                Box::new(papermeta_sink::MemorySink::default()),
            );
            let record = driver.extract(&path)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Extract { paths } => {
            let mut driver = open_driver(&config, assembler)?;
            let report = driver.run(&paths);
            println!("{report}");
        }
        Commands::Interactive => {
            let mut driver = open_driver(&config, assembler)?;
            let stdin = std::io::stdin();
            let report = interactive::run_session(&mut driver, stdin.lock(), std::io::stdout())?;
            println!("{report}");
        }
    }

    Ok(())
}

/// File config (or defaults), then environment, then command-line flags
fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };

    if let Some(output) = &cli.output {
        config.sink.output = output.clone();
    }
    if let Some(format) = cli.format {
        config.sink.format = format;
    }

    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    // stdout is reserved for records and reports
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the entity engine once for the whole run
fn build_engine(config: &EngineConfig) -> Arc<dyn EntityEngine> {
    let engine: Arc<dyn EntityEngine> = match config.kind {
        EngineKind::Rules => Arc::new(RuleBasedEngine::new()),
    };
    tracing::info!(engine = engine.engine_id(), "entity engine loaded");
    engine
}

fn open_driver(config: &AppConfig, assembler: RecordAssembler) -> anyhow::Result<BatchDriver> {
    let sink = papermeta_sink::open_sink(&config.sink).with_context(|| {
        format!("failed to open record sink at {}", config.sink.output.display())
    })?;

    tracing::info!(
        output = %config.sink.output.display(),
        format = %config.sink.format,
        "record sink ready"
    );

    Ok(BatchDriver::new(ParserRegistry::with_defaults(), assembler, sink))
}
