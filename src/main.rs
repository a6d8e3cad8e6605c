//! deepl - DeepL Translator CLI without API key.
//!
//! Reads text from a file or stdin, translates it through the DeepL web
//! translator in a headless browser and prints the result.

mod cli;

use std::error::Error;
use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use deepl_config::{ConfigLoader, ConfigValidator, LoggingConfig};
use deepl_translator::{DeepL, TranslatorOptions};

use crate::cli::Cli;

/// Initialize tracing on stderr, plus a daily rolling file when a log
/// directory is configured.
fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(&logging.level)
        }
    });

    let file_layer = match &logging.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("deepl")
                .filename_suffix("log")
                .max_log_files(7)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keeps the writer flushing until exit.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::load_default()?,
    };
    cli.apply(&mut config);

    init_tracing(&config.logging, cli.verbose)?;

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("{}: {}", warning.path, warning.message);
    }

    let script = read_script(&cli)?;
    let deepl = DeepL::new(&cli.fr, &cli.to, TranslatorOptions::from(&config))?;
    let translation = deepl.translate_async(&script)?;

    debug!(
        source = %cli.fr,
        target = %cli.to,
        chars = script.chars().count(),
        "Translating"
    );
    if cli.verbose {
        eprint!("Translating...");
        std::io::stderr().flush()?;
    }

    let result = translation.await;

    if cli.verbose {
        // Erase the progress line.
        eprint!("\x1b[1K\x1b[G");
        std::io::stderr().flush()?;
    }

    let result = result?;
    if cli.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", result);
    }

    Ok(())
}

fn read_script(cli: &Cli) -> Result<String, Box<dyn Error>> {
    let mut script = String::new();
    match &cli.file {
        Some(path) => {
            script = std::fs::read_to_string(path)
                .map_err(|e| format!("{}: {}", path.display(), e))?;
        }
        None => {
            std::io::stdin().read_to_string(&mut script)?;
        }
    }
    Ok(script)
}
