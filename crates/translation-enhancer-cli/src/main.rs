//! Translation Enhancer CLI - translate, score and speak sentences from the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use translation_enhancer_core::{
    AppConfig, ConfigOverrides, QualityScore, TranslationEnhancer, TranslationRequest,
    TranslationResult,
};

#[derive(Parser, Debug)]
#[command(name = "translation-enhancer")]
#[command(author, version, about = "Translate sentences, score them with BLEURT and read them aloud", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Model hub base URL
    #[arg(long, env = "HF_HUB_URL", global = true)]
    hub_url: Option<String>,

    /// Inference API base URL
    #[arg(long, env = "HF_INFERENCE_URL", global = true)]
    inference_url: Option<String>,

    /// Access token for the hub and inference API
    #[arg(long, env = "HF_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// BLEURT scoring endpoint
    #[arg(long, env = "BLEURT_ENDPOINT", global = true)]
    scorer_endpoint: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available languages
    Languages,

    /// List languages a source language can be translated into
    Targets {
        /// Source language name (e.g., "English")
        source: String,
    },

    /// Translate a sentence and score the translation
    Translate {
        /// Source language name
        #[arg(short = 's', long)]
        source: String,

        /// Target language name
        #[arg(short = 't', long)]
        target: String,

        /// Read the translation aloud
        #[arg(long)]
        speak: bool,

        /// Text to translate
        text: String,
    },

    /// Read text aloud
    Speak {
        text: String,
    },

    /// Show the score legend
    Legend,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            hub_url: self.hub_url.clone(),
            inference_url: self.inference_url.clone(),
            api_token: self.token.clone(),
            scorer_endpoint: self.scorer_endpoint.clone(),
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed}] {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Render a result the way the web UI labels it
fn describe(result: &TranslationResult) -> String {
    match result.quality {
        QualityScore::Score(score) => match result.quality.band() {
            Some(band) => format!("BLEURT score: {score} ({band})"),
            None => format!("BLEURT score: {score}"),
        },
        QualityScore::Unavailable(ref message) => message.clone(),
    }
}

// CLI output is intentional
#[allow(clippy::print_stdout)]
async fn run(args: Args) -> Result<ExitCode> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };
    config.apply_overrides(args.overrides());

    let enhancer =
        TranslationEnhancer::new(&config).context("Failed to initialize translation enhancer")?;

    match args.command {
        Command::Languages => {
            for language in enhancer.languages() {
                println!("{:<10} {}", language.name, language.code);
            }
        }
        Command::Targets { source } => {
            for target in enhancer.valid_targets(&source) {
                println!("{target}");
            }
        }
        Command::Translate {
            source,
            target,
            speak,
            text,
        } => {
            info!("Translating {} → {}", source, target);
            let pb = spinner(&format!("Translating {source} → {target}"));
            let request = TranslationRequest::new(text, source, target);
            let outcome = enhancer.translate(&request).await;
            pb.finish_and_clear();

            let result = outcome.unwrap_or_else(TranslationResult::from);
            if !result.translated_text.is_empty() {
                println!("{}", result.translated_text);
            }
            println!("{}", describe(&result));

            if !result.is_success() {
                return Ok(ExitCode::FAILURE);
            }
            if speak {
                enhancer.speak(&result.translated_text).await;
            }
        }
        Command::Speak { text } => {
            enhancer.speak(&text).await;
        }
        Command::Legend => {
            print!("{}", enhancer.legend());
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    run(args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_translate() {
        let args = Args::try_parse_from([
            "translation-enhancer",
            "translate",
            "-s",
            "English",
            "-t",
            "Spanish",
            "--speak",
            "Hello",
        ])
        .unwrap();

        match args.command {
            Command::Translate {
                source,
                target,
                speak,
                text,
            } => {
                assert_eq!(source, "English");
                assert_eq!(target, "Spanish");
                assert!(speak);
                assert_eq!(text, "Hello");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = Args::try_parse_from([
            "translation-enhancer",
            "--scorer-endpoint",
            "http://scorer:9000/score",
            "--hub-url",
            "http://hub.local",
            "legend",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        config.apply_overrides(args.overrides());
        assert_eq!(config.scorer.endpoint, "http://scorer:9000/score");
        assert_eq!(config.model_store.hub_url, "http://hub.local");
    }

    #[test]
    fn test_describe_failure_shows_message() {
        let result = TranslationResult::failed("Missing input.");
        assert_eq!(describe(&result), "Missing input.");
    }

    #[test]
    fn test_describe_score_shows_band() {
        let result = TranslationResult {
            translated_text: "Hola".to_string(),
            quality: QualityScore::Score(0.65),
            model: None,
        };
        assert_eq!(describe(&result), "BLEURT score: 0.65 (Good, minor issues)");
    }
}
