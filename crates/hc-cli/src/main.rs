use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hc_agents::{AnswerService, HelpDesk};
use hc_core::{ProgressHandler, Provider};
use hc_providers::OpenAIProvider;
use hc_tools::{DomainConfig, SearchProvider, SerperClient};

mod chat;
mod config;
mod interface;
mod setup;

use chat::{format_error, EXAMPLE_QUESTIONS};
use config::{CliOverrides, Config};
use interface::StatusPrinter;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose
    Trace,
    /// Model requests, tool calls and stage transitions
    Debug,
    /// Pipeline completions and quality verdicts
    Info,
    /// Quiet: only warnings and errors
    Warn,
    /// Minimal: only errors
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser)]
#[command(name = "hc")]
#[command(author, version, about = "SEAMEO SPAFA help center assistant", long_about = None)]
pub struct Cli {
    /// Ask a single question and print the answer
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Model to use (overrides OPENAI_MODEL and config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Temperature (0.0-2.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate per model call
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// JSON file with the allowed search domains
    #[arg(long)]
    pub domains: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Enable debug logging (shorthand for --log-level debug)
    #[arg(short, long)]
    pub debug: bool,

    /// Write logs to file (JSON-lines format)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            domains_file: self.domains.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective configuration (API keys masked)
    Config,
    /// List the example questions
    Examples,
    /// Create ~/.config/hc/config.toml and a default domain file
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env must be loaded before configuration reads the environment
    let _ = dotenvy::dotenv();

    let interactive = cli.prompt.is_none() && cli.command.is_none();

    // Resolve log level: --debug overrides --log-level
    let log_level = if cli.debug {
        LogLevel::Debug
    } else {
        cli.log_level
    };
    let filter = EnvFilter::new(log_level.as_filter());

    if let Some(log_path) = &cli.log_file {
        let file = std::fs::File::create(log_path)
            .with_context(|| format!("Failed to create log file: {:?}", log_path))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::sync::Mutex::new(file)))
            .init();
    } else if interactive {
        // Chat mode without log file: keep the terminal clean
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Some(Commands::Setup) => setup::run(),
        Some(Commands::Config) => show_config(&Config::load(&cli.overrides())?),
        Some(Commands::Examples) => {
            list_examples();
            Ok(())
        }
        None => {
            let config = Config::load(&cli.overrides())?;
            if let Some(prompt) = &cli.prompt {
                completion_mode(&config, prompt).await
            } else {
                chat_mode(&config).await
            }
        }
    }
}

/// Build the pipeline from configuration.
fn build_help_desk(config: &Config, progress: Option<Arc<dyn ProgressHandler>>) -> Result<HelpDesk> {
    let domains_path = config.domains_path();
    let domains = DomainConfig::load(&domains_path)
        .with_context(|| format!("Failed to load search domains from {}", domains_path.display()))?;

    let openai_key = config.openai_api_key.clone().unwrap_or_default();
    let mut openai = OpenAIProvider::new(openai_key).with_default_model(&config.model);
    if let Some(base_url) = &config.openai_base_url {
        openai = openai.with_base_url(base_url);
    }
    let provider: Arc<dyn Provider> = Arc::new(openai);

    let serper_key = config.serper_api_key.clone().unwrap_or_default();
    let mut serper = SerperClient::new(serper_key).with_num_results(config.num_results);
    if let Some(base_url) = &config.serper_base_url {
        serper = serper.with_base_url(base_url);
    }
    let search: Arc<dyn SearchProvider> = Arc::new(serper);

    tracing::debug!(
        model = %config.model,
        domains = ?domains.search_domains,
        num_results = config.num_results,
        "Help desk configured"
    );

    let mut desk = HelpDesk::new(provider, search, domains)
        .with_settings(config.model_settings())
        .with_max_iterations(config.max_iterations);
    if let Some(progress) = progress {
        desk = desk.with_progress(progress);
    }
    Ok(desk)
}

async fn completion_mode(config: &Config, question: &str) -> Result<()> {
    let missing = config.missing_credentials();
    if !missing.is_empty() {
        eprintln!("{}", setup::setup_message(&missing));
        std::process::exit(1);
    }

    let desk = build_help_desk(config, None)?;

    let validation = desk.validate(question);
    if !validation.valid {
        eprintln!("❌ {}", validation.message);
        std::process::exit(1);
    }

    let result = desk.process(question).await;
    match result.answer {
        Some(answer) if result.success => {
            println!("{}", answer);
            Ok(())
        }
        _ => {
            eprintln!("{}", format_error(result.error.as_deref().unwrap_or("Unknown error")));
            std::process::exit(1);
        }
    }
}

async fn chat_mode(config: &Config) -> Result<()> {
    let missing = config.missing_credentials();
    if !missing.is_empty() {
        println!("{}", setup::setup_message(&missing));
        return Ok(());
    }

    let progress: Arc<dyn ProgressHandler> = Arc::new(StatusPrinter);
    let service: Arc<dyn AnswerService> = Arc::new(build_help_desk(config, Some(progress))?);
    chat::run_chat(service).await
}

fn show_config(config: &Config) -> Result<()> {
    println!("# Configuration file: {}", Config::config_path()?.display());
    println!("# Domain file: {}\n", config.domains_path().display());
    print!("{}", config.to_display_toml()?);

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        println!("\n# Missing: {}", missing.join(", "));
    }
    Ok(())
}

fn list_examples() {
    println!("Example questions:");
    for (i, question) in EXAMPLE_QUESTIONS.iter().enumerate() {
        println!("  {}. {}", i + 1, question);
    }
}
