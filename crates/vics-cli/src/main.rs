//! Vics CLI - autonomous coding agent for the command line
//!
//! Interactive chat, single-prompt mode, and inspection of the tool
//! catalog and resolved configuration.

mod display;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use vics_core::{build_agent, Agent, AgentConfig, Error, ProviderKind};

use display::ConsoleSink;

#[derive(Parser)]
#[command(name = "vics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Vics Agent - Coding your day away", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Workspace directory (default: ./workspace)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Override the model name
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// LLM provider (openai, anthropic)
    #[arg(short, long, global = true)]
    provider: Option<ProviderKind>,

    /// Maximum agent loop iterations per request
    #[arg(long, global = true)]
    max_iterations: Option<usize>,

    /// Show iteration markers and debug logs
    #[arg(long, global = true)]
    verbose: bool,

    /// Path to a config file (default: <config dir>/vics-agent/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat mode
    Chat,

    /// Run a single prompt and exit
    Ask {
        /// The request to send
        prompt: String,
    },

    /// Show available tools
    Tools,

    /// Show resolved configuration
    Config,
}

fn init_logging(verbose: bool) {
    // Logs go to stderr so they never interleave with answers on stdout.
    // Use --verbose for info/debug level logs; RUST_LOG overrides both.
    let default = if verbose { "info,vics_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Layer CLI flags over file and environment configuration
fn resolve_config(cli: &Cli) -> anyhow::Result<AgentConfig> {
    let mut config = AgentConfig::load(cli.config.as_deref())?;

    if let Some(provider) = cli.provider {
        config.select_provider(provider, |key| std::env::var(key).ok());
    }
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }
    if let Some(workspace) = &cli.workspace {
        config.workspace = workspace.clone();
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.max_iterations = max_iterations;
    }
    config.verbose = cli.verbose;

    config.validate()?;
    tracing::debug!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        workspace = %config.workspace.display(),
        "Configuration resolved"
    );
    Ok(config)
}

fn workspace_display(config: &AgentConfig) -> String {
    // Use dunce::canonicalize to avoid UNC path prefix on Windows (\\?\)
    dunce::canonicalize(&config.workspace)
        .unwrap_or_else(|_| config.workspace.clone())
        .display()
        .to_string()
}

/// Build the agent, exiting with status 1 when no API key is configured
fn create_agent(config: &AgentConfig) -> anyhow::Result<Agent> {
    if !config.llm.has_api_key() {
        display::show_missing_key();
        std::process::exit(1);
    }
    let agent = build_agent(config)?;
    Ok(agent.with_sink(Arc::new(ConsoleSink::new(config.verbose))))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolve_config(&cli)?;

    match cli.command {
        None | Some(Commands::Chat) => run_chat(&config).await,
        Some(Commands::Ask { ref prompt }) => run_ask(&config, prompt).await,
        Some(Commands::Tools) => {
            display::show_tools()?;
            Ok(())
        }
        Some(Commands::Config) => {
            let path = cli
                .config
                .clone()
                .or_else(|| AgentConfig::default_config_path().ok().filter(|p| p.exists()));
            display::show_config(&config, path.as_ref().and_then(|p| p.to_str()));
            Ok(())
        }
    }
}

async fn run_ask(config: &AgentConfig, prompt: &str) -> anyhow::Result<()> {
    let mut agent = create_agent(config)?;
    agent.run(prompt).await?;
    Ok(())
}

async fn run_chat(config: &AgentConfig) -> anyhow::Result<()> {
    let mut agent = create_agent(config)?;
    display::show_banner(config, &workspace_display(config));

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("You> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!();
                display::show_dim("Goodbye!");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                display::show_dim("Goodbye!");
                break;
            }
            "reset" => {
                agent.reset();
                display::show_dim("Conversation reset.");
                println!();
                continue;
            }
            _ => {}
        }

        println!();
        match agent.run(input).await {
            Ok(_) => {}
            Err(Error::Transport(e)) => display::show_error(e),
            Err(e) => return Err(e.into()),
        }
        println!();
    }

    Ok(())
}
