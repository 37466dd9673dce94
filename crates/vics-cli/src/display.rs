//! Terminal rendering for the CLI

use console::style;
use vics_core::{AgentConfig, AgentEvent, EventSink, ProviderKind, ToolRegistry};

pub const BANNER: &str = r#"
 ██╗   ██╗██╗ ██████╗███████╗     █████╗  ██████╗ ███████╗███╗   ██╗████████╗
 ██║   ██║██║██╔════╝██╔════╝    ██╔══██╗██╔════╝ ██╔════╝████╗  ██║╚══██╔══╝
 ██║   ██║██║██║     ███████╗    ███████║██║  ███╗█████╗  ██╔██╗ ██║   ██║
 ╚██╗ ██╔╝██║██║     ╚════██║    ██╔══██║██║   ██║██╔══╝  ██║╚██╗██║   ██║
  ╚████╔╝ ██║╚██████╗███████║    ██║  ██║╚██████╔╝███████╗██║ ╚████║   ██║
   ╚═══╝  ╚═╝ ╚═════╝╚══════╝    ╚═╝  ╚═╝ ╚═════╝ ╚══════╝╚═╝  ╚═══╝   ╚═╝
"#;

/// Prints agent progress to the terminal
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: &AgentEvent) {
        match event {
            AgentEvent::IterationStarted { iteration, max_iterations } => {
                if self.verbose {
                    println!(
                        "{}",
                        style(format!("── iteration {}/{} ──", iteration, max_iterations)).dim()
                    );
                }
            }
            AgentEvent::AssistantText { text } => {
                println!("{}", style(text).cyan());
            }
            AgentEvent::ToolStarted { name, summary, .. } => {
                println!("  {}({})", style(format!("⚡ {}", name)).yellow(), summary);
            }
            AgentEvent::ToolFinished { result, .. } => {
                println!("  {}", style(format!("→ {}", result)).dim());
            }
            AgentEvent::Finished { text, .. } => {
                if !text.is_empty() {
                    println!();
                    println!("{}", style("Vics Agent").bold().cyan());
                    println!("{}", style("─".repeat(60)).dim());
                    println!("{}", text);
                    println!("{}", style("─".repeat(60)).dim());
                }
            }
            AgentEvent::IterationLimitReached { message, .. } => {
                println!("{}", style(message).red());
            }
        }
    }
}

pub fn show_banner(config: &AgentConfig, workspace: &str) {
    println!("{}", style(BANNER).cyan());
    println!("{}", style("⚙ Configuration").bold());
    println!(
        "  {} {}  |  {} {}  |  {} {}",
        style("Provider:").bold(),
        config.llm.provider,
        style("Model:").bold(),
        config.llm.model,
        style("Workspace:").bold(),
        workspace
    );
    println!();
    println!(
        "{}",
        style("Type your request. Use 'quit' to exit, 'reset' to clear history.").dim()
    );
    println!();
}

pub fn show_tools() -> vics_core::Result<()> {
    println!("{}", style("Available Tools:").bold());
    println!();

    for def in ToolRegistry::standard()?.definitions() {
        // First sentence only
        let summary = def
            .description
            .split_once(". ")
            .map(|(first, _)| format!("{}.", first))
            .unwrap_or_else(|| def.description.clone());
        println!("  {:<20} {}", style(&def.name).cyan(), summary);
    }
    Ok(())
}

pub fn show_config(config: &AgentConfig, config_path: Option<&str>) {
    println!("{}", style("Configuration:").bold());
    println!();
    println!("  Provider:       {}", style(config.llm.provider).green());
    println!("  Model:          {}", style(&config.llm.model).green());
    println!("  API key:        {}", config.llm.masked_api_key());
    println!("  Base URL:       {}", config.llm.base_url());
    println!("  Temperature:    {}", config.llm.temperature);
    println!("  Max tokens:     {}", config.llm.max_tokens);
    println!("  Max iterations: {}", config.max_iterations);
    println!("  Workspace:      {}", style(config.workspace.display()).green());
    println!(
        "  Shell denylist: {} patterns",
        config.command_policy().patterns().len()
    );
    println!(
        "  Config file:    {}",
        style(config_path.unwrap_or("(none)")).dim()
    );
}

pub fn show_missing_key() {
    eprintln!(
        "{} Set {} or {} in your environment or .env file.",
        style("No API key found!").red().bold(),
        style(ProviderKind::OpenAI.api_key_env()).cyan(),
        style(ProviderKind::Anthropic.api_key_env()).cyan()
    );
}

pub fn show_error(message: impl std::fmt::Display) {
    eprintln!("{}", style(format!("Error: {}", message)).red());
}

pub fn show_dim(message: &str) {
    println!("{}", style(message).dim());
}
