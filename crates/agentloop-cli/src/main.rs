//! agentloop command line host
//!
//! Loads configuration, registers the built-in tools and runs each query
//! through one shared conversation.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;

use agentloop_core::tools::builtin::{register_builtin_tools, SystemClock};
use agentloop_core::{
    create_gateway, Agent, AgentConfig, AgentOptions, CancellationToken, ConfigError,
    ConsoleLogger, ConversationError, GatewayError, SharedLogger, ToolError, ToolRegistry,
    TurnOutcome,
};

use cli::Cli;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Gateway(#[from] GatewayError),
    #[error("{0}")]
    Tool(#[from] ToolError),
    #[error("{0}")]
    Conversation(#[from] ConversationError),
}

fn build_registry(logger: SharedLogger) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new(logger);
    register_builtin_tools(&mut registry, Arc::new(SystemClock))?;
    Ok(registry)
}

fn build_agent(config: &AgentConfig, logger: SharedLogger) -> Result<Agent, CliError> {
    let registry = build_registry(Arc::clone(&logger))?;
    let gateway = create_gateway(config, Arc::clone(&logger))?;

    let mut agent = Agent::new(gateway, Arc::new(registry), logger)
        .with_options(AgentOptions::from(config));
    if let Some(prompt) = &config.system_prompt {
        agent.set_system_prompt(prompt.clone())?;
    }
    Ok(agent)
}

/// Run one query; Ctrl-C cancels it
async fn run_query(agent: &mut Agent, query: &str) -> TurnOutcome {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let outcome = agent.run_turn_with_cancel(query, &cancel).await;
    watcher.abort();
    outcome
}

async fn run(cli: Cli) -> Result<bool, CliError> {
    let logger: SharedLogger = Arc::new(ConsoleLogger::new().with_level(cli.log_level()));

    if cli.list_tools {
        for tool in build_registry(logger)?.list() {
            println!("{:<18} {}", tool.name(), tool.description());
        }
        return Ok(true);
    }

    let config = cli.loader().load()?;
    let mut agent = build_agent(&config, logger)?;
    println!("Using {} ({})", config.model, config.provider);

    let mut all_ok = true;
    for query in cli.queries() {
        println!("\nUser: {}", query);
        match run_query(&mut agent, &query).await.into_result() {
            Ok(answer) => println!("Assistant: {}", answer),
            Err(e) => {
                all_ok = false;
                eprintln!("Error: {}", e);
            }
        }
    }
    Ok(all_ok)
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
