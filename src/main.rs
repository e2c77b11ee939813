use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eve_wiki_mcp::config::{Config, Transport};
use eve_wiki_mcp::mcp;
use eve_wiki_mcp::planning::generate_plan_with_context;
use eve_wiki_mcp::server::{self, state::AppState};
use eve_wiki_mcp::tools::ToolRegistry;
use eve_wiki_mcp::wiki::client::WikiClient;
use eve_wiki_mcp::wiki::WikiApi;

#[derive(Parser)]
#[command(name = "eve-wiki-mcp")]
#[command(version, about = "MCP server for the EVE University Wiki", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the wiki tools over MCP stdio or HTTP
    Serve {
        /// stdio or http (default: from config)
        #[arg(long)]
        transport: Option<Transport>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a newbro mining plan
    Plan {
        /// Hours per play session
        #[arg(long)]
        hours: Option<f64>,
        /// Sessions per week
        #[arg(long)]
        sessions: Option<i64>,
        /// Starting ISK
        #[arg(long)]
        isk: Option<i64>,
        /// Ships, modules and skills already owned
        #[arg(long)]
        assets: Option<String>,
        /// What happened last session
        #[arg(long)]
        outcome: Option<String>,
        #[arg(long)]
        questions: Option<String>,
        /// Also dump the gathered wiki context to stderr
        #[arg(long)]
        show_context: bool,
    },
    /// List available tools
    Tools,
    /// Show or write the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the MCP stdio transport
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eve_wiki_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            transport,
            host,
            port,
        } => {
            let mut config = Config::load()?;
            if let Some(transport) = transport {
                config.server.transport = transport;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Plan {
            hours,
            sessions,
            isk,
            assets,
            outcome,
            questions,
            show_context,
        } => {
            let mut args = Map::new();
            if let Some(hours) = hours {
                args.insert("hours_per_session".into(), hours.into());
            }
            if let Some(sessions) = sessions {
                args.insert("sessions_per_week".into(), sessions.into());
            }
            if let Some(isk) = isk {
                args.insert("starting_isk".into(), isk.into());
            }
            if let Some(assets) = assets {
                args.insert("current_assets".into(), assets.into());
            }
            if let Some(outcome) = outcome {
                args.insert("recent_outcome".into(), outcome.into());
            }
            if let Some(questions) = questions {
                args.insert("questions".into(), questions.into());
            }
            run_plan(Value::Object(args), show_context).await?;
        }
        Commands::Tools => {
            for tool in ToolRegistry::new().tools() {
                println!("{:<30} {}", tool.name(), tool.description());
            }
        }
        Commands::Config { show } => {
            handle_config(show)?;
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let registry = Arc::new(ToolRegistry::new());
    let wiki: Arc<dyn WikiApi> = Arc::new(WikiClient::new(&config.wiki)?);

    match config.server.transport {
        Transport::Stdio => mcp::serve_stdio(registry, wiki).await,
        Transport::Http => {
            let state = Arc::new(AppState::new(registry, wiki, &config.server));
            server::start_server(&config.server, state).await
        }
    }
}

async fn run_plan(arguments: Value, show_context: bool) -> Result<()> {
    let config = Config::load()?;
    let wiki = WikiClient::new(&config.wiki)?;

    let (plan, context) = generate_plan_with_context(&wiki, &arguments).await?;

    if show_context {
        for candidate in &context.ranked_candidates {
            eprintln!("[{}] {} {}", candidate.score, candidate.title, candidate.url);
        }
        for (title, summary) in &context.summaries {
            eprintln!("\n== summary: {} ==\n{}", title, summary);
        }
        for (title, snippet) in &context.page_snippets {
            eprintln!("\n== snippet: {} ==\n{}", title, snippet);
        }
        for failure in &context.errors {
            eprintln!("failed: {}", failure);
        }
        eprintln!();
    }

    println!("{}", plan);
    Ok(())
}

fn handle_config(show: bool) -> Result<()> {
    let path = Config::config_path()?;

    if show {
        let config = Config::load()?;
        println!("Config file: {}", path.display());
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    if path.exists() {
        println!("Config already exists at {}", path.display());
    } else {
        Config::default().save()?;
        println!("✓ Wrote default configuration to {}", path.display());
    }
    Ok(())
}
