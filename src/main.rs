use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

mod application;
mod domain;
mod infrastructure;
#[cfg(test)]
mod test_support;

use application::commands::{default_registry, CommandDeps};
use application::errors::{BotError, ConversationError};
use application::functions::FunctionTable;
use application::messaging::{EventRouter, MessageDispatcher};
use application::services::ConversationService;
use domain::entities::{InboundEvent, User};
use domain::traits::{ChatGateway, Store};
use infrastructure::adapters::ConsoleAdapter;
use infrastructure::config::Config;
use infrastructure::database::SqliteStore;
use infrastructure::llm::{OpenAIProvider, LLM};
use infrastructure::services::{AmapClient, EmojiClient};
use infrastructure::storage::MemoryStore;

#[derive(Parser)]
#[command(name = "wechatgpt")]
#[command(about = "Chat bot that routes messages to commands or to an LLM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// LLM API key (overrides config and environment)
    #[arg(long)]
    api_key: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.api_key),
        Commands::Version => {
            println!("wechatgpt v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str, api_key: Option<String>) -> Result<Config, BotError> {
    // A file that exists but does not parse is fatal; only a missing file falls back
    let mut config = if std::path::Path::new(path).exists() {
        Config::load(path)?
    } else {
        tracing::info!("No config at {}, using defaults and environment", path);
        Config::load_env()
    };

    if let Some(key) = api_key {
        config.llm.api_key = Some(key);
    }
    config.validate()?;
    Ok(config)
}

fn run_bot(config_path: &str, api_key: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path, api_key)?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    let result = rt.block_on(serve(config));
    // stdin reads run on a blocking thread that never finishes by itself
    rt.shutdown_timeout(Duration::from_secs(1));
    result
}

async fn open_store(config: &Config) -> Result<Arc<dyn Store>, BotError> {
    if !config.database.enabled {
        tracing::info!("Persistence disabled, keeping exchanges in memory");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = if config.database.in_memory() {
        SqliteStore::open_in_memory()?
    } else {
        SqliteStore::open(&config.database.path)?
    };
    store.ensure_schema().await?;
    tracing::info!("Database ready at {}", config.database.path.display());
    Ok(Arc::new(store))
}

async fn serve(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting wechatgpt: {}", config.bot.name);

    let store = open_store(&config).await?;

    let provider = OpenAIProvider::from_config(&config.llm).map_err(ConversationError::from)?;
    let functions = FunctionTable::with_defaults();
    tracing::info!(
        "LLM provider {} using {}, {} local function(s)",
        provider.name(),
        config.llm.model(),
        functions.len()
    );
    let llm: Arc<dyn LLM> = Arc::new(provider);
    let conversation = Arc::new(ConversationService::from_config(llm, functions, &config.llm));

    let console_config = config.console();
    if !console_config.enabled {
        return Err(BotError::Gateway("no chat adapter enabled".to_string()));
    }
    let console_user = User::new("console")
        .with_nickname("you")
        .with_locality(console_config.region, console_config.city);
    let console = Arc::new(ConsoleAdapter::new(&config.bot.name, console_user));
    let gateway: Arc<dyn ChatGateway> = console.clone();
    gateway.start().await?;
    let info = gateway.info();
    tracing::info!("Connected to {} as {} ({})", info.platform, info.name, info.id);

    let timeout = Duration::from_secs(config.services.timeout_seconds);
    let amap_key = config.services.amap_key.clone().unwrap_or_else(|| {
        tracing::warn!("No Amap key configured; /weather will not find any region");
        String::new()
    });
    let weather = AmapClient::new(amap_key, timeout).map_err(|e| BotError::Network(e.to_string()))?;
    let pictures =
        EmojiClient::new(&config.services.emoji_api, timeout).map_err(|e| BotError::Network(e.to_string()))?;

    let registry = default_registry(CommandDeps {
        gateway: gateway.clone(),
        weather: Arc::new(weather),
        pictures: Arc::new(pictures),
        default_location: config.services.default_location.clone(),
        scratch_dir: config.services.scratch_dir.clone(),
    })?;
    tracing::info!("Registered {} commands", registry.len());
    for name in registry.names() {
        if let Ok(command) = registry.lookup(name) {
            tracing::info!("  {}: {}", name, command.description());
        }
    }

    let dispatcher = MessageDispatcher::new(&config.bot.prefix, Arc::new(registry), conversation, store)
        .with_fallback_reply(&config.bot.fallback_reply);
    let router = Arc::new(EventRouter::standard(Arc::new(dispatcher)));
    tracing::debug!("{} event routes", router.len());

    let (tx, mut rx) = mpsc::channel::<InboundEvent>(64);
    let listener = {
        let console = console.clone();
        tokio::spawn(async move {
            if let Err(e) = console.listen(tx).await {
                tracing::error!("Console listener stopped: {}", e);
            }
        })
    };
    println!("wechatgpt is listening. Type a message, 'group: ...' or 'friend: <name> <greeting>'.");

    let mut tasks = JoinSet::new();
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    tasks.spawn(handle_event(router.clone(), gateway.clone(), event));
                }
                None => break,
            },
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    tracing::error!("Event task failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    listener.abort();
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Event task failed: {}", e);
        }
    }
    Ok(())
}

async fn handle_event(router: Arc<EventRouter>, gateway: Arc<dyn ChatGateway>, event: InboundEvent) {
    let Some(reply) = router.route(&event).await else {
        return;
    };
    let Some(conversation_id) = event.conversation_id() else {
        return;
    };
    if reply.is_empty() {
        return;
    }

    if let Err(e) = gateway.send_text(conversation_id, &reply).await {
        tracing::warn!("[{}] failed to send reply: {}", conversation_id, e);
    }
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
