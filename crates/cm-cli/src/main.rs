use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cm_core::{ThoughtProjector, WireRecord};
use cm_store::{AgentConfig, MemoryStore, config_file, default_base_dir, memory_file, paths};

#[derive(Parser)]
#[command(name = "cm", about = "Cognitive memory CLI - remember, recall, forget")]
struct Cli {
    /// Agent whose memories to use (default: the shared store)
    #[arg(long, global = true)]
    agent: Option<String>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a memory
    Remember {
        /// What was said
        input: String,

        /// What the agent answered
        #[arg(long, default_value = "")]
        response: String,

        /// How much this memory matters, 0 to 1
        #[arg(long, default_value_t = 0.5)]
        importance: f64,
    },

    /// Search memories by meaning
    Recall {
        /// Query text
        query: String,

        /// Maximum number of matches
        #[arg(long)]
        top_k: Option<usize>,

        /// Minimum cosine similarity
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<f32>,
    },

    /// Print every stored memory
    List {
        /// Emit raw JSON records
        #[arg(long)]
        json: bool,
    },

    /// Show store statistics
    Status,

    /// Delete the agent's memory file
    Forget,
}

fn base_dir() -> PathBuf {
    std::env::var("CM_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(default_base_dir)
}

fn open_store(cli: &Cli) -> (MemoryStore, AgentConfig) {
    let base = base_dir();
    let config = AgentConfig::load(&config_file(&base));
    let agent = cli.agent.as_deref().unwrap_or("");
    let store = MemoryStore::with_capacity(memory_file(&base, agent), config.capacity);
    (store, config)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Remember {
            input,
            response,
            importance,
        } => cmd_remember(&cli, input, response, *importance),
        Commands::Recall {
            query,
            top_k,
            threshold,
        } => cmd_recall(&cli, query, *top_k, *threshold),
        Commands::List { json } => cmd_list(&cli, *json),
        Commands::Status => cmd_status(&cli),
        Commands::Forget => cmd_forget(&cli),
    }
}

fn cmd_remember(cli: &Cli, input: &str, response: &str, importance: f64) -> Result<()> {
    let (store, _) = open_store(cli);
    let projector = ThoughtProjector::default();

    let vector = projector.project_text(input);
    let id = store
        .save(vector, input, response, importance)
        .context("failed to save memory")?;

    println!("remembered {id}");
    if cli.verbose {
        eprintln!("--- store: {} ---", store.path().display());
    }
    Ok(())
}

fn cmd_recall(cli: &Cli, query: &str, top_k: Option<usize>, threshold: Option<f32>) -> Result<()> {
    let (store, config) = open_store(cli);
    let projector = ThoughtProjector::default();

    let top_k = top_k.unwrap_or(config.recall_top_k);
    let threshold = threshold.unwrap_or(config.recall_threshold);

    let query_vector = projector.project_text(query);
    let hits = store
        .recall(&query_vector, top_k, threshold)
        .context("failed to search memories")?;

    if hits.is_empty() {
        println!("(no memories found)");
    } else {
        for (i, (record, similarity)) in hits.iter().enumerate() {
            println!(
                "{}. [{similarity:.3}] {} → {}",
                i + 1,
                record.user_input,
                record.response
            );
        }
    }

    if cli.verbose {
        eprintln!(
            "--- recall: top_k={top_k} threshold={threshold} hits={} ---",
            hits.len()
        );
    }
    Ok(())
}

fn cmd_list(cli: &Cli, json: bool) -> Result<()> {
    let (store, _) = open_store(cli);
    let records = store.load().context("failed to load memories")?;

    if json {
        let wire: Vec<WireRecord> = records.iter().map(WireRecord::from_record).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&wire).context("failed to serialize records")?
        );
        return Ok(());
    }

    if records.is_empty() {
        println!("(no memories stored)");
        return Ok(());
    }
    for record in &records {
        println!(
            "{}  [{:.2}]  {} → {}",
            record.timestamp, record.importance, record.user_input, record.response
        );
    }
    Ok(())
}

fn cmd_status(cli: &Cli) -> Result<()> {
    let (store, config) = open_store(cli);
    let count = store.len().context("failed to load memories")?;
    let size = std::fs::metadata(store.path()).map(|m| m.len()).unwrap_or(0);
    let agent = paths::sanitize_name(cli.agent.as_deref().unwrap_or(""));

    println!("agent:      {agent}");
    println!("file:       {}", store.path().display());
    println!("memories:   {count}");
    println!("capacity:   {}", store.capacity());
    println!("size:       {size} bytes");
    println!("persona:    {}", config.persona);
    Ok(())
}

fn cmd_forget(cli: &Cli) -> Result<()> {
    let (store, _) = open_store(cli);
    let count = store.len().context("failed to load memories")?;
    store.clear().context("failed to clear store")?;

    println!("forgot {count} memories");
    Ok(())
}
