use anyhow::Context;
use clap::{Parser, Subcommand};
use ra_core::{Scope, SpeechSynthesizer};
use ra_inference::{create_summarizer, OpenAiSpeech, SummaryCache};
use ra_reader::{Action, ActionReconciler, FeedAssembler, ReaderClient};
use ra_storage::MarkerStore;
use ra_web::{create_app, AppState};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod args;
mod duration;

use args::{FeedArgs, ReaderArgs, SpeechArgs, SummarizerArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Listen to your reading queue", long_about = None)]
pub struct Cli {
    /// Key-value store backend: memory or sqlite
    #[arg(long, default_value = "memory", global = true)]
    store: String,
    /// Database file for the sqlite store
    #[arg(long, global = true)]
    store_path: Option<String>,
    /// Summarizer: openai or extractive
    #[arg(long, default_value = "openai", global = true)]
    summarizer: String,
    #[command(flatten)]
    reader: ReaderArgs,
    #[command(flatten)]
    summarizer_args: SummarizerArgs,
    #[command(flatten)]
    speech: SpeechArgs,
    #[command(flatten)]
    feed: FeedArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the player and its API
    Serve {
        #[arg(long, default_value = "0.0.0.0:8787")]
        addr: String,
    },
    /// Assemble a feed and print it
    Sync {
        /// all, feed or library
        #[arg(long, default_value = "all")]
        location: Scope,
    },
    /// Archive an article
    Archive { id: String },
    /// Delete an article
    Delete { id: String },
    /// Hear an article again on the next sync
    Later { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = args::build_config(cli.reader, cli.summarizer_args, cli.speech, cli.feed);
    debug!("{:?}", config);

    let store = ra_storage::create_store(&cli.store, cli.store_path.as_deref())
        .await
        .with_context(|| format!("opening {} store", cli.store))?;
    info!("💾 Store ready (using {})", cli.store);

    let reader = Arc::new(ReaderClient::new(config.reader.clone()));
    let summarizer = create_summarizer(&cli.summarizer, &config.summarizer)?;
    info!("🧠 Summarizer ready (using {})", summarizer.name());

    let markers = MarkerStore::new(store.clone(), &config.feed);
    let cache = SummaryCache::new(store, summarizer, config.feed.summary_ttl);
    let feed = FeedAssembler::new(reader.clone(), markers.clone(), cache, &config);
    let actions = ActionReconciler::new(reader, markers);

    match cli.command {
        Commands::Serve { addr } => {
            let speech = config
                .speech
                .api_key
                .is_some()
                .then(|| Arc::new(OpenAiSpeech::new(config.speech.clone())) as Arc<dyn SpeechSynthesizer>);
            if speech.is_none() {
                info!("🔇 No TTS key, clients will use browser speech");
            }
            let app = create_app(AppState { feed, actions, speech });
            ra_web::serve(app, &addr)
                .await
                .with_context(|| format!("serving on {}", addr))?;
        }
        Commands::Sync { location } => {
            let response = feed.assemble(location).await?;
            println!(
                "{} of {} available articles ({})",
                response.articles.len(),
                response.total_available,
                response.location
            );
            for (n, item) in response.articles.iter().enumerate() {
                println!("\n{}. {} ({}, {} words)", n + 1, item.title, item.source, item.word_count);
                println!("   {}", item.summary);
                println!("   {}", item.url);
            }
        }
        Commands::Archive { id } => run(&actions, Action::Archive, &id).await?,
        Commands::Delete { id } => run(&actions, Action::Delete, &id).await?,
        Commands::Later { id } => run(&actions, Action::Later, &id).await?,
    }

    Ok(())
}

async fn run(actions: &ActionReconciler, action: Action, id: &str) -> anyhow::Result<()> {
    actions
        .apply(action, id)
        .await
        .with_context(|| format!("{} {}", action, id))?;
    println!("✅ {} {}", action, id);
    Ok(())
}
