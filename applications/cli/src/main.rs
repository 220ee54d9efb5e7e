/// Beats - music discovery from the terminal
use beats_cli::{shell, AppState, BeatsConfig};
use beats_core::FileKeyValueStore;
use beats_playback::lyrics_search_url;
use beats_search_client::{SearchSession, YouTubeClient};
use beats_storage::CollectionStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "beats")]
#[command(about = "Search music, keep collections, and drive playback", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "BEATS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for music videos
    Search {
        /// Search text
        query: Vec<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show query suggestions
    Suggest {
        /// Partial search text
        text: Vec<String>,
    },
    /// List collections
    Collections,
    /// Create a collection
    Create {
        /// Collection name
        name: String,
    },
    /// Print the lyrics search link for a title
    Lyrics {
        /// Track title
        title: Vec<String>,
    },
    /// Start the interactive shell
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "beats_cli=info,beats_playback=info,beats_storage=warn,beats_search_client=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = BeatsConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Search { query, json } => search(&config, &query.join(" "), json).await?,
        Commands::Suggest { text } => suggest(&config, &text.join(" ")).await?,
        Commands::Collections => {
            let store = open_store(&config)?;
            for collection in store.collections() {
                println!("{} ({} tracks)", collection.name, collection.len());
            }
        }
        Commands::Create { name } => {
            let mut store = open_store(&config)?;
            store.create_collection(&name)?;
            println!("Created '{name}'");
        }
        Commands::Lyrics { title } => println!("{}", lyrics_search_url(&title.join(" "))),
        Commands::Shell => run_shell(&config).await?,
    }

    Ok(())
}

fn open_store(config: &BeatsConfig) -> anyhow::Result<CollectionStore<FileKeyValueStore>> {
    let backend = FileKeyValueStore::open(config.storage.data_dir.clone())?;
    tracing::debug!(data_dir = %config.storage.data_dir.display(), "Collection store opened");
    Ok(CollectionStore::load(backend))
}

async fn search(config: &BeatsConfig, query: &str, json: bool) -> anyhow::Result<()> {
    let client = YouTubeClient::new(config.search_client())?;
    let mut session = SearchSession::new(Arc::new(client));
    let tracks = session.search(query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(tracks)?);
    } else {
        println!("{}", shell::format_tracks(tracks));
    }
    Ok(())
}

async fn suggest(config: &BeatsConfig, text: &str) -> anyhow::Result<()> {
    let client = YouTubeClient::new(config.search_client())?;
    let session =
        SearchSession::new(Arc::new(client)).with_min_suggest_chars(config.suggest.min_chars);

    for suggestion in session.suggest(text).await {
        println!("{suggestion}");
    }
    Ok(())
}

async fn run_shell(config: &BeatsConfig) -> anyhow::Result<()> {
    let client = Arc::new(YouTubeClient::new(config.search_client())?);
    let store = open_store(config)?;

    tracing::info!(
        data_dir = %config.storage.data_dir.display(),
        collections = store.collections().len(),
        "Starting Beats shell"
    );

    let (mut state, feeds) = AppState::new(
        client,
        store,
        config.controller(),
        config.api.related_max_results,
        &config.suggest,
    );

    shell::run(&mut state, feeds).await?;
    Ok(())
}
