use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use royale_meta::analytics::{
    card_win_loss, loss_combo_count, upset_win_count, winning_combos, winning_decks,
    UpsetCriteria, DEFAULT_COMBO_WIN_RATE,
};
use royale_meta::api::state::AppState;
use royale_meta::api::WindowParams;
use royale_meta::config::AppConfig;
use royale_meta::fetch::{Fetcher, FetcherConfig};
use royale_meta::parse_duration;
use royale_meta::storage::{PlayerStore, StorageConfig};
use royale_meta::sync::{RoyaleClient, SyncConfig, SyncOrchestrator};

#[derive(Parser)]
#[command(name = "royale-meta")]
#[command(about = "Clash Royale leaderboard ingestion and battle analytics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the configured leaderboard
    Sync {
        /// Run sync once and exit (default)
        #[arg(long)]
        once: bool,

        /// Run continuously at interval
        #[arg(long, conflicts_with = "once")]
        watch: bool,

        /// Sync interval (e.g., "6h", "30m"); defaults to the config value
        #[arg(long)]
        interval: Option<String>,

        /// Fetch and convert but don't store
        #[arg(long)]
        dry_run: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file and PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Also run periodic sync in the background
        #[arg(long)]
        watch: bool,
    },

    /// Run an analytic query over stored battles and print JSON
    Analyze {
        #[command(subcommand)]
        query: AnalyzeQuery,
    },
}

#[derive(Args)]
struct WindowArgs {
    /// Window start (RFC 3339, battle timestamp or YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Window end; a bare date covers the whole day
    #[arg(long)]
    to: Option<String>,
}

#[derive(Subcommand)]
enum AnalyzeQuery {
    /// Win/loss percentage of matches featuring a card
    CardWinRate {
        card: String,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Team decks at or above a win rate
    Decks {
        #[arg(long, default_value_t = 0.0)]
        min_win_rate: f64,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Defeats with every listed card in the team deck
    LossCombo {
        cards: Vec<String>,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Fast wins by a lower-trophy player using a card
    UpsetWins {
        card: String,

        /// Minimum trophy deficit in percent
        #[arg(long)]
        percentage: f64,

        /// Require the loser's first two towers at full health
        #[arg(long)]
        full_health_towers: bool,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// N-card combinations at or above a win rate
    Combos {
        #[arg(short, long)]
        n: usize,

        #[arg(long, default_value_t = DEFAULT_COMBO_WIN_RATE)]
        min_win_rate: f64,

        #[command(flatten)]
        window: WindowArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting royale-meta v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Sync {
            once: _,
            watch,
            interval,
            dry_run,
        } => {
            let orchestrator = Arc::new(build_orchestrator(&config, dry_run, interval.as_deref())?);

            if watch {
                orchestrator.run_periodic().await;
            } else {
                let result = orchestrator.sync_once().await?;
                println!("\n=== Sync Results ===");
                println!("Leaderboard:     {}", result.leaderboard_id);
                println!("Players synced:  {}", result.players_synced);
                println!("Battles stored:  {}", result.battles_stored);
                println!("Duration:        {:?}", result.duration);
                if result.dry_run {
                    println!("(dry run, nothing written)");
                }
            }
        }
        Commands::Serve { host, port, watch } => {
            let orchestrator = Arc::new(build_orchestrator(&config, false, None)?);
            if watch {
                tokio::spawn(orchestrator.clone().run_periodic());
            }

            let state = AppState {
                store: Arc::new(PlayerStore::new(StorageConfig::new(config.data_dir.clone()))),
                orchestrator,
                cors_origin: config.server.cors_origin.clone(),
            };
            let app = royale_meta::api::build_router(state);

            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Analyze { query } => {
            let store = PlayerStore::new(StorageConfig::new(config.data_dir.clone()));
            run_query(&store, query)?;
        }
    }

    Ok(())
}

fn build_orchestrator(
    config: &AppConfig,
    dry_run: bool,
    interval: Option<&str>,
) -> Result<SyncOrchestrator> {
    let royale = &config.royale;
    let interval = match interval {
        Some(s) => parse_duration(s)
            .filter(|d| !d.is_zero())
            .with_context(|| format!("Invalid interval: {:?}", s))?,
        None => royale
            .interval()
            .context("Invalid sync_interval in config")?,
    };

    if royale.api_token.is_none() {
        tracing::warn!(
            "No API token in ${}; upstream requests will be rejected",
            royale.api_token_env
        );
    }

    let storage = StorageConfig::new(config.data_dir.clone());
    let fetcher = Fetcher::new(FetcherConfig {
        archive_dir: Some(storage.raw_dir()),
        timeout: royale.timeout(),
        bearer_token: royale.api_token.clone(),
        ..Default::default()
    })?;
    let client = RoyaleClient::new(fetcher, &royale.base_url)?;

    let sync_config = SyncConfig {
        leaderboard_name: royale.leaderboard_name.clone(),
        player_limit: royale.player_limit,
        battle_limit: royale.battle_limit,
        interval,
        dry_run,
    };

    Ok(SyncOrchestrator::new(
        sync_config,
        Arc::new(client),
        PlayerStore::new(storage),
    ))
}

fn run_query(store: &PlayerStore, query: AnalyzeQuery) -> Result<()> {
    fn window_of(args: &WindowArgs) -> Result<royale_meta::TimeWindow> {
        let params = WindowParams {
            from: args.from.clone(),
            to: args.to.clone(),
        };
        Ok(params.window()?)
    }

    fn print<T: Serialize>(value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    match query {
        AnalyzeQuery::CardWinRate { card, window } => {
            let window = window_of(&window)?;
            let records = store.battles(&window)?;
            print(&card_win_loss(&records, &card, &window))
        }
        AnalyzeQuery::Decks {
            min_win_rate,
            window,
        } => {
            let window = window_of(&window)?;
            let records = store.battles(&window)?;
            print(&winning_decks(&records, min_win_rate, &window))
        }
        AnalyzeQuery::LossCombo { cards, window } => {
            let window = window_of(&window)?;
            let records = store.battles(&window)?;
            print(&loss_combo_count(&records, &cards, &window))
        }
        AnalyzeQuery::UpsetWins {
            card,
            percentage,
            full_health_towers,
            window,
        } => {
            let mut criteria = UpsetCriteria::new(card, percentage);
            if full_health_towers {
                criteria = criteria.with_full_health_towers();
            }
            let window = window_of(&window)?;
            let records = store.battles(&window)?;
            print(&upset_win_count(&records, &criteria, &window))
        }
        AnalyzeQuery::Combos {
            n,
            min_win_rate,
            window,
        } => {
            if n == 0 {
                bail!("--n must be at least 1");
            }
            let window = window_of(&window)?;
            let records = store.battles(&window)?;
            print(&winning_combos(&records, n, min_win_rate, &window))
        }
    }
}
