use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use gamesessions::{Account, AppState, Config, InMemoryRecordStore, StaticSeasonTable};

#[derive(Parser)]
#[command(name = "gamesessions")]
#[command(about = "Game-session directory and profile reward service", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long, env = "GAMESESSIONS_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if !config.auth_enabled() {
        warn!("no client credentials configured; basic-token auth is disabled");
    }

    let store = InMemoryRecordStore::new();
    let mut state = AppState::new(config.clone(), store)
        .with_notifier(gamesessions::notify::from_config(&config));
    info!(notifier = ?config.notifier, "notifier selected");

    if let Some(path) = &config.rewards_table {
        let table = StaticSeasonTable::from_json(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), levels = table.levels.len(), "season table loaded");
        state = state.with_season_table(Arc::new(table));
    }

    for seed in &config.accounts {
        state
            .accounts
            .register(&Account::new(&seed.account_id, &seed.username))?;
        state
            .profiles
            .ensure_defaults(&seed.account_id, config.current_season)?;
    }
    info!(
        accounts = config.accounts.len(),
        season = config.current_season,
        "accounts seeded"
    );

    gamesessions::serve(Arc::new(state), &config.bind).await?;
    Ok(())
}
