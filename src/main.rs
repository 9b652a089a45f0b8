//! Arb Signal Bot entry point.
//!
//! One pass per sport:
//! 1. Load the latest snapshot per source
//! 2. Run the matching pipeline
//! 3. Export results and push notifications

mod config;

use arb_core::{pipeline, EngineConfig, Notifier, SportProfile};
use clap::Parser;
use notifier::{LogNotifier, SmsConfig, SmsNotifier};
use snapshot_store::{ResultWriter, SnapshotStore};
use tracing::{error, info, warn};

use crate::config::{load_config, BotConfig};

#[derive(Parser)]
struct Cli {
    /// Log opportunities instead of sending SMS.
    #[arg(long)]
    dry_run: bool,

    /// Run only these sports (default: all configured).
    #[arg(long)]
    sport: Vec<String>,

    /// Override the snapshot directory.
    #[arg(long)]
    snapshot_dir: Option<String>,
}

fn profile_for(name: &str) -> Option<SportProfile> {
    match name {
        "football" => Some(SportProfile::football()),
        "tennis" => Some(SportProfile::tennis()),
        _ => None,
    }
}

async fn run_sport(
    profile: &SportProfile,
    store: &SnapshotStore,
    writer: &mut ResultWriter,
    notifier: &dyn Notifier,
    engine: &EngineConfig,
) -> common::Result<()> {
    let rows_toto = store.load(common::Source::Toto)?;
    let rows_kambi = store.load(common::Source::Kambi)?;

    let result = pipeline::run(&rows_toto, &rows_kambi, profile, engine);

    if result.opportunities.is_empty() {
        info!(sport = profile.name, "no opportunities found");
        return Ok(());
    }

    let csv_path = writer.export_csv(profile.name, &result.opportunities)?;
    info!(sport = profile.name, path = %csv_path.display(), "results exported");
    for path in writer.export_family_csvs(profile.name, &result.families)? {
        info!(sport = profile.name, path = %path.display(), "family results exported");
    }
    writer.journal(&result.opportunities);

    let sent = arb_core::emit::emit(&result.opportunities, notifier).await;
    info!(
        sport = profile.name,
        opportunities = result.opportunities.len(),
        arbitrages = result.stats.arbitrages,
        notifications = sent,
        "sport run complete"
    );
    Ok(())
}

async fn run_all(
    cfg: &BotConfig,
    sports: &[String],
    store: &SnapshotStore,
    writer: &mut ResultWriter,
    notifier: &dyn Notifier,
) {
    for name in sports {
        let Some(profile) = profile_for(name) else {
            warn!(sport = %name, "unknown sport profile, skipping");
            continue;
        };
        if let Err(e) = run_sport(&profile, store, writer, notifier, &cfg.engine).await {
            error!(sport = %name, "sport run failed: {}", e);
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arb_signal_bot=info,arb_core=info,snapshot_store=info,notifier=info".into()),
        )
        .init();

    info!("Arb Signal Bot starting...");

    let cli = Cli::parse();
    let mut cfg = match load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {}", e);
            return;
        }
    };
    if let Some(dir) = cli.snapshot_dir {
        cfg.snapshot_dir = dir;
    }
    let sports = if cli.sport.is_empty() {
        cfg.sports.clone()
    } else {
        cli.sport.clone()
    };
    info!(
        "Engine config: bankroll={} winner_threshold={} overunder_threshold={} min_profit={}",
        cfg.engine.bankroll,
        cfg.engine.winner_team_threshold,
        cfg.engine.overunder_team_threshold,
        cfg.min_profit_threshold
    );

    let notifier: Box<dyn Notifier> = if cli.dry_run {
        info!("Dry-run mode enabled: opportunities will be logged, not sent.");
        Box::new(LogNotifier::new(cfg.min_profit_threshold))
    } else {
        let sms_config = match SmsConfig::from_env(cfg.min_profit_threshold) {
            Ok(c) => c,
            Err(e) => {
                error!("SMS config error: {}", e);
                return;
            }
        };
        Box::new(SmsNotifier::new(sms_config))
    };

    let store = SnapshotStore::new(&cfg.snapshot_dir);
    let mut writer = match ResultWriter::open(&cfg.results_dir) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to initialize result writer: {}", e);
            return;
        }
    };

    run_all(&cfg, &sports, &store, &mut writer, notifier.as_ref()).await;
}
