pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod ranking;
pub mod services;

use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::ranking::{PairwiseComparison, Scope};
use crate::services::aggregation::{AggregationService, AggregationSummary};
use crate::services::compatibility::CompatibilityService;
use crate::services::groups::GroupService;
use crate::services::scheduler::{run_scheduler, RecomputeQueue};
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_database(config: &AppConfig) -> Result<DbPool> {
    let pool = database::create_pool(&config.database_path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::ensure_schema(&mut conn)?;
    Ok(pool)
}

pub fn handle_init() -> Result<()> {
    let config = AppConfig::from_env();
    open_database(&config)?;
    log::info!("Database initialised at {}", config.database_path);
    Ok(())
}

pub fn handle_aggregate() -> Result<AggregationSummary> {
    let config = AppConfig::from_env();
    let pool = open_database(&config)?;
    AggregationService::new(pool, config.aggregation).recompute_global_rankings()
}

pub fn handle_schedule(interval_minutes: Option<u64>) -> Result<()> {
    let config = AppConfig::from_env();
    let interval = interval_minutes
        .map(|minutes| Duration::from_secs(minutes.max(1) * 60))
        .unwrap_or(config.scheduler.interval);
    let pool = open_database(&config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = AggregationService::new(pool, config.aggregation);
        let queue = RecomputeQueue::start(move || service.recompute_global_rankings());
        run_scheduler(queue, interval).await
    })
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_compare(user_a: i64, user_b: i64, album: Option<i64>) -> Result<PairwiseComparison> {
    let config = AppConfig::from_env();
    let pool = open_database(&config)?;
    let scope = album.map_or(Scope::Albums, Scope::TracksOfAlbum);
    CompatibilityService::new(pool, config.compatibility).compatibility(user_a, user_b, scope)
}

pub fn handle_coherence(group_id: i64) -> Result<f64> {
    let config = AppConfig::from_env();
    let pool = open_database(&config)?;
    let service = GroupService::new(pool, config.compatibility);
    if service.find_group(group_id)?.is_none() {
        anyhow::bail!("Group {} not found", group_id);
    }
    service.coherence(group_id)
}

pub fn handle_completions(shell: Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
}
