//! `skirmish`: play one encounter in the terminal.

use std::io;

use anyhow::Result;
use combat_client::{BattleSetup, SkirmishApp, SkirmishConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = SkirmishConfig::from_env();
    let setup = BattleSetup::load(&settings)?;
    info!(encounter = %setup.encounter_id, seed = ?settings.seed, "starting skirmish");

    let mut app = SkirmishApp::new(setup.config, settings.seed, settings.tick_seconds)?;
    app.start(setup.party, setup.enemies)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = app.run(stdin.lock(), &mut stdout.lock())?;

    info!(?outcome, "skirmish ended");
    Ok(())
}
