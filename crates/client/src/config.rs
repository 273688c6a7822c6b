//! Skirmish runtime configuration.
use std::env;
use std::path::PathBuf;

/// Where content comes from and how enemies behave.
#[derive(Clone, Debug, PartialEq)]
pub struct SkirmishConfig {
    /// Directory holding `config.toml`, `techniques.ron` and `roster.ron`.
    pub data_dir: PathBuf,
    /// Overrides `data_dir/config.toml`.
    pub config_path: Option<PathBuf>,
    /// Overrides `data_dir/roster.ron`.
    pub roster_path: Option<PathBuf>,
    /// Encounter to fight; the first one in the roster when unset.
    pub encounter: Option<String>,
    /// Seeds the random enemy policy. Unset means enemies hit the first
    /// living player.
    pub seed: Option<u64>,
    /// Seconds simulated by a bare `wait` command.
    pub tick_seconds: f32,
}

impl SkirmishConfig {
    pub const DEFAULT_TICK_SECONDS: f32 = 0.05;

    /// Construct configuration from process environment variables.
    ///
    /// - `SKIRMISH_DATA_DIR`
    /// - `SKIRMISH_CONFIG`
    /// - `SKIRMISH_ROSTER`
    /// - `SKIRMISH_ENCOUNTER`
    /// - `SKIRMISH_SEED`
    /// - `SKIRMISH_TICK`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("SKIRMISH_DATA_DIR") {
            config.data_dir = dir;
        }
        config.config_path = read_env("SKIRMISH_CONFIG");
        config.roster_path = read_env("SKIRMISH_ROSTER");
        config.encounter = read_env("SKIRMISH_ENCOUNTER");
        config.seed = read_env("SKIRMISH_SEED");

        if let Some(tick) = read_env::<f32>("SKIRMISH_TICK")
            && tick.is_finite()
            && tick > 0.0
        {
            config.tick_seconds = tick;
        }

        config
    }
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../combat/content/data"),
            config_path: None,
            roster_path: None,
            encounter: None,
            seed: None,
            tick_seconds: Self::DEFAULT_TICK_SECONDS,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
