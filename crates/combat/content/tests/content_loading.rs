use std::fs;
use std::path::PathBuf;

use combat_content::{ConfigLoader, ContentFactory, RosterLoader, TechniqueLoader};
use combat_core::{
    BattleCallbacks, CombatConfig, CombatSystem, CombatSystemState, FirstLivingTarget,
    RosterOracle,
};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn bundled_content_loads() {
    let factory = ContentFactory::new(data_dir());

    let config = factory.load_config().unwrap();
    assert_eq!(config.meter.patterns.len(), 3);
    assert_eq!(config, CombatConfig::default());

    let roster = factory.load_roster().unwrap();
    assert_eq!(roster.party().len(), 3);
    for id in roster.encounter_ids() {
        let enemies = roster.encounter(&id).unwrap();
        assert!(!enemies.is_empty(), "encounter {id} is empty");
    }
}

#[test]
fn bundled_content_runs_a_battle() {
    let factory = ContentFactory::new(data_dir());
    let config = factory.load_config().unwrap();
    let roster = factory.load_roster().unwrap();

    let mut system =
        CombatSystem::new(config, FirstLivingTarget, BattleCallbacks::none()).unwrap();
    system
        .engage(roster.party(), roster.encounter("meadow").unwrap())
        .unwrap();
    assert_eq!(system.state(), CombatSystemState::Text);
    assert_eq!(system.view().text.as_deref(), Some("Slime draws near!"));

    for _ in 0..500 {
        if !system.is_active() {
            break;
        }
        system.on_confirm().unwrap();
    }
    assert!(!system.is_active());
    assert!(system.outcome().is_some());
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let factory = ContentFactory::new(dir.path());
    assert_eq!(factory.load_config().unwrap(), CombatConfig::default());
}

#[test]
fn loaders_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    let techniques_path = dir.path().join("techniques.ron");
    let roster_path = dir.path().join("roster.ron");

    fs::write(&config_path, "log_capacity = 4\n").unwrap();
    fs::write(
        &techniques_path,
        r#"(techniques: [Heal(name: "Mend", resource_cost: 2, power: 8)])"#,
    )
    .unwrap();
    fs::write(
        &roster_path,
        r#"(
            party: [(name: "Aria", health: 30, resource: 4, techniques: ["Mend"])],
            enemies: {"rat": (name: "Rat", health: 6)},
            encounters: {"cellar": ["rat", "rat", "rat"]},
        )"#,
    )
    .unwrap();

    let config = ConfigLoader::load(&config_path).unwrap();
    assert_eq!(config.log_capacity, 4);

    let techniques = TechniqueLoader::load(&techniques_path).unwrap();
    let roster = RosterLoader::load(&roster_path, &techniques).unwrap();
    assert_eq!(roster.encounter("cellar").unwrap().len(), 3);
    assert_eq!(roster.party()[0].techniques()[0].name(), "Mend");
}

#[test]
fn unreadable_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.ron");
    let err = TechniqueLoader::load(&missing).unwrap_err();
    assert!(err.to_string().contains("nope.ron"));
}
