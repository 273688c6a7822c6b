use std::cell::Cell;
use std::rc::Rc;

use combat_core::{
    BattleCallbacks, BattleOutcome, CombatConfig, CombatEntity, CombatSystem, CombatSystemState,
    CombatantId, DamageType, FirstLivingTarget, Measure, PatternSpec, SeededRandomTarget,
    Technique,
};

#[derive(Clone, Default)]
struct Calls {
    victory: Rc<Cell<u32>>,
    defeat: Rc<Cell<u32>>,
}

impl Calls {
    fn callbacks(&self) -> BattleCallbacks {
        let victory = Rc::clone(&self.victory);
        let defeat = Rc::clone(&self.defeat);
        BattleCallbacks::new(
            move || victory.set(victory.get() + 1),
            move || defeat.set(defeat.get() + 1),
        )
    }
}

fn meter(layouts: &[&str]) -> CombatConfig {
    CombatConfig::new().with_patterns(
        layouts
            .iter()
            .map(|layout| PatternSpec::new(*layout, 10.0))
            .collect(),
    )
}

fn system(layouts: &[&str], calls: &Calls) -> CombatSystem {
    CombatSystem::new(meter(layouts), FirstLivingTarget, calls.callbacks()).unwrap()
}

/// Confirms through text, picks Attack and the highlighted target.
fn attack_until_meter(system: &mut CombatSystem) {
    while system.state() == CombatSystemState::Text {
        system.on_confirm().unwrap();
    }
    assert_eq!(system.state(), CombatSystemState::MenuSelect);
    system.on_confirm().unwrap();
    assert_eq!(system.state(), CombatSystemState::SelectEnemyTarget);
    system.on_confirm().unwrap();
    assert_eq!(system.state(), CombatSystemState::PowerMeter);
}

#[test]
fn defeated_enemy_at_engage_is_an_immediate_victory() {
    let calls = Calls::default();
    let mut system = system(&["="], &calls);
    let corpse = CombatEntity::enemy("Slime", 5, 0).with_health(Measure::new(0, 5));

    system
        .engage(vec![CombatEntity::player("Ann", 10, 0)], vec![corpse])
        .unwrap();

    assert_eq!(system.state(), CombatSystemState::BattleOver);
    assert_eq!(system.outcome(), Some(BattleOutcome::Victory));
    assert_eq!(calls.victory.get(), 0);

    system.on_confirm().unwrap();
    assert_eq!(calls.victory.get(), 1);
    assert!(!system.is_active());

    system.on_confirm().unwrap();
    assert_eq!(calls.victory.get(), 1);
    assert_eq!(calls.defeat.get(), 0);
}

#[test]
fn one_hit_kill_ends_in_victory() {
    let calls = Calls::default();
    let mut system = system(&["==="], &calls);
    system
        .engage(
            vec![CombatEntity::player("A", 10, 0).with_speed(1)],
            vec![CombatEntity::enemy("E", 1, 0)],
        )
        .unwrap();

    attack_until_meter(&mut system);
    system.on_confirm().unwrap();

    assert!(system.roster().enemies.is_empty());
    assert_eq!(system.state(), CombatSystemState::BattleOver);
    assert_eq!(system.outcome(), Some(BattleOutcome::Victory));
    assert_eq!(
        system.view().text.as_deref(),
        Some("The enemies have been defeated!")
    );
    assert_eq!(calls.victory.get(), 0);

    system.on_confirm().unwrap();
    assert_eq!(calls.victory.get(), 1);
    assert_eq!(calls.defeat.get(), 0);
}

#[test]
fn fallen_party_at_engage_is_an_immediate_defeat() {
    let calls = Calls::default();
    let mut system = system(&["="], &calls);
    let fallen = CombatEntity::player("A", 10, 0).with_health(Measure::new(0, 10));

    system
        .engage(vec![fallen], vec![CombatEntity::enemy("E", 10, 0)])
        .unwrap();
    assert_eq!(system.state(), CombatSystemState::BattleOver);
    assert_eq!(system.outcome(), Some(BattleOutcome::Defeat));
    assert_ne!(system.previous_state(), CombatSystemState::EnemyAct);

    system.on_confirm().unwrap();
    assert_eq!(calls.defeat.get(), 1);
    assert_eq!(calls.victory.get(), 0);
}

#[test]
fn full_round_returns_to_text_then_first_player() {
    let calls = Calls::default();
    let mut system = system(&["="], &calls);
    system
        .engage(
            vec![CombatEntity::player("Ann", 30, 0), CombatEntity::player("Bo", 30, 0)],
            vec![CombatEntity::enemy("Ogre", 100, 0)],
        )
        .unwrap();

    attack_until_meter(&mut system);
    system.on_confirm().unwrap();
    assert_eq!(system.state(), CombatSystemState::MenuSelect);
    assert_eq!(system.current_player_index(), Some(1));

    system.on_confirm().unwrap();
    system.on_confirm().unwrap();
    system.on_confirm().unwrap();
    assert_eq!(system.state(), CombatSystemState::EnemyAct);
    assert_eq!(system.roster().enemies.get(0).unwrap().health().current(), 90);

    system.on_confirm().unwrap();
    assert_eq!(system.state(), CombatSystemState::Text);
    assert_eq!(system.round(), 2);
    assert_eq!(
        system.view().text.as_deref(),
        Some("Ogre attacks Ann for 5 damage.")
    );
    assert_eq!(system.roster().players.get(0).unwrap().health().current(), 25);

    system.on_confirm().unwrap();
    assert_eq!(system.view().text.as_deref(), Some("Round 2."));
    system.on_confirm().unwrap();
    assert_eq!(system.state(), CombatSystemState::MenuSelect);
    assert_eq!(system.current_player_index(), Some(0));
}

#[test]
fn enemy_target_index_reclamps_after_removal() {
    let calls = Calls::default();
    let mut system = system(&["="], &calls);
    system
        .engage(
            vec![CombatEntity::player("Ann", 30, 0)],
            vec![CombatEntity::enemy("Ogre", 100, 0), CombatEntity::enemy("Rat", 1, 0)],
        )
        .unwrap();

    while system.state() == CombatSystemState::Text {
        system.on_confirm().unwrap();
    }
    system.on_confirm().unwrap();
    system.on_right().unwrap();
    system.on_right().unwrap();
    assert_eq!(system.enemy_target_index(), 1);
    assert_eq!(system.view().text.as_deref(), Some("Target: Rat"));

    system.on_confirm().unwrap();
    system.on_confirm().unwrap();

    assert_eq!(system.roster().enemies.len(), 1);
    assert_eq!(system.enemy_target_index(), 0);
    assert_eq!(system.state(), CombatSystemState::EnemyAct);
}

#[test]
fn first_pattern_miss_still_deals_one_damage() {
    let calls = Calls::default();
    let mut system = system(&["-", "X"], &calls);
    system
        .engage(
            vec![CombatEntity::player("Ann", 30, 0)],
            vec![CombatEntity::enemy("Ogre", 10, 0)],
        )
        .unwrap();

    attack_until_meter(&mut system);
    system.on_confirm().unwrap();
    assert_eq!(system.state(), CombatSystemState::PowerMeter);
    system.on_confirm().unwrap();

    assert_eq!(system.roster().enemies.get(0).unwrap().health().current(), 9);
}

#[test]
fn crits_compound_across_patterns() {
    let calls = Calls::default();
    let mut system = system(&["X", "X"], &calls);
    system
        .engage(
            vec![CombatEntity::player("Ann", 30, 0)],
            vec![CombatEntity::enemy("Ogre", 50, 0)],
        )
        .unwrap();

    attack_until_meter(&mut system);
    system.on_confirm().unwrap();
    assert_eq!(system.view().meter.unwrap().modifier, 1.5);
    system.on_confirm().unwrap();

    // 5 * 2.25 = 11.25, truncated.
    assert_eq!(system.roster().enemies.get(0).unwrap().health().current(), 39);
}

#[test]
fn meter_timing_follows_update() {
    let calls = Calls::default();
    let mut system = system(&["-X"], &calls);
    system
        .engage(
            vec![CombatEntity::player("Ann", 30, 0)],
            vec![CombatEntity::enemy("Ogre", 50, 0)],
        )
        .unwrap();

    attack_until_meter(&mut system);
    system.update(6.0);
    assert_eq!(system.view().meter.unwrap().render(), "-|");
    system.on_confirm().unwrap();

    // 5 * 1.5 = 7.5, truncated.
    assert_eq!(system.roster().enemies.get(0).unwrap().health().current(), 43);
}

#[test]
fn damage_technique_debits_cost_and_uses_its_type() {
    let calls = Calls::default();
    let mut system = system(&["="], &calls);
    let mage = CombatEntity::player("Mage", 20, 10)
        .with_technique(Technique::damage("Spark", 4, 3, DamageType::Fire));
    system
        .engage(vec![mage], vec![CombatEntity::enemy("Ogre", 50, 0)])
        .unwrap();

    while system.state() == CombatSystemState::Text {
        system.on_confirm().unwrap();
    }
    system.on_left().unwrap();
    system.on_confirm().unwrap();
    assert_eq!(system.state(), CombatSystemState::SelectTechnique);
    assert_eq!(system.view().techniques[0].label, "Spark (4 RP)");

    system.on_confirm().unwrap();
    assert_eq!(system.state(), CombatSystemState::SelectEnemyTarget);
    assert_eq!(system.view().target, Some(CombatantId::enemy(0)));
    system.on_confirm().unwrap();
    system.on_confirm().unwrap();

    assert_eq!(system.roster().players.get(0).unwrap().resource().current(), 6);
    assert_eq!(system.roster().enemies.get(0).unwrap().health().current(), 42);
    assert_eq!(
        system.log().recent(1).next().unwrap().text,
        "Mage uses Spark on Ogre for 8 fire damage."
    );
}

#[test]
fn seeded_enemies_replay_identically() {
    fn play(seed: u64) -> Vec<String> {
        let config = meter(&["="]);
        let mut system =
            CombatSystem::new(config, SeededRandomTarget::new(seed), BattleCallbacks::none())
                .unwrap();
        system
            .engage(
                vec![
                    CombatEntity::player("Ann", 40, 0),
                    CombatEntity::player("Bo", 40, 0),
                    CombatEntity::player("Cy", 40, 0),
                ],
                vec![
                    CombatEntity::enemy("Imp", 30, 4)
                        .with_technique(Technique::damage("Hex", 2, 4, DamageType::Shadow)),
                    CombatEntity::enemy("Bat", 30, 0),
                ],
            )
            .unwrap();

        for _ in 0..200 {
            if !system.is_active() {
                break;
            }
            system.on_confirm().unwrap();
        }
        assert!(!system.is_active());
        system.log().iter().map(|entry| entry.text.clone()).collect()
    }

    assert_eq!(play(11), play(11));
}
