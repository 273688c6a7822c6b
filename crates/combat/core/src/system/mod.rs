//! Combat controller.
//!
//! [`CombatSystem`] owns one battle at a time. The host drives it with
//! frame ticks (`update`) and discrete inputs (`on_confirm`, `on_cancel`,
//! `on_left`, `on_right`, `on_up`, `on_down`) and renders from
//! [`CombatSystem::view`].
//!
//! Turn flow: players act in party order (menu → target → power meter),
//! then every enemy acts once through the injected [`EnemyPolicy`], then a
//! new round opens with a line of text. Victory and defeat are re-checked
//! after every confirm; the confirm that closes the final message fires
//! exactly one of the [`BattleCallbacks`].

mod errors;
mod menu;
mod policy;
mod state;
mod text;
mod view;

pub use errors::{CombatError, EngageError, SystemError};
pub use menu::{Menu, MenuChoice};
pub use policy::{EnemyPolicy, FirstLivingTarget, SeededRandomTarget};
pub use state::{BattleCallbacks, BattleOutcome, CombatSystemState};
pub use text::{BattleLog, Dialogue, LogEntry};
pub use view::{CombatView, CombatantView, MenuView, MeterView, TechniqueView};

use std::fmt;

use tracing::{debug, info, warn};

use crate::action::{ActionOutcome, CombatAction, Effect};
use crate::config::{BattleText, CombatConfig};
use crate::meter::{MeterError, PowerMeter};
use crate::state::{
    CombatEntity, CombatantId, CombatantKind, Party, Roster, Side, clamp_index, first_living,
    next_living_after,
};
use crate::technique::Technique;

use self::CombatSystemState as S;

/// Enemy that acted most recently and how long its cue stays visible.
#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCue {
    enemy: CombatantId,
    remaining: f32,
}

/// Turn-based battle state machine.
pub struct CombatSystem {
    config: CombatConfig,
    policy: Box<dyn EnemyPolicy>,
    callbacks: BattleCallbacks,
    meter: PowerMeter,

    roster: Roster,
    state: CombatSystemState,
    previous_state: CombatSystemState,
    active: bool,
    outcome: Option<BattleOutcome>,
    round: u32,

    current_player_index: Option<usize>,
    current_enemy_index: usize,
    enemy_target_index: usize,
    player_target_index: usize,
    technique_index: usize,
    selected_technique: Option<usize>,

    menu: Menu,
    dialogue: Dialogue,
    prompt: Option<String>,
    log: BattleLog,
    cue: Option<EnemyCue>,
}

impl CombatSystem {
    /// Builds an idle controller. Fails if the configured meter patterns
    /// do not parse.
    pub fn new(
        config: CombatConfig,
        policy: impl EnemyPolicy + 'static,
        callbacks: BattleCallbacks,
    ) -> Result<Self, MeterError> {
        let meter = PowerMeter::from_rules(&config.meter)?;
        let log = BattleLog::new(config.log_capacity);

        Ok(Self {
            config,
            policy: Box::new(policy),
            callbacks,
            meter,
            roster: Roster::new(Vec::new(), Vec::new()),
            state: S::Text,
            previous_state: S::Text,
            active: false,
            outcome: None,
            round: 0,
            current_player_index: None,
            current_enemy_index: 0,
            enemy_target_index: 0,
            player_target_index: 0,
            technique_index: 0,
            selected_technique: None,
            menu: Menu::default(),
            dialogue: Dialogue::default(),
            prompt: None,
            log,
            cue: None,
        })
    }

    // ===== battle lifecycle =====

    /// Starts a battle. Defeated enemies are dropped before the first turn;
    /// a battle that is already decided goes straight to `BattleOver`.
    pub fn engage(
        &mut self,
        players: Vec<CombatEntity>,
        enemies: Vec<CombatEntity>,
    ) -> Result<(), EngageError> {
        if self.active {
            return Err(EngageError::AlreadyEngaged);
        }
        if enemies.is_empty() {
            return Err(EngageError::NoEnemies);
        }
        if players.is_empty() {
            return Err(EngageError::NoPlayers);
        }
        check_kind(&players, CombatantKind::Player)?;
        check_kind(&enemies, CombatantKind::Enemy)?;

        self.roster = Roster::new(players, enemies);
        let pruned = self.roster.enemies.remove_defeated();

        self.active = true;
        self.outcome = None;
        self.round = 1;
        self.state = S::Text;
        self.previous_state = S::Text;
        self.current_player_index = None;
        self.current_enemy_index = 0;
        self.enemy_target_index = 0;
        self.player_target_index = 0;
        self.technique_index = 0;
        self.selected_technique = None;
        self.menu.reset();
        self.meter.reset();
        self.prompt = None;
        self.log.clear();
        self.cue = None;

        match self.roster.enemies.get(0) {
            Some(first) => {
                let opening = BattleText::render(&self.config.text.opening, "{enemy}", first.name());
                self.log.push(self.round, opening.clone());
                self.dialogue.show([opening]);
            }
            None => self.dialogue.clear(),
        }

        info!(
            players = self.roster.players.len(),
            enemies = self.roster.enemies.len(),
            pruned,
            "battle engaged"
        );
        self.check_battle_over();
        Ok(())
    }

    /// Hands the player party back once the battle is closed.
    ///
    /// Returns `None` while a battle is still running.
    pub fn release_players(&mut self) -> Option<Vec<CombatEntity>> {
        if self.active {
            warn!("release_players called during an active battle");
            return None;
        }
        let party = std::mem::replace(&mut self.roster.players, Party::new(Side::Players, Vec::new()));
        let mut players = party.into_members();
        for player in &mut players {
            player.set_critical_damage_modifier(1.0);
        }
        Some(players)
    }

    /// Advances time-driven state: the meter cursor and the enemy cue.
    pub fn update(&mut self, dt: f32) {
        if !self.active || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if self.state == S::PowerMeter {
            self.meter.update(dt);
        }
        if let Some(cue) = self.cue.as_mut() {
            cue.remaining -= dt;
        }
        if self.cue.is_some_and(|cue| cue.remaining <= 0.0) {
            self.cue = None;
        }
    }

    // ===== input =====

    pub fn on_confirm(&mut self) -> Result<(), CombatError> {
        if !self.active {
            return Ok(());
        }
        match self.state {
            S::Text => self.confirm_text(),
            S::MenuSelect => self.confirm_menu()?,
            S::SelectTechnique => self.confirm_technique()?,
            S::SelectEnemyTarget => self.confirm_enemy_target(),
            S::SelectPlayerTarget => self.confirm_player_target()?,
            S::PowerMeter => self.confirm_meter()?,
            S::EnemyAct => self.confirm_enemy_act()?,
            S::BattleOver => {
                self.finish();
                return Ok(());
            }
        }
        self.check_battle_over();
        Ok(())
    }

    pub fn on_cancel(&mut self) -> Result<(), CombatError> {
        if !self.active || !self.state.is_cancellable() {
            return Ok(());
        }

        if self.state == S::SelectTechnique {
            self.transition(S::MenuSelect);
        } else {
            debug!(from = %self.state, to = %self.previous_state, "selection cancelled");
            self.state = self.previous_state;
        }

        self.prompt = None;
        if self.state == S::MenuSelect {
            self.selected_technique = None;
            self.prompt = self.turn_prompt();
        }
        Ok(())
    }

    pub fn on_left(&mut self) -> Result<(), CombatError> {
        self.horizontal(-1);
        Ok(())
    }

    pub fn on_right(&mut self) -> Result<(), CombatError> {
        self.horizontal(1);
        Ok(())
    }

    pub fn on_up(&mut self) -> Result<(), CombatError> {
        self.vertical(-1);
        Ok(())
    }

    pub fn on_down(&mut self) -> Result<(), CombatError> {
        self.vertical(1);
        Ok(())
    }

    /// Selects the acting player directly. `None` clears the selection.
    pub fn set_current_player(&mut self, index: Option<usize>) -> Result<(), CombatError> {
        if let Some(index) = index
            && index >= self.roster.players.len()
        {
            return Err(SystemError::player_index_out_of_range(
                index,
                self.roster.players.len(),
                self.round,
            )
            .into());
        }
        self.current_player_index = index;
        Ok(())
    }

    // ===== queries =====

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn state(&self) -> CombatSystemState {
        self.state
    }

    #[inline]
    pub fn previous_state(&self) -> CombatSystemState {
        self.previous_state
    }

    #[inline]
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    #[inline]
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn meter(&self) -> &PowerMeter {
        &self.meter
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn current_player_index(&self) -> Option<usize> {
        self.current_player_index
    }

    pub fn current_enemy_index(&self) -> usize {
        self.current_enemy_index
    }

    pub fn enemy_target_index(&self) -> usize {
        self.enemy_target_index
    }

    pub fn player_target_index(&self) -> usize {
        self.player_target_index
    }

    pub fn technique_index(&self) -> usize {
        self.technique_index
    }

    pub fn current_player(&self) -> Option<&CombatEntity> {
        self.roster.players.get(self.current_player_index?)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> CombatView {
        let text = match self.state {
            S::Text | S::BattleOver => self.dialogue.current().map(str::to_owned),
            _ => self.prompt.clone(),
        };

        let menu = (self.state == S::MenuSelect).then(|| MenuView {
            choices: self.menu.choices().to_vec(),
            selected: self.menu.selected_index(),
        });

        let techniques = match (self.state, self.current_player()) {
            (S::SelectTechnique, Some(player)) => player
                .techniques()
                .iter()
                .enumerate()
                .map(|(i, t)| TechniqueView::new(player, t, i == self.technique_index))
                .collect(),
            _ => Vec::new(),
        };

        let target = match self.state {
            S::SelectEnemyTarget | S::PowerMeter => self
                .roster
                .enemies
                .get(self.enemy_target_index)
                .map(CombatEntity::id),
            S::SelectPlayerTarget => self
                .roster
                .players
                .get(self.player_target_index)
                .map(CombatEntity::id),
            _ => None,
        };

        let meter = (self.state == S::PowerMeter).then(|| MeterView {
            slices: self.meter.current_pattern().slices().to_vec(),
            cursor: self.meter.cursor_position() / self.meter.width(),
            stage: self.meter.current_pattern_index(),
            stages: self.meter.patterns().len(),
            modifier: self.meter.damage_modifier(),
        });

        CombatView {
            state: self.state,
            round: self.round,
            outcome: self.outcome,
            text,
            menu,
            techniques,
            players: self.roster.players.iter().map(CombatantView::from).collect(),
            enemies: self.roster.enemies.iter().map(CombatantView::from).collect(),
            current_player: self.current_player().map(CombatEntity::id),
            target,
            meter,
            cue: self.cue.map(|cue| cue.enemy),
        }
    }

    // ===== confirm handlers =====

    fn confirm_text(&mut self) {
        if self.dialogue.advance() {
            return;
        }
        self.current_player_index = first_living(self.roster.players.members());
        self.start_player_turn();
    }

    fn confirm_menu(&mut self) -> Result<(), CombatError> {
        let player = self.require_player()?;
        let (name, known) = (player.name().to_owned(), player.techniques().len());

        match self.menu.selected() {
            MenuChoice::Attack => {
                self.selected_technique = None;
                self.enter_enemy_target();
            }
            MenuChoice::Technique if known == 0 => {
                warn!(player = %name, "technique menu opened without techniques");
                self.prompt = Some(format!("{name} knows no techniques."));
            }
            MenuChoice::Technique => {
                self.technique_index = clamp_index(self.technique_index, known);
                self.prompt = None;
                self.transition(S::SelectTechnique);
            }
        }
        Ok(())
    }

    fn confirm_technique(&mut self) -> Result<(), CombatError> {
        let player = self.require_player()?;
        let Some(technique) = player.techniques().get(self.technique_index) else {
            return Ok(());
        };
        let affordable = player.can_afford(technique);
        let targets_allies = technique.targets_allies();
        let (name, label) = (player.name().to_owned(), technique.to_string());

        if !affordable {
            warn!(player = %name, technique = %label, "unaffordable technique selected");
            self.prompt = Some(format!("{name} cannot afford {label}."));
            return Ok(());
        }

        self.selected_technique = Some(self.technique_index);
        if targets_allies {
            self.player_target_index = self.current_player_index.unwrap_or(0);
            self.transition(S::SelectPlayerTarget);
            self.refresh_target_prompt();
        } else {
            self.enter_enemy_target();
        }
        Ok(())
    }

    fn confirm_enemy_target(&mut self) {
        self.meter.reset();
        self.meter.activate();
        self.transition(S::PowerMeter);
        self.refresh_meter_prompt();
    }

    fn confirm_player_target(&mut self) -> Result<(), CombatError> {
        let source = self.require_player()?.id();
        let target = self
            .roster
            .players
            .get(self.player_target_index)
            .map(CombatEntity::id)
            .ok_or_else(|| {
                SystemError::target_index_out_of_range(
                    Side::Players,
                    self.player_target_index,
                    self.round,
                )
            })?;
        let technique = self
            .pending_technique()
            .ok_or_else(|| SystemError::no_technique_selected(source, self.round))?;

        self.resolve_player_action(CombatAction::technique(source, target, technique), 1.0)
    }

    fn confirm_meter(&mut self) -> Result<(), CombatError> {
        self.meter.confirm_cursor();
        if self.meter.advance() {
            self.refresh_meter_prompt();
            return Ok(());
        }
        let modifier = self.meter.damage_modifier();
        self.meter.reset();

        let source = self.require_player()?.id();
        let target = self
            .roster
            .enemies
            .get(self.enemy_target_index)
            .map(CombatEntity::id)
            .ok_or_else(|| {
                SystemError::target_index_out_of_range(
                    Side::Enemies,
                    self.enemy_target_index,
                    self.round,
                )
            })?;
        let action = match self.selected_technique {
            Some(_) => {
                let technique = self
                    .pending_technique()
                    .ok_or_else(|| SystemError::no_technique_selected(source, self.round))?;
                CombatAction::technique(source, target, technique)
            }
            None => CombatAction::attack(source, target),
        };

        self.resolve_player_action(action, modifier)
    }

    fn confirm_enemy_act(&mut self) -> Result<(), CombatError> {
        self.current_enemy_index = clamp_index(self.current_enemy_index, self.roster.enemies.len());
        let Some(actor) = self.roster.enemies.get(self.current_enemy_index) else {
            self.begin_new_round(None);
            return Ok(());
        };
        let (actor_id, actor_name) = (actor.id(), actor.name().to_owned());

        let decision =
            self.policy
                .decide(actor, self.roster.enemies.members(), self.roster.players.members());

        let message = match decision {
            None => {
                debug!(enemy = %actor_id, "enemy passed");
                format!("{actor_name} hesitates.")
            }
            Some(action) => {
                self.validate_decision(actor_id, &action)?;
                if let Some(enemy) = self.roster.get_mut(actor_id) {
                    enemy.set_critical_damage_modifier(1.0);
                }
                let outcome = action.execute(&mut self.roster, &self.config.damage)?;
                self.describe(&outcome, action.technique.as_ref())
            }
        };

        self.log.push(self.round, message.clone());
        self.cue = Some(EnemyCue {
            enemy: actor_id,
            remaining: self.config.enemy_cue_seconds,
        });

        if self.current_enemy_index + 1 < self.roster.enemies.len() {
            self.current_enemy_index += 1;
            self.prompt = Some(message);
        } else {
            self.begin_new_round(Some(message));
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.active = false;
        if let Some(outcome) = self.outcome {
            info!(%outcome, round = self.round, "battle closed");
            self.callbacks.fire(outcome);
        }
    }

    // ===== directional input =====

    fn horizontal(&mut self, delta: isize) {
        if !self.active {
            return;
        }
        match self.state {
            S::MenuSelect => self.menu.cycle(delta),
            S::SelectEnemyTarget => {
                self.enemy_target_index = step_clamped(
                    self.enemy_target_index,
                    delta,
                    self.roster.enemies.len(),
                );
                self.refresh_target_prompt();
            }
            S::SelectPlayerTarget => {
                self.player_target_index = step_clamped(
                    self.player_target_index,
                    delta,
                    self.roster.players.len(),
                );
                self.refresh_target_prompt();
            }
            _ => {}
        }
    }

    fn vertical(&mut self, delta: isize) {
        if !self.active || self.state != S::SelectTechnique {
            return;
        }
        let known = self.current_player().map_or(0, |p| p.techniques().len());
        if known == 0 {
            return;
        }
        self.technique_index =
            (self.technique_index as isize + delta).rem_euclid(known as isize) as usize;
        self.prompt = None;
    }

    // ===== turn flow =====

    fn transition(&mut self, next: CombatSystemState) {
        debug!(from = %self.state, to = %next, round = self.round, "combat state transition");
        self.previous_state = self.state;
        self.state = next;
    }

    fn start_player_turn(&mut self) {
        self.menu.reset();
        self.selected_technique = None;
        self.technique_index = 0;
        self.prompt = self.turn_prompt();
        self.transition(S::MenuSelect);
    }

    fn turn_prompt(&self) -> Option<String> {
        self.current_player()
            .map(|player| format!("What will {} do?", player.name()))
    }

    fn enter_enemy_target(&mut self) {
        self.enemy_target_index = clamp_index(self.enemy_target_index, self.roster.enemies.len());
        self.transition(S::SelectEnemyTarget);
        self.refresh_target_prompt();
    }

    /// Executes a player's action and moves the turn along.
    fn resolve_player_action(
        &mut self,
        action: CombatAction,
        modifier: f32,
    ) -> Result<(), CombatError> {
        if let Some(player) = self.roster.get_mut(action.source) {
            player.set_critical_damage_modifier(modifier);
        }
        let result = action.execute(&mut self.roster, &self.config.damage);
        if let Some(player) = self.roster.get_mut(action.source) {
            player.set_critical_damage_modifier(1.0);
        }
        let outcome = result?;

        let message = self.describe(&outcome, action.technique.as_ref());
        self.log.push(self.round, message);

        if outcome.target_died && outcome.target.side == Side::Enemies {
            self.roster.enemies.remove(outcome.target);
            self.clamp_enemy_indices();
        }
        self.selected_technique = None;
        self.advance_player_turn();
        Ok(())
    }

    fn advance_player_turn(&mut self) {
        let next = self
            .current_player_index
            .and_then(|index| next_living_after(self.roster.players.members(), index));
        match next {
            Some(index) => {
                self.current_player_index = Some(index);
                self.start_player_turn();
            }
            None => self.begin_enemy_phase(),
        }
    }

    fn begin_enemy_phase(&mut self) {
        self.current_player_index = None;
        self.current_enemy_index = 0;
        self.prompt = self
            .roster
            .enemies
            .get(0)
            .map(|enemy| format!("{} is about to act.", enemy.name()));
        self.transition(S::EnemyAct);
    }

    fn begin_new_round(&mut self, last_message: Option<String>) {
        self.round += 1;
        self.current_enemy_index = 0;
        self.prompt = None;

        let banner = BattleText::render(&self.config.text.new_round, "{round}", self.round.to_string());
        self.dialogue.show(last_message.into_iter().chain([banner]));
        self.transition(S::Text);
    }

    /// Forces `BattleOver` when either side is out of fighters.
    fn check_battle_over(&mut self) {
        if !self.active || self.state == S::BattleOver {
            return;
        }
        let outcome = if self.roster.enemies.is_defeated() {
            BattleOutcome::Victory
        } else if self.roster.players.is_defeated() {
            BattleOutcome::Defeat
        } else {
            return;
        };

        let message = match outcome {
            BattleOutcome::Victory => self.config.text.victory.clone(),
            BattleOutcome::Defeat => self.config.text.defeat.clone(),
        };
        self.outcome = Some(outcome);
        self.log.push(self.round, message.clone());
        self.dialogue.show([message]);
        self.prompt = None;
        self.current_player_index = None;
        self.meter.reset();
        self.transition(S::BattleOver);

        info!(%outcome, round = self.round, "battle decided");
    }

    // ===== helpers =====

    fn require_player(&self) -> Result<&CombatEntity, SystemError> {
        self.current_player()
            .ok_or_else(|| SystemError::no_current_player(self.round))
    }

    fn pending_technique(&self) -> Option<Technique> {
        let index = self.selected_technique?;
        self.current_player()?.techniques().get(index).cloned()
    }

    fn clamp_enemy_indices(&mut self) {
        let len = self.roster.enemies.len();
        self.enemy_target_index = clamp_index(self.enemy_target_index, len);
        self.current_enemy_index = clamp_index(self.current_enemy_index, len);
    }

    fn refresh_target_prompt(&mut self) {
        let target = match self.state {
            S::SelectEnemyTarget => self.roster.enemies.get(self.enemy_target_index),
            S::SelectPlayerTarget => self.roster.players.get(self.player_target_index),
            _ => None,
        };
        self.prompt = target.map(|target| {
            BattleText::render(&self.config.text.target_prompt, "{target}", target.name())
        });
    }

    fn refresh_meter_prompt(&mut self) {
        self.prompt = Some(format!(
            "Power {}/{}",
            self.meter.current_pattern_index() + 1,
            self.meter.patterns().len()
        ));
    }

    /// Rejects policy output the acting enemy is not allowed to perform.
    fn validate_decision(
        &self,
        actor: CombatantId,
        action: &CombatAction,
    ) -> Result<(), SystemError> {
        let reject = |reason| Err(SystemError::invalid_decision(actor, reason, self.round));

        if action.source != actor {
            return reject("source is not the acting enemy");
        }
        let allied = action
            .technique
            .as_ref()
            .is_some_and(Technique::targets_allies);
        let expected = if allied { actor.side } else { actor.side.opponent() };
        if action.target.side != expected {
            return reject("target is on the wrong side");
        }
        if let Some(technique) = &action.technique {
            let known = self
                .roster
                .get(actor)
                .is_some_and(|enemy| enemy.techniques().contains(technique));
            if !known {
                return reject("technique is not known by the actor");
            }
            if technique.targets_allies() {
                if self.roster.enemies.find(action.target).is_none() {
                    return reject("support target is not an ally");
                }
                return Ok(());
            }
        }
        if !self
            .roster
            .players
            .find(action.target)
            .is_some_and(CombatEntity::is_alive)
        {
            return reject("target is not a living player");
        }
        Ok(())
    }

    fn describe(&self, outcome: &ActionOutcome, technique: Option<&Technique>) -> String {
        let name_of = |id| {
            self.roster
                .get(id)
                .map_or_else(|| id.to_string(), |e: &CombatEntity| e.name().to_owned())
        };
        let source = name_of(outcome.source);
        let target = name_of(outcome.target);
        let amount = outcome.amount;

        let mut message = match (outcome.effect, technique) {
            (Effect::Damage(_), None) => {
                format!("{source} attacks {target} for {amount} damage.")
            }
            (Effect::Damage(damage_type), Some(technique)) => format!(
                "{source} uses {} on {target} for {amount} {damage_type} damage.",
                technique.name()
            ),
            (Effect::Heal, _) => format!("{source} heals {target} for {amount}."),
            (Effect::Restore, _) => format!("{source} restores {amount} RP to {target}."),
        };
        if outcome.target_died && matches!(outcome.effect, Effect::Damage(_)) {
            message.push_str(&format!(" {target} is defeated!"));
        }
        message
    }
}

impl fmt::Debug for CombatSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatSystem")
            .field("state", &self.state)
            .field("previous_state", &self.previous_state)
            .field("active", &self.active)
            .field("round", &self.round)
            .field("outcome", &self.outcome)
            .field("roster", &self.roster)
            .finish_non_exhaustive()
    }
}

fn check_kind(members: &[CombatEntity], expected: CombatantKind) -> Result<(), EngageError> {
    match members.iter().find(|member| member.kind() != expected) {
        Some(member) => Err(EngageError::WrongKind {
            name: member.name().to_owned(),
            expected,
            found: member.kind(),
        }),
        None => Ok(()),
    }
}

fn step_clamped(index: usize, delta: isize, len: usize) -> usize {
    clamp_index(index.saturating_add_signed(delta), len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternSpec;
    use crate::error::{EngineError, ErrorSeverity};
    use crate::state::{DamageType, Measure};

    fn config(layout: &str) -> CombatConfig {
        CombatConfig::new().with_patterns(vec![PatternSpec::new(layout, 10.0)])
    }

    fn system(layout: &str) -> CombatSystem {
        CombatSystem::new(config(layout), FirstLivingTarget, BattleCallbacks::none()).unwrap()
    }

    fn mage() -> CombatEntity {
        CombatEntity::player("Mage", 20, 6)
            .with_technique(Technique::damage("Spark", 4, 3, DamageType::Fire))
            .with_technique(Technique::heal("Mend", 2, 8))
            .with_technique(Technique::damage("Nova", 50, 40, DamageType::Astral))
    }

    /// Walks from engage to the first menu.
    fn to_menu(system: &mut CombatSystem) {
        while system.state() == S::Text {
            system.on_confirm().unwrap();
        }
    }

    #[test]
    fn engage_rejects_bad_parties() {
        let mut system = system("=");
        assert_eq!(
            system.engage(vec![mage()], Vec::new()),
            Err(EngageError::NoEnemies)
        );
        assert_eq!(
            system.engage(Vec::new(), vec![CombatEntity::enemy("Rat", 5, 0)]),
            Err(EngageError::NoPlayers)
        );
        let err = system
            .engage(vec![CombatEntity::enemy("Rat", 5, 0)], vec![CombatEntity::enemy("Bat", 5, 0)])
            .unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!system.is_active());
    }

    #[test]
    fn engage_prunes_dead_enemies() {
        let mut system = system("=");
        let mut ghost = CombatEntity::enemy("Ghost", 5, 0);
        ghost.take_damage(5);
        system
            .engage(vec![mage()], vec![ghost, CombatEntity::enemy("Rat", 5, 0)])
            .unwrap();

        assert_eq!(system.roster().enemies.len(), 1);
        assert_eq!(system.roster().enemies.get(0).unwrap().id(), CombatantId::enemy(1));
        assert_eq!(system.view().text.as_deref(), Some("Rat draws near!"));
    }

    #[test]
    fn engaging_twice_is_rejected_until_the_battle_closes() {
        let mut system = system("=");
        let corpse = CombatEntity::enemy("Rat", 5, 0).with_health(Measure::new(0, 5));
        system.engage(vec![mage()], vec![corpse]).unwrap();

        let err = system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 5, 0)])
            .unwrap_err();
        assert_eq!(err, EngageError::AlreadyEngaged);
        assert!(err.severity().is_recoverable());

        system.on_confirm().unwrap();
        assert!(!system.is_active());
        system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 5, 0)])
            .unwrap();
        assert_eq!(system.state(), S::Text);
    }

    #[test]
    fn left_right_cycle_the_menu() {
        let mut system = system("=");
        system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 50, 0)])
            .unwrap();
        to_menu(&mut system);

        system.on_right().unwrap();
        assert_eq!(system.view().menu.unwrap().selected, 1);
        system.on_right().unwrap();
        assert_eq!(system.view().menu.unwrap().selected, 0);
    }

    #[test]
    fn unaffordable_technique_keeps_selection_open() {
        let mut system = system("=");
        system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 50, 0)])
            .unwrap();
        to_menu(&mut system);

        system.on_right().unwrap();
        system.on_confirm().unwrap();
        assert_eq!(system.state(), S::SelectTechnique);

        system.on_up().unwrap();
        assert_eq!(system.technique_index(), 2);
        system.on_confirm().unwrap();

        assert_eq!(system.state(), S::SelectTechnique);
        assert_eq!(
            system.view().text.as_deref(),
            Some("Mage cannot afford Nova (50 RP).")
        );
        assert!(!system.view().techniques[2].affordable);
    }

    #[test]
    fn heal_technique_targets_allies() {
        let mut system = system("=");
        let mut hurt = mage();
        hurt.take_damage(10);
        system
            .engage(vec![hurt], vec![CombatEntity::enemy("Rat", 50, 0)])
            .unwrap();
        to_menu(&mut system);

        system.on_right().unwrap();
        system.on_confirm().unwrap();
        system.on_down().unwrap();
        system.on_confirm().unwrap();
        assert_eq!(system.state(), S::SelectPlayerTarget);
        assert_eq!(system.view().target, Some(CombatantId::player(0)));

        system.on_confirm().unwrap();
        let mage = system.roster().players.get(0).unwrap();
        assert_eq!(mage.health().current(), 18);
        assert_eq!(mage.resource().current(), 4);
        assert_eq!(system.state(), S::EnemyAct);
    }

    #[test]
    fn cancel_walks_back_one_level_at_a_time() {
        let mut system = system("=");
        system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 50, 0)])
            .unwrap();
        to_menu(&mut system);

        system.on_right().unwrap();
        system.on_confirm().unwrap();
        system.on_confirm().unwrap();
        assert_eq!(system.state(), S::SelectEnemyTarget);

        system.on_cancel().unwrap();
        assert_eq!(system.state(), S::SelectTechnique);
        assert_eq!(system.view().text, None);

        system.on_cancel().unwrap();
        assert_eq!(system.state(), S::MenuSelect);
        assert_eq!(system.view().text.as_deref(), Some("What will Mage do?"));

        system.on_cancel().unwrap();
        assert_eq!(system.state(), S::MenuSelect);
    }

    #[test]
    fn cancelling_an_attack_target_restores_the_turn_prompt() {
        let mut system = system("=");
        system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 50, 0)])
            .unwrap();
        to_menu(&mut system);

        system.on_confirm().unwrap();
        assert_eq!(system.state(), S::SelectEnemyTarget);
        assert_eq!(system.view().text.as_deref(), Some("Target: Rat"));

        system.on_cancel().unwrap();
        assert_eq!(system.state(), S::MenuSelect);
        assert_eq!(system.view().text.as_deref(), Some("What will Mage do?"));
    }

    #[test]
    fn cancel_is_ignored_outside_selection_states() {
        let mut system = system("=");
        system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 50, 0)])
            .unwrap();
        system.on_cancel().unwrap();
        assert_eq!(system.state(), S::Text);

        to_menu(&mut system);
        system.on_confirm().unwrap();
        system.on_confirm().unwrap();
        assert_eq!(system.state(), S::PowerMeter);
        system.on_cancel().unwrap();
        assert_eq!(system.state(), S::PowerMeter);
    }

    #[test]
    fn set_current_player_rejects_out_of_range() {
        let mut system = system("=");
        system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 50, 0)])
            .unwrap();

        let err = system.set_current_player(Some(3)).unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Internal);
        assert_eq!(err.error_code(), "SYSTEM_PLAYER_INDEX_OUT_OF_RANGE");

        system.set_current_player(Some(0)).unwrap();
        assert_eq!(system.current_player_index(), Some(0));
        system.set_current_player(None).unwrap();
        assert_eq!(system.current_player_index(), None);
    }

    #[test]
    fn invalid_policy_output_is_internal() {
        let cheat = |actor: &CombatEntity, allies: &[CombatEntity], _: &[CombatEntity]| {
            Some(CombatAction::attack(actor.id(), allies[0].id()))
        };
        let mut system =
            CombatSystem::new(config("="), cheat, BattleCallbacks::none()).unwrap();
        system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 50, 0)])
            .unwrap();
        to_menu(&mut system);

        // Attack, pick target, confirm meter.
        for _ in 0..3 {
            system.on_confirm().unwrap();
        }
        assert_eq!(system.state(), S::EnemyAct);

        let err = system.on_confirm().unwrap_err();
        assert_eq!(err.error_code(), "SYSTEM_INVALID_DECISION");
        assert_eq!(err.severity(), ErrorSeverity::Internal);
        assert!(err.to_string().contains("wrong side"));
    }

    #[test]
    fn enemy_cue_expires_with_time() {
        let mut system = system("=");
        system
            .engage(
                vec![mage()],
                vec![CombatEntity::enemy("Rat", 50, 0), CombatEntity::enemy("Bat", 50, 0)],
            )
            .unwrap();
        to_menu(&mut system);
        for _ in 0..3 {
            system.on_confirm().unwrap();
        }
        system.on_confirm().unwrap();
        assert_eq!(system.view().cue, Some(CombatantId::enemy(0)));

        system.update(CombatConfig::DEFAULT_ENEMY_CUE_SECONDS + 0.1);
        assert_eq!(system.view().cue, None);
    }

    #[test]
    fn released_players_keep_battle_damage() {
        let mut system = system("=");
        system
            .engage(vec![mage()], vec![CombatEntity::enemy("Rat", 1, 0)])
            .unwrap();
        assert!(system.release_players().is_none());

        to_menu(&mut system);
        for _ in 0..3 {
            system.on_confirm().unwrap();
        }
        assert_eq!(system.state(), S::BattleOver);
        system.on_confirm().unwrap();

        let players = system.release_players().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name(), "Mage");
        assert_eq!(players[0].critical_damage_modifier(), 1.0);
    }
}
