//! The interactive session loop.

use std::cell::Cell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use anyhow::Result;
use combat_core::{
    BattleCallbacks, BattleOutcome, CombatConfig, CombatEntity, CombatSystem, FirstLivingTarget,
    SeededRandomTarget,
};
use tracing::{debug, info};

use crate::input::{Command, HELP};
use crate::render::render;

/// Entries printed by the `log` command.
const LOG_LINES: usize = 8;

/// One battle driven by line input.
pub struct SkirmishApp {
    system: CombatSystem,
    outcome: Rc<Cell<Option<BattleOutcome>>>,
    tick_seconds: f32,
}

impl SkirmishApp {
    /// `seed` selects the random enemy policy; without one enemies always
    /// strike the first living player.
    pub fn new(config: CombatConfig, seed: Option<u64>, tick_seconds: f32) -> Result<Self> {
        let outcome = Rc::new(Cell::new(None));
        let on_victory = Rc::clone(&outcome);
        let on_defeat = Rc::clone(&outcome);
        let callbacks = BattleCallbacks::new(
            move || on_victory.set(Some(BattleOutcome::Victory)),
            move || on_defeat.set(Some(BattleOutcome::Defeat)),
        );

        let system = match seed {
            Some(seed) => CombatSystem::new(config, SeededRandomTarget::new(seed), callbacks)?,
            None => CombatSystem::new(config, FirstLivingTarget, callbacks)?,
        };

        Ok(Self {
            system,
            outcome,
            tick_seconds,
        })
    }

    pub fn start(&mut self, party: Vec<CombatEntity>, enemies: Vec<CombatEntity>) -> Result<()> {
        self.system.engage(party, enemies)?;
        Ok(())
    }

    pub fn system(&self) -> &CombatSystem {
        &self.system
    }

    /// Reads commands until the battle finishes, the player quits or input
    /// runs out. Returns the outcome if the battle finished.
    pub fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<Option<BattleOutcome>>
    where
        R: BufRead,
        W: Write,
    {
        let mut lines = input.lines();

        while self.system.is_active() {
            writeln!(output, "{}", render(&self.system.view()))?;
            write!(output, "> ")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                debug!("input closed");
                break;
            };

            match line?.parse::<Command>() {
                Ok(Command::Quit) => {
                    info!("player quit");
                    break;
                }
                Ok(command) => self.apply(command, output)?,
                Err(err) => writeln!(output, "{err}")?,
            }
        }

        let outcome = self.outcome.get();
        if let Some(outcome) = outcome {
            writeln!(output, "Battle over: {outcome}")?;
        }
        Ok(outcome)
    }

    fn apply<W: Write>(&mut self, command: Command, output: &mut W) -> Result<()> {
        match command {
            Command::Confirm => self.system.on_confirm()?,
            Command::Cancel => self.system.on_cancel()?,
            Command::Left => self.system.on_left()?,
            Command::Right => self.system.on_right()?,
            Command::Up => self.system.on_up()?,
            Command::Down => self.system.on_down()?,
            Command::Wait(seconds) => self.system.update(seconds.unwrap_or(self.tick_seconds)),
            Command::Log => {
                for entry in self.system.log().recent(LOG_LINES) {
                    writeln!(output, "  [round {}] {}", entry.round, entry.text)?;
                }
            }
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => {}
        }
        Ok(())
    }
}
