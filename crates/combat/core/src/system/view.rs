//! Read-only snapshot of the battle for presentation layers.

use super::menu::MenuChoice;
use super::state::{BattleOutcome, CombatSystemState};
use crate::meter::Slice;
use crate::state::{CombatEntity, CombatantId, Measure};
use crate::technique::Technique;

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatView {
    pub state: CombatSystemState,
    pub round: u32,
    pub outcome: Option<BattleOutcome>,
    /// Dialogue line in `Text` and `BattleOver`, prompt text otherwise.
    pub text: Option<String>,
    pub menu: Option<MenuView>,
    pub techniques: Vec<TechniqueView>,
    pub players: Vec<CombatantView>,
    pub enemies: Vec<CombatantView>,
    pub current_player: Option<CombatantId>,
    /// Highlighted combatant during target selection.
    pub target: Option<CombatantId>,
    pub meter: Option<MeterView>,
    /// Enemy that just acted, while its cue timer runs.
    pub cue: Option<CombatantId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuView {
    pub choices: Vec<MenuChoice>,
    pub selected: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TechniqueView {
    pub label: String,
    pub affordable: bool,
    pub selected: bool,
}

impl TechniqueView {
    pub(crate) fn new(owner: &CombatEntity, technique: &Technique, selected: bool) -> Self {
        Self {
            label: technique.to_string(),
            affordable: owner.can_afford(technique),
            selected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatantView {
    pub id: CombatantId,
    pub name: String,
    pub health: Measure,
    pub resource: Measure,
    pub alive: bool,
}

impl From<&CombatEntity> for CombatantView {
    fn from(entity: &CombatEntity) -> Self {
        Self {
            id: entity.id(),
            name: entity.name().to_owned(),
            health: entity.health(),
            resource: entity.resource(),
            alive: entity.is_alive(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeterView {
    pub slices: Vec<Slice>,
    /// Cursor position as a fraction of the meter width, in `[0, 1]`.
    pub cursor: f32,
    pub stage: usize,
    pub stages: usize,
    pub modifier: f32,
}

impl MeterView {
    /// Renders the pattern with the cursor's slice marked by `|`.
    pub fn render(&self) -> String {
        let marker = ((self.cursor * self.slices.len() as f32).floor() as usize)
            .min(self.slices.len().saturating_sub(1));
        self.slices
            .iter()
            .enumerate()
            .map(|(i, slice)| if i == marker { '|' } else { slice.symbol() })
            .collect()
    }
}
