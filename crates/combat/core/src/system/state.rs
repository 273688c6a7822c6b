//! Controller states and battle outcomes.

/// Phase of the combat controller. Input events are routed by this value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CombatSystemState {
    /// Showing battle text; confirm advances it.
    #[default]
    Text,
    /// Choosing the current player's command.
    MenuSelect,
    /// Choosing one of the current player's techniques.
    SelectTechnique,
    /// Choosing which enemy to strike.
    SelectEnemyTarget,
    /// Choosing which ally receives a heal or support technique.
    SelectPlayerTarget,
    /// Timing the power meter for the pending attack.
    PowerMeter,
    /// Enemies resolve their actions one per confirm.
    EnemyAct,
    /// Battle decided; the next confirm closes it.
    BattleOver,
}

impl CombatSystemState {
    /// States that a cancel input can unwind from.
    pub const fn is_cancellable(self) -> bool {
        matches!(
            self,
            Self::SelectTechnique | Self::SelectEnemyTarget | Self::SelectPlayerTarget
        )
    }
}

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// Injected end-of-battle hooks.
///
/// Exactly one of them runs, once per battle, when the player confirms the
/// final message.
pub struct BattleCallbacks {
    pub on_victory: Box<dyn FnMut()>,
    pub on_defeat: Box<dyn FnMut()>,
}

impl BattleCallbacks {
    pub fn new(on_victory: impl FnMut() + 'static, on_defeat: impl FnMut() + 'static) -> Self {
        Self {
            on_victory: Box::new(on_victory),
            on_defeat: Box::new(on_defeat),
        }
    }

    /// Callbacks that do nothing.
    pub fn none() -> Self {
        Self::new(|| {}, || {})
    }

    pub(crate) fn fire(&mut self, outcome: BattleOutcome) {
        match outcome {
            BattleOutcome::Victory => (self.on_victory)(),
            BattleOutcome::Defeat => (self.on_defeat)(),
        }
    }
}

impl Default for BattleCallbacks {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for BattleCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleCallbacks").finish_non_exhaustive()
    }
}
