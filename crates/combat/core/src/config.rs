//! Combat configuration constants and tunable parameters.

/// Tunable rules for one [`CombatSystem`](crate::CombatSystem).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatConfig {
    pub damage: DamageRules,
    pub meter: MeterRules,
    pub text: BattleText,
    /// Seconds an enemy's "acting" cue stays lit after it resolves an action.
    pub enemy_cue_seconds: f32,
    /// Number of resolved-action lines kept in the battle log.
    pub log_capacity: usize,
}

impl CombatConfig {
    // ===== compile-time constants =====
    /// Multiplier applied to the damage modifier on a CRIT stage.
    pub const CRIT_MULTIPLIER: f32 = 1.5;
    /// Lowest damage any damaging action may deal.
    pub const MINIMUM_DAMAGE: u32 = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_METER_WIDTH: f32 = 100.0;
    pub const DEFAULT_ENEMY_CUE_SECONDS: f32 = 0.4;
    pub const DEFAULT_LOG_CAPACITY: usize = 32;

    pub fn new() -> Self {
        Self {
            damage: DamageRules::default(),
            meter: MeterRules::default(),
            text: BattleText::default(),
            enemy_cue_seconds: Self::DEFAULT_ENEMY_CUE_SECONDS,
            log_capacity: Self::DEFAULT_LOG_CAPACITY,
        }
    }

    #[must_use]
    pub fn with_patterns(mut self, patterns: Vec<PatternSpec>) -> Self {
        self.meter.patterns = patterns;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Damage formula parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DamageRules {
    /// Floor applied after defense; values below 1 are raised to 1.
    pub minimum: u32,
}

impl DamageRules {
    /// Effective floor (never below [`CombatConfig::MINIMUM_DAMAGE`]).
    pub fn floor(&self) -> u32 {
        self.minimum.max(CombatConfig::MINIMUM_DAMAGE)
    }
}

impl Default for DamageRules {
    fn default() -> Self {
        Self {
            minimum: CombatConfig::MINIMUM_DAMAGE,
        }
    }
}

/// Power meter parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MeterRules {
    /// Meter width in cursor units; slices share it evenly.
    pub width: f32,
    pub crit_multiplier: f32,
    /// Optional multiplier for HIT on any stage after the first.
    ///
    /// `None` keeps HIT neutral.
    pub hit_bonus: Option<f32>,
    /// Escalating stages, first to last.
    pub patterns: Vec<PatternSpec>,
}

impl Default for MeterRules {
    fn default() -> Self {
        Self {
            width: CombatConfig::DEFAULT_METER_WIDTH,
            crit_multiplier: CombatConfig::CRIT_MULTIPLIER,
            hit_bonus: None,
            patterns: vec![
                PatternSpec::new("--===XX===--", 80.0),
                PatternSpec::new("---==X==---", 130.0),
                PatternSpec::new("----=X=----", 190.0),
            ],
        }
    }
}

/// Textual layout and cursor speed of one meter stage.
///
/// Layout characters: `-` miss, `=` hit, `x`/`X` crit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternSpec {
    pub layout: String,
    /// Cursor speed in width units per second. The sign sets the initial direction.
    pub speed: f32,
}

impl PatternSpec {
    pub fn new(layout: impl Into<String>, speed: f32) -> Self {
        Self {
            layout: layout.into(),
            speed,
        }
    }
}

/// Lines shown by the battle text surface.
///
/// `{enemy}`, `{target}` and `{round}` are substituted where noted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BattleText {
    /// Opening line; `{enemy}` is the first enemy's name.
    pub opening: String,
    /// Shown when a new round starts; `{round}` is the round number.
    pub new_round: String,
    /// Target selection prompt; `{target}` is the highlighted combatant.
    pub target_prompt: String,
    pub victory: String,
    pub defeat: String,
}

impl BattleText {
    pub(crate) fn render(template: &str, key: &str, value: impl AsRef<str>) -> String {
        template.replace(key, value.as_ref())
    }
}

impl Default for BattleText {
    fn default() -> Self {
        Self {
            opening: "{enemy} draws near!".to_owned(),
            new_round: "Round {round}.".to_owned(),
            target_prompt: "Target: {target}".to_owned(),
            victory: "The enemies have been defeated!".to_owned(),
            defeat: "Your party has fallen...".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_hit_neutral() {
        let config = CombatConfig::default();
        assert_eq!(config.meter.hit_bonus, None);
        assert_eq!(config.meter.crit_multiplier, 1.5);
        assert_eq!(config.meter.patterns.len(), 3);
    }

    #[test]
    fn damage_floor_never_drops_below_one() {
        assert_eq!(DamageRules { minimum: 0 }.floor(), 1);
        assert_eq!(DamageRules { minimum: 3 }.floor(), 3);
    }

    #[test]
    fn text_templates_substitute_keys() {
        let text = BattleText::default();
        assert_eq!(
            BattleText::render(&text.opening, "{enemy}", "Slime"),
            "Slime draws near!"
        );
    }
}
