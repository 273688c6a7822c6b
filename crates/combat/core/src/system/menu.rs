//! Command menu shown on a player's turn.

/// A top-level battle command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum MenuChoice {
    Attack,
    Technique,
}

impl MenuChoice {
    pub const ALL: [Self; 2] = [Self::Attack, Self::Technique];

    pub fn label(self) -> &'static str {
        match self {
            Self::Attack => "Attack",
            Self::Technique => "Technique",
        }
    }
}

/// Wrapping cursor over [`MenuChoice::ALL`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Menu {
    selected: usize,
}

impl Menu {
    pub fn choices(&self) -> &'static [MenuChoice] {
        &MenuChoice::ALL
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> MenuChoice {
        MenuChoice::ALL[self.selected]
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    pub fn cycle(&mut self, delta: isize) {
        let len = MenuChoice::ALL.len() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
    }
}
