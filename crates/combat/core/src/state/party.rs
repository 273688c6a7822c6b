//! Ordered parties and stable combatant handles.
//!
//! Indices into a party shift when a defeated enemy is removed, so actions
//! and logs refer to combatants through [`CombatantId`] instead. Selection
//! indices kept by the controller are re-clamped after every removal.

use std::fmt;

use super::entity::CombatEntity;

/// Side of the battlefield a party fights on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    #[default]
    Players,
    Enemies,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Players => Self::Enemies,
            Self::Enemies => Self::Players,
        }
    }
}

/// Stable identifier for a combatant within one battle.
///
/// The slot is the combatant's position at engage time and never changes,
/// even after earlier members are removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId {
    pub side: Side,
    pub slot: usize,
}

impl CombatantId {
    pub const fn new(side: Side, slot: usize) -> Self {
        Self { side, slot }
    }

    pub const fn player(slot: usize) -> Self {
        Self::new(Side::Players, slot)
    }

    pub const fn enemy(slot: usize) -> Self {
        Self::new(Side::Enemies, slot)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.side {
            Side::Players => 'P',
            Side::Enemies => 'E',
        };
        write!(f, "{prefix}{}", self.slot)
    }
}

/// Ordered collection of combatants on one side of a battle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Party {
    side: Side,
    members: Vec<CombatEntity>,
}

impl Party {
    /// Builds a party, assigning each member a stable id from its position.
    pub fn new(side: Side, members: Vec<CombatEntity>) -> Self {
        let members = members
            .into_iter()
            .enumerate()
            .map(|(slot, mut member)| {
                member.id = CombatantId::new(side, slot);
                member
            })
            .collect();
        Self { side, members }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[CombatEntity] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEntity> {
        self.members.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CombatEntity> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CombatEntity> {
        self.members.get_mut(index)
    }

    /// Current position of the combatant with the given id.
    pub fn position_of(&self, id: CombatantId) -> Option<usize> {
        self.members.iter().position(|member| member.id == id)
    }

    pub fn find(&self, id: CombatantId) -> Option<&CombatEntity> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn find_mut(&mut self, id: CombatantId) -> Option<&mut CombatEntity> {
        self.members.iter_mut().find(|member| member.id == id)
    }

    /// Physically removes a combatant; later members shift down by one.
    pub fn remove(&mut self, id: CombatantId) -> Option<CombatEntity> {
        let index = self.position_of(id)?;
        Some(self.members.remove(index))
    }

    /// Drops every defeated member and returns how many were removed.
    pub fn remove_defeated(&mut self) -> usize {
        let before = self.members.len();
        self.members.retain(CombatEntity::is_alive);
        before - self.members.len()
    }

    /// True when the party is empty or every member is down.
    pub fn is_defeated(&self) -> bool {
        self.members.iter().all(|member| !member.is_alive())
    }

    pub fn into_members(self) -> Vec<CombatEntity> {
        self.members
    }
}

// ============================================================================
// Living-member queries
// ============================================================================

/// Index of the first living combatant.
pub fn first_living(members: &[CombatEntity]) -> Option<usize> {
    members.iter().position(CombatEntity::is_alive)
}

/// Index of the first living combatant strictly after `index`.
///
/// `None` means the scan ran off the end of the party.
pub fn next_living_after(members: &[CombatEntity], index: usize) -> Option<usize> {
    members
        .iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, member)| member.is_alive())
        .map(|(position, _)| position)
}

/// Clamps `index` into `[0, len)`; an empty party clamps to zero.
#[inline]
pub fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

// ============================================================================
// Roster
// ============================================================================

/// Both parties of an engaged battle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    pub players: Party,
    pub enemies: Party,
}

impl Roster {
    pub fn new(players: Vec<CombatEntity>, enemies: Vec<CombatEntity>) -> Self {
        Self {
            players: Party::new(Side::Players, players),
            enemies: Party::new(Side::Enemies, enemies),
        }
    }

    pub fn party(&self, side: Side) -> &Party {
        match side {
            Side::Players => &self.players,
            Side::Enemies => &self.enemies,
        }
    }

    pub fn party_mut(&mut self, side: Side) -> &mut Party {
        match side {
            Side::Players => &mut self.players,
            Side::Enemies => &mut self.enemies,
        }
    }

    pub fn get(&self, id: CombatantId) -> Option<&CombatEntity> {
        self.party(id.side).find(id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut CombatEntity> {
        self.party_mut(id.side).find_mut(id)
    }
}
