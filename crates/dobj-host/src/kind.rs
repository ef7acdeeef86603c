//! Closed category tags for in-world objects.
//!
//! [`ObjectKind`] is the fixed set of object categories exposed by the host's
//! object table. Its discriminants match the host's numeric values and double
//! as indices into per-kind preference arrays, so the enum is `repr(u8)` and
//! [`KIND_COUNT`] is the length of those arrays.
//!
//! [`BattleNpcSubKind`] and [`ActionType`] are carried on entities as raw
//! bytes because the host may report values this crate does not know about;
//! the `label` helpers fall back to the number for unknown values.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, FromRepr, IntoEnumIterator};

use crate::HostError;

// ---------------------------------------------------------------------------
// ObjectKind
// ---------------------------------------------------------------------------

/// Category of a game object.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    FromRepr,
)]
#[repr(u8)]
pub enum ObjectKind {
    /// Placeholder for invalid or unset objects. Never displayed.
    None = 0,
    Player = 1,
    BattleNpc = 2,
    EventNpc = 3,
    Treasure = 4,
    Aetheryte = 5,
    GatheringPoint = 6,
    EventObj = 7,
    MountType = 8,
    Companion = 9,
    Retainer = 10,
    Area = 11,
    Housing = 12,
    Cutscene = 13,
    CardStand = 14,
    Ornament = 15,
}

/// Number of object kinds, including [`ObjectKind::None`].
pub const KIND_COUNT: usize = ObjectKind::COUNT;

impl ObjectKind {
    /// Index of this kind in per-kind arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Kind for a per-kind array index.
    pub fn from_index(index: usize) -> Result<ObjectKind, HostError> {
        u8::try_from(index)
            .ok()
            .and_then(ObjectKind::from_repr)
            .ok_or(HostError::InvalidKind {
                index,
                count: KIND_COUNT,
            })
    }

    /// All kinds a user may toggle, in index order (everything but `None`).
    pub fn toggleable() -> impl Iterator<Item = ObjectKind> {
        ObjectKind::iter().filter(|k| *k != ObjectKind::None)
    }

    /// Kinds whose objects carry character state (vitals, level, status).
    pub fn is_character(self) -> bool {
        matches!(
            self,
            ObjectKind::Player | ObjectKind::BattleNpc | ObjectKind::EventNpc
        )
    }

    /// Kinds whose objects can be casting an action.
    pub fn is_battle_capable(self) -> bool {
        matches!(self, ObjectKind::Player | ObjectKind::BattleNpc)
    }
}

// ---------------------------------------------------------------------------
// BattleNpcSubKind
// ---------------------------------------------------------------------------

/// Finer category for [`ObjectKind::BattleNpc`] objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(u8)]
pub enum BattleNpcSubKind {
    None = 0,
    BattleNpcPart = 1,
    Pet = 2,
    Chocobo = 3,
    Enemy = 5,
    NpcPartyMember = 9,
}

impl BattleNpcSubKind {
    /// Display name for a raw sub-kind byte.
    pub fn label(raw: u8) -> String {
        match BattleNpcSubKind::from_repr(raw) {
            Some(sub) => sub.to_string(),
            None => raw.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// Category of the action an object is casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(u8)]
pub enum ActionType {
    None = 0,
    Action = 1,
    Item = 2,
    EventItem = 3,
    EventAction = 4,
    GeneralAction = 5,
    BuddyAction = 6,
    MainCommand = 7,
    Companion = 8,
    CraftAction = 9,
    PetAction = 11,
    Mount = 13,
    PvPAction = 14,
    Waymark = 15,
    ChocoboRaceAbility = 16,
    ChocoboRaceItem = 17,
    BgcArmyAction = 19,
    Ornament = 20,
}

impl ActionType {
    /// Display name for a raw action type byte.
    pub fn label(raw: u8) -> String {
        match ActionType::from_repr(raw) {
            Some(t) => t.to_string(),
            None => raw.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
