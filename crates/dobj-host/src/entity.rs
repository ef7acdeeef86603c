//! Entity snapshots read from the host's object table.
//!
//! An [`Entity`] is an owned, immutable copy of one game object's state for a
//! single frame. Character-like objects additionally carry a
//! [`CharacterState`] with vitals, status and an optional active cast.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::kind::ObjectKind;
use crate::math::Vec3;

// ---------------------------------------------------------------------------
// StatusFlags
// ---------------------------------------------------------------------------

bitflags! {
    /// Character status bits reported by the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StatusFlags: u8 {
        const HOSTILE = 1;
        const IN_COMBAT = 1 << 1;
        const WEAPON_OUT = 1 << 2;
        const OFFHAND_OUT = 1 << 3;
        const PARTY_MEMBER = 1 << 4;
        const ALLIANCE_MEMBER = 1 << 5;
        const FRIEND = 1 << 6;
        const IS_CASTING = 1 << 7;
    }
}

const STATUS_NAMES: &[(StatusFlags, &str)] = &[
    (StatusFlags::HOSTILE, "Hostile"),
    (StatusFlags::IN_COMBAT, "InCombat"),
    (StatusFlags::WEAPON_OUT, "WeaponOut"),
    (StatusFlags::OFFHAND_OUT, "OffhandOut"),
    (StatusFlags::PARTY_MEMBER, "PartyMember"),
    (StatusFlags::ALLIANCE_MEMBER, "AllianceMember"),
    (StatusFlags::FRIEND, "Friend"),
    (StatusFlags::IS_CASTING, "IsCasting"),
];

impl fmt::Display for StatusFlags {
    /// `None` for no flags, otherwise flag names joined by `", "`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let names: Vec<&str> = STATUS_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Character state
// ---------------------------------------------------------------------------

/// A current/max pair (HP, MP, GP, CP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Gauge {
    pub current: u32,
    pub max: u32,
}

impl Gauge {
    pub const fn new(current: u32, max: u32) -> Self {
        Self { current, max }
    }

    /// A full gauge.
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }
}

/// An action being cast by a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastInfo {
    /// Row id in the action sheet.
    pub action_id: u32,
    /// Raw action type byte, see [`ActionType`](crate::kind::ActionType).
    pub action_type: u8,
    /// Elapsed cast time in seconds.
    pub current_time: f32,
    /// Total cast time in seconds.
    pub total_time: f32,
    pub interruptible: bool,
}

/// State carried by player, battle NPC and event NPC objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterState {
    /// Free company tag; empty when the character has none.
    #[serde(default)]
    pub company_tag: String,
    pub level: u8,
    pub hp: Gauge,
    #[serde(default)]
    pub mp: Gauge,
    #[serde(default)]
    pub gp: Gauge,
    #[serde(default)]
    pub cp: Gauge,
    /// Shield as a percentage of max HP.
    #[serde(default)]
    pub shield_percentage: u8,
    #[serde(default)]
    pub status: StatusFlags,
    /// Present while the character is casting.
    #[serde(default)]
    pub cast: Option<CastInfo>,
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Snapshot of a single game object for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable id that survives zone changes and relogs.
    pub game_object_id: u64,
    /// Per-session id assigned by the server.
    #[serde(default)]
    pub entity_id: u32,
    /// Template id into the kind's data sheet (e.g. the aetheryte row).
    #[serde(default)]
    pub data_id: u32,
    pub name: String,
    pub kind: ObjectKind,
    /// Raw sub-kind byte; only meaningful for [`ObjectKind::BattleNpc`].
    #[serde(default)]
    pub sub_kind: u8,
    pub position: Vec3,
    #[serde(default)]
    pub hitbox_radius: f32,
    #[serde(default)]
    pub is_dead: bool,
    #[serde(default = "default_true")]
    pub is_targetable: bool,
    #[serde(default)]
    pub character: Option<CharacterState>,
}

impl Entity {
    /// Create a targetable, alive entity with no character state.
    pub fn new(game_object_id: u64, kind: ObjectKind, name: &str, position: Vec3) -> Self {
        Self {
            game_object_id,
            entity_id: 0,
            data_id: 0,
            name: name.to_owned(),
            kind,
            sub_kind: 0,
            position,
            hitbox_radius: 0.5,
            is_dead: false,
            is_targetable: true,
            character: None,
        }
    }

    pub fn with_ids(mut self, entity_id: u32, data_id: u32) -> Self {
        self.entity_id = entity_id;
        self.data_id = data_id;
        self
    }

    pub fn with_sub_kind(mut self, sub_kind: u8) -> Self {
        self.sub_kind = sub_kind;
        self
    }

    pub fn with_character(mut self, character: CharacterState) -> Self {
        self.character = Some(character);
        self
    }

    /// The active cast, if this is a character that is casting.
    pub fn cast(&self) -> Option<&CastInfo> {
        self.character.as_ref().and_then(|c| c.cast.as_ref())
    }

    /// Company tag, or `""` for entities without one.
    pub fn company_tag(&self) -> &str {
        self.character
            .as_ref()
            .map(|c| c.company_tag.as_str())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
