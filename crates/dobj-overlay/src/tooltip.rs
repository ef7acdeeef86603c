//! Tooltip text composition.
//!
//! Every function here is pure: it takes an entity snapshot (and, for the
//! detail blocks, read-only game data) and returns the text to draw. Layout
//! and colors live in [`crate::overlay`].
//!
//! There are two basic tooltips:
//!
//! - the **full** tooltip shown when the cursor is over a marker, one
//!   `Label: value` line per identity field;
//! - the **ambient** tooltip shown next to every marker, just the name and
//!   the kind.
//!
//! Under the cursor a second **detail** block is shown beside the full
//! tooltip. Which detail block an entity gets depends only on its kind, see
//! [`DetailKind`].

use dobj_host::entity::{CastInfo, CharacterState, Entity, Gauge};
use dobj_host::kind::{ActionType, BattleNpcSubKind, ObjectKind};
use dobj_host::sheets::{resolve_aetheryte, GameData};

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Display name of an entity. Players with a company tag get `Name <Tag>`.
pub fn object_name(entity: &Entity) -> String {
    let tag = entity.company_tag();
    if entity.kind == ObjectKind::Player && !tag.is_empty() {
        format!("{} <{}>", entity.name, tag)
    } else {
        entity.name.clone()
    }
}

/// Kind label. Battle NPCs include their sub-kind: `BattleNpc->Enemy`.
pub fn object_kind_string(entity: &Entity) -> String {
    match entity.kind {
        ObjectKind::BattleNpc => format!(
            "{}->{}",
            entity.kind,
            BattleNpcSubKind::label(entity.sub_kind)
        ),
        kind => kind.to_string(),
    }
}

/// `True` or `False`, the way the game client prints flags.
fn bool_label(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

// ---------------------------------------------------------------------------
// Basic tooltips
// ---------------------------------------------------------------------------

/// Identity tooltip shown under the cursor.
pub fn full_tooltip(entity: &Entity) -> String {
    let p = entity.position;
    format!(
        "Name: {}\n\
         Type: {}\n\
         Dead: {}\n\
         Targetable: {}\n\
         HitboxRadius: {:.2}\n\
         Position: (x:{:.2}, y:{:.2}, z:{:.2})\n\
         GameObjectId: {}\n\
         EntityId: {}\n\
         DataId: {}",
        object_name(entity),
        object_kind_string(entity),
        bool_label(entity.is_dead),
        bool_label(entity.is_targetable),
        entity.hitbox_radius,
        p.x,
        p.y,
        p.z,
        entity.game_object_id,
        entity.entity_id,
        entity.data_id,
    )
}

/// Short tooltip shown next to every marker.
///
/// Unnamed entities show only `[Kind]`.
pub fn ambient_tooltip(entity: &Entity) -> String {
    if entity.name.is_empty() {
        format!("[{}]", object_kind_string(entity))
    } else {
        format!("{}\n[{}]", object_name(entity), object_kind_string(entity))
    }
}

// ---------------------------------------------------------------------------
// Detail blocks
// ---------------------------------------------------------------------------

/// Which detail block an object kind gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    /// Character block followed by the cast block while casting.
    Battle,
    /// Character block only.
    Character,
    /// Aetheryte location names.
    Aetheryte,
    /// No detail block.
    Empty,
}

impl DetailKind {
    pub fn for_kind(kind: ObjectKind) -> DetailKind {
        match kind {
            ObjectKind::Player | ObjectKind::BattleNpc => DetailKind::Battle,
            ObjectKind::EventNpc => DetailKind::Character,
            ObjectKind::Aetheryte => DetailKind::Aetheryte,
            ObjectKind::None
            | ObjectKind::Treasure
            | ObjectKind::GatheringPoint
            | ObjectKind::EventObj
            | ObjectKind::MountType
            | ObjectKind::Companion
            | ObjectKind::Retainer
            | ObjectKind::Area
            | ObjectKind::Housing
            | ObjectKind::Cutscene
            | ObjectKind::CardStand
            | ObjectKind::Ornament => DetailKind::Empty,
        }
    }
}

/// Detail block for `entity`, or `""` when there is nothing to show.
///
/// Character kinds without character state produce an empty block, as do
/// aetherytes whose sheet rows cannot be resolved.
pub fn detail_tooltip(entity: &Entity, data: &dyn GameData) -> String {
    match DetailKind::for_kind(entity.kind) {
        DetailKind::Battle => match &entity.character {
            Some(character) => battle_detail(character, data),
            None => String::new(),
        },
        DetailKind::Character => entity
            .character
            .as_ref()
            .map(character_detail)
            .unwrap_or_default(),
        DetailKind::Aetheryte => aetheryte_detail(entity.data_id, data),
        DetailKind::Empty => String::new(),
    }
}

/// Level, vitals and status of a character.
pub fn character_detail(character: &CharacterState) -> String {
    let gauge = |g: Gauge| format!("{}/{}", group_thousands(g.current), group_thousands(g.max));
    format!(
        "Level: {}\n\
         HP: {} (+{}%)\n\
         MP: {}\n\
         GP: {}\n\
         CP: {}\n\
         Status: {}",
        character.level,
        gauge(character.hp),
        character.shield_percentage,
        gauge(character.mp),
        gauge(character.gp),
        gauge(character.cp),
        character.status,
    )
}

/// Character block plus the cast block while the character is casting.
pub fn battle_detail(character: &CharacterState, data: &dyn GameData) -> String {
    let mut text = character_detail(character);
    if let Some(cast) = &character.cast {
        text.push('\n');
        text.push_str(&cast_detail(cast, data));
    }
    text
}

/// Cast block. A missing action row drops the name: `Casting [id]`.
pub fn cast_detail(cast: &CastInfo, data: &dyn GameData) -> String {
    let mut text = String::from("Casting ");
    if let Some(row) = data.action(cast.action_id) {
        text.push_str(&row.name);
        text.push(' ');
    }
    text.push_str(&format!(
        "[{}]\n\
         \tType: {}\n\
         \tInterruptible: {}\n\
         \tTime: {:.2}/{:.2}",
        cast.action_id,
        ActionType::label(cast.action_type),
        bool_label(cast.interruptible),
        cast.current_time,
        cast.total_time,
    ));
    text
}

/// Zone, region, territory and aetheryte names for an aetheryte row.
///
/// Empty if any row along the lookup chain is missing.
pub fn aetheryte_detail(aetheryte_id: u32, data: &dyn GameData) -> String {
    match resolve_aetheryte(data, aetheryte_id) {
        Some(info) => format!(
            "Zone: {}\nRegion: {}\nTerritory: {} [{}]\nAetheryte: {} [{}]",
            info.zone,
            info.region,
            info.territory_name,
            info.territory_id,
            info.aetheryte_name,
            info.aetheryte_id,
        ),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// `12345` -> `"12,345"`.
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
