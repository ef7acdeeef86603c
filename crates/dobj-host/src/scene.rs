//! Serializable host scenes.
//!
//! A [`SceneSnapshot`] bundles an object table, the data sheets it refers to
//! and an optional camera. Scenes can be captured to JSON and loaded back,
//! which lets the overlay be exercised without a running game client.
//! [`generate_scene`] builds a deterministic pseudo-random scene from a seed.

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::entity::{CastInfo, CharacterState, Entity, Gauge, StatusFlags};
use crate::kind::ObjectKind;
use crate::math::{Vec2, Vec3};
use crate::projection::PerspectiveCamera;
use crate::sheets::{AetheryteRow, SheetSet, TerritoryRow};
use crate::table::ObjectTable;
use crate::HostError;

// ---------------------------------------------------------------------------
// SceneSnapshot
// ---------------------------------------------------------------------------

/// A captured host state: objects, sheets and camera.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub objects: ObjectTable,
    #[serde(default)]
    pub sheets: SheetSet,
    #[serde(default)]
    pub camera: Option<PerspectiveCamera>,
}

impl SceneSnapshot {
    /// Parse a scene from a JSON document.
    pub fn from_json_str(json: &str) -> Result<SceneSnapshot, HostError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene from a JSON file.
    pub fn load(path: &Path) -> Result<SceneSnapshot, HostError> {
        let json = std::fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let scene = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            objects = scene.objects.len(),
            "scene loaded"
        );
        Ok(scene)
    }

    /// Serialize the scene as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, HostError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Scene generation
// ---------------------------------------------------------------------------

const FIRST_NAMES: &[&str] = &[
    "Alisaie", "Thancred", "Y'shtola", "Urianger", "Estinien", "Tataru", "Krile", "Lyse",
];
const LAST_NAMES: &[&str] = &["Leveilleur", "Waters", "Rhul", "Augurelt", "Wyrmblood", "Taru"];
const ENEMY_NAMES: &[&str] = &["Coeurl", "Morbol", "Tonberry", "Behemoth", "Malboro", "Ahriman"];
const NPC_NAMES: &[&str] = &["Merchant", "Marketboard", "Levemete", "Guildmaster", "Vendor"];
const COMPANY_TAGS: &[&str] = &["", "", "FATE", "MOGS", "Crys"];
const ACTIONS: &[(u32, &str)] = &[
    (7, "Attack"),
    (141, "Fire"),
    (142, "Blizzard"),
    (152, "Fire III"),
    (1531, "Hellfire"),
    (3569, "Aero III"),
];

/// Kinds used by the generator, weighted towards characters.
const GENERATED_KINDS: &[ObjectKind] = &[
    ObjectKind::Player,
    ObjectKind::Player,
    ObjectKind::BattleNpc,
    ObjectKind::BattleNpc,
    ObjectKind::BattleNpc,
    ObjectKind::EventNpc,
    ObjectKind::Treasure,
    ObjectKind::Aetheryte,
    ObjectKind::GatheringPoint,
    ObjectKind::EventObj,
    ObjectKind::Companion,
    ObjectKind::Housing,
];

/// Sheets shared by every generated scene: a few actions and a single
/// aetheryte (row 8) with its territory and place names.
fn generated_sheets() -> SheetSet {
    let mut sheets = SheetSet::new();
    for (id, name) in ACTIONS {
        sheets.add_action(*id, name);
    }
    sheets.add_place_name(22, "La Noscea");
    sheets.add_place_name(27, "Limsa Lominsa");
    sheets.add_place_name(28, "Limsa Lominsa Lower Decks");
    sheets.add_place_name(41, "Limsa Lominsa Aetheryte Plaza");
    sheets.add_territory(TerritoryRow {
        row_id: 129,
        place_name: 28,
        place_name_zone: 27,
        place_name_region: 22,
    });
    sheets.add_aetheryte(AetheryteRow {
        row_id: 8,
        place_name: 41,
        territory: 129,
    });
    sheets
}

fn pick<'a>(rng: &mut Pcg64, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn gauge(rng: &mut Pcg64, max: u32) -> Gauge {
    Gauge::new(rng.gen_range(0..=max), max)
}

fn generate_character(rng: &mut Pcg64, kind: ObjectKind) -> CharacterState {
    let level = rng.gen_range(1..=100u8);
    let max_hp = u32::from(level) * rng.gen_range(500..2_000);
    let mut status = StatusFlags::empty();
    if kind == ObjectKind::BattleNpc {
        status |= StatusFlags::HOSTILE;
    }
    if rng.gen_bool(0.3) {
        status |= StatusFlags::IN_COMBAT | StatusFlags::WEAPON_OUT;
    }

    let cast = if kind.is_battle_capable() && rng.gen_bool(0.25) {
        let (action_id, _) = ACTIONS[rng.gen_range(0..ACTIONS.len())];
        let total_time = rng.gen_range(1.0..5.0f32);
        status |= StatusFlags::IS_CASTING;
        Some(CastInfo {
            action_id,
            action_type: 1,
            current_time: rng.gen_range(0.0..total_time),
            total_time,
            interruptible: rng.gen_bool(0.5),
        })
    } else {
        None
    };

    CharacterState {
        company_tag: if kind == ObjectKind::Player {
            pick(rng, COMPANY_TAGS).to_owned()
        } else {
            String::new()
        },
        level,
        hp: gauge(rng, max_hp),
        mp: Gauge::full(10_000),
        gp: if kind == ObjectKind::Player { gauge(rng, 900) } else { Gauge::default() },
        cp: if kind == ObjectKind::Player { gauge(rng, 600) } else { Gauge::default() },
        shield_percentage: if rng.gen_bool(0.2) { rng.gen_range(1..=50) } else { 0 },
        status,
        cast,
    }
}

/// Build a deterministic scene of `count` objects scattered around the
/// origin, with a camera looking at them from above and behind.
///
/// The same seed always produces the same scene.
pub fn generate_scene(seed: u64, count: usize) -> SceneSnapshot {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut objects = ObjectTable::new();

    for i in 0..count {
        let kind = GENERATED_KINDS[rng.gen_range(0..GENERATED_KINDS.len())];
        let position = Vec3::new(
            rng.gen_range(-40.0..40.0),
            rng.gen_range(0.0..4.0),
            rng.gen_range(-40.0..40.0),
        );
        let name = match kind {
            ObjectKind::Player => {
                format!("{} {}", pick(&mut rng, FIRST_NAMES), pick(&mut rng, LAST_NAMES))
            }
            ObjectKind::BattleNpc => pick(&mut rng, ENEMY_NAMES).to_owned(),
            ObjectKind::EventNpc => pick(&mut rng, NPC_NAMES).to_owned(),
            ObjectKind::Aetheryte => "aetheryte".to_owned(),
            ObjectKind::Treasure => "Treasure Coffer".to_owned(),
            // Many host objects have no name at all.
            _ => String::new(),
        };

        let game_object_id = 0x1000_0000 + i as u64;
        let mut entity = Entity::new(game_object_id, kind, &name, position)
            .with_ids(0x4000_0000 + i as u32, rng.gen_range(1..20_000));
        entity.hitbox_radius = rng.gen_range(0.3..3.0);
        entity.is_targetable = rng.gen_bool(0.9);

        match kind {
            ObjectKind::BattleNpc => {
                entity.sub_kind = if rng.gen_bool(0.8) { 5 } else { 2 };
                entity.character = Some(generate_character(&mut rng, kind));
                entity.is_dead = rng.gen_bool(0.1);
            }
            ObjectKind::Player | ObjectKind::EventNpc => {
                entity.character = Some(generate_character(&mut rng, kind));
            }
            ObjectKind::Aetheryte => {
                // Mostly the known aetheryte, sometimes an unknown row.
                entity.data_id = if rng.gen_bool(0.8) { 8 } else { 9_999 };
            }
            _ => {}
        }

        objects.insert(entity);
    }

    let camera = PerspectiveCamera::looking_at(
        Vec3::new(0.0, 25.0, -60.0),
        Vec3::ZERO,
        Vec2::new(1280.0, 720.0),
    );

    SceneSnapshot {
        objects,
        sheets: generated_sheets(),
        camera: Some(camera),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = generate_scene(42, 50);
        let b = generate_scene(42, 50);
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }

    #[test]
    fn different_seeds_differ() {
        let a = serde_json::to_string(&generate_scene(1, 50)).unwrap();
        let b = serde_json::to_string(&generate_scene(2, 50)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_scene_has_requested_count_and_camera() {
        let scene = generate_scene(7, 120);
        assert_eq!(scene.objects.len(), 120);
        assert!(scene.camera.is_some());
        assert!(scene.objects.iter().all(|e| e.kind != ObjectKind::None));
    }

    #[test]
    fn characters_have_state_and_others_do_not() {
        let scene = generate_scene(3, 200);
        for e in scene.objects.iter() {
            assert_eq!(e.character.is_some(), e.kind.is_character(), "{e:?}");
        }
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = SceneSnapshot::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, HostError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneSnapshot::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, HostError::Io { .. }));
    }
}
