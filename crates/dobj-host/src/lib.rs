//! Display Objects host model -- read-only view of the game client's world.
//!
//! This crate describes everything the overlay consumes from the host game
//! process: the live object table, the world-to-screen projection, and the
//! game data sheets used for name lookups. Each host service is a small
//! capability trait so the overlay can run against the real client or against
//! the in-memory implementations provided here ([`ObjectTable`],
//! [`PerspectiveCamera`], [`SheetSet`]).
//!
//! # Quick Start
//!
//! ```
//! use dobj_host::prelude::*;
//!
//! let mut table = ObjectTable::new();
//! table.insert(Entity::new(0x1000_0001, ObjectKind::Player, "Alphinaud", Vec3::new(0.0, 0.0, 5.0)));
//!
//! let camera = PerspectiveCamera::looking_at(
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(0.0, 0.0, 1.0),
//!     Vec2::new(800.0, 600.0),
//! );
//!
//! for entity in table.entities() {
//!     let screen = camera.world_to_screen(entity.position).unwrap();
//!     assert_eq!(screen, Vec2::new(400.0, 300.0));
//! }
//! ```

#![deny(unsafe_code)]

pub mod entity;
pub mod kind;
pub mod math;
pub mod projection;
pub mod scene;
pub mod sheets;
pub mod table;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while loading host snapshots.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A snapshot file could not be read.
    #[error("failed to read scene '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot document was not valid JSON for the expected schema.
    #[error("failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),

    /// An object kind index outside the fixed kind range.
    #[error("object kind index {index} out of range (0..{count})")]
    InvalidKind { index: usize, count: usize },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::entity::{CastInfo, CharacterState, Entity, Gauge, StatusFlags};
    pub use crate::kind::{ActionType, BattleNpcSubKind, ObjectKind, KIND_COUNT};
    pub use crate::math::{Vec2, Vec3};
    pub use crate::projection::{PerspectiveCamera, WorldToScreen};
    pub use crate::scene::{generate_scene, SceneSnapshot};
    pub use crate::sheets::{
        resolve_aetheryte, ActionRow, AetheryteInfo, AetheryteRow, GameData, PlaceNameRow,
        SheetSet, TerritoryRow,
    };
    pub use crate::table::{EntitySource, ObjectTable};
    pub use crate::HostError;
}
