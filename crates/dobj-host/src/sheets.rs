//! Read-only game data sheets.
//!
//! The overlay only needs a handful of keyed lookups: action names for
//! casts, and the territory/place-name chain behind an aetheryte. Every
//! lookup may miss; callers degrade instead of failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A row of the action sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRow {
    pub row_id: u32,
    pub name: String,
}

/// A row of the place-name sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceNameRow {
    pub row_id: u32,
    pub name: String,
}

/// A row of the territory sheet. The three fields reference place names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryRow {
    pub row_id: u32,
    pub place_name: u32,
    pub place_name_zone: u32,
    pub place_name_region: u32,
}

/// A row of the aetheryte sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AetheryteRow {
    pub row_id: u32,
    pub place_name: u32,
    pub territory: u32,
}

// ---------------------------------------------------------------------------
// GameData
// ---------------------------------------------------------------------------

/// Keyed row lookups into the host's data sheets.
///
/// A missing sheet and a missing row are indistinguishable to callers: both
/// are `None`.
pub trait GameData {
    fn action(&self, row_id: u32) -> Option<ActionRow>;
    fn aetheryte(&self, row_id: u32) -> Option<AetheryteRow>;
    fn territory(&self, row_id: u32) -> Option<TerritoryRow>;
    fn place_name(&self, row_id: u32) -> Option<PlaceNameRow>;
}

/// Fully resolved naming for an aetheryte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AetheryteInfo {
    pub zone: String,
    pub region: String,
    pub territory_name: String,
    pub territory_id: u32,
    pub aetheryte_name: String,
    pub aetheryte_id: u32,
}

/// Follow aetheryte -> territory -> place names. Any missing row along the
/// chain yields `None`.
pub fn resolve_aetheryte(data: &dyn GameData, aetheryte_id: u32) -> Option<AetheryteInfo> {
    let aetheryte = data.aetheryte(aetheryte_id)?;
    let territory = data.territory(aetheryte.territory)?;
    let name = |row_id: u32| data.place_name(row_id).map(|row| row.name);

    let info = AetheryteInfo {
        zone: name(territory.place_name_zone)?,
        region: name(territory.place_name_region)?,
        territory_name: name(territory.place_name)?,
        territory_id: territory.row_id,
        aetheryte_name: name(aetheryte.place_name)?,
        aetheryte_id: aetheryte.row_id,
    };
    Some(info)
}

// ---------------------------------------------------------------------------
// SheetSet
// ---------------------------------------------------------------------------

/// In-memory sheets keyed by row id.
///
/// Uses `BTreeMap` so serialized sheets have a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetSet {
    #[serde(default)]
    pub actions: BTreeMap<u32, ActionRow>,
    #[serde(default)]
    pub aetherytes: BTreeMap<u32, AetheryteRow>,
    #[serde(default)]
    pub territories: BTreeMap<u32, TerritoryRow>,
    #[serde(default)]
    pub place_names: BTreeMap<u32, PlaceNameRow>,
}

impl SheetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, row_id: u32, name: &str) {
        self.actions.insert(
            row_id,
            ActionRow {
                row_id,
                name: name.to_owned(),
            },
        );
    }

    pub fn add_place_name(&mut self, row_id: u32, name: &str) {
        self.place_names.insert(
            row_id,
            PlaceNameRow {
                row_id,
                name: name.to_owned(),
            },
        );
    }

    pub fn add_territory(&mut self, row: TerritoryRow) {
        self.territories.insert(row.row_id, row);
    }

    pub fn add_aetheryte(&mut self, row: AetheryteRow) {
        self.aetherytes.insert(row.row_id, row);
    }
}

impl GameData for SheetSet {
    fn action(&self, row_id: u32) -> Option<ActionRow> {
        let row = self.actions.get(&row_id).cloned();
        if row.is_none() {
            tracing::trace!(row_id, "action row not found");
        }
        row
    }

    fn aetheryte(&self, row_id: u32) -> Option<AetheryteRow> {
        let row = self.aetherytes.get(&row_id).cloned();
        if row.is_none() {
            tracing::trace!(row_id, "aetheryte row not found");
        }
        row
    }

    fn territory(&self, row_id: u32) -> Option<TerritoryRow> {
        self.territories.get(&row_id).cloned()
    }

    fn place_name(&self, row_id: u32) -> Option<PlaceNameRow> {
        self.place_names.get(&row_id).cloned()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
