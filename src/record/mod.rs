//! Entity records carried in container payloads.
//!
//! Every payload is a JSON object whose `"ItemType"` integer selects the
//! record schema.  [`Record::from_json`] dispatches on [`ItemType`] with an
//! exhaustive `match`, so adding a type without a decoder fails to compile.
//!
//! Fields are read leniently: anything missing takes the game's default and
//! unknown fields are ignored.

mod types;

pub use types::*;

use std::fmt;

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload has no integer \"ItemType\" field")]
    MissingItemType,
    #[error("unknown ItemType: {0}")]
    UnknownItemType(i64),
}

// ── ItemType ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemType {
    Component,
    Device,
    Weapon,
    Ammunition,
    DroneBay,
    Ship,
    Satellite,
    ShipBuild,
    SatelliteBuild,
    Technology,
    ComponentStats,
    ComponentModification,
    TechnologyMap,
    ShipBuilderSettings,
}

impl ItemType {
    pub const ALL: [ItemType; 14] = [
        ItemType::Component,
        ItemType::Device,
        ItemType::Weapon,
        ItemType::Ammunition,
        ItemType::DroneBay,
        ItemType::Ship,
        ItemType::Satellite,
        ItemType::ShipBuild,
        ItemType::SatelliteBuild,
        ItemType::Technology,
        ItemType::ComponentStats,
        ItemType::ComponentModification,
        ItemType::TechnologyMap,
        ItemType::ShipBuilderSettings,
    ];

    /// The integer written in the `"ItemType"` field.
    pub fn code(self) -> i64 {
        match self {
            ItemType::Component             => 1,
            ItemType::Device                => 2,
            ItemType::Weapon                => 3,
            ItemType::Ammunition            => 4,
            ItemType::DroneBay              => 5,
            ItemType::Ship                  => 6,
            ItemType::Satellite             => 7,
            ItemType::ShipBuild             => 8,
            ItemType::SatelliteBuild        => 9,
            ItemType::Technology            => 10,
            ItemType::ComponentStats        => 11,
            ItemType::ComponentModification => 12,
            ItemType::TechnologyMap         => 13,
            ItemType::ShipBuilderSettings   => 100,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        ItemType::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ItemType::Component             => "Component",
            ItemType::Device                => "Device",
            ItemType::Weapon                => "Weapon",
            ItemType::Ammunition            => "Ammunition",
            ItemType::DroneBay              => "DroneBay",
            ItemType::Ship                  => "Ship",
            ItemType::Satellite             => "Satellite",
            ItemType::ShipBuild             => "ShipBuild",
            ItemType::SatelliteBuild        => "SatelliteBuild",
            ItemType::Technology            => "Technology",
            ItemType::ComponentStats        => "ComponentStats",
            ItemType::ComponentModification => "ComponentModification",
            ItemType::TechnologyMap         => "TechnologyMap",
            ItemType::ShipBuilderSettings   => "ShipBuilderSettings",
        }
    }

    /// Directory (relative, `/`-separated) used by the exported database.
    pub fn dir_name(self) -> &'static str {
        match self {
            ItemType::Component             => "Component",
            ItemType::Device                => "Device",
            ItemType::Weapon                => "Weapon",
            ItemType::Ammunition            => "Ammunition",
            ItemType::DroneBay              => "DroneBay",
            ItemType::Ship                  => "Ship",
            ItemType::Satellite             => "Satellite",
            ItemType::ShipBuild             => "Ship/Build",
            ItemType::SatelliteBuild        => "Satellite/Build",
            ItemType::Technology            => "Technology",
            ItemType::ComponentStats        => "Component/Stats",
            ItemType::ComponentModification => "Component/Mod",
            ItemType::TechnologyMap         => "TechnologyMap",
            ItemType::ShipBuilderSettings   => "",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl TryFrom<i64> for ItemType {
    type Error = RecordError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        ItemType::from_code(code).ok_or(RecordError::UnknownItemType(code))
    }
}

// ── Faction ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    FreeStars,
    Veniri,
    Bushark,
    Korerans,
    Taraniaks,
    Sayjix,
    Jurgans,
    Zumbalari,
    Neganari,
    Daazen,
    Unknowns,
    TheEmpire,
    TheSwarm,
}

impl Faction {
    pub fn from_id(id: i32) -> Option<Self> {
        Some(match id {
            -1 | 0 => Faction::FreeStars,
            1      => Faction::Veniri,
            2      => Faction::Bushark,
            3      => Faction::Korerans,
            4      => Faction::Taraniaks,
            5      => Faction::Sayjix,
            6      => Faction::Jurgans,
            7      => Faction::Zumbalari,
            8      => Faction::Neganari,
            9      => Faction::Daazen,
            10     => Faction::Unknowns,
            11     => Faction::TheEmpire,
            12     => Faction::TheSwarm,
            _      => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Faction::FreeStars => "Free Stars",
            Faction::Veniri    => "Veniri",
            Faction::Bushark   => "Bushark",
            Faction::Korerans  => "Korerans",
            Faction::Taraniaks => "Taraniaks",
            Faction::Sayjix    => "Sayjix",
            Faction::Jurgans   => "Jurgans",
            Faction::Zumbalari => "Zumbalari",
            Faction::Neganari  => "Neganari",
            Faction::Daazen    => "Daazen",
            Faction::Unknowns  => "Unknowns",
            Faction::TheEmpire => "The Empire",
            Faction::TheSwarm  => "The Swarm",
        }
    }
}

// ── RecordKey ────────────────────────────────────────────────────────────────

/// Identity of a record across game versions: `(ItemType, Id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub item_type: ItemType,
    pub id: i32,
}

impl RecordKey {
    pub fn new(item_type: ItemType, id: i32) -> Self {
        Self { item_type, id }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.item_type, self.id)
    }
}

// ── Record ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Component(Component),
    Device(Device),
    Weapon(Weapon),
    Ammunition(Ammunition),
    DroneBay(DroneBay),
    Ship(Ship),
    Satellite(Satellite),
    ShipBuild(ShipBuild),
    SatelliteBuild(SatelliteBuild),
    Technology(Technology),
    ComponentStats(ComponentStats),
    ComponentModification(ComponentModification),
    TechnologyMap(TechnologyMap),
    ShipBuilderSettings(ShipBuilderSettings),
}

/// Rewrite floats without a fractional part (`3.0`) as integers, recursively.
/// Game data sometimes stores integer fields this way.
pub fn collapse_integral_floats(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(f) = n.as_f64() {
                // Beyond 2^53 the conversion would not be exact.
                if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                    *value = Value::from(f as i64);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(collapse_integral_floats),
        Value::Object(map) => map.values_mut().for_each(collapse_integral_floats),
        _ => {}
    }
}

/// Read the `"ItemType"` discriminator from a parsed payload.
pub fn item_type_of(value: &Value) -> Result<ItemType, RecordError> {
    let code = value
        .get("ItemType")
        .and_then(Value::as_i64)
        .ok_or(RecordError::MissingItemType)?;
    ItemType::try_from(code)
}

impl Record {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Integer fields accept integral floats such as `1.0`; float fields
    /// accept integers either way.
    pub fn from_value(mut value: Value) -> Result<Self, RecordError> {
        use serde_json::from_value as de;
        collapse_integral_floats(&mut value);
        Ok(match item_type_of(&value)? {
            ItemType::Component             => Record::Component(de(value)?),
            ItemType::Device                => Record::Device(de(value)?),
            ItemType::Weapon                => Record::Weapon(de(value)?),
            ItemType::Ammunition            => Record::Ammunition(de(value)?),
            ItemType::DroneBay              => Record::DroneBay(de(value)?),
            ItemType::Ship                  => Record::Ship(de(value)?),
            ItemType::Satellite             => Record::Satellite(de(value)?),
            ItemType::ShipBuild             => Record::ShipBuild(de(value)?),
            ItemType::SatelliteBuild        => Record::SatelliteBuild(de(value)?),
            ItemType::Technology            => Record::Technology(de(value)?),
            ItemType::ComponentStats        => Record::ComponentStats(de(value)?),
            ItemType::ComponentModification => Record::ComponentModification(de(value)?),
            ItemType::TechnologyMap         => Record::TechnologyMap(de(value)?),
            ItemType::ShipBuilderSettings   => Record::ShipBuilderSettings(de(value)?),
        })
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            Record::Component(_)             => ItemType::Component,
            Record::Device(_)                => ItemType::Device,
            Record::Weapon(_)                => ItemType::Weapon,
            Record::Ammunition(_)            => ItemType::Ammunition,
            Record::DroneBay(_)              => ItemType::DroneBay,
            Record::Ship(_)                  => ItemType::Ship,
            Record::Satellite(_)             => ItemType::Satellite,
            Record::ShipBuild(_)             => ItemType::ShipBuild,
            Record::SatelliteBuild(_)        => ItemType::SatelliteBuild,
            Record::Technology(_)            => ItemType::Technology,
            Record::ComponentStats(_)        => ItemType::ComponentStats,
            Record::ComponentModification(_) => ItemType::ComponentModification,
            Record::TechnologyMap(_)         => ItemType::TechnologyMap,
            Record::ShipBuilderSettings(_)   => ItemType::ShipBuilderSettings,
        }
    }

    /// Settings records have no `Id`; they are always id 0.
    pub fn id(&self) -> i32 {
        match self {
            Record::Component(r)             => r.id,
            Record::Device(r)                => r.id,
            Record::Weapon(r)                => r.id,
            Record::Ammunition(r)            => r.id,
            Record::DroneBay(r)              => r.id,
            Record::Ship(r)                  => r.id,
            Record::Satellite(r)             => r.id,
            Record::ShipBuild(r)             => r.id,
            Record::SatelliteBuild(r)        => r.id,
            Record::Technology(r)            => r.id,
            Record::ComponentStats(r)        => r.id,
            Record::ComponentModification(r) => r.id,
            Record::TechnologyMap(r)         => r.id,
            Record::ShipBuilderSettings(_)   => 0,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.item_type(), self.id())
    }
}
