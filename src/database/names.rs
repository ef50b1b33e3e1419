//! Derived display names.  Most records carry no name of their own and are
//! named after whatever references them.

use crate::record::{Component, Faction, ItemType, Record, RecordKey};

use super::Database;

/// Coupled ammunition can chain; stop following after this many hops.
const MAX_COUPLING_DEPTH: usize = 8;

const UNKNOWN: &str = "null";

impl Database {
    fn components(&self) -> impl Iterator<Item = &Component> {
        self.of_type(ItemType::Component).filter_map(|e| match &e.record {
            Record::Component(c) => Some(c),
            _                    => None,
        })
    }

    fn own_name(&self, key: RecordKey) -> Option<&str> {
        match self.record(key)? {
            Record::Component(c) => Some(&c.name),
            Record::Ship(s)      => Some(&s.name),
            Record::Satellite(s) => Some(&s.name),
            _                    => None,
        }
    }

    /// Name of the single component matching `pred`, `"many"`, or `None`.
    fn owner_name(&self, pred: impl Fn(&Component) -> bool) -> Option<String> {
        let owners: Vec<&Component> = self.components().filter(|&c| pred(c)).collect();
        match owners.as_slice() {
            []  => None,
            [c] => Some(c.name.clone()),
            _   => Some("many".into()),
        }
    }

    fn ammunition_name(&self, id: i32, depth: usize) -> String {
        if let Some(name) = self.owner_name(|c| c.ammunition_id == id) {
            return name;
        }
        if depth >= MAX_COUPLING_DEPTH {
            return UNKNOWN.into();
        }
        let coupled: Vec<i32> = self
            .of_type(ItemType::Ammunition)
            .filter_map(|e| match &e.record {
                Record::Ammunition(a) if a.coupled_ammunition_id == id => Some(a.id),
                _ => None,
            })
            .collect();
        match coupled.as_slice() {
            []   => "none".into(),
            [id] => format!("couple of {}", self.ammunition_name(*id, depth + 1)),
            _    => "couple of many".into(),
        }
    }

    fn stats_name(&self, id: i32) -> String {
        let owners: Vec<&Component> = self.components().filter(|c| c.component_stats_id == id).collect();
        match owners.as_slice() {
            []  => "none".into(),
            [c] => c.name.clone(),
            [first, ..] if first.is_device()    => "DefaultDevice".into(),
            [first, ..] if first.is_drone_bay() => "DefaultDroneBay".into(),
            [first, ..] if first.is_weapon()    => "DefaultWeapon".into(),
            _ => "many".into(),
        }
    }

    fn hull_name(&self, item_type: ItemType, id: i32) -> String {
        self.own_name(RecordKey::new(item_type, id))
            .unwrap_or(UNKNOWN)
            .to_owned()
    }

    /// Display name of `key`; empty when the record is absent.
    pub fn name_of(&self, key: RecordKey) -> String {
        let Some(record) = self.record(key) else {
            return String::new();
        };
        match record {
            Record::Component(c)             => c.name.clone(),
            Record::Device(d)                => format!("Device{}", d.id),
            Record::Weapon(w)                => self.owner_name(|c| c.weapon_id == w.id).unwrap_or_else(|| "none".into()),
            Record::Ammunition(a)            => self.ammunition_name(a.id, 0),
            Record::DroneBay(d)              => format!("DroneBay{}", d.id),
            Record::Ship(s)                  => s.name.clone(),
            Record::Satellite(s)             => s.name.clone(),
            Record::ShipBuild(b)             => format!("{} {}", b.difficulty_class, self.hull_name(ItemType::Ship, b.ship_id)),
            Record::SatelliteBuild(b)        => format!("{} {}", b.difficulty_class, self.hull_name(ItemType::Satellite, b.ship_id)),
            Record::Technology(t) => {
                let target = match t.kind {
                    0 => Some(ItemType::Component),
                    1 => Some(ItemType::Ship),
                    2 => Some(ItemType::Satellite),
                    _ => None,
                };
                target
                    .and_then(|ty| self.own_name(RecordKey::new(ty, t.item_id)))
                    .unwrap_or_default()
                    .to_owned()
            }
            Record::ComponentStats(s)        => self.stats_name(s.id),
            Record::ComponentModification(m) => format!("ComponentModification{}", m.id),
            Record::TechnologyMap(m) => match m.kind {
                1  => self.own_name(RecordKey::new(ItemType::Component, m.detail)).unwrap_or_default().to_owned(),
                2  => self.own_name(RecordKey::new(ItemType::Ship, m.detail)).unwrap_or_default().to_owned(),
                3  => "fleet size".into(),
                4  => "ship attack".into(),
                5  => "ship defence".into(),
                6  => "star base attack".into(),
                7  => "star base defence".into(),
                10 => "price".into(),
                11 => "magnet".into(),
                12 => "loot".into(),
                _  => String::new(),
            },
            Record::ShipBuilderSettings(_)   => "ShipBuilderSettings".into(),
        }
    }

    /// Base of the exported file name, before `{id}_` and `.json`.
    pub fn raw_file_name(&self, key: RecordKey) -> String {
        match self.record(key) {
            Some(Record::Device(_))                => "Device".into(),
            Some(Record::DroneBay(_))              => "DroneBay".into(),
            Some(Record::ComponentModification(_)) => "Modification".into(),
            Some(Record::ShipBuild(b)) => {
                format!("{}_{}", self.hull_name(ItemType::Ship, b.ship_id), b.difficulty_class)
            }
            Some(Record::SatelliteBuild(b)) => {
                format!("{}_{}", self.hull_name(ItemType::Satellite, b.ship_id), b.difficulty_class)
            }
            _ => self.name_of(key),
        }
    }

    /// One-line summary used by listings.
    pub fn describe(&self, key: RecordKey) -> String {
        let Some(entry) = self.get(key) else {
            return format!("{key} (missing)");
        };
        let file = entry.file_name();
        let id = key.id;
        let name = self.name_of(key);
        match &entry.record {
            Record::Component(c) => format!("{file} Component[{id:>3}] from {}: {name}", faction_name(c.faction)),
            Record::Ship(s)      => format!("{file} Ship[{id:>3}] from {}: {name}", faction_name(s.faction)),
            Record::Satellite(_) => format!("{file} Satellite[{id:>3}]: {name}"),
            Record::Weapon(_)     => format!("{file} Weapon[{id:>3}] of {name}"),
            Record::Ammunition(_) => format!("{file} Ammunition[{id:>3}] of {name}"),
            Record::ComponentStats(_) => format!("{file} ComponentStats[{id:>3}] of {name}"),
            Record::Device(_)                => format!("{file} Device[{id:>3}]"),
            Record::DroneBay(_)              => format!("{file} DroneBay[{id:>3}]"),
            Record::ComponentModification(_) => format!("{file} ComponentModification[{id:>3}]"),
            Record::ShipBuild(b) => format!(
                "{file} ShipBuild[{id:>3}] level {} of {}",
                b.difficulty_class,
                self.hull_name(ItemType::Ship, b.ship_id)
            ),
            Record::SatelliteBuild(b) => format!(
                "{file} SatelliteBuild[{id:>3}] level {} of {}",
                b.difficulty_class,
                self.hull_name(ItemType::Satellite, b.ship_id)
            ),
            Record::Technology(t) => format!(
                "{file} Technology[{id:>3}] from {}: {name:<30} depending on [{}]",
                faction_name(t.faction),
                join_ids(&t.dependencies)
            ),
            Record::TechnologyMap(m) => format!(
                "{file} TechnologyMap[{id:>3}]: {name:<30} depending on [{}]",
                join_ids(&m.dependencies)
            ),
            Record::ShipBuilderSettings(_) => format!("{file} ShipBuilderSettings"),
        }
    }
}

fn faction_name(id: i32) -> String {
    Faction::from_id(id)
        .map(|f| f.name().to_owned())
        .unwrap_or_else(|| format!("faction {id}"))
}

fn join_ids(ids: &[i32]) -> String {
    ids.iter().map(i32::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::super::tests::db_from;
    use super::*;

    fn key(t: ItemType, id: i32) -> RecordKey {
        RecordKey::new(t, id)
    }

    #[test]
    fn weapon_and_ammunition_take_component_names() {
        let db = db_from(&[
            r#"{"ItemType":1,"Id":1,"Name":"Pulse Cannon","WeaponId":3,"AmmunitionId":7}"#,
            r#"{"ItemType":3,"Id":3}"#,
            r#"{"ItemType":3,"Id":4}"#,
            r#"{"ItemType":4,"Id":7}"#,
            r#"{"ItemType":4,"Id":8,"CoupledAmmunitionId":7}"#,
            r#"{"ItemType":4,"Id":9,"CoupledAmmunitionId":8}"#,
            r#"{"ItemType":4,"Id":10}"#,
        ]);
        assert_eq!(db.name_of(key(ItemType::Weapon, 3)), "Pulse Cannon");
        assert_eq!(db.name_of(key(ItemType::Weapon, 4)), "none");
        assert_eq!(db.name_of(key(ItemType::Ammunition, 7)), "Pulse Cannon");
        // 8 is mounted by nothing; 9 is coupled to it and is itself unnamed.
        assert_eq!(db.name_of(key(ItemType::Ammunition, 8)), "couple of none");
        assert_eq!(db.name_of(key(ItemType::Ammunition, 10)), "none");
    }

    #[test]
    fn coupling_chain_is_followed() {
        // Launcher fires 20, which spawns 21, which spawns 22.
        let db = db_from(&[
            r#"{"ItemType":1,"Id":1,"Name":"Launcher","AmmunitionId":20}"#,
            r#"{"ItemType":4,"Id":20,"CoupledAmmunitionId":21}"#,
            r#"{"ItemType":4,"Id":21,"CoupledAmmunitionId":22}"#,
            r#"{"ItemType":4,"Id":22}"#,
        ]);
        assert_eq!(db.name_of(key(ItemType::Ammunition, 20)), "Launcher");
        assert_eq!(db.name_of(key(ItemType::Ammunition, 21)), "couple of Launcher");
        assert_eq!(db.name_of(key(ItemType::Ammunition, 22)), "couple of couple of Launcher");
    }

    #[test]
    fn coupling_cycle_stops() {
        let db = db_from(&[
            r#"{"ItemType":4,"Id":30,"CoupledAmmunitionId":31}"#,
            r#"{"ItemType":4,"Id":31,"CoupledAmmunitionId":30}"#,
        ]);
        let name = db.name_of(key(ItemType::Ammunition, 30));
        assert!(name.ends_with("null"), "{name}");
        assert_eq!(name.matches("couple of ").count(), MAX_COUPLING_DEPTH);
    }

    #[test]
    fn stats_names() {
        let db = db_from(&[
            r#"{"ItemType":1,"Id":1,"Name":"Armor","ComponentStatsId":5}"#,
            r#"{"ItemType":1,"Id":2,"Name":"Shield","ComponentStatsId":6,"DeviceId":1}"#,
            r#"{"ItemType":1,"Id":3,"Name":"Cloak","ComponentStatsId":6,"DeviceId":2}"#,
            r#"{"ItemType":1,"Id":4,"Name":"Gun","ComponentStatsId":7,"WeaponId":1}"#,
            r#"{"ItemType":1,"Id":5,"Name":"Gun2","ComponentStatsId":7,"WeaponId":2}"#,
            r#"{"ItemType":11,"Id":5}"#,
            r#"{"ItemType":11,"Id":6}"#,
            r#"{"ItemType":11,"Id":7}"#,
            r#"{"ItemType":11,"Id":8}"#,
        ]);
        assert_eq!(db.name_of(key(ItemType::ComponentStats, 5)), "Armor");
        assert_eq!(db.name_of(key(ItemType::ComponentStats, 6)), "DefaultDevice");
        assert_eq!(db.name_of(key(ItemType::ComponentStats, 7)), "DefaultWeapon");
        assert_eq!(db.name_of(key(ItemType::ComponentStats, 8)), "none");
    }

    #[test]
    fn builds_and_technology() {
        let db = db_from(&[
            r#"{"ItemType":6,"Id":2,"Name":"Falcon"}"#,
            r#"{"ItemType":7,"Id":3,"Name":"Drone Sat"}"#,
            r#"{"ItemType":8,"Id":10,"ShipId":2,"DifficultyClass":1}"#,
            r#"{"ItemType":9,"Id":11,"ShipId":3,"DifficultyClass":0}"#,
            r#"{"ItemType":10,"Id":4,"Type":1,"ItemId":2,"Faction":3,"Dependencies":[1,2]}"#,
            r#"{"ItemType":13,"Id":5,"Type":11}"#,
            r#"{"ItemType":8,"Id":12,"ShipId":99}"#,
        ]);
        assert_eq!(db.name_of(key(ItemType::ShipBuild, 10)), "1 Falcon");
        assert_eq!(db.raw_file_name(key(ItemType::ShipBuild, 10)), "Falcon_1");
        assert_eq!(db.name_of(key(ItemType::SatelliteBuild, 11)), "0 Drone Sat");
        assert_eq!(db.name_of(key(ItemType::ShipBuild, 12)), "0 null");
        assert_eq!(db.name_of(key(ItemType::Technology, 4)), "Falcon");
        assert_eq!(db.name_of(key(ItemType::TechnologyMap, 5)), "magnet");
        assert_eq!(
            db.describe(key(ItemType::Technology, 4)),
            format!("file4 Technology[  4] from Korerans: {:<30} depending on [1, 2]", "Falcon")
        );
        assert_eq!(db.describe(key(ItemType::ShipBuild, 10)), "file2 ShipBuild[ 10] level 1 of Falcon");
    }

    #[test]
    fn missing_records() {
        let db = Database::new();
        assert_eq!(db.name_of(key(ItemType::Ship, 1)), "");
        assert_eq!(db.describe(key(ItemType::Ship, 1)), "Ship[1] (missing)");
    }
}
