use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Component {
    pub id: i32,
    pub name: String,
    pub display_category: i32,
    pub availability: i32,
    pub component_stats_id: i32,
    pub faction: i32,
    pub level: i32,
    pub layout: String,
    pub cell_type: String,
    pub device_id: i32,
    pub drone_bay_id: i32,
    pub drone_id: i32,
    pub weapon_id: i32,
    pub ammunition_id: i32,
    pub weapon_slot_type: String,
    pub possible_modifications: Vec<i32>,
}

impl Default for Component {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            display_category: 0,
            availability: 1,
            component_stats_id: 0,
            faction: -1,
            level: 0,
            layout: "1".into(),
            cell_type: String::new(),
            device_id: -1,
            drone_bay_id: -1,
            drone_id: -1,
            weapon_id: -1,
            ammunition_id: -1,
            weapon_slot_type: String::new(),
            possible_modifications: Vec::new(),
        }
    }
}

impl Component {
    pub fn is_device(&self) -> bool { self.device_id != -1 }
    pub fn is_drone_bay(&self) -> bool { self.drone_bay_id != -1 }
    pub fn is_weapon(&self) -> bool { self.weapon_id != -1 }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Device {
    pub id: i32,
    pub device_class: i32,
    pub energy_consumption: f64,
    pub power: f64,
    pub range: f64,
    pub size: f64,
    pub cooldown: f64,
    pub offset: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Weapon {
    pub id: i32,
    pub weapon_class: i32,
    pub fire_rate: f64,
    pub spread: f64,
    pub magazine: i32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self { id: 0, weapon_class: 0, fire_rate: 1.0, spread: 0.0, magazine: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ammunition {
    pub id: i32,
    pub ammunition_class: i32,
    pub damage_type: i32,
    pub impulse: f64,
    pub recoil: f64,
    pub size: f64,
    pub area_of_effect: f64,
    pub damage: f64,
    pub range: f64,
    pub velocity: f64,
    pub life_time: f64,
    pub hit_points: f64,
    pub energy_cost: f64,
    pub coupled_ammunition_id: i32,
}

impl Default for Ammunition {
    fn default() -> Self {
        Self {
            id: 0,
            ammunition_class: 0,
            damage_type: 0,
            impulse: 0.0,
            recoil: 0.0,
            size: 0.0,
            area_of_effect: 0.0,
            damage: 0.0,
            range: 0.0,
            velocity: 0.0,
            life_time: 0.0,
            hit_points: f64::MAX,
            energy_cost: 0.0,
            coupled_ammunition_id: -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DroneBay {
    pub id: i32,
    pub energy_consumption: f64,
    pub passive_energy_consumption: f64,
    pub range: f64,
    pub capacity: i32,
}

impl Default for DroneBay {
    fn default() -> Self {
        Self { id: 0, energy_consumption: 0.0, passive_energy_consumption: 0.0, range: 0.0, capacity: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Barrel {
    pub position: Position,
    pub rotation: f64,
    pub weapon_class: String,
    pub platform_type: i32,
    pub faction: i32,
}

impl Default for Barrel {
    fn default() -> Self {
        Self {
            position: Position::default(),
            rotation: 0.0,
            weapon_class: String::new(),
            platform_type: 0,
            faction: -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ship {
    pub id: i32,
    pub name: String,
    pub faction: i32,
    pub size_class: i32,
    pub layout: String,
    pub barrels: Vec<Barrel>,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            faction: -1,
            size_class: 0,
            layout: "0".into(),
            barrels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Satellite {
    pub id: i32,
    pub name: String,
    pub layout: String,
    pub barrels: Vec<Barrel>,
}

impl Default for Satellite {
    fn default() -> Self {
        Self { id: 0, name: String::new(), layout: "0".into(), barrels: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BuildComponent {
    pub component_id: i32,
    pub locked: bool,
    pub x: i32,
    pub y: i32,
    pub barrel_id: i32,
    pub behaviour: i32,
    pub key_binding: i32,
}

impl Default for BuildComponent {
    fn default() -> Self {
        Self {
            component_id: 0,
            locked: false,
            x: 0,
            y: 0,
            barrel_id: -1,
            behaviour: 0,
            key_binding: -1,
        }
    }
}

/// Loadout of a ship hull.  Also used for satellites, where `ship_id`
/// refers to the satellite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ShipBuild {
    pub id: i32,
    pub ship_id: i32,
    pub difficulty_class: i32,
    pub not_available_in_game: bool,
    pub components: Vec<BuildComponent>,
}

impl Default for ShipBuild {
    fn default() -> Self {
        Self {
            id: 0,
            ship_id: -1,
            difficulty_class: 0,
            not_available_in_game: false,
            components: Vec::new(),
        }
    }
}

pub type SatelliteBuild = ShipBuild;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Technology {
    pub id: i32,
    #[serde(rename = "Type")]
    pub kind: i32,
    pub item_id: i32,
    pub faction: i32,
    pub price: i32,
    pub hidden: bool,
    pub dependencies: Vec<i32>,
}

impl Default for Technology {
    fn default() -> Self {
        Self {
            id: 0,
            kind: 0,
            item_id: 0,
            faction: -1,
            price: 0,
            hidden: false,
            dependencies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ComponentStats {
    pub id: i32,
    #[serde(rename = "Type")]
    pub kind: i32,
    pub armor_points: f64,
    pub energy_points: f64,
    pub energy_recharge_rate: f64,
    pub weight: f64,
    pub ramming_damage: f64,
    pub energy_absorption: f64,
    pub kinetic_resistance: f64,
    pub energy_resistance: f64,
    pub thermal_resistance: f64,
    pub engine_power: f64,
    pub turn_rate: f64,
    pub weapon_fire_rate_modifier: f64,
    pub weapon_damage_modifier: f64,
    pub weapon_range_modifier: f64,
    pub weapon_energy_cost_modifier: f64,
    pub drone_range_modifier: f64,
    pub drone_damage_modifier: f64,
    pub drone_defense_modifier: f64,
    pub drone_speed_modifier: f64,
    pub drones_built_per_second: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ComponentModification {
    pub id: i32,
    #[serde(rename = "Type")]
    pub kind: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TechnologyMap {
    pub id: i32,
    #[serde(rename = "Type")]
    pub kind: i32,
    pub detail: i32,
    pub price: i32,
    pub dependencies: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ShipBuilderSettings {
    pub default_weight_per_cell: f64,
    pub minimum_weight_per_cell: f64,
    pub hull_repair_cooldown: f64,
    pub armor_points_per_cell: f64,
    pub base_energy_points: f64,
    pub base_energy_recharge_rate: f64,
    pub energy_recharge_cooldown: f64,
    pub shield_recharge_cooldown: f64,
    pub max_velocity: f64,
    pub max_turn_rate: f64,
}

impl Default for ShipBuilderSettings {
    fn default() -> Self {
        Self {
            default_weight_per_cell: 20.0,
            minimum_weight_per_cell: 10.0,
            hull_repair_cooldown: 1.0,
            armor_points_per_cell: 0.5,
            base_energy_points: 1.0,
            base_energy_recharge_rate: 0.1,
            energy_recharge_cooldown: 1.0,
            shield_recharge_cooldown: 4.0,
            max_velocity: 20.0,
            max_turn_rate: 20.0,
        }
    }
}
