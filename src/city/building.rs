//! Building categories and per-category types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of placeable building, each with its own pricing and rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    House,
    Energy,
    Entertainment,
    Store,
    Facilities,
    Factory,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::House,
        Category::Energy,
        Category::Entertainment,
        Category::Store,
        Category::Facilities,
        Category::Factory,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::House => "house",
            Category::Energy => "energy",
            Category::Entertainment => "entertainment",
            Category::Store => "store",
            Category::Facilities => "facilities",
            Category::Factory => "factory",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name.to_lowercase())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseType {
    American,
    TwoStory,
    Modern,
}

impl HouseType {
    pub const ALL: [HouseType; 3] = [HouseType::American, HouseType::TwoStory, HouseType::Modern];

    pub fn name(&self) -> &'static str {
        match self {
            HouseType::American => "american",
            HouseType::TwoStory => "two_story",
            HouseType::Modern => "modern",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyType {
    Nuclear,
    Thermal,
    Wind,
}

impl EnergyType {
    pub const ALL: [EnergyType; 3] = [EnergyType::Nuclear, EnergyType::Thermal, EnergyType::Wind];

    pub fn name(&self) -> &'static str {
        match self {
            EnergyType::Nuclear => "nuclear",
            EnergyType::Thermal => "thermal",
            EnergyType::Wind => "wind",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntertainmentType {
    SmallPark,
    Stadium,
}

impl EntertainmentType {
    pub const ALL: [EntertainmentType; 2] =
        [EntertainmentType::SmallPark, EntertainmentType::Stadium];

    pub fn name(&self) -> &'static str {
        match self {
            EntertainmentType::SmallPark => "small_park",
            EntertainmentType::Stadium => "stadium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    ConvenienceStore,
    Bakery,
}

impl StoreType {
    pub const ALL: [StoreType; 2] = [StoreType::ConvenienceStore, StoreType::Bakery];

    pub fn name(&self) -> &'static str {
        match self {
            StoreType::ConvenienceStore => "convenience_store",
            StoreType::Bakery => "bakery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    Bank,
    FireStation,
    Hospital,
    PoliceStation,
    School,
}

impl FacilityType {
    pub const ALL: [FacilityType; 5] = [
        FacilityType::Bank,
        FacilityType::FireStation,
        FacilityType::Hospital,
        FacilityType::PoliceStation,
        FacilityType::School,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FacilityType::Bank => "bank",
            FacilityType::FireStation => "fire_station",
            FacilityType::Hospital => "hospital",
            FacilityType::PoliceStation => "police_station",
            FacilityType::School => "school",
        }
    }

    /// Everything except the bank counts toward city safety
    pub fn provides_safety(&self) -> bool {
        !matches!(self, FacilityType::Bank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoryType {
    SmallFactory,
    BigFactory,
    Industry,
}

impl FactoryType {
    pub const ALL: [FactoryType; 3] = [
        FactoryType::SmallFactory,
        FactoryType::BigFactory,
        FactoryType::Industry,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FactoryType::SmallFactory => "small_factory",
            FactoryType::BigFactory => "big_factory",
            FactoryType::Industry => "industry",
        }
    }
}

/// A concrete building: category plus its subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "type", rename_all = "snake_case")]
pub enum BuildingKind {
    House(HouseType),
    Energy(EnergyType),
    Entertainment(EntertainmentType),
    Store(StoreType),
    Facilities(FacilityType),
    Factory(FactoryType),
}

impl BuildingKind {
    pub fn category(&self) -> Category {
        match self {
            BuildingKind::House(_) => Category::House,
            BuildingKind::Energy(_) => Category::Energy,
            BuildingKind::Entertainment(_) => Category::Entertainment,
            BuildingKind::Store(_) => Category::Store,
            BuildingKind::Facilities(_) => Category::Facilities,
            BuildingKind::Factory(_) => Category::Factory,
        }
    }

    /// Subtype name, used as the key in config tables
    pub fn type_name(&self) -> &'static str {
        match self {
            BuildingKind::House(t) => t.name(),
            BuildingKind::Energy(t) => t.name(),
            BuildingKind::Entertainment(t) => t.name(),
            BuildingKind::Store(t) => t.name(),
            BuildingKind::Facilities(t) => t.name(),
            BuildingKind::Factory(t) => t.name(),
        }
    }

    /// Every kind the game offers, in menu order
    pub fn all() -> Vec<BuildingKind> {
        let mut kinds = Vec::new();
        kinds.extend(HouseType::ALL.into_iter().map(BuildingKind::House));
        kinds.extend(EnergyType::ALL.into_iter().map(BuildingKind::Energy));
        kinds.extend(EntertainmentType::ALL.into_iter().map(BuildingKind::Entertainment));
        kinds.extend(StoreType::ALL.into_iter().map(BuildingKind::Store));
        kinds.extend(FacilityType::ALL.into_iter().map(BuildingKind::Facilities));
        kinds.extend(FactoryType::ALL.into_iter().map(BuildingKind::Factory));
        kinds
    }

    /// Resolve `(category, type)` names as typed by a player or a tool
    pub fn parse(category: &str, type_name: &str) -> Option<Self> {
        let category = Category::parse(category)?;
        let type_name = type_name.to_lowercase();
        Self::all()
            .into_iter()
            .find(|k| k.category() == category && k.type_name() == type_name)
    }

    /// Footprint size in tiles (width along x, depth along z) at zero rotation
    pub fn size(&self) -> (i32, i32) {
        match self {
            BuildingKind::House(HouseType::Modern) => (3, 1),
            BuildingKind::House(_) => (1, 1),
            BuildingKind::Energy(EnergyType::Wind) => (1, 1),
            BuildingKind::Energy(_) => (3, 2),
            BuildingKind::Entertainment(EntertainmentType::Stadium) => (4, 3),
            BuildingKind::Entertainment(_) => (1, 1),
            BuildingKind::Store(_) => (1, 1),
            BuildingKind::Facilities(FacilityType::Bank) => (2, 2),
            BuildingKind::Facilities(_) => (3, 2),
            BuildingKind::Factory(FactoryType::SmallFactory) => (2, 2),
            BuildingKind::Factory(FactoryType::BigFactory) => (3, 2),
            BuildingKind::Factory(FactoryType::Industry) => (5, 5),
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category(), self.type_name())
    }
}
