use thiserror::Error;

use crate::core::types::{BuildingId, Money, TileCoord};

#[derive(Error, Debug)]
pub enum CityError {
    #[error("Insufficient funds: price {price}, balance {balance}")]
    InsufficientFunds { price: Money, balance: Money },

    #[error("Invalid save: {0}")]
    InvalidSave(String),

    #[error("Saving is disabled in creative mode")]
    CreativeModeSave,

    #[error("Building not found: {0}")]
    UnknownBuilding(BuildingId),

    #[error("Building is not a bank: {0}")]
    NotABank(BuildingId),

    #[error("Bank already holds a running deposit: {0}")]
    DepositActive(BuildingId),

    #[error("Invalid deposit amount: {0}")]
    InvalidDeposit(Money),

    #[error("Cannot place on tile {tile}: {reason}")]
    PlacementBlocked { tile: TileCoord, reason: String },

    #[error("Placement has no tiles")]
    EmptyPlacement,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CityError>;
