pub mod save;

pub use save::{SaveGame, SAVE_VERSION};
