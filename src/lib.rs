pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::GrocyClient;
pub use config::AppConfig;
pub use crate::core::{SearchUrlTemplate, ShoppingListSync};
pub use utils::error::{AppError, InventoryError, Result};
