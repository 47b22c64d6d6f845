// Adapters layer: concrete implementations for external systems.

pub mod grocy;

pub use grocy::GrocyClient;
