pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{ClientSettings, TomlConfig};

pub use adapters::{firestore::FirestoreClient, memory::InMemoryStore};
pub use crate::core::listing::{list_collection, list_society, ListingOutcome};
pub use domain::model::{Document, FieldValue, Snapshot, SOCIETY_COLLECTION};
pub use domain::ports::DocumentStore;
pub use utils::error::{Result, StoreError};
