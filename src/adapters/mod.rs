// Adapters layer: concrete DocumentStore implementations.

pub mod firestore;
pub mod memory;
