pub mod listing;
pub mod render;

pub use crate::domain::model::{CollectionRef, Document, FieldValue, Fields, Snapshot};
pub use crate::domain::ports::{ConfigProvider, DocumentStore};
pub use crate::utils::error::Result;
