use crate::domain::model::{CollectionRef, Snapshot};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A document database client, constructed by the caller and injected.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn collection(&self, id: &str) -> CollectionRef {
        CollectionRef::new(id)
    }

    async fn get_documents(&self, collection: &CollectionRef) -> Result<Snapshot>;
}

pub trait ConfigProvider: Send + Sync {
    fn project_id(&self) -> &str;
    fn database_id(&self) -> &str;
    fn base_url(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn access_token(&self) -> Option<&str>;
    fn emulator_host(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
}
