//! In-process document store for tests and offline demos.

use crate::domain::model::{CollectionRef, Document, Snapshot};
use crate::domain::ports::DocumentStore;
use crate::utils::error::{Result, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type FailureFn = Box<dyn Fn() -> StoreError + Send + Sync>;

#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    failure: Mutex<Option<FailureFn>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document, or replaces one with the same id in place.
    pub fn insert(&self, collection: &str, document: Document) {
        let mut collections = lock(&self.collections);
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => docs.push(document),
        }
    }

    /// Every subsequent fetch fails with the error built by `make_error`.
    pub fn fail_with<F>(&self, make_error: F)
    where
        F: Fn() -> StoreError + Send + Sync + 'static,
    {
        *lock(&self.failure) = Some(Box::new(make_error));
    }

    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_documents(&self, collection: &CollectionRef) -> Result<Snapshot> {
        if let Some(make_error) = lock(&self.failure).as_ref() {
            return Err(make_error());
        }

        let documents = lock(&self.collections)
            .get(collection.id())
            .cloned()
            .unwrap_or_default();

        Ok(Snapshot {
            documents,
            read_time: Some(Utc::now()),
        })
    }
}
