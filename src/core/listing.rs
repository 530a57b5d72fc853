use crate::core::render::render_fields;
use crate::domain::model::SOCIETY_COLLECTION;
use crate::domain::ports::DocumentStore;
use crate::utils::error::StoreError;
use std::io::{self, Write};

/// Result of one listing run. A failed fetch is reported, not raised.
#[derive(Debug)]
pub enum ListingOutcome {
    Listed { count: usize },
    Failed(StoreError),
}

impl ListingOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ListingOutcome::Listed { .. })
    }
}

/// 讀取整個集合，逐筆輸出 `<id> => <data>` 到 `out`。
///
/// 任何取得失敗都只在 `err` 寫一行 `Error getting documents: <error>`，
/// 然後正常返回；只有寫入主控台失敗才會以 `io::Error` 往外傳。
pub async fn list_collection<S, O, E>(
    store: &S,
    collection_name: &str,
    out: &mut O,
    err: &mut E,
) -> io::Result<ListingOutcome>
where
    S: DocumentStore + ?Sized,
    O: Write,
    E: Write,
{
    let collection = store.collection(collection_name);
    tracing::debug!("Fetching documents from collection: {}", collection.id());

    let snapshot = match store.get_documents(&collection).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::debug!("Fetch failed (code: {})", e.code());
            writeln!(err, "Error getting documents: {}", e)?;
            err.flush()?;
            return Ok(ListingOutcome::Failed(e));
        }
    };

    tracing::debug!("Received {} documents", snapshot.len());

    for doc in &snapshot {
        writeln!(out, "{} => {}", doc.id, render_fields(&doc.data))?;
    }
    out.flush()?;

    Ok(ListingOutcome::Listed {
        count: snapshot.len(),
    })
}

pub async fn list_society<S, O, E>(store: &S, out: &mut O, err: &mut E) -> io::Result<ListingOutcome>
where
    S: DocumentStore + ?Sized,
    O: Write,
    E: Write,
{
    list_collection(store, SOCIETY_COLLECTION, out, err).await
}
