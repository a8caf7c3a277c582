//! Command implementations.

pub mod closure;
pub mod reduce;
pub mod relations;
pub mod run;

pub use self::closure::execute_closure;
pub use self::reduce::execute_reduce;
pub use self::relations::execute_relations;
pub use self::run::execute_run;

use crate::error::{CliError, Result};
use caevo_domain::{links_from_records, Document, LinkRecord, TLink};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Read a JSON array of link records, skipping records that do not convert.
pub fn read_links(path: &Path) -> Result<Vec<TLink>> {
    let contents = fs::read_to_string(path)?;
    let records: Vec<LinkRecord> = serde_json::from_str(&contents)?;
    let (links, rejected) = links_from_records(records);
    for (record, error) in &rejected {
        warn!(id1 = %record.id1, id2 = %record.id2, relation = %record.relation, %error, "Skipping link record");
    }
    Ok(links)
}

/// Read a JSON array of documents.
pub fn read_documents(path: &Path) -> Result<Vec<Document>> {
    let contents = fs::read_to_string(path)?;
    let docs: Vec<Document> = serde_json::from_str(&contents)?;
    if docs.is_empty() {
        return Err(CliError::InvalidInput(format!("{} holds no documents", path.display())));
    }
    Ok(docs)
}
