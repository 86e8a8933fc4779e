//! JSON question bank loader.
//!
//! A bank file is a JSON array of `{ "index", "question", "options", "answer" }`
//! objects.

use std::path::Path;

use crate::repository::{InMemoryRepository, QuestionRecord, QuestionRepository, StorageError};

/// Parse a bank from a JSON string.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON, or validation errors
/// from [`InMemoryRepository::from_records`].
pub fn parse_bank(json: &str) -> Result<InMemoryRepository, StorageError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
    InMemoryRepository::from_records(records)
}

/// Load a bank from a JSON file.
///
/// # Errors
///
/// Returns `StorageError::Io` if the file cannot be read, otherwise as
/// [`parse_bank`].
pub fn load_bank(path: &Path) -> Result<InMemoryRepository, StorageError> {
    let raw = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bank = parse_bank(&raw)?;
    tracing::info!(path = %path.display(), questions = bank.len(), "loaded question bank");
    Ok(bank)
}
