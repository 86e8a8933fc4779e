#![forbid(unsafe_code)]

pub mod browse;
pub mod json;
pub mod repository;

pub use browse::{BankFilter, browse};
pub use json::{load_bank, parse_bank};
pub use repository::{InMemoryRepository, QuestionRecord, QuestionRepository, StorageError};
