#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    AttemptDraftRepository, CredentialRepository, InMemoryRepository, Storage, StorageError,
    StoredCredentials,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
