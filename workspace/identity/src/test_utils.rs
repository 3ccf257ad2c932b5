//! Shared helpers for the identity tests.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use crate::blob::BlobStore;
use crate::error::Result;
use crate::manager::AccountManager;
use crate::password::CredentialHasher;

/// Create an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> DatabaseConnection {
    init_test_tracing();

    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Logs to stderr when RUST_LOG is set. Safe to call from every test.
pub fn init_test_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Reversible stand-in for Argon2 so tests stay fast.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(format!("plain${}", plaintext))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(plaintext)
    }
}

pub fn test_manager() -> AccountManager<PlainHasher> {
    AccountManager::new(PlainHasher)
}

/// Blob store keeping everything in memory; optionally fails every write.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail: bool,
}

impl MemoryBlobStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        if self.fail {
            return Err(io::Error::other("blob store unavailable").into());
        }
        self.blobs
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }
}
