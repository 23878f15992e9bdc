//! libSQL-backed `PersistenceClient`.
//!
//! Accounts and profile payloads live in a local libSQL database; the
//! ambient session lives in process memory. Passwords are stored as
//! SHA-256 digests and compared on authenticate.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, params};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use crate::error::PersistError;
use crate::model::{AccountFields, AccountId, ProfileFields, Session};
use crate::store::traits::PersistenceClient;

/// libSQL persistence client.
///
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use;
/// a single connection is reused for all operations.
pub struct LibSqlClient {
    #[allow(dead_code)]
    db: Arc<libsql::Database>,
    conn: Connection,
    session: Mutex<Option<Session>>,
    auth_delay: Duration,
}

impl LibSqlClient {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn open(path: &Path) -> Result<Self, PersistError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PersistError::Storage(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| PersistError::Storage(format!("Failed to open database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| PersistError::Storage(format!("Failed to create connection: {e}")))?;

        let client = Self {
            db: Arc::new(db),
            conn,
            session: Mutex::new(None),
            auth_delay: Duration::ZERO,
        };
        client.init_schema().await?;
        info!(path = %path.display(), "Account database opened");
        Ok(client)
    }

    /// Create an in-memory database (for tests and demos).
    pub async fn open_memory() -> Result<Self, PersistError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| PersistError::Storage(format!("Failed to open database: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| PersistError::Storage(format!("Failed to create connection: {e}")))?;

        let client = Self {
            db: Arc::new(db),
            conn,
            session: Mutex::new(None),
            auth_delay: Duration::ZERO,
        };
        client.init_schema().await?;
        Ok(client)
    }

    /// Fixed delay applied to `authenticate`, standing in for network
    /// round-trip latency.
    pub fn with_auth_delay(mut self, delay: Duration) -> Self {
        self.auth_delay = delay;
        self
    }

    fn conn(&self) -> Connection {
        self.conn.clone()
    }

    async fn init_schema(&self) -> Result<(), PersistError> {
        self.conn()
            .execute(
                "CREATE TABLE IF NOT EXISTS accounts (
                    id TEXT PRIMARY KEY,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT NOT NULL UNIQUE,
                    phone TEXT NOT NULL,
                    password_sha256 TEXT NOT NULL,
                    profile TEXT,
                    created_at TEXT NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| PersistError::Storage(format!("init_schema: {e}")))?;
        Ok(())
    }

    /// Read the stored profile for an account. Returns `None` when the
    /// profile has never been written.
    pub async fn load_profile(
        &self,
        id: AccountId,
    ) -> Result<Option<ProfileFields>, PersistError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT profile FROM accounts WHERE id = ?1",
                params![id.to_string()],
            )
            .await
            .map_err(|e| PersistError::Storage(format!("load_profile: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                // NULL until the first profile write.
                let json: Option<String> = row.get(0).ok();
                match json {
                    Some(json) => {
                        let fields = serde_json::from_str(&json)
                            .map_err(|e| PersistError::Serialization(e.to_string()))?;
                        Ok(Some(fields))
                    }
                    None => Ok(None),
                }
            }
            Ok(None) => Ok(None),
            Err(e) => Err(PersistError::Storage(format!("load_profile: {e}"))),
        }
    }
}

fn digest(password: &SecretString) -> String {
    hex::encode(Sha256::digest(password.expose_secret().as_bytes()))
}

#[async_trait]
impl PersistenceClient for LibSqlClient {
    async fn authenticate(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> Result<Session, PersistError> {
        if !self.auth_delay.is_zero() {
            tokio::time::sleep(self.auth_delay).await;
        }

        let mut rows = self
            .conn()
            .query(
                "SELECT id, password_sha256 FROM accounts WHERE email = ?1",
                params![identifier],
            )
            .await
            .map_err(|e| PersistError::Storage(format!("authenticate: {e}")))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Err(PersistError::InvalidCredentials),
            Err(e) => return Err(PersistError::Storage(format!("authenticate: {e}"))),
        };

        let id: String = row
            .get(0)
            .map_err(|e| PersistError::Storage(format!("authenticate: {e}")))?;
        let stored: String = row
            .get(1)
            .map_err(|e| PersistError::Storage(format!("authenticate: {e}")))?;

        if stored != digest(password) {
            return Err(PersistError::InvalidCredentials);
        }

        let account_id = AccountId(
            Uuid::parse_str(&id)
                .map_err(|e| PersistError::Storage(format!("authenticate: bad id: {e}")))?,
        );
        let session = Session {
            account_id,
            started_at: Utc::now(),
        };
        *self.session.lock().unwrap_or_else(|p| p.into_inner()) = Some(session);
        info!(account = %account_id, "Session established");
        Ok(session)
    }

    async fn create_account(&self, fields: &AccountFields) -> Result<AccountId, PersistError> {
        let id = AccountId::new();
        let now = Utc::now().to_rfc3339();

        let result = self
            .conn()
            .execute(
                "INSERT INTO accounts
                    (id, first_name, last_name, email, phone, password_sha256, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id.to_string(),
                    fields.first_name.as_str(),
                    fields.last_name.as_str(),
                    fields.email.as_str(),
                    fields.phone.as_str(),
                    digest(&fields.password),
                    now
                ],
            )
            .await;

        match result {
            Ok(_) => {
                info!(account = %id, "Account created");
                Ok(id)
            }
            Err(e) if e.to_string().contains("UNIQUE") => Err(PersistError::DuplicateEmail {
                email: fields.email.clone(),
            }),
            Err(e) => Err(PersistError::Storage(format!("create_account: {e}"))),
        }
    }

    async fn update_profile(&self, fields: &ProfileFields) -> Result<(), PersistError> {
        let session = self.current_session().ok_or(PersistError::NotSignedIn)?;

        let json = serde_json::to_string(fields)
            .map_err(|e| PersistError::Serialization(e.to_string()))?;
        let updated = self
            .conn()
            .execute(
                "UPDATE accounts SET profile = ?1 WHERE id = ?2",
                params![json, session.account_id.to_string()],
            )
            .await
            .map_err(|e| PersistError::Storage(format!("update_profile: {e}")))?;

        if updated == 0 {
            return Err(PersistError::Storage(format!(
                "update_profile: account {} not found",
                session.account_id
            )));
        }
        info!(account = %session.account_id, "Profile updated");
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        *self.session.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn sign_out(&self) {
        *self.session.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }
}
