use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use super::UserRepository;
use crate::common::{hash_phone_number, mask_phone_number};
use crate::domains::auth::AuthenticatedUser;

/// Display name for users who signed in without registering a name.
pub const PLACEHOLDER_USER_NAME: &str = "Demo Farmer";

/// File name of the user table inside the state directory.
pub const USERS_FILE_NAME: &str = "users.json";

fn new_user(
    phone_number: &str,
    registration_name: Option<&str>,
    now: DateTime<Utc>,
) -> AuthenticatedUser {
    let name = registration_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(PLACEHOLDER_USER_NAME);

    let user = AuthenticatedUser {
        id: Uuid::new_v4().to_string(),
        phone: phone_number.to_string(),
        name: name.to_string(),
        created_at: now,
    };
    info!(user_id = %user.id, phone = %mask_phone_number(phone_number), "created user");
    user
}

/// Users keyed by the SHA256 of their phone number.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, AuthenticatedUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn find(&self, phone_number: &str) -> Option<AuthenticatedUser> {
        let phone_hash = hash_phone_number(phone_number);
        self.users.read().await.get(&phone_hash).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_or_create(
        &self,
        phone_number: &str,
        registration_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser> {
        let phone_hash = hash_phone_number(phone_number);
        let mut users = self.users.write().await;

        if let Some(existing) = users.get(&phone_hash) {
            return Ok(existing.clone());
        }

        let user = new_user(phone_number, registration_name, now);
        users.insert(phone_hash, user.clone());
        Ok(user)
    }
}

// =============================================================================
// File-backed repository
// =============================================================================

/// Users kept as a JSON map of phone hash to user in one file, so ids and
/// registered names survive across CLI runs.
#[derive(Debug)]
pub struct FileUserRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileUserRepository {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(USERS_FILE_NAME),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn find(&self, phone_number: &str) -> Result<Option<AuthenticatedUser>> {
        let _guard = self.lock.lock().await;
        let users = self.read_all().await?;
        Ok(users.get(&hash_phone_number(phone_number)).cloned())
    }

    async fn read_all(&self) -> Result<HashMap<String, AuthenticatedUser>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt user table at {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read user table at {}", self.path.display())),
        }
    }

    async fn write_all(&self, users: &HashMap<String, AuthenticatedUser>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create state directory")?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_string(users)?)
            .await
            .context("Failed to write user table")?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .context("Failed to replace user table")?;

        debug!(path = %self.path.display(), users = users.len(), "user table saved");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FileUserRepository {
    async fn find_or_create(
        &self,
        phone_number: &str,
        registration_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser> {
        let _guard = self.lock.lock().await;
        let phone_hash = hash_phone_number(phone_number);
        let mut users = self.read_all().await?;

        if let Some(existing) = users.get(&phone_hash) {
            return Ok(existing.clone());
        }

        let user = new_user(phone_number, registration_name, now);
        users.insert(phone_hash, user.clone());
        self.write_all(&users).await?;
        Ok(user)
    }
}
