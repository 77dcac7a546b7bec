use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::User;
use crate::storage::UserStore;

pub struct JsonUserStore {
    file_path: PathBuf,
    cache: RwLock<Vec<User>>,
}

impl JsonUserStore {
    pub async fn new(data_dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .context("Failed to create data directory")?;

        let file_path = data_dir.join("users.json");

        let users = if file_path.exists() {
            let content = tokio::fs::read_to_string(&file_path)
                .await
                .context("Failed to read users.json")?;
            match serde_json::from_str::<Vec<User>>(&content) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(
                        "users.json is corrupted ({}), creating backup and starting empty",
                        e
                    );
                    let backup_path = data_dir.join("users.json.bak");
                    if let Err(backup_err) = tokio::fs::copy(&file_path, &backup_path).await {
                        tracing::error!(
                            "Failed to create backup of corrupted users.json: {}",
                            backup_err
                        );
                    }
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            file_path,
            cache: RwLock::new(users),
        })
    }

    async fn persist(&self, users: &[User]) -> Result<()> {
        let tmp_path = self.file_path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(users).context("Failed to serialize users")?;

        tokio::fs::write(&tmp_path, json.as_bytes())
            .await
            .context("Failed to write temporary users file")?;

        tokio::fs::rename(&tmp_path, &self.file_path)
            .await
            .context("Failed to rename temporary users file")?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonUserStore {
    async fn create(&self, user: User) -> Result<User> {
        let mut cache = self.cache.write().await;
        cache.push(user.clone());
        self.persist(&cache).await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let cache = self.cache.read().await;
        Ok(cache.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let cache = self.cache.read().await;
        Ok(cache.iter().find(|u| u.email == email).cloned())
    }
}
