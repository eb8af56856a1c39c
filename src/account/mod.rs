//! External collaborator interfaces.
//!
//! The engine never talks to storage or an identity provider directly; it
//! consumes the three narrow traits below. Embedders wire in whatever
//! backs them (a database, an auth service), while tests and small
//! deployments use [`MemoryAccounts`], which implements all three over an
//! in-memory map.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::game::constants::INITIAL_SCORE;
use crate::game::entities::Username;

/// Errors from collaborator lookups.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum AccountError {
    #[error("unknown player {0}")]
    UnknownPlayer(Username),

    #[error("invalid credentials for {0}")]
    InvalidCredentials(Username),

    #[error("account storage error: {0}")]
    Storage(String),
}

/// A player as the session layer sees them.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlayerProfile {
    pub username: Username,
    pub display_name: String,
    pub total_score: i64,
}

/// Checks that a presented token belongs to the named player.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    async fn validate(&self, username: &Username, token: &str) -> Result<(), AccountError>;
}

/// Looks up a player's profile by identity.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, username: &Username) -> Result<PlayerProfile, AccountError>;
}

/// Persists a player's settled total after a match.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn update_score(&self, username: &Username, total: i64) -> Result<(), AccountError>;
}

struct AccountRecord {
    token: String,
    profile: PlayerProfile,
    last_seen: DateTime<Utc>,
}

/// In-memory implementation of all three collaborator traits.
#[derive(Default)]
pub struct MemoryAccounts {
    records: RwLock<HashMap<Username, AccountRecord>>,
}

impl MemoryAccounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player with the starting score.
    pub async fn register(&self, username: &str, display_name: &str, token: &str) {
        let username = Username::new(username);
        let mut records = self.records.write().await;
        records.insert(
            username.clone(),
            AccountRecord {
                token: token.to_string(),
                profile: PlayerProfile {
                    username,
                    display_name: display_name.to_string(),
                    total_score: INITIAL_SCORE,
                },
                last_seen: Utc::now(),
            },
        );
    }

    /// Current persisted total for a player, if registered.
    pub async fn score(&self, username: &Username) -> Option<i64> {
        let records = self.records.read().await;
        records
            .get(username)
            .map(|record| record.profile.total_score)
    }

    /// When the player last presented valid credentials.
    pub async fn last_seen(&self, username: &Username) -> Option<DateTime<Utc>> {
        let records = self.records.read().await;
        records.get(username).map(|record| record.last_seen)
    }
}

#[async_trait]
impl CredentialValidator for MemoryAccounts {
    async fn validate(&self, username: &Username, token: &str) -> Result<(), AccountError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(username)
            .ok_or_else(|| AccountError::UnknownPlayer(username.clone()))?;
        if record.token != token {
            return Err(AccountError::InvalidCredentials(username.clone()));
        }
        record.last_seen = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryAccounts {
    async fn profile(&self, username: &Username) -> Result<PlayerProfile, AccountError> {
        let records = self.records.read().await;
        records
            .get(username)
            .map(|record| record.profile.clone())
            .ok_or_else(|| AccountError::UnknownPlayer(username.clone()))
    }
}

#[async_trait]
impl ScoreStore for MemoryAccounts {
    async fn update_score(&self, username: &Username, total: i64) -> Result<(), AccountError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(username)
            .ok_or_else(|| AccountError::UnknownPlayer(username.clone()))?;
        record.profile.total_score = total;
        debug!("persisted score {total} for {username}");
        Ok(())
    }
}
