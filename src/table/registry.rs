//! Session directory: create, look up, join, and list live tables.
//!
//! The registry owns the shared table map and the collaborator handles;
//! nothing here is a process-wide singleton, and embedders construct one
//! registry and pass it wherever it is needed. Each created table gets a
//! clone of the map so it can delist itself at dismissal, which keeps
//! lookups safe while sessions come and go concurrently.

use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, oneshot};

use crate::account::{CredentialValidator, ProfileStore, ScoreStore};
use crate::game::entities::{SeatIndex, Username};

use super::actor::{TableActor, TableHandle};
use super::config::TableConfig;
use super::errors::TableError;
use super::messages::{SeatResponse, ServerMessage, TableId, TableMessage, TableSummary};

/// Shared map of live tables. Tables hold a clone and remove themselves.
pub type TableDirectory = Arc<RwLock<HashMap<TableId, TableHandle>>>;

/// Directory of live sessions.
pub struct TableRegistry {
    tables: TableDirectory,
    next_code: Arc<RwLock<TableId>>,
    validator: Arc<dyn CredentialValidator>,
    profiles: Arc<dyn ProfileStore>,
    scores: Arc<dyn ScoreStore>,
}

impl TableRegistry {
    pub fn new(
        validator: Arc<dyn CredentialValidator>,
        profiles: Arc<dyn ProfileStore>,
        scores: Arc<dyn ScoreStore>,
    ) -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            next_code: Arc::new(RwLock::new(1)),
            validator,
            profiles,
            scores,
        }
    }

    /// Create a table and spawn its actor task.
    pub async fn create_table(&self, config: TableConfig) -> Result<TableHandle, TableError> {
        config.validate().map_err(TableError::InvalidConfig)?;

        let mut next_code = self.next_code.write().await;
        let code = *next_code;
        *next_code += 1;
        drop(next_code);

        let (actor, handle) =
            TableActor::new(code, config, Arc::clone(&self.scores), Arc::clone(&self.tables));

        let mut tables = self.tables.write().await;
        tables.insert(code, handle.clone());
        drop(tables);

        tokio::spawn(actor.run());
        info!("created table {code}");
        Ok(handle)
    }

    /// Look up a live table by code.
    pub async fn get_table(&self, code: TableId) -> Option<TableHandle> {
        let tables = self.tables.read().await;
        tables.get(&code).cloned()
    }

    pub async fn active_table_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.len()
    }

    /// Summaries of every live table, gathered concurrently.
    pub async fn list_tables(&self) -> Vec<TableSummary> {
        let handles: Vec<TableHandle> = {
            let tables = self.tables.read().await;
            tables.values().cloned().collect()
        };
        let queries = handles.into_iter().map(|handle| async move {
            let (reply, answer) = oneshot::channel();
            handle.send(TableMessage::Summary { reply }).await.ok()?;
            answer.await.ok()
        });
        let mut summaries: Vec<TableSummary> = futures_util::future::join_all(queries)
            .await
            .into_iter()
            .flatten()
            .collect();
        summaries.sort_by_key(|summary| summary.code);
        summaries
    }

    /// Validate credentials, look up the player's profile, and seat them,
    /// handing the table their duplex channel.
    pub async fn join_table(
        &self,
        code: TableId,
        username: &Username,
        token: &str,
        outbound: mpsc::Sender<ServerMessage>,
        inbound: mpsc::Receiver<SeatResponse>,
    ) -> Result<SeatIndex, TableError> {
        self.validator.validate(username, token).await?;
        let profile = self.profiles.profile(username).await?;
        let handle = self
            .get_table(code)
            .await
            .ok_or(TableError::NotFound(code))?;
        let (reply, answer) = oneshot::channel();
        handle
            .send(TableMessage::Join {
                profile,
                outbound,
                inbound,
                reply,
            })
            .await?;
        answer.await.map_err(|_| TableError::ChannelClosed)?
    }

    /// Re-attach a previously seated player after a transport drop.
    pub async fn reconnect(
        &self,
        code: TableId,
        username: &Username,
        token: &str,
        outbound: mpsc::Sender<ServerMessage>,
        inbound: mpsc::Receiver<SeatResponse>,
    ) -> Result<(), TableError> {
        self.validator.validate(username, token).await?;
        let handle = self
            .get_table(code)
            .await
            .ok_or(TableError::NotFound(code))?;
        let (reply, answer) = oneshot::channel();
        handle
            .send(TableMessage::Reconnect {
                username: username.clone(),
                outbound,
                inbound,
                reply,
            })
            .await?;
        answer.await.map_err(|_| TableError::ChannelClosed)?
    }

    /// Leave a table before its match starts.
    pub async fn exit_table(&self, code: TableId, username: &Username) -> Result<(), TableError> {
        let handle = self
            .get_table(code)
            .await
            .ok_or(TableError::NotFound(code))?;
        let (reply, answer) = oneshot::channel();
        handle
            .send(TableMessage::Exit {
                username: username.clone(),
                reply,
            })
            .await?;
        answer.await.map_err(|_| TableError::ChannelClosed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryAccounts;

    fn registry() -> (TableRegistry, Arc<MemoryAccounts>) {
        let accounts = Arc::new(MemoryAccounts::new());
        let registry = TableRegistry::new(accounts.clone(), accounts.clone(), accounts.clone());
        (registry, accounts)
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_codes() {
        let (registry, _) = registry();
        let a = registry.create_table(TableConfig::default()).await.unwrap();
        let b = registry.create_table(TableConfig::default()).await.unwrap();
        assert_eq!(a.code(), 1);
        assert_eq!(b.code(), 2);
        assert_eq!(registry.active_table_count().await, 2);
    }

    #[tokio::test]
    async fn test_invalid_config_is_refused() {
        let (registry, _) = registry();
        let config = TableConfig {
            seat_count: 9,
            ..TableConfig::default()
        };
        assert!(matches!(
            registry.create_table(config).await,
            Err(TableError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_of_unknown_code_is_none() {
        let (registry, _) = registry();
        assert!(registry.get_table(404).await.is_none());
    }

    #[tokio::test]
    async fn test_join_requires_valid_credentials() {
        let (registry, accounts) = registry();
        accounts.register("alice", "Alice", "secret").await;
        let handle = registry.create_table(TableConfig::default()).await.unwrap();
        let (out_tx, _out_rx) = mpsc::channel(16);
        let (_in_tx, in_rx) = mpsc::channel(16);
        let result = registry
            .join_table(handle.code(), &Username::new("alice"), "wrong", out_tx, in_rx)
            .await;
        assert!(matches!(result, Err(TableError::Account(_))));
    }

    #[tokio::test]
    async fn test_list_tables_sees_waiting_sessions() {
        let (registry, _) = registry();
        registry.create_table(TableConfig::default()).await.unwrap();
        let summaries = registry.list_tables().await;
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].seated.is_empty());
    }
}
