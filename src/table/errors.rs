//! Table and registry error types.

use thiserror::Error;

use crate::account::AccountError;
use crate::game::entities::Username;
use crate::game::state_machine::MatchError;

use super::messages::TableId;

/// Errors from table and registry operations.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table {0} not found")]
    NotFound(TableId),

    #[error("table roster is full")]
    RosterFull,

    #[error("{0} is already seated")]
    AlreadySeated(Username),

    #[error("{0} is not seated at this table")]
    NotSeated(Username),

    #[error("the match is already underway")]
    MatchInProgress,

    #[error("no match is underway")]
    MatchNotStarted,

    #[error("table is no longer accepting messages")]
    ChannelClosed,

    #[error("invalid table config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Match(#[from] MatchError),
}
