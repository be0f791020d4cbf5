use std::io;

use rusqlite::Error as RusqliteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Database(#[from] RusqliteError),

    #[error("bot is not configured; run setup first")]
    NotConfigured,

    #[error("incorrect admin password")]
    WrongPassword,
}
