//! Shared application state handed to every request handler.
//!
//! Holds only immutable configuration: the database location and the
//! summarization gateway. Each request opens its own connection, so no
//! mutable state is shared between concurrent requests.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::summarization::SummarizationGateway;

pub struct CoreState {
    db_path: PathBuf,
    pub gateway: SummarizationGateway,
}

impl CoreState {
    /// Build state for an existing database whose schema is already ensured.
    pub fn new(db_path: PathBuf, gateway: SummarizationGateway) -> Self {
        Self { db_path, gateway }
    }

    /// Ensure the schema at `db_path`, then build the state.
    pub fn initialize(db_path: PathBuf, gateway: SummarizationGateway) -> Result<Self, DatabaseError> {
        db::open_database(&db_path)?;
        Ok(Self::new(db_path, gateway))
    }

    /// Open a fresh connection for one request.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::connect(&self.db_path)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
