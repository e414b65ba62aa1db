//! Repository layer: entity-scoped database operations.
//!
//! Every function takes a borrowed `Connection` and runs as one SQLite
//! transaction; a transaction dropped before `commit` rolls back.

mod note;
mod patient;

pub use note::*;
pub use patient::*;
