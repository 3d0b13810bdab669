//! Schema version migration chains for sealbox blobs.
//!
//! A [`Migrator`] carries an encoded payload one step forward through a
//! schema evolution; the [`MigrationManager`] keeps a per-type registry of
//! steps and resolves a contiguous chain from a blob's stored version to the
//! version the application requires.
//!
//! Chain resolution is a greedy single-hop walk, valid because each version
//! has at most one outgoing step (last registration wins on conflicts). It is
//! not a shortest-path search.

mod error;
mod manager;
mod migrator;

pub use error::{BoxError, MigrateError, Result};
pub use manager::{MigrationEvents, MigrationManager, TracingEvents};
pub use migrator::Migrator;
