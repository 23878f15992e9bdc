//! Persistence layer — accounts, profiles, and the ambient session.

pub mod libsql;
pub mod traits;

pub use libsql::LibSqlClient;
pub use traits::PersistenceClient;
