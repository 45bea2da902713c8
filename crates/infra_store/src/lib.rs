//! Storage adapters for the claims billing pipeline
//!
//! Two implementations of the `ClaimsStore` port from `domain_claims`:
//!
//! - [`InMemoryStore`] — tokio RwLock maps; the default for tests and
//!   local development.
//! - [`PgClaimsStore`] — PostgreSQL via SQLx; schema in `migrations/`.

pub mod memory;
pub mod pool;
pub mod postgres;

pub use memory::InMemoryStore;
pub use pool::{create_pool, DatabaseConfig, DatabasePool};
pub use postgres::PgClaimsStore;
