pub use config::{DbConnectConfig, DbOptionsConfig, PostgresDbConfig};
pub use connection::SqlConnect;
pub use deadpool_postgres::PoolError;
pub use migrator::SqlMigrator;
pub use pool::connect_postgres_db;
pub use tokio_postgres::Error as PgError;

pub mod config;
mod connection;
pub mod migrator;
mod pool;
