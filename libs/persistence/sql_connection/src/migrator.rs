use anyhow::Context;
use deadpool_postgres::Pool;
use tracing::{debug, info};

/// Schema migrations, applied in order.
pub const MIGRATIONS: &[(&str, &str)] = &[(
    "001_create_owners",
    include_str!("../../../../domains/owners/migrations/sql/001_create_owners.sql"),
)];

/// Applies plain SQL migrations, recording each applied name in
/// `_migrations` so reruns are no-ops.
pub struct SqlMigrator {
    pool: Pool,
}

impl SqlMigrator {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    pub async fn run_all_migrations(&self) -> anyhow::Result<()> {
        self.create_migration_table().await?;

        for &(name, sql) in MIGRATIONS {
            if self.is_migration_applied(name).await? {
                debug!("Migration {} already applied, skipping", name);
                continue;
            }

            info!("Running migration: {}", name);
            let mut client = self.pool.get().await?;
            let tx = client.transaction().await?;
            tx.batch_execute(sql)
                .await
                .with_context(|| format!("Failed to run migration {name}"))?;
            tx.execute(
                "INSERT INTO _migrations (name, applied_at) VALUES ($1, NOW())",
                &[&name],
            )
            .await?;
            tx.commit().await?;
        }

        Ok(())
    }

    pub async fn applied_migrations(&self) -> anyhow::Result<Vec<String>> {
        let client = self.pool.get().await?;
        let rows = client
            .query("SELECT name FROM _migrations ORDER BY id", &[])
            .await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    async fn create_migration_table(&self) -> anyhow::Result<()> {
        let client = self.pool.get().await?;
        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS _migrations (
                     id SERIAL PRIMARY KEY,
                     name VARCHAR(255) NOT NULL UNIQUE,
                     applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                 )",
            )
            .await?;
        Ok(())
    }

    async fn is_migration_applied(&self, name: &str) -> anyhow::Result<bool> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "SELECT EXISTS(SELECT 1 FROM _migrations WHERE name = $1)",
                &[&name],
            )
            .await?;
        Ok(row.get(0))
    }
}
