//! Database seeding.

use tracing::info;

use super::{connect, finish, insert_customers};
use crate::config::SeedConfig;
use crate::errors::SeedError;
use crate::fixtures::sample_customers;
use crate::models::Customer;
use crate::schema::{Table, customers_table, ensure_table};

/// Outcome of a completed seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub table: String,
    pub inserted: u64,
}

impl SeedReport {
    /// The line printed on success.
    pub fn confirmation(&self) -> String {
        format!(
            "✅ Dummy '{}' table created and seeded with sample data.",
            self.table
        )
    }
}

/// Creates the target table and writes the sample rows into it.
pub struct Seeder {
    config: SeedConfig,
    table: Table,
    rows: Vec<Customer>,
}

impl Seeder {
    /// Creates a seeder for the `customers` table and the sample rows.
    pub fn new(config: SeedConfig) -> Self {
        Self {
            config,
            table: customers_table(),
            rows: sample_customers(),
        }
    }

    /// Targets a different table declaration.
    pub fn with_table(mut self, table: Table) -> Self {
        self.table = table;
        self
    }

    /// Replaces the rows to insert.
    pub fn with_rows(mut self, rows: Vec<Customer>) -> Self {
        self.rows = rows;
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Creates the table if absent. Holds its own connection for the duration.
    pub async fn ensure_schema(&self) -> Result<(), SeedError> {
        info!("Ensuring table {}...", self.table.name());

        let mut conn = connect(&self.config).await?;
        let outcome = ensure_table(&mut conn, &self.table).await;
        finish(conn, outcome).await
    }

    /// Inserts the rows in one batch. The connection is closed whether or not
    /// the insert succeeds.
    pub async fn seed(&self) -> Result<u64, SeedError> {
        let mut conn = connect(&self.config).await?;
        info!("Connected to database");

        let outcome = insert_customers(&mut conn, &self.table, &self.rows).await;
        finish(conn, outcome).await
    }

    /// Ensures the schema, then seeds.
    pub async fn run(&self) -> Result<SeedReport, SeedError> {
        self.ensure_schema().await?;
        let inserted = self.seed().await?;

        info!("Seeded {} rows into {}", inserted, self.table.name());
        Ok(SeedReport {
            table: self.table.name().to_string(),
            inserted,
        })
    }
}
