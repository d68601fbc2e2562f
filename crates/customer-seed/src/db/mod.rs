//! Database access for seeding.
//!
//! Each step runs on its own [`PgConnection`] opened with [`connect`] and
//! closed with [`release`]; no pool or process-wide handle is kept.

mod seeder;

pub use seeder::{SeedReport, Seeder};

use sqlx::{ConnectOptions, Connection, PgConnection, Postgres, QueryBuilder};
use tracing::{debug, info, warn};

use crate::config::{SeedConfig, redact};
use crate::errors::SeedError;
use crate::models::Customer;
use crate::schema::Table;

/// Opens a single connection, bounded by the configured timeout.
pub async fn connect(config: &SeedConfig) -> Result<PgConnection, SeedError> {
    let options = config.connect_options()?;

    debug!("Connecting to {}", redact(&config.database_url));
    let conn = tokio::time::timeout(config.connect_timeout, options.connect())
        .await
        .map_err(|_| SeedError::ConnectTimeout(config.connect_timeout))?
        .map_err(SeedError::Connection)?;

    debug!("Connected");
    Ok(conn)
}

/// Closes a connection gracefully.
pub async fn release(conn: PgConnection) -> Result<(), SeedError> {
    conn.close().await.map_err(SeedError::Connection)?;
    debug!("Disconnected");
    Ok(())
}

/// Releases `conn` and returns `outcome`. A close failure only surfaces when
/// the work itself succeeded.
pub(crate) async fn finish<T>(
    conn: PgConnection,
    outcome: Result<T, SeedError>,
) -> Result<T, SeedError> {
    match (outcome, release(conn).await) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!("Failed to close connection after error: {close_err}");
            Err(err)
        }
    }
}

/// Builds one multi-row INSERT for `rows`. Revenue travels as text and is
/// cast server-side so the stored value is exact.
fn build_insert<'a>(table: &Table, rows: &'a [Customer]) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {} (id, name, revenue, signup_date) ",
        table.quoted_name()
    ));
    qb.push_values(rows, |mut b, customer| {
        b.push_bind(customer.id)
            .push_bind(customer.name.as_str())
            .push_bind(customer.revenue.to_string())
            .push_unseparated("::numeric(10,2)")
            .push_bind(customer.signup_date);
    });
    qb
}

/// Inserts all `rows` in a single statement. Either every row is written or
/// none is; a duplicate `id` fails the whole batch.
pub async fn insert_customers(
    conn: &mut PgConnection,
    table: &Table,
    rows: &[Customer],
) -> Result<u64, SeedError> {
    if rows.is_empty() {
        return Ok(0);
    }

    info!("Inserting {} rows into {}...", rows.len(), table.name());

    let result = build_insert(table, rows)
        .build()
        .execute(&mut *conn)
        .await
        .map_err(SeedError::Insert)?;

    info!("Inserted {} rows", result.rows_affected());
    Ok(result.rows_affected())
}

/// Reads every row of `table`, ordered by `id`.
pub async fn fetch_customers(
    conn: &mut PgConnection,
    table: &Table,
) -> Result<Vec<Customer>, sqlx::Error> {
    let sql = format!(
        "SELECT id, name, revenue::text AS revenue, signup_date FROM {} ORDER BY id",
        table.quoted_name()
    );
    sqlx::query_as::<_, Customer>(&sql).fetch_all(conn).await
}
