//! Initialization and seeding for the `customers` table.
//!
//! This crate declares the `customers` schema, creates the table if it is
//! absent, and inserts a fixed batch of sample rows over a single scoped
//! PostgreSQL connection.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use customer_seed::prelude::*;
//!
//! let config = SeedConfig::from_env()?;
//! let report = Seeder::new(config).run().await?;
//! println!("{}", report.confirmation());
//! ```

pub mod config;
pub mod db;
pub mod errors;
pub mod fixtures;
pub mod models;
pub mod schema;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::SeedConfig;
    pub use crate::db::{SeedReport, Seeder};
    pub use crate::errors::SeedError;
    pub use crate::fixtures::sample_customers;
    pub use crate::models::{Customer, Revenue};
    pub use crate::schema::{Table, customers_table};
}
