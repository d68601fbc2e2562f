//! The fixed sample rows written by the seeder.

use time::macros::date;

use crate::models::{Customer, Revenue};

/// Returns the five sample customers, ids 1 through 5.
pub fn sample_customers() -> Vec<Customer> {
    vec![
        customer(1, "Alice", 120_000, date!(2023 - 05 - 01)),
        customer(2, "Bob", 95_050, date!(2023 - 06 - 15)),
        customer(3, "Charlie", 110_025, date!(2023 - 07 - 22)),
        customer(4, "Diana", 78_075, date!(2023 - 03 - 13)),
        customer(5, "Eve", 130_000, date!(2023 - 04 - 09)),
    ]
}

fn customer(id: i32, name: &str, cents: i64, signup_date: time::Date) -> Customer {
    // Literal amounts are far inside NUMERIC(10,2).
    let revenue = Revenue::from_cents(cents).unwrap_or_default();
    Customer::new(id, name, revenue, signup_date)
}
