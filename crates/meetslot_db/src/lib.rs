//! Booking persistence for Meetslot
//!
//! A thin layer over SQLx's `Any` driver backed by SQLite. The schema relies on
//! SQLite DDL (autoincrement keys and a partial unique index), so `database.url`
//! must be a `sqlite:` URL.
//!
//! # Example
//!
//! ```rust,no_run
//! use meetslot_db::{BookingRepository, DbClient, SqlBookingRepository};
//!
//! async fn setup_db() -> Result<SqlBookingRepository, Box<dyn std::error::Error>> {
//!     let db_client = DbClient::from_url("sqlite:data/meetslot.db").await?;
//!     let repository = SqlBookingRepository::new(db_client);
//!     repository.init_schema().await?;
//!     Ok(repository)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;

// Register the SQLite driver when the crate is loaded
#[cfg(feature = "sqlite")]
mod sqlite_driver {
    // This import ensures the SQLite driver is linked and registered
    #[allow(unused_imports)]
    use sqlx::sqlite::SqlitePoolOptions as _;
}

pub use client::DbClient;
pub use error::DbError;
pub use repositories::{BookingRepository, SqlBookingRepository};
