//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one driven port on top of `diesel-async`
//! connections checked out of a `bb8` pool. Row structs (`models.rs`) and
//! table definitions (`schema.rs`) never leave this module; rows are
//! converted back into domain types through their validating constructors.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new(database_url)).await?;
//! let venues = DieselVenueRepository::new(pool.clone());
//! ```

mod diesel_artist_repository;
mod diesel_category_repository;
mod diesel_drink_repository;
pub(crate) mod diesel_helpers;
mod diesel_question_repository;
mod diesel_show_repository;
mod diesel_venue_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_artist_repository::DieselArtistRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_drink_repository::DieselDrinkRepository;
pub use diesel_question_repository::DieselQuestionRepository;
pub use diesel_show_repository::DieselShowRepository;
pub use diesel_venue_repository::DieselVenueRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
