//! Driven port for drink persistence.

use async_trait::async_trait;

use crate::domain::{Drink, DrinkId, DrinkPatch, NewDrink};

use super::define_port_error;

define_port_error! {
    /// Errors raised by drink persistence adapters.
    pub enum DrinkRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "drink repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "drink repository query failed: {message}",
        /// No drink has the given id.
        NotFound { id: i32 } => "drink {id} not found",
        /// Another drink already uses the title.
        DuplicateTitle { title: String } => "a drink titled {title:?} already exists",
    }
}

/// Port for reading and writing drinks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrinkRepository: Send + Sync {
    /// Every drink, ordered by id.
    async fn list(&self) -> Result<Vec<Drink>, DrinkRepositoryError>;

    /// Insert a drink.
    async fn create(&self, drink: &NewDrink) -> Result<Drink, DrinkRepositoryError>;

    /// Apply a partial update and return the stored result.
    async fn update(&self, id: DrinkId, patch: &DrinkPatch) -> Result<Drink, DrinkRepositoryError>;

    /// Delete a drink.
    async fn delete(&self, id: DrinkId) -> Result<(), DrinkRepositoryError>;
}
