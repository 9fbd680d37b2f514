//! Coffee-shop drink service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{DrinkRepository, DrinkRepositoryError, DrinksCommand, DrinksQuery};
use crate::domain::{Drink, DrinkId, DrinkPatch, Error, NewDrink};

/// Drink service implementing the coffee-shop driving ports.
#[derive(Clone)]
pub struct CoffeeService<D> {
    drinks: Arc<D>,
}

impl<D> CoffeeService<D> {
    /// Create a new service over the drink repository.
    #[must_use]
    pub fn new(drinks: Arc<D>) -> Self {
        Self { drinks }
    }
}

fn map_drink_error(error: DrinkRepositoryError) -> Error {
    match error {
        DrinkRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("drink repository unavailable: {message}"))
        }
        DrinkRepositoryError::Query { message } => {
            Error::internal(format!("drink repository error: {message}"))
        }
        DrinkRepositoryError::NotFound { id } => Error::not_found(format!("drink {id} not found")),
        DrinkRepositoryError::DuplicateTitle { title } => {
            Error::unprocessable(format!("a drink titled {title:?} already exists"))
        }
    }
}

#[async_trait]
impl<D: DrinkRepository> DrinksQuery for CoffeeService<D> {
    async fn menu(&self) -> Result<Vec<Drink>, Error> {
        let drinks = self.drinks.list().await.map_err(map_drink_error)?;
        if drinks.is_empty() {
            return Err(Error::not_found("no drinks on the menu"));
        }
        Ok(drinks)
    }
}

#[async_trait]
impl<D: DrinkRepository> DrinksCommand for CoffeeService<D> {
    async fn create_drink(&self, drink: NewDrink) -> Result<Drink, Error> {
        self.drinks.create(&drink).await.map_err(map_drink_error)
    }

    async fn update_drink(&self, id: DrinkId, patch: DrinkPatch) -> Result<Drink, Error> {
        self.drinks
            .update(id, &patch)
            .await
            .map_err(map_drink_error)
    }

    async fn delete_drink(&self, id: DrinkId) -> Result<DrinkId, Error> {
        self.drinks.delete(id).await.map_err(map_drink_error)?;
        Ok(id)
    }
}
