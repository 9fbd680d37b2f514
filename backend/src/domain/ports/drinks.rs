//! Driving ports for the coffee-shop API.

use async_trait::async_trait;

use crate::domain::{BearerToken, Drink, DrinkId, DrinkPatch, Error, NewDrink, Permission, VerifiedClaims};

/// Read side of the drink menu.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrinksQuery: Send + Sync {
    /// Every drink; an empty menu is not found.
    async fn menu(&self) -> Result<Vec<Drink>, Error>;
}

/// Write side of the drink menu.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrinksCommand: Send + Sync {
    /// Add a drink.
    async fn create_drink(&self, drink: NewDrink) -> Result<Drink, Error>;

    /// Partially update a drink.
    async fn update_drink(&self, id: DrinkId, patch: DrinkPatch) -> Result<Drink, Error>;

    /// Remove a drink.
    async fn delete_drink(&self, id: DrinkId) -> Result<DrinkId, Error>;
}

/// Bearer-token access guard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Verify `token` and require `permission`.
    async fn authorize(
        &self,
        token: &BearerToken,
        permission: Permission,
    ) -> Result<VerifiedClaims, Error>;
}
