//! Shared HTTP adapter state.
//!
//! Each application gets its own state bundle, registered with
//! `web::Data` only when that application is mounted. Handlers depend on
//! driving ports alone and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessControl, BookingCommand, BookingQuery, DrinksCommand, DrinksQuery, TriviaCommand,
    TriviaQuery,
};

/// Ports used by the booking handlers.
#[derive(Clone)]
pub struct BookingState {
    pub query: Arc<dyn BookingQuery>,
    pub command: Arc<dyn BookingCommand>,
}

impl BookingState {
    /// Bundle the booking ports.
    #[must_use]
    pub fn new(query: Arc<dyn BookingQuery>, command: Arc<dyn BookingCommand>) -> Self {
        Self { query, command }
    }
}

/// Ports used by the trivia handlers.
#[derive(Clone)]
pub struct TriviaState {
    pub query: Arc<dyn TriviaQuery>,
    pub command: Arc<dyn TriviaCommand>,
}

impl TriviaState {
    /// Bundle the trivia ports.
    #[must_use]
    pub fn new(query: Arc<dyn TriviaQuery>, command: Arc<dyn TriviaCommand>) -> Self {
        Self { query, command }
    }
}

/// Ports used by the coffee-shop handlers.
#[derive(Clone)]
pub struct CoffeeState {
    pub query: Arc<dyn DrinksQuery>,
    pub command: Arc<dyn DrinksCommand>,
    pub access: Arc<dyn AccessControl>,
}

impl CoffeeState {
    /// Bundle the coffee-shop ports.
    #[must_use]
    pub fn new(
        query: Arc<dyn DrinksQuery>,
        command: Arc<dyn DrinksCommand>,
        access: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            query,
            command,
            access,
        }
    }
}
