//! HTTP inbound adapter exposing the booking, trivia and coffee-shop APIs.

pub mod artists;
pub mod auth;
pub mod categories;
pub mod drinks;
pub mod envelope;
pub mod error;
pub mod health;
pub mod profile_form;
pub mod questions;
pub mod quizzes;
pub mod routes;
pub mod schemas;
pub mod shows;
pub mod state;
pub mod validation;
pub mod venues;

pub use error::ApiResult;
