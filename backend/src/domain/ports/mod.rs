//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`TokenVerifier`]) are implemented by
//! outbound adapters. Driving ports ([`BookingQuery`], [`TriviaCommand`],
//! and so on) are implemented by domain services and consumed by inbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod artist_repository;
mod booking;
mod drink_repository;
mod drinks;
mod question_repository;
mod show_repository;
mod token_verifier;
mod trivia;
mod venue_repository;

#[cfg(test)]
pub use artist_repository::MockArtistRepository;
pub use artist_repository::{ArtistRepository, ArtistRepositoryError};
#[cfg(test)]
pub use booking::{MockBookingCommand, MockBookingQuery};
pub use booking::{BookingCommand, BookingQuery};
#[cfg(test)]
pub use drink_repository::MockDrinkRepository;
pub use drink_repository::{DrinkRepository, DrinkRepositoryError};
#[cfg(test)]
pub use drinks::{MockAccessControl, MockDrinksCommand, MockDrinksQuery};
pub use drinks::{AccessControl, DrinksCommand, DrinksQuery};
#[cfg(test)]
pub use question_repository::{MockCategoryRepository, MockQuestionRepository};
pub use question_repository::{CategoryRepository, QuestionRepository, TriviaRepositoryError};
#[cfg(test)]
pub use show_repository::MockShowRepository;
pub use show_repository::{ShowRepository, ShowRepositoryError};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenVerificationError, TokenVerifier};
#[cfg(test)]
pub use trivia::{MockTriviaCommand, MockTriviaQuery};
pub use trivia::{QuestionListing, TriviaCommand, TriviaQuery};
#[cfg(test)]
pub use venue_repository::MockVenueRepository;
pub use venue_repository::{VenueRepository, VenueRepositoryError};
