//! Domain types, ports and services for the three backends.
//!
//! - Booking: venues, artists and the shows that join them.
//! - Trivia: categories, paginated questions and quiz sampling.
//! - Coffee shop: drinks behind a bearer-token permission guard.
//!
//! Nothing here knows about HTTP or SQL; inbound adapters call the driving
//! ports in [`ports`] and outbound adapters implement the driven ones.

pub mod access_guard;
pub mod artist;
pub mod auth;
pub mod booking_service;
pub mod coffee_service;
pub mod drink;
pub mod error;
pub mod ids;
pub mod ports;
pub mod profile;
pub mod question;
pub mod quiz;
pub mod search;
pub mod shows;
pub mod trace_id;
pub mod trivia_service;
pub mod venue;

pub use self::access_guard::AccessGuard;
pub use self::artist::{Artist, ArtistDetail, ArtistListing, ArtistSummary, validate_artist};
pub use self::auth::{BearerToken, CredentialsError, Permission, VerifiedClaims};
pub use self::booking_service::BookingService;
pub use self::coffee_service::CoffeeService;
pub use self::drink::{
    Drink, DrinkPatch, DrinkValidationError, NewDrink, Recipe, RecipePart, ShortRecipePart,
};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{ArtistId, CategoryId, DrinkId, QuestionId, ShowId, VenueId};
pub use self::profile::{
    Genres, Links, Profile, ProfileDraft, ProfileValidationError, Seeking, SeekingFlag,
    SeekingFlagError,
};
pub use self::question::{
    Category, Difficulty, NewQuestion, Question, QuestionDraft, QuestionFilter,
    QuestionValidationError,
};
pub use self::quiz::{QuizCategory, QuizDraw, QuizRound};
pub use self::search::SearchTerm;
pub use self::shows::{
    Engagement, START_TIME_FORMAT, Scheduled, Show, ShowBuckets, ShowDraft, ShowListing,
    ShowTiming, StartTimeError, classify, count_upcoming, format_start_time, parse_start_time,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trivia_service::TriviaService;
pub use self::venue::{
    Venue, VenueArea, VenueDetail, VenueDraft, VenueListing, VenueRecord, VenueSummary,
    group_into_areas,
};
