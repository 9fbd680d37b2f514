//! Integer identifiers for persisted entities.
//!
//! Every table uses a serial `INTEGER` primary key, so identifiers are thin
//! `i32` newtypes that keep venue ids from being passed where artist ids are
//! expected.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw database identifier.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Return the raw database identifier.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Venue`](super::Venue).
    VenueId
);
define_id!(
    /// Identifier of an [`Artist`](super::Artist).
    ArtistId
);
define_id!(
    /// Identifier of a [`Show`](super::Show).
    ShowId
);
define_id!(
    /// Identifier of a trivia [`Question`](super::Question).
    QuestionId
);
define_id!(
    /// Identifier of a trivia [`Category`](super::Category).
    CategoryId
);
define_id!(
    /// Identifier of a [`Drink`](super::Drink).
    DrinkId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ids_serialise_transparently() {
        let json = serde_json::to_string(&VenueId::new(7)).expect("serialise id");
        assert_eq!(json, "7");
        let back: ArtistId = serde_json::from_str("12").expect("deserialise id");
        assert_eq!(back.get(), 12);
    }
}
