//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types re-run
//! domain validation and report failures as strings for the caller to wrap.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Artist, ArtistId, ArtistSummary, Category, CategoryId, Difficulty, Drink, DrinkId, Links,
    NewDrink, NewQuestion, Profile, ProfileDraft, Question, QuestionId, Recipe, RecipePart,
    SeekingFlag, Show, ShowDraft, ShowId, Venue, VenueDraft, VenueId, VenueRecord, VenueSummary,
};

use super::schema::{artists, categories, drinks, questions, shows, venues};

// ---------------------------------------------------------------------------
// Venues
// ---------------------------------------------------------------------------

/// Row struct for reading from the venues table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = venues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VenueRow {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: String,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueRow {
    pub(crate) fn into_venue(self) -> Result<Venue, String> {
        let profile = ProfileDraft {
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            genres: vec![self.genres],
            links: Links {
                image_link: self.image_link,
                facebook_link: self.facebook_link,
                website_link: self.website_link,
            },
            seeking: SeekingFlag::from(self.seeking_talent),
            seeking_description: self.seeking_description,
        };
        let record = VenueRecord::try_from(VenueDraft {
            profile,
            address: self.address,
        })
        .map_err(|err| format!("venue {}: {err}", self.id))?;
        Ok(Venue {
            id: VenueId::new(self.id),
            record,
        })
    }
}

/// Listing columns of the venues table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = venues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VenueSummaryRow {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
}

impl From<VenueSummaryRow> for VenueSummary {
    fn from(row: VenueSummaryRow) -> Self {
        Self {
            id: VenueId::new(row.id),
            name: row.name,
            city: row.city,
            state: row.state,
        }
    }
}

/// Insertable and changeset struct for venue writes.
///
/// Cleared optional fields must overwrite stored values on update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = venues)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VenueWrite<'a> {
    pub name: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub address: &'a str,
    pub phone: Option<&'a str>,
    pub genres: String,
    pub image_link: Option<&'a str>,
    pub facebook_link: Option<&'a str>,
    pub website_link: Option<&'a str>,
    pub seeking_talent: bool,
    pub seeking_description: Option<&'a str>,
}

impl<'a> From<&'a VenueRecord> for VenueWrite<'a> {
    fn from(record: &'a VenueRecord) -> Self {
        let profile = record.profile();
        Self {
            name: profile.name(),
            city: profile.city(),
            state: profile.state(),
            address: record.address(),
            phone: profile.phone(),
            genres: profile.genres().to_stored(),
            image_link: profile.links().image_link.as_deref(),
            facebook_link: profile.links().facebook_link.as_deref(),
            website_link: profile.links().website_link.as_deref(),
            seeking_talent: profile.seeking().is_seeking(),
            seeking_description: profile.seeking().description(),
        }
    }
}

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

/// Row struct for reading from the artists table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = artists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArtistRow {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: String,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistRow {
    pub(crate) fn into_artist(self) -> Result<Artist, String> {
        let profile = Profile::try_from(ProfileDraft {
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            genres: vec![self.genres],
            links: Links {
                image_link: self.image_link,
                facebook_link: self.facebook_link,
                website_link: self.website_link,
            },
            seeking: SeekingFlag::from(self.seeking_venue),
            seeking_description: self.seeking_description,
        })
        .map_err(|err| format!("artist {}: {err}", self.id))?;
        Ok(Artist {
            id: ArtistId::new(self.id),
            profile,
        })
    }
}

/// Identity columns of the artists table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = artists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArtistSummaryRow {
    pub id: i32,
    pub name: String,
}

impl From<ArtistSummaryRow> for ArtistSummary {
    fn from(row: ArtistSummaryRow) -> Self {
        Self {
            id: ArtistId::new(row.id),
            name: row.name,
        }
    }
}

/// Insertable and changeset struct for artist writes.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = artists)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ArtistWrite<'a> {
    pub name: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub phone: Option<&'a str>,
    pub genres: String,
    pub image_link: Option<&'a str>,
    pub facebook_link: Option<&'a str>,
    pub website_link: Option<&'a str>,
    pub seeking_venue: bool,
    pub seeking_description: Option<&'a str>,
}

impl<'a> From<&'a Profile> for ArtistWrite<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            name: profile.name(),
            city: profile.city(),
            state: profile.state(),
            phone: profile.phone(),
            genres: profile.genres().to_stored(),
            image_link: profile.links().image_link.as_deref(),
            facebook_link: profile.links().facebook_link.as_deref(),
            website_link: profile.links().website_link.as_deref(),
            seeking_venue: profile.seeking().is_seeking(),
            seeking_description: profile.seeking().description(),
        }
    }
}

// ---------------------------------------------------------------------------
// Shows
// ---------------------------------------------------------------------------

/// Row struct for reading from the shows table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shows)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShowRow {
    pub id: i32,
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<Utc>,
}

impl From<ShowRow> for Show {
    fn from(row: ShowRow) -> Self {
        Self {
            id: ShowId::new(row.id),
            venue_id: VenueId::new(row.venue_id),
            artist_id: ArtistId::new(row.artist_id),
            start_time: row.start_time,
        }
    }
}

/// Insertable struct for booking shows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = shows)]
pub(crate) struct NewShowRow {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<Utc>,
}

impl From<&ShowDraft> for NewShowRow {
    fn from(draft: &ShowDraft) -> Self {
        Self {
            venue_id: draft.venue_id.get(),
            artist_id: draft.artist_id.get(),
            start_time: draft.start_time,
        }
    }
}

/// Show joined with venue name and artist identity:
/// `(show id, venue id, venue name, artist id, artist name, artist image, start)`.
pub(crate) type ShowListingTuple = (
    i32,
    i32,
    String,
    i32,
    String,
    Option<String>,
    DateTime<Utc>,
);

/// Counterpart of a show seen from one side:
/// `(counterpart id, name, image link, start)`.
pub(crate) type EngagementTuple = (i32, String, Option<String>, DateTime<Utc>);

// ---------------------------------------------------------------------------
// Trivia
// ---------------------------------------------------------------------------

/// Row struct for reading from the categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i32,
    pub kind: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            kind: row.kind,
        }
    }
}

/// Row struct for reading from the questions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QuestionRow {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub difficulty: i32,
    pub category: i32,
}

impl QuestionRow {
    pub(crate) fn into_question(self) -> Result<Question, String> {
        let difficulty = Difficulty::new(i64::from(self.difficulty))
            .map_err(|err| format!("question {}: {err}", self.id))?;
        Ok(Question {
            id: QuestionId::new(self.id),
            text: self.question,
            answer: self.answer,
            difficulty,
            category: CategoryId::new(self.category),
        })
    }
}

/// Insertable struct for new questions.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = questions)]
pub(crate) struct NewQuestionRow<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub difficulty: i32,
    pub category: i32,
}

impl<'a> From<&'a NewQuestion> for NewQuestionRow<'a> {
    fn from(question: &'a NewQuestion) -> Self {
        Self {
            question: &question.text,
            answer: &question.answer,
            difficulty: i32::from(question.difficulty.get()),
            category: question.category.get(),
        }
    }
}

// ---------------------------------------------------------------------------
// Drinks
// ---------------------------------------------------------------------------

/// Stored shape of one recipe part inside the `recipe` JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredRecipePart {
    pub color: String,
    pub name: String,
    pub parts: u32,
}

/// Encode a recipe for the `recipe` column.
pub(crate) fn encode_recipe(recipe: &Recipe) -> Result<serde_json::Value, String> {
    let parts: Vec<StoredRecipePart> = recipe
        .parts()
        .iter()
        .map(|part| StoredRecipePart {
            color: part.color.clone(),
            name: part.name.clone(),
            parts: part.parts,
        })
        .collect();
    serde_json::to_value(parts).map_err(|err| format!("serialise recipe: {err}"))
}

fn decode_recipe(value: serde_json::Value) -> Result<Recipe, String> {
    let parts: Vec<StoredRecipePart> =
        serde_json::from_value(value).map_err(|err| format!("decode recipe: {err}"))?;
    Recipe::new(
        parts
            .into_iter()
            .map(|part| RecipePart {
                color: part.color,
                name: part.name,
                parts: part.parts,
            })
            .collect(),
    )
    .map_err(|err| err.to_string())
}

/// Row struct for reading from the drinks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = drinks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DrinkRow {
    pub id: i32,
    pub title: String,
    pub recipe: serde_json::Value,
}

impl DrinkRow {
    pub(crate) fn into_drink(self) -> Result<Drink, String> {
        let recipe = decode_recipe(self.recipe).map_err(|err| format!("drink {}: {err}", self.id))?;
        Ok(Drink {
            id: DrinkId::new(self.id),
            title: self.title,
            recipe,
        })
    }
}

/// Insertable struct for new drinks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = drinks)]
pub(crate) struct NewDrinkRow<'a> {
    pub title: &'a str,
    pub recipe: serde_json::Value,
}

impl<'a> NewDrinkRow<'a> {
    pub(crate) fn new(drink: &'a NewDrink) -> Result<Self, String> {
        Ok(Self {
            title: &drink.title,
            recipe: encode_recipe(&drink.recipe)?,
        })
    }
}

/// Changeset for partial drink updates; `None` leaves a column untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = drinks)]
pub(crate) struct DrinkUpdate<'a> {
    pub title: Option<&'a str>,
    pub recipe: Option<serde_json::Value>,
}

impl DrinkUpdate<'_> {
    /// Whether no column would change. Diesel rejects an empty changeset.
    #[must_use]
    pub(crate) const fn is_empty(&self) -> bool {
        self.title.is_none() && self.recipe.is_none()
    }
}
