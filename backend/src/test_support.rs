//! In-memory port implementations for integration tests.
//!
//! Compiled for unit tests and behind the `test-support` feature. Each
//! repository mirrors the constraints the PostgreSQL schema enforces
//! (unique names, foreign keys, cascading show deletes) so HTTP tests see
//! the same error mapping as production.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    ArtistRepository, ArtistRepositoryError, CategoryRepository, DrinkRepository,
    DrinkRepositoryError, QuestionRepository, ShowRepository, ShowRepositoryError,
    TokenVerificationError, TokenVerifier, TriviaRepositoryError, VenueRepository,
    VenueRepositoryError,
};
use crate::domain::{
    Artist, ArtistId, ArtistSummary, BearerToken, Category, CategoryId, Drink, DrinkId,
    DrinkPatch, Engagement, NewDrink, NewQuestion, Profile, Question, QuestionFilter, QuestionId,
    QuizCategory, Scheduled, SearchTerm, Show, ShowDraft, ShowId, ShowListing, Venue, VenueId,
    VenueRecord, VenueSummary, VerifiedClaims,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock(pub DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
struct BookingTables {
    next_id: i32,
    venues: BTreeMap<i32, VenueRecord>,
    artists: BTreeMap<i32, Profile>,
    shows: BTreeMap<i32, ShowDraft>,
}

impl BookingTables {
    fn allocate(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn venue_times(&self, id: i32) -> Vec<DateTime<Utc>> {
        self.shows
            .values()
            .filter(|show| show.venue_id.get() == id)
            .map(|show| show.start_time)
            .collect()
    }

    fn artist_times(&self, id: i32) -> Vec<DateTime<Utc>> {
        self.shows
            .values()
            .filter(|show| show.artist_id.get() == id)
            .map(|show| show.start_time)
            .collect()
    }

    fn venue_summary(id: i32, record: &VenueRecord) -> VenueSummary {
        VenueSummary {
            id: VenueId::new(id),
            name: record.profile().name().to_owned(),
            city: record.profile().city().to_owned(),
            state: record.profile().state().to_owned(),
        }
    }

    fn scheduled_venues(&self, term: Option<&SearchTerm>) -> Vec<Scheduled<VenueSummary>> {
        self.venues
            .iter()
            .filter(|(_, record)| term.is_none_or(|term| term.matches(record.profile().name())))
            .map(|(id, record)| Scheduled {
                subject: Self::venue_summary(*id, record),
                show_times: self.venue_times(*id),
            })
            .collect()
    }

    fn listing(&self, id: i32, show: &ShowDraft) -> Option<ShowListing> {
        let venue = self.venues.get(&show.venue_id.get())?;
        let artist = self.artists.get(&show.artist_id.get())?;
        Some(ShowListing {
            id: ShowId::new(id),
            venue_id: show.venue_id,
            venue_name: venue.profile().name().to_owned(),
            artist_id: show.artist_id,
            artist_name: artist.name().to_owned(),
            artist_image_link: artist.links().image_link.clone(),
            start_time: show.start_time,
        })
    }

    fn venue_name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.venues
            .iter()
            .any(|(id, record)| Some(*id) != except && record.profile().name() == name)
    }

    fn artist_name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.artists
            .iter()
            .any(|(id, profile)| Some(*id) != except && profile.name() == name)
    }
}

/// Venues, artists and shows in one shared store.
#[derive(Clone, Default)]
pub struct InMemoryBookingRepository {
    tables: Arc<Mutex<BookingTables>>,
}

impl InMemoryBookingRepository {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored shows.
    #[must_use]
    pub fn show_count(&self) -> usize {
        lock(&self.tables).shows.len()
    }
}

#[async_trait]
impl VenueRepository for InMemoryBookingRepository {
    async fn list(&self) -> Result<Vec<Scheduled<VenueSummary>>, VenueRepositoryError> {
        Ok(lock(&self.tables).scheduled_venues(None))
    }

    async fn search(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<Scheduled<VenueSummary>>, VenueRepositoryError> {
        Ok(lock(&self.tables).scheduled_venues(Some(term)))
    }

    async fn find(&self, id: VenueId) -> Result<Option<Venue>, VenueRepositoryError> {
        Ok(lock(&self.tables)
            .venues
            .get(&id.get())
            .map(|record| Venue {
                id,
                record: record.clone(),
            }))
    }

    async fn find_with_engagements(
        &self,
        id: VenueId,
    ) -> Result<Option<(Venue, Vec<Engagement>)>, VenueRepositoryError> {
        let tables = lock(&self.tables);
        let Some(record) = tables.venues.get(&id.get()) else {
            return Ok(None);
        };
        let engagements = tables
            .shows
            .values()
            .filter(|show| show.venue_id == id)
            .filter_map(|show| {
                let artist = tables.artists.get(&show.artist_id.get())?;
                Some(Engagement {
                    counterpart_id: show.artist_id.get(),
                    counterpart_name: artist.name().to_owned(),
                    counterpart_image_link: artist.links().image_link.clone(),
                    start_time: show.start_time,
                })
            })
            .collect();
        Ok(Some((
            Venue {
                id,
                record: record.clone(),
            },
            engagements,
        )))
    }

    async fn create(&self, record: &VenueRecord) -> Result<Venue, VenueRepositoryError> {
        let mut tables = lock(&self.tables);
        let name = record.profile().name();
        if tables.venue_name_taken(name, None) {
            return Err(VenueRepositoryError::duplicate_name(name));
        }
        let id = tables.allocate();
        tables.venues.insert(id, record.clone());
        Ok(Venue {
            id: VenueId::new(id),
            record: record.clone(),
        })
    }

    async fn update(
        &self,
        id: VenueId,
        record: &VenueRecord,
    ) -> Result<Venue, VenueRepositoryError> {
        let mut tables = lock(&self.tables);
        if !tables.venues.contains_key(&id.get()) {
            return Err(VenueRepositoryError::not_found(id.get()));
        }
        let name = record.profile().name();
        if tables.venue_name_taken(name, Some(id.get())) {
            return Err(VenueRepositoryError::duplicate_name(name));
        }
        tables.venues.insert(id.get(), record.clone());
        Ok(Venue {
            id,
            record: record.clone(),
        })
    }

    async fn delete(&self, id: VenueId) -> Result<(), VenueRepositoryError> {
        let mut tables = lock(&self.tables);
        tables
            .venues
            .remove(&id.get())
            .ok_or_else(|| VenueRepositoryError::not_found(id.get()))?;
        tables.shows.retain(|_, show| show.venue_id != id);
        Ok(())
    }
}

#[async_trait]
impl ArtistRepository for InMemoryBookingRepository {
    async fn list(&self) -> Result<Vec<ArtistSummary>, ArtistRepositoryError> {
        Ok(lock(&self.tables)
            .artists
            .iter()
            .map(|(id, profile)| ArtistSummary {
                id: ArtistId::new(*id),
                name: profile.name().to_owned(),
            })
            .collect())
    }

    async fn search(
        &self,
        term: &SearchTerm,
    ) -> Result<Vec<Scheduled<ArtistSummary>>, ArtistRepositoryError> {
        let tables = lock(&self.tables);
        Ok(tables
            .artists
            .iter()
            .filter(|(_, profile)| term.matches(profile.name()))
            .map(|(id, profile)| Scheduled {
                subject: ArtistSummary {
                    id: ArtistId::new(*id),
                    name: profile.name().to_owned(),
                },
                show_times: tables.artist_times(*id),
            })
            .collect())
    }

    async fn find(&self, id: ArtistId) -> Result<Option<Artist>, ArtistRepositoryError> {
        Ok(lock(&self.tables)
            .artists
            .get(&id.get())
            .map(|profile| Artist {
                id,
                profile: profile.clone(),
            }))
    }

    async fn find_with_engagements(
        &self,
        id: ArtistId,
    ) -> Result<Option<(Artist, Vec<Engagement>)>, ArtistRepositoryError> {
        let tables = lock(&self.tables);
        let Some(profile) = tables.artists.get(&id.get()) else {
            return Ok(None);
        };
        let engagements = tables
            .shows
            .values()
            .filter(|show| show.artist_id == id)
            .filter_map(|show| {
                let venue = tables.venues.get(&show.venue_id.get())?;
                Some(Engagement {
                    counterpart_id: show.venue_id.get(),
                    counterpart_name: venue.profile().name().to_owned(),
                    counterpart_image_link: venue.profile().links().image_link.clone(),
                    start_time: show.start_time,
                })
            })
            .collect();
        Ok(Some((
            Artist {
                id,
                profile: profile.clone(),
            },
            engagements,
        )))
    }

    async fn create(&self, profile: &Profile) -> Result<Artist, ArtistRepositoryError> {
        let mut tables = lock(&self.tables);
        if tables.artist_name_taken(profile.name(), None) {
            return Err(ArtistRepositoryError::duplicate_name(profile.name()));
        }
        let id = tables.allocate();
        tables.artists.insert(id, profile.clone());
        Ok(Artist {
            id: ArtistId::new(id),
            profile: profile.clone(),
        })
    }

    async fn update(
        &self,
        id: ArtistId,
        profile: &Profile,
    ) -> Result<Artist, ArtistRepositoryError> {
        let mut tables = lock(&self.tables);
        if !tables.artists.contains_key(&id.get()) {
            return Err(ArtistRepositoryError::not_found(id.get()));
        }
        if tables.artist_name_taken(profile.name(), Some(id.get())) {
            return Err(ArtistRepositoryError::duplicate_name(profile.name()));
        }
        tables.artists.insert(id.get(), profile.clone());
        Ok(Artist {
            id,
            profile: profile.clone(),
        })
    }

    async fn delete(&self, id: ArtistId) -> Result<(), ArtistRepositoryError> {
        let mut tables = lock(&self.tables);
        tables
            .artists
            .remove(&id.get())
            .ok_or_else(|| ArtistRepositoryError::not_found(id.get()))?;
        tables.shows.retain(|_, show| show.artist_id != id);
        Ok(())
    }
}

#[async_trait]
impl ShowRepository for InMemoryBookingRepository {
    async fn list(&self) -> Result<Vec<ShowListing>, ShowRepositoryError> {
        let tables = lock(&self.tables);
        let mut listings: Vec<ShowListing> = tables
            .shows
            .iter()
            .filter_map(|(id, show)| tables.listing(*id, show))
            .collect();
        listings.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(listings)
    }

    async fn find(&self, id: ShowId) -> Result<Option<ShowListing>, ShowRepositoryError> {
        let tables = lock(&self.tables);
        Ok(tables
            .shows
            .get(&id.get())
            .and_then(|show| tables.listing(id.get(), show)))
    }

    async fn create(&self, draft: &ShowDraft) -> Result<Show, ShowRepositoryError> {
        let mut tables = lock(&self.tables);
        let venue_known = tables.venues.contains_key(&draft.venue_id.get());
        let artist_known = tables.artists.contains_key(&draft.artist_id.get());
        match (venue_known, artist_known) {
            (false, _) => return Err(ShowRepositoryError::missing_reference("venue does not exist")),
            (_, false) => {
                return Err(ShowRepositoryError::missing_reference("artist does not exist"));
            }
            (true, true) => {}
        }
        let id = tables.allocate();
        tables.shows.insert(id, draft.clone());
        Ok(Show {
            id: ShowId::new(id),
            venue_id: draft.venue_id,
            artist_id: draft.artist_id,
            start_time: draft.start_time,
        })
    }

    async fn delete(&self, id: ShowId) -> Result<(), ShowRepositoryError> {
        lock(&self.tables)
            .shows
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| ShowRepositoryError::not_found(id.get()))
    }
}

/// Categories seeded by the initial migration.
pub const SEEDED_CATEGORIES: [&str; 6] =
    ["Science", "Art", "Geography", "History", "Entertainment", "Sports"];

struct TriviaTables {
    next_question: i32,
    categories: BTreeMap<i32, String>,
    questions: BTreeMap<i32, NewQuestion>,
}

/// Questions and categories, seeded with the migration's categories.
#[derive(Clone)]
pub struct InMemoryTriviaRepository {
    tables: Arc<Mutex<TriviaTables>>,
}

impl Default for InMemoryTriviaRepository {
    fn default() -> Self {
        let categories = (1..)
            .zip(SEEDED_CATEGORIES)
            .map(|(id, kind)| (id, kind.to_owned()))
            .collect();
        Self {
            tables: Arc::new(Mutex::new(TriviaTables {
                next_question: 0,
                categories,
                questions: BTreeMap::new(),
            })),
        }
    }
}

impl InMemoryTriviaRepository {
    /// Store with the seeded categories and no questions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn question(id: i32, stored: &NewQuestion) -> Question {
        Question {
            id: QuestionId::new(id),
            text: stored.text.clone(),
            answer: stored.answer.clone(),
            difficulty: stored.difficulty,
            category: stored.category,
        }
    }
}

#[async_trait]
impl QuestionRepository for InMemoryTriviaRepository {
    async fn page(
        &self,
        filter: &QuestionFilter,
        request: PageRequest,
    ) -> Result<Page<Question>, TriviaRepositoryError> {
        let matching: Vec<Question> = lock(&self.tables)
            .questions
            .iter()
            .map(|(id, stored)| Self::question(*id, stored))
            .filter(|question| filter.accepts(question))
            .collect();
        Ok(Page::from_full(matching, request))
    }

    async fn quiz_candidates(
        &self,
        category: QuizCategory,
    ) -> Result<Vec<Question>, TriviaRepositoryError> {
        Ok(lock(&self.tables)
            .questions
            .iter()
            .map(|(id, stored)| Self::question(*id, stored))
            .filter(|question| match category {
                QuizCategory::All => true,
                QuizCategory::Only(id) => question.category == id,
            })
            .collect())
    }

    async fn create(&self, question: &NewQuestion) -> Result<Question, TriviaRepositoryError> {
        let mut tables = lock(&self.tables);
        if !tables.categories.contains_key(&question.category.get()) {
            return Err(TriviaRepositoryError::unknown_category(question.category.get()));
        }
        tables.next_question += 1;
        let id = tables.next_question;
        tables.questions.insert(id, question.clone());
        Ok(Self::question(id, question))
    }

    async fn delete(&self, id: QuestionId) -> Result<(), TriviaRepositoryError> {
        lock(&self.tables)
            .questions
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| TriviaRepositoryError::question_not_found(id.get()))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryTriviaRepository {
    async fn list(&self) -> Result<Vec<Category>, TriviaRepositoryError> {
        Ok(lock(&self.tables)
            .categories
            .iter()
            .map(|(id, kind)| Category {
                id: CategoryId::new(*id),
                kind: kind.clone(),
            })
            .collect())
    }

    async fn find(&self, id: CategoryId) -> Result<Option<Category>, TriviaRepositoryError> {
        Ok(lock(&self.tables)
            .categories
            .get(&id.get())
            .map(|kind| Category {
                id,
                kind: kind.clone(),
            }))
    }
}

#[derive(Default)]
struct DrinkTable {
    next_id: i32,
    drinks: BTreeMap<i32, NewDrink>,
}

/// Drink menu store.
#[derive(Clone, Default)]
pub struct InMemoryDrinkRepository {
    table: Arc<Mutex<DrinkTable>>,
}

impl InMemoryDrinkRepository {
    /// Empty menu.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn stored_drink(id: i32, stored: &NewDrink) -> Drink {
    Drink {
        id: DrinkId::new(id),
        title: stored.title.clone(),
        recipe: stored.recipe.clone(),
    }
}

#[async_trait]
impl DrinkRepository for InMemoryDrinkRepository {
    async fn list(&self) -> Result<Vec<Drink>, DrinkRepositoryError> {
        Ok(lock(&self.table)
            .drinks
            .iter()
            .map(|(id, stored)| stored_drink(*id, stored))
            .collect())
    }

    async fn create(&self, drink: &NewDrink) -> Result<Drink, DrinkRepositoryError> {
        let mut table = lock(&self.table);
        if table.drinks.values().any(|stored| stored.title == drink.title) {
            return Err(DrinkRepositoryError::duplicate_title(drink.title.as_str()));
        }
        table.next_id += 1;
        let id = table.next_id;
        table.drinks.insert(id, drink.clone());
        Ok(stored_drink(id, drink))
    }

    async fn update(&self, id: DrinkId, patch: &DrinkPatch) -> Result<Drink, DrinkRepositoryError> {
        let mut table = lock(&self.table);
        let current = table
            .drinks
            .get(&id.get())
            .map(|stored| stored_drink(id.get(), stored))
            .ok_or_else(|| DrinkRepositoryError::not_found(id.get()))?;
        let patched = patch.apply(current);
        let clash = table
            .drinks
            .iter()
            .any(|(other, stored)| *other != id.get() && stored.title == patched.title);
        if clash {
            return Err(DrinkRepositoryError::duplicate_title(patched.title.as_str()));
        }
        table.drinks.insert(
            id.get(),
            NewDrink {
                title: patched.title.clone(),
                recipe: patched.recipe.clone(),
            },
        );
        Ok(patched)
    }

    async fn delete(&self, id: DrinkId) -> Result<(), DrinkRepositoryError> {
        lock(&self.table)
            .drinks
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| DrinkRepositoryError::not_found(id.get()))
    }
}

/// Token verifier answering from a fixed table of tokens.
///
/// Tokens absent from the table are rejected as invalid.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenVerifier {
    outcomes: HashMap<String, Result<VerifiedClaims, TokenVerificationError>>,
}

impl StaticTokenVerifier {
    /// Verifier that rejects every token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` with the given permissions.
    #[must_use]
    pub fn granting(mut self, token: &str, permissions: &[&str]) -> Self {
        self.outcomes.insert(
            token.to_owned(),
            Ok(VerifiedClaims {
                subject: Some(format!("fixture|{token}")),
                permissions: Some(permissions.iter().map(|p| (*p).to_owned()).collect()),
            }),
        );
        self
    }

    /// Answer `token` with a fixed outcome.
    #[must_use]
    pub fn answering(
        mut self,
        token: &str,
        outcome: Result<VerifiedClaims, TokenVerificationError>,
    ) -> Self {
        self.outcomes.insert(token.to_owned(), outcome);
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &BearerToken) -> Result<VerifiedClaims, TokenVerificationError> {
        self.outcomes
            .get(token.as_str())
            .cloned()
            .unwrap_or_else(|| Err(TokenVerificationError::invalid("unrecognised fixture token")))
    }
}
