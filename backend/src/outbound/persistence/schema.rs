//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. The
//! `diesel print-schema` command can regenerate them from a live database.

diesel::table! {
    /// Booking venues. `name` is unique.
    venues (id) {
        id -> Int4,
        name -> Varchar,
        city -> Varchar,
        state -> Varchar,
        address -> Varchar,
        phone -> Nullable<Varchar>,
        /// Comma-joined genre names.
        genres -> Varchar,
        image_link -> Nullable<Varchar>,
        facebook_link -> Nullable<Varchar>,
        website_link -> Nullable<Varchar>,
        seeking_talent -> Bool,
        seeking_description -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Performing artists. `name` is unique.
    artists (id) {
        id -> Int4,
        name -> Varchar,
        city -> Varchar,
        state -> Varchar,
        phone -> Nullable<Varchar>,
        /// Comma-joined genre names.
        genres -> Varchar,
        image_link -> Nullable<Varchar>,
        facebook_link -> Nullable<Varchar>,
        website_link -> Nullable<Varchar>,
        seeking_venue -> Bool,
        seeking_description -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Artist bookings at venues. Rows cascade with either parent.
    shows (id) {
        id -> Int4,
        venue_id -> Int4,
        artist_id -> Int4,
        start_time -> Timestamptz,
    }
}

diesel::table! {
    /// Trivia categories.
    categories (id) {
        id -> Int4,
        #[sql_name = "type"]
        kind -> Text,
    }
}

diesel::table! {
    /// Trivia questions.
    questions (id) {
        id -> Int4,
        question -> Text,
        answer -> Text,
        /// 1 to 5, enforced by a check constraint.
        difficulty -> Int4,
        category -> Int4,
    }
}

diesel::table! {
    /// Coffee-shop drinks. `title` is unique.
    drinks (id) {
        id -> Int4,
        title -> Varchar,
        /// JSON array of `{color, name, parts}` objects.
        recipe -> Jsonb,
    }
}

diesel::joinable!(shows -> venues (venue_id));
diesel::joinable!(shows -> artists (artist_id));
diesel::joinable!(questions -> categories (category));

diesel::allow_tables_to_appear_in_same_query!(venues, artists, shows, categories, questions, drinks);
