//! Shows and their past/upcoming bucketing.
//!
//! A show's bucket is derived at query time against a reference instant
//! supplied by the caller (normally `mockable::Clock::utc`). Comparisons are
//! strict on both sides, so a show starting exactly at the reference instant
//! is neither past nor upcoming.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

use super::{ArtistId, ShowId, VenueId};

/// Wire format for show start times (`YYYY-MM-DD HH:MM:SS`).
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const START_TIME_INPUT_FORMATS: [&str; 3] = [START_TIME_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Render a start time in the wire format.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use trio::domain::format_start_time;
///
/// let at = Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap();
/// assert_eq!(format_start_time(at), "2035-04-01 20:00:00");
/// ```
#[must_use]
pub fn format_start_time(start_time: DateTime<Utc>) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

/// Raised when a start time string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("start_time {raw:?} is not an RFC 3339 or 'YYYY-MM-DD HH:MM:SS' timestamp")]
pub struct StartTimeError {
    raw: String,
}

/// Parse a start time.
///
/// Accepts RFC 3339 with an offset, or a naive `YYYY-MM-DD HH:MM[:SS]`
/// timestamp which is taken to be UTC.
///
/// # Errors
/// Returns [`StartTimeError`] when no accepted format matches.
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>, StartTimeError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    START_TIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| StartTimeError {
            raw: raw.to_owned(),
        })
}

/// Position of a show relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTiming {
    /// Started strictly before the reference instant.
    Past,
    /// Starts strictly after the reference instant.
    Upcoming,
    /// Starts exactly at the reference instant.
    Boundary,
}

/// Classify a start time against `now`.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use trio::domain::{classify, ShowTiming};
///
/// let now = Utc::now();
/// assert_eq!(classify(now - Duration::hours(1), now), ShowTiming::Past);
/// assert_eq!(classify(now, now), ShowTiming::Boundary);
/// ```
#[must_use]
pub fn classify(start_time: DateTime<Utc>, now: DateTime<Utc>) -> ShowTiming {
    if start_time < now {
        ShowTiming::Past
    } else if start_time > now {
        ShowTiming::Upcoming
    } else {
        ShowTiming::Boundary
    }
}

/// Number of start times strictly after `now`.
#[must_use]
pub fn count_upcoming(start_times: &[DateTime<Utc>], now: DateTime<Utc>) -> usize {
    start_times
        .iter()
        .filter(|start| classify(**start, now) == ShowTiming::Upcoming)
        .count()
}

/// A persisted show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    pub id: ShowId,
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

/// Input for booking a show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowDraft {
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

/// A show joined with the names needed for the show listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowListing {
    pub id: ShowId,
    pub venue_id: VenueId,
    pub venue_name: String,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A show seen from one side of the booking: the counterpart entity
/// (the artist when viewing a venue, the venue when viewing an artist).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engagement {
    pub counterpart_id: i32,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A listing entry paired with the start times of all its shows.
///
/// Repositories return this shape so upcoming counts are always computed
/// from the live join at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled<T> {
    pub subject: T,
    pub show_times: Vec<DateTime<Utc>>,
}

impl<T> Scheduled<T> {
    /// Number of shows strictly after `now`.
    #[must_use]
    pub fn upcoming_count(&self, now: DateTime<Utc>) -> usize {
        count_upcoming(&self.show_times, now)
    }
}

/// Engagements split into past and upcoming buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowBuckets {
    past: Vec<Engagement>,
    upcoming: Vec<Engagement>,
}

impl ShowBuckets {
    /// Partition engagements around `now`, preserving input order within
    /// each bucket. Engagements starting exactly at `now` are dropped.
    #[must_use]
    pub fn partition(engagements: Vec<Engagement>, now: DateTime<Utc>) -> Self {
        let mut buckets = Self::default();
        for engagement in engagements {
            match classify(engagement.start_time, now) {
                ShowTiming::Past => buckets.past.push(engagement),
                ShowTiming::Upcoming => buckets.upcoming.push(engagement),
                ShowTiming::Boundary => {}
            }
        }
        buckets
    }

    /// Shows that started before the reference instant.
    #[must_use]
    pub fn past(&self) -> &[Engagement] {
        &self.past
    }

    /// Shows that start after the reference instant.
    #[must_use]
    pub fn upcoming(&self) -> &[Engagement] {
        &self.upcoming
    }

    /// Size of the past bucket.
    #[must_use]
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    /// Size of the upcoming bucket.
    #[must_use]
    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }

    /// Consume into `(past, upcoming)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Engagement>, Vec<Engagement>) {
        (self.past, self.upcoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    fn engagement(id: i32, start_time: DateTime<Utc>) -> Engagement {
        Engagement {
            counterpart_id: id,
            counterpart_name: format!("Counterpart {id}"),
            counterpart_image_link: None,
            start_time,
        }
    }

    #[rstest]
    fn partition_uses_strict_comparisons(now: DateTime<Utc>) {
        let shows = vec![
            engagement(1, now - Duration::days(3)),
            engagement(2, now),
            engagement(3, now + Duration::seconds(1)),
            engagement(4, now - Duration::seconds(1)),
        ];
        let buckets = ShowBuckets::partition(shows, now);

        let past: Vec<_> = buckets.past().iter().map(|e| e.counterpart_id).collect();
        let upcoming: Vec<_> = buckets.upcoming().iter().map(|e| e.counterpart_id).collect();
        assert_eq!(past, vec![1, 4]);
        assert_eq!(upcoming, vec![3]);
        assert_eq!(buckets.past_count() + buckets.upcoming_count(), 3);
    }

    #[rstest]
    fn every_show_lands_in_exactly_one_class(now: DateTime<Utc>) {
        for offset in -5..=5 {
            let start = now + Duration::minutes(offset);
            let timing = classify(start, now);
            let expected = match offset.signum() {
                -1 => ShowTiming::Past,
                1 => ShowTiming::Upcoming,
                _ => ShowTiming::Boundary,
            };
            assert_eq!(timing, expected, "offset {offset}");
        }
    }

    #[rstest]
    fn count_upcoming_ignores_boundary(now: DateTime<Utc>) {
        let times = [now, now + Duration::hours(1), now - Duration::hours(1)];
        assert_eq!(count_upcoming(&times, now), 1);
    }

    #[rstest]
    #[case("2035-04-01T20:00:00Z")]
    #[case("2035-04-01T22:00:00+02:00")]
    #[case("2035-04-01 20:00:00")]
    #[case("2035-04-01T20:00:00")]
    #[case("2035-04-01 20:00")]
    fn parse_start_time_accepts_supported_formats(#[case] raw: &str) {
        let parsed = parse_start_time(raw).expect("supported format");
        assert_eq!(format_start_time(parsed), "2035-04-01 20:00:00");
    }

    #[rstest]
    #[case("")]
    #[case("tomorrow")]
    #[case("2035-13-01 20:00:00")]
    fn parse_start_time_rejects_garbage(#[case] raw: &str) {
        assert!(parse_start_time(raw).is_err());
    }
}
