//! Tests for the booking service.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockArtistRepository, MockShowRepository, MockVenueRepository};
use crate::domain::{Engagement, ErrorCode, ProfileDraft, Scheduled, VenueDraft};

type TestService = BookingService<MockVenueRepository, MockArtistRepository, MockShowRepository>;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn pinned_clock(now: DateTime<Utc>) -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(now);
    Arc::new(clock)
}

fn make_service(
    venues: MockVenueRepository,
    artists: MockArtistRepository,
    shows: MockShowRepository,
    now: DateTime<Utc>,
) -> TestService {
    BookingService::new(
        Arc::new(venues),
        Arc::new(artists),
        Arc::new(shows),
        pinned_clock(now),
    )
}

fn venue_only(venues: MockVenueRepository, now: DateTime<Utc>) -> TestService {
    make_service(
        venues,
        MockArtistRepository::new(),
        MockShowRepository::new(),
        now,
    )
}

fn summary(id: i32, city: &str) -> VenueSummary {
    VenueSummary {
        id: VenueId::new(id),
        name: format!("Venue {id}"),
        city: city.to_owned(),
        state: "CA".to_owned(),
    }
}

fn record(name: &str) -> VenueRecord {
    VenueRecord::try_from(VenueDraft {
        profile: ProfileDraft {
            name: name.to_owned(),
            city: "San Francisco".to_owned(),
            state: "CA".to_owned(),
            ..ProfileDraft::default()
        },
        address: "1015 Folsom Street".to_owned(),
    })
    .expect("valid venue")
}

fn engagement(id: i32, start_time: DateTime<Utc>) -> Engagement {
    Engagement {
        counterpart_id: id,
        counterpart_name: format!("Artist {id}"),
        counterpart_image_link: None,
        start_time,
    }
}

#[rstest]
#[tokio::test]
async fn venue_areas_group_and_count_strictly_upcoming(now: DateTime<Utc>) {
    let mut venues = MockVenueRepository::new();
    venues.expect_list().times(1).return_once(move || {
        Ok(vec![
            Scheduled {
                subject: summary(1, "San Francisco"),
                show_times: vec![now - Duration::days(1), now + Duration::days(1), now],
            },
            Scheduled {
                subject: summary(2, "New York"),
                show_times: Vec::new(),
            },
            Scheduled {
                subject: summary(3, "San Francisco"),
                show_times: vec![now + Duration::hours(2), now + Duration::days(9)],
            },
        ])
    });

    let areas = venue_only(venues, now)
        .venue_areas()
        .await
        .expect("areas load");

    assert_eq!(areas.len(), 2);
    let counts: Vec<_> = areas
        .first()
        .expect("first area")
        .venues
        .iter()
        .map(|venue| (venue.id.get(), venue.num_upcoming_shows))
        .collect();
    assert_eq!(counts, vec![(1, 1), (3, 2)]);
}

#[rstest]
#[tokio::test]
async fn venue_detail_buckets_shows(now: DateTime<Utc>) {
    let mut venues = MockVenueRepository::new();
    let venue = Venue {
        id: VenueId::new(4),
        record: record("The Musical Hop"),
    };
    let stored = venue.clone();
    venues
        .expect_find_with_engagements()
        .times(1)
        .return_once(move |_| {
            Ok(Some((
                stored,
                vec![
                    engagement(1, now - Duration::days(3)),
                    engagement(2, now + Duration::days(3)),
                    engagement(3, now),
                ],
            )))
        });

    let detail = venue_only(venues, now)
        .venue_detail(VenueId::new(4))
        .await
        .expect("detail loads");

    assert_eq!(detail.venue, venue);
    assert_eq!(detail.shows.past_count(), 1);
    assert_eq!(detail.shows.upcoming_count(), 1);
}

#[rstest]
#[tokio::test]
async fn missing_venue_detail_is_not_found(now: DateTime<Utc>) {
    let mut venues = MockVenueRepository::new();
    venues
        .expect_find_with_engagements()
        .return_once(|_| Ok(None));

    let error = venue_only(venues, now)
        .venue_detail(VenueId::new(99))
        .await
        .expect_err("missing venue");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn deleting_a_missing_venue_is_not_found(now: DateTime<Utc>) {
    let mut venues = MockVenueRepository::new();
    venues
        .expect_delete()
        .return_once(|id| Err(VenueRepositoryError::not_found(id.get())));

    let error = venue_only(venues, now)
        .delete_venue(VenueId::new(99))
        .await
        .expect_err("missing venue");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn deleting_a_venue_returns_its_id(now: DateTime<Utc>) {
    let mut venues = MockVenueRepository::new();
    venues.expect_delete().return_once(|_| Ok(()));

    let deleted = venue_only(venues, now)
        .delete_venue(VenueId::new(7))
        .await
        .expect("venue deleted");
    assert_eq!(deleted, VenueId::new(7));
}

#[rstest]
#[case(VenueRepositoryError::duplicate_name("The Musical Hop"), ErrorCode::Unprocessable)]
#[case(VenueRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(VenueRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn create_venue_maps_repository_errors(
    now: DateTime<Utc>,
    #[case] failure: VenueRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut venues = MockVenueRepository::new();
    venues.expect_create().return_once(move |_| Err(failure));

    let error = venue_only(venues, now)
        .create_venue(record("The Musical Hop"))
        .await
        .expect_err("create fails");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn artist_search_counts_upcoming(now: DateTime<Utc>) {
    let mut artists = MockArtistRepository::new();
    artists.expect_search().return_once(move |_| {
        Ok(vec![Scheduled {
            subject: ArtistSummary {
                id: ArtistId::new(5),
                name: "Guns N Petals".to_owned(),
            },
            show_times: vec![now - Duration::days(30), now + Duration::days(30)],
        }])
    });
    let service = make_service(
        MockVenueRepository::new(),
        artists,
        MockShowRepository::new(),
        now,
    );

    let listings = service
        .search_artists(&SearchTerm::new("petal"))
        .await
        .expect("search succeeds");
    assert_eq!(
        listings,
        vec![ArtistListing {
            id: ArtistId::new(5),
            name: "Guns N Petals".to_owned(),
            num_upcoming_shows: 1,
        }]
    );
}

#[rstest]
#[tokio::test]
async fn show_with_unknown_venue_is_unprocessable(now: DateTime<Utc>) {
    let mut shows = MockShowRepository::new();
    shows
        .expect_create()
        .return_once(|_| Err(ShowRepositoryError::missing_reference("venue 9 does not exist")));
    let service = make_service(
        MockVenueRepository::new(),
        MockArtistRepository::new(),
        shows,
        now,
    );

    let error = service
        .create_show(ShowDraft {
            venue_id: VenueId::new(9),
            artist_id: ArtistId::new(1),
            start_time: now + Duration::days(1),
        })
        .await
        .expect_err("unknown venue");
    assert_eq!(error.code(), ErrorCode::Unprocessable);
}
