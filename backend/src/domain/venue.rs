//! Venues and the area-grouped venue listing.

use super::profile::{Profile, ProfileDraft, ProfileValidationError, require_text};
use super::shows::ShowBuckets;
use super::VenueId;

/// Unvalidated venue input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueDraft {
    pub profile: ProfileDraft,
    pub address: String,
}

/// Validated venue fields, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueRecord {
    profile: Profile,
    address: String,
}

impl VenueRecord {
    /// Public profile.
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Street address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl TryFrom<VenueDraft> for VenueRecord {
    type Error = ProfileValidationError;

    fn try_from(draft: VenueDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            profile: Profile::try_from(draft.profile)?,
            address: require_text(draft.address, "address")?,
        })
    }
}

/// A persisted venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    pub id: VenueId,
    pub record: VenueRecord,
}

impl Venue {
    /// Listing name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.record.profile().name()
    }
}

/// Minimal venue identity used by listings and search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: VenueId,
    pub name: String,
    pub city: String,
    pub state: String,
}

/// Venue summary with its live upcoming show count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueListing {
    pub id: VenueId,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing a `(city, state)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueListing>,
}

/// Group venues into areas.
///
/// Areas appear in order of their first venue; venues keep input order
/// within an area.
#[must_use]
pub fn group_into_areas(venues: Vec<(VenueSummary, usize)>) -> Vec<VenueArea> {
    let mut areas: Vec<VenueArea> = Vec::new();
    for (summary, num_upcoming_shows) in venues {
        let listing = VenueListing {
            id: summary.id,
            name: summary.name,
            num_upcoming_shows,
        };
        match areas
            .iter_mut()
            .find(|area| area.city == summary.city && area.state == summary.state)
        {
            Some(area) => area.venues.push(listing),
            None => areas.push(VenueArea {
                city: summary.city,
                state: summary.state,
                venues: vec![listing],
            }),
        }
    }
    areas
}

/// A venue together with its bucketed shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDetail {
    pub venue: Venue,
    pub shows: ShowBuckets,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn summary(id: i32, city: &str, state: &str) -> VenueSummary {
        VenueSummary {
            id: VenueId::new(id),
            name: format!("Venue {id}"),
            city: city.to_owned(),
            state: state.to_owned(),
        }
    }

    #[rstest]
    fn venues_are_grouped_by_city_and_state() {
        let areas = group_into_areas(vec![
            (summary(1, "San Francisco", "CA"), 0),
            (summary(2, "New York", "NY"), 2),
            (summary(3, "San Francisco", "CA"), 1),
            (summary(4, "San Francisco", "NM"), 0),
        ]);

        assert_eq!(areas.len(), 3);
        let first = areas.first().expect("first area");
        assert_eq!(first.city, "San Francisco");
        let ids: Vec<_> = first.venues.iter().map(|v| v.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(first.venues.get(1).map(|v| v.num_upcoming_shows), Some(1));
    }

    #[rstest]
    fn blank_address_is_rejected() {
        let draft = VenueDraft {
            profile: ProfileDraft {
                name: "Hall".to_owned(),
                city: "Leeds".to_owned(),
                state: "WY".to_owned(),
                ..ProfileDraft::default()
            },
            address: "  ".to_owned(),
        };
        let err = VenueRecord::try_from(draft).expect_err("blank address");
        assert_eq!(err.field(), "address");
    }
}
