//! Builders wiring Diesel repositories into services and HTTP state.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::DefaultClock;

use crate::config::AuthSettings;
use crate::domain::{AccessGuard, BookingService, CoffeeService, TriviaService};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::state::{BookingState, CoffeeState, TriviaState};
use crate::outbound::jwks::{HttpJwksSource, JwksTokenVerifier, TokenIssuer};
use crate::outbound::persistence::{
    DbPool, DieselArtistRepository, DieselCategoryRepository, DieselDrinkRepository,
    DieselQuestionRepository, DieselShowRepository, DieselVenueRepository,
};

use super::{AppDependencies, ServerConfig};

const JWKS_TIMEOUT: Duration = Duration::from_secs(5);

fn booking_state(pool: &DbPool) -> BookingState {
    let service = Arc::new(BookingService::new(
        Arc::new(DieselVenueRepository::new(pool.clone())),
        Arc::new(DieselArtistRepository::new(pool.clone())),
        Arc::new(DieselShowRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    ));
    BookingState::new(service.clone(), service)
}

fn trivia_state(pool: &DbPool) -> TriviaState {
    let service = Arc::new(TriviaService::new(
        Arc::new(DieselQuestionRepository::new(pool.clone())),
        Arc::new(DieselCategoryRepository::new(pool.clone())),
    ));
    TriviaState::new(service.clone(), service)
}

fn coffee_state(pool: &DbPool, auth: &AuthSettings) -> io::Result<CoffeeState> {
    let url = HttpJwksSource::url_for_domain(&auth.domain).map_err(io::Error::other)?;
    let source = HttpJwksSource::new(url, JWKS_TIMEOUT)
        .map_err(|err| io::Error::other(format!("build JWKS client: {err}")))?;
    let verifier = JwksTokenVerifier::new(
        source,
        TokenIssuer::for_domain(&auth.domain, auth.audience.clone()),
    );
    let service = Arc::new(CoffeeService::new(Arc::new(DieselDrinkRepository::new(
        pool.clone(),
    ))));
    Ok(CoffeeState::new(
        service.clone(),
        service,
        Arc::new(AccessGuard::new(Arc::new(verifier))),
    ))
}

/// Build the per-application state for every enabled route set.
///
/// # Errors
/// Fails when the coffee shop is enabled without identity provider settings
/// or its JWKS client cannot be built.
pub(super) fn build_dependencies(
    config: &ServerConfig,
    health: web::Data<HealthState>,
) -> io::Result<AppDependencies> {
    let pool = &config.db_pool;
    let apps = config.applications;
    let mut deps = AppDependencies::new(health);
    if apps.booking {
        deps = deps.with_booking(booking_state(pool));
    }
    if apps.trivia {
        deps = deps.with_trivia(trivia_state(pool));
    }
    if apps.coffee {
        let auth = config.auth.as_ref().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "coffee shop enabled without identity provider settings",
            )
        })?;
        deps = deps.with_coffee(coffee_state(pool, auth)?);
    }
    Ok(deps)
}
