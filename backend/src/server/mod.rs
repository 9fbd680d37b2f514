//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::routes::{
    configure_booking, configure_coffee, configure_health, configure_trivia, json_config,
    not_found, path_config, query_config,
};
use crate::inbound::http::state::{BookingState, CoffeeState, TriviaState};
use crate::middleware::Trace;

/// State for each mounted application. An absent state leaves its routes
/// unmounted, so their paths answer 404.
#[derive(Clone)]
pub struct AppDependencies {
    health: web::Data<HealthState>,
    booking: Option<web::Data<BookingState>>,
    trivia: Option<web::Data<TriviaState>>,
    coffee: Option<web::Data<CoffeeState>>,
}

impl AppDependencies {
    /// Health checks only.
    #[must_use]
    pub fn new(health: web::Data<HealthState>) -> Self {
        Self {
            health,
            booking: None,
            trivia: None,
            coffee: None,
        }
    }

    /// Mount the booking routes.
    #[must_use]
    pub fn with_booking(mut self, state: BookingState) -> Self {
        self.booking = Some(web::Data::new(state));
        self
    }

    /// Mount the trivia routes.
    #[must_use]
    pub fn with_trivia(mut self, state: TriviaState) -> Self {
        self.trivia = Some(web::Data::new(state));
        self
    }

    /// Mount the coffee-shop routes.
    #[must_use]
    pub fn with_coffee(mut self, state: CoffeeState) -> Self {
        self.coffee = Some(web::Data::new(state));
        self
    }
}

fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Headers", "Content-Type,Authorization"))
        .add((
            "Access-Control-Allow-Methods",
            "GET,POST,PATCH,DELETE,OPTIONS",
        ))
}

/// Assemble the application for the given dependencies.
///
/// # Examples
/// ```
/// use actix_web::web;
/// use trio::inbound::http::health::HealthState;
/// use trio::server::{AppDependencies, build_app};
///
/// let app = build_app(AppDependencies::new(web::Data::new(HealthState::new())));
/// ```
#[must_use]
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health,
        booking,
        trivia,
        coffee,
    } = deps;

    let mounted = App::new()
        .app_data(health)
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .wrap(cors_headers())
        .wrap(Trace)
        .configure(configure_health)
        .configure(move |cfg| {
            if let Some(state) = booking {
                cfg.app_data(state);
                configure_booking(cfg);
            }
            if let Some(state) = trivia {
                cfg.app_data(state);
                configure_trivia(cfg);
            }
            if let Some(state) = coffee {
                cfg.app_data(state);
                configure_coffee(cfg);
            }
        });

    #[cfg(debug_assertions)]
    let documented = mounted.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
    #[cfg(not(debug_assertions))]
    let documented = mounted;

    documented.default_service(web::to(not_found))
}

/// Construct the HTTP server for `config`, marking `health_state` ready once
/// the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when state construction, binding or
/// startup fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let deps = state_builders::build_dependencies(&config, health_state.clone())?;
    let bind_addr = config.bind_addr;
    let server = serve(deps, &config)?;

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(not(feature = "metrics"))]
fn serve(deps: AppDependencies, config: &ServerConfig) -> std::io::Result<Server> {
    Ok(HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run())
}

#[cfg(feature = "metrics")]
fn serve(deps: AppDependencies, config: &ServerConfig) -> std::io::Result<Server> {
    let prometheus = config.prometheus.clone();
    Ok(HttpServer::new(move || {
        build_app(deps.clone()).wrap(metrics::MetricsLayer::new(prometheus.clone()))
    })
    .bind(config.bind_addr)?
    .run())
}
