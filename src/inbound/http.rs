use crate::configuration::{ApplicationSettings, Environment};
use crate::domain::city_info::ports::CityInfoRepository;
use crate::domain::mapping::Mapper;
use crate::domain::notification::ports::MailService;
use crate::inbound::http::authorization::{authorize_endpoint, AuthorizationPolicy};
use crate::inbound::http::diagnostics::developer_exception_page;
use crate::inbound::http::handlers::points_of_interest::POINT_OF_INTEREST_ROUTE;
use crate::inbound::http::handlers::{
    create_point_of_interest, delete_point_of_interest, get_cities, get_city,
    get_point_of_interest, get_points_of_interest, health_check, not_found,
    update_point_of_interest,
};
use crate::inbound::http::negotiation::{OutputFormat, OutputFormatters};
use crate::inbound::http::request_scope::open_request_scope;
use crate::inbound::http::route_table::RouteTable;
use crate::inbound::http::state::SharedAppState;
use crate::registry::{Capability, ServiceRegistry};
use actix_web::dev::Server;
use actix_web::http::{Method, StatusCode};
use actix_web::middleware::{from_fn, Condition, ErrorHandlers};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub mod authorization;
mod diagnostics;
pub mod errors;
mod handlers;
pub mod inject;
pub mod negotiation;
mod request_scope;
pub mod route_table;
pub mod state;

const HEALTH_CHECK: &str = "/health_check";
const CITIES: &str = "/api/cities";
const CITY: &str = "/api/cities/{city_id}";
const POINTS_OF_INTEREST: &str = "/api/cities/{city_id}/pointsofinterest";
const POINT_OF_INTEREST: &str = "/api/cities/{city_id}/pointsofinterest/{id}";

/// Capabilities the mapped endpoints resolve at request time.
pub fn required_capabilities() -> Vec<Capability> {
    vec![
        Capability::of::<dyn CityInfoRepository>(),
        Capability::of::<dyn MailService>(),
        Capability::of::<dyn AuthorizationPolicy>(),
        Capability::of::<Mapper>(),
    ]
}

/// Patterns and methods mounted by [`run`].
pub fn route_table() -> RouteTable {
    RouteTable::default()
        .with(HEALTH_CHECK, &[Method::GET])
        .with(CITIES, &[Method::GET])
        .with(CITY, &[Method::GET])
        .with(POINTS_OF_INTEREST, &[Method::GET, Method::POST])
        .with(
            POINT_OF_INTEREST,
            &[Method::GET, Method::PUT, Method::DELETE],
        )
}

pub struct Application {
    port: u16,
    server: Server,
}

fn run(
    listener: TcpListener,
    state: SharedAppState,
    formatters: OutputFormatters,
) -> Result<Server, std::io::Error> {
    let development = state.environment().is_development();
    let state = web::Data::new(state);
    let formatters = web::Data::new(formatters);
    let routes = web::Data::new(route_table());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(from_fn(open_request_scope))
            .wrap(from_fn(authorize_endpoint))
            .wrap(Condition::new(
                development,
                ErrorHandlers::new()
                    .handler(StatusCode::INTERNAL_SERVER_ERROR, developer_exception_page),
            ))
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(formatters.clone())
            .app_data(routes.clone())
            .route(HEALTH_CHECK, web::get().to(health_check))
            .route(CITIES, web::get().to(get_cities))
            .route(CITY, web::get().to(get_city))
            .service(
                web::resource(POINTS_OF_INTEREST)
                    .route(web::get().to(get_points_of_interest))
                    .route(web::post().to(create_point_of_interest)),
            )
            .service(
                web::resource(POINT_OF_INTEREST)
                    .name(POINT_OF_INTEREST_ROUTE)
                    .route(web::get().to(get_point_of_interest))
                    .route(web::put().to(update_point_of_interest))
                    .route(web::delete().to(delete_point_of_interest)),
            )
            .default_service(web::route().to(not_found))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

impl Application {
    /// Checks the registry and binds the listener.
    ///
    /// Fails before serving anything if a capability the endpoints need has
    /// no binding.
    pub async fn build(
        registry: ServiceRegistry,
        configuration: ApplicationSettings,
        environment: Environment,
    ) -> Result<Self, anyhow::Error> {
        registry
            .verify(&required_capabilities())
            .context("The service registry is incomplete")?;

        let address = format!("{}:{}", configuration.host, configuration.port);
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
        let port = listener.local_addr()?.port();

        let state = SharedAppState::new(registry, environment);
        let formatters = OutputFormatters::default().with(OutputFormat::Xml);
        tracing::info!(
            port,
            environment = environment.as_str(),
            formatters = ?formatters.formats(),
            "Starting the City Info API"
        );
        let server = run(listener, state, formatters)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
