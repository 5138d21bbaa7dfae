//! Builds the service registry from the loaded settings.

use crate::configuration::{
    AuthorizationSettings, ConfigurationError, ConnectionStrings, MailSettings, MailTransport,
    Settings,
};
use crate::domain::city_info::ports::CityInfoRepository;
use crate::domain::mapping::{Mapper, MappingProfile};
use crate::domain::notification::ports::MailService;
use crate::inbound::http::authorization::{policy_from_settings, AuthorizationPolicy};
use crate::outbound::db::postgres_db::PostgresDb;
use crate::outbound::mail::cloud_mail::CloudMailService;
use crate::outbound::mail::local_mail::LocalMailService;
use crate::registry::ServiceRegistry;
use std::sync::Arc;

/// Registers every capability the API needs.
///
/// Fails on the first invalid setting, before anything is served.
pub fn register_services(
    configuration: &Settings,
    profiles: Vec<Box<dyn MappingProfile>>,
) -> Result<ServiceRegistry, ConfigurationError> {
    let mut registry = ServiceRegistry::new();
    register_repository(&mut registry, &configuration.db_connection_string)?;
    register_mapper(&mut registry, profiles)?;
    register_mail_service(&mut registry, &configuration.mail_settings)?;
    register_authorization(&mut registry, &configuration.authorization)?;
    Ok(registry)
}

/// The repository is scoped: one instance per request over the shared pool.
pub fn register_repository(
    registry: &mut ServiceRegistry,
    connection_strings: &ConnectionStrings,
) -> Result<(), ConfigurationError> {
    let db = PostgresDb::new(connection_strings)?;
    registry.add_scoped::<dyn CityInfoRepository, _>(move || -> Arc<dyn CityInfoRepository> {
        Arc::new(db.clone())
    })?;
    Ok(())
}

pub fn register_mapper(
    registry: &mut ServiceRegistry,
    profiles: Vec<Box<dyn MappingProfile>>,
) -> Result<(), ConfigurationError> {
    let mapper = Mapper::from_profiles(profiles)?;
    registry.add_singleton::<Mapper>(Arc::new(mapper))?;
    Ok(())
}

/// Binds exactly one mail sender, picked by `mail_settings.transport`.
pub fn register_mail_service(
    registry: &mut ServiceRegistry,
    settings: &MailSettings,
) -> Result<(), ConfigurationError> {
    let mail_to = settings.recipient()?;
    let mail_from = settings.sender()?;

    match settings.transport {
        MailTransport::Local => {
            let service = LocalMailService::new(mail_to, mail_from);
            registry.add_transient::<dyn MailService, _>(move || -> Arc<dyn MailService> {
                Arc::new(service.clone())
            })?;
        }
        MailTransport::Cloud => {
            let service = CloudMailService::new(settings.cloud()?, mail_to, mail_from)
                .map_err(|e| ConfigurationError::InvalidMailSettings(format!("{:#}", e)))?;
            registry.add_transient::<dyn MailService, _>(move || -> Arc<dyn MailService> {
                Arc::new(service.clone())
            })?;
        }
    }
    tracing::info!(transport = ?settings.transport, "Registered the mail service");
    Ok(())
}

pub fn register_authorization(
    registry: &mut ServiceRegistry,
    settings: &AuthorizationSettings,
) -> Result<(), ConfigurationError> {
    registry.add_singleton::<dyn AuthorizationPolicy>(policy_from_settings(settings))?;
    Ok(())
}
