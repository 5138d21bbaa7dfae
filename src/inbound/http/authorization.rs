//! Authorization stage and the policies it can evaluate.

use crate::configuration::AuthorizationSettings;
use crate::inbound::http::errors::AppError;
use crate::inbound::http::route_table::RouteTable;
use crate::inbound::http::state::SharedAppState;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::HeaderMap;
use actix_web::http::Method;
use actix_web::middleware::Next;
use actix_web::web;
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// The matched endpoint a policy decides on.
#[derive(Debug)]
pub struct Endpoint<'a> {
    pub pattern: &'a str,
    pub method: &'a Method,
    pub headers: &'a HeaderMap,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthorizationError {
    #[error("{method} {pattern} requires the '{header}' header")]
    MissingApiKey {
        method: Method,
        pattern: String,
        header: &'static str,
    },
    #[error("The provided API key is not allowed to {method} {pattern}")]
    InvalidApiKey { method: Method, pattern: String },
}

pub trait AuthorizationPolicy: Send + Sync + 'static {
    fn evaluate(&self, endpoint: &Endpoint<'_>) -> Result<(), AuthorizationError>;
}

/// Lets every request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAnonymous;

impl AuthorizationPolicy for AllowAnonymous {
    fn evaluate(&self, _endpoint: &Endpoint<'_>) -> Result<(), AuthorizationError> {
        Ok(())
    }
}

/// Reads stay open; anything that changes state needs the configured API key.
#[derive(Debug, Clone)]
pub struct ApiKeyPolicy {
    api_key: Secret<String>,
}

impl ApiKeyPolicy {
    pub fn new(api_key: Secret<String>) -> Self {
        Self { api_key }
    }
}

impl AuthorizationPolicy for ApiKeyPolicy {
    fn evaluate(&self, endpoint: &Endpoint<'_>) -> Result<(), AuthorizationError> {
        if endpoint.method.is_safe() {
            return Ok(());
        }

        let provided = endpoint
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AuthorizationError::MissingApiKey {
                method: endpoint.method.clone(),
                pattern: endpoint.pattern.to_string(),
                header: API_KEY_HEADER,
            })?;

        if provided != self.api_key.expose_secret() {
            return Err(AuthorizationError::InvalidApiKey {
                method: endpoint.method.clone(),
                pattern: endpoint.pattern.to_string(),
            });
        }
        Ok(())
    }
}

pub fn policy_from_settings(settings: &AuthorizationSettings) -> Arc<dyn AuthorizationPolicy> {
    match &settings.api_key {
        Some(api_key) if !api_key.expose_secret().is_empty() => {
            Arc::new(ApiKeyPolicy::new(api_key.clone()))
        }
        _ => Arc::new(AllowAnonymous),
    }
}

/// Evaluates the registered [`AuthorizationPolicy`] against the matched endpoint.
///
/// Requests that match no route, by path or by method, are passed through so
/// the router answers them with a 404.
pub async fn authorize_endpoint(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, actix_web::Error> {
    let routed = req.match_pattern().filter(|pattern| {
        req.app_data::<web::Data<RouteTable>>()
            .is_some_and(|table| table.allows(pattern, req.method()))
    });
    let Some(pattern) = routed else {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    };

    let state = req
        .app_data::<web::Data<SharedAppState>>()
        .ok_or_else(|| AppError::Unexpected(anyhow::anyhow!("Application state is missing")))?;
    let policy = state
        .registry()
        .resolve::<dyn AuthorizationPolicy>()
        .map_err(AppError::from)?;

    let decision = policy.evaluate(&Endpoint {
        pattern: &pattern,
        method: req.method(),
        headers: req.headers(),
    });
    if let Err(e) = decision {
        tracing::warn!(error = %e, "Request denied by the authorization policy");
        return Ok(req.error_response(AppError::from(e)).map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
