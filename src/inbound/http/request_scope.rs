use crate::inbound::http::errors::AppError;
use crate::inbound::http::state::SharedAppState;
use crate::registry::RequestScope;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, HttpMessage};
use std::sync::Arc;

/// Opens a [`RequestScope`] before dispatch and drops it once the response is ready.
pub async fn open_request_scope(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let registry = req
        .app_data::<web::Data<SharedAppState>>()
        .map(|state| Arc::clone(state.registry()))
        .ok_or_else(|| AppError::Unexpected(anyhow::anyhow!("Application state is missing")))?;

    let scope = RequestScope::new(registry);
    tracing::debug!(scope_id = %scope.id(), "Opened request scope");
    req.extensions_mut().insert(scope);

    let response = next.call(req).await?;
    if let Some(scope) = response.request().extensions_mut().remove::<RequestScope>() {
        tracing::debug!(scope_id = %scope.id(), "Closed request scope");
    }
    Ok(response)
}
