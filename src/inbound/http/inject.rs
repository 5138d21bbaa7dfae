use crate::inbound::http::errors::AppError;
use crate::registry::RequestScope;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use std::ops::Deref;
use std::sync::Arc;

/// Extracts a capability from the current request scope.
///
/// Scoped capabilities resolve to the same instance for every extractor in
/// one request.
pub struct Inject<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: ?Sized + Send + Sync + 'static> FromRequest for Inject<T> {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let extensions = req.extensions();
        let outcome = match extensions.get::<RequestScope>() {
            Some(scope) => scope.resolve::<T>().map(Inject).map_err(AppError::from),
            None => Err(AppError::Unexpected(anyhow::anyhow!(
                "No request scope is open for this request"
            ))),
        };
        ready(outcome)
    }
}
