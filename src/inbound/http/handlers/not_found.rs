use crate::inbound::http::errors::AppError;
use actix_web::{HttpRequest, HttpResponse};

pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(format!(
        "No endpoint matches {} {}",
        req.method(),
        req.path()
    )))
}
