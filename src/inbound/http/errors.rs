use crate::domain::city_info::errors::CityInfoError;
use crate::domain::city_info::models::point_of_interest::PointOfInterestValidationError;
use crate::domain::mapping::MappingError;
use crate::inbound::http::authorization::AuthorizationError;
use crate::registry::RegistryError;
use crate::utils::error_chain_fmt;

use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use actix_web::{http::StatusCode, ResponseError};

#[derive(thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("A required service could not be resolved")]
    Configuration(#[from] RegistryError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<CityInfoError> for AppError {
    fn from(error: CityInfoError) -> Self {
        match error {
            CityInfoError::ValidationError(s) => AppError::ValidationError(s),
            CityInfoError::NotFound(s) => AppError::NotFound(s),
            CityInfoError::Unexpected(e) => AppError::Unexpected(e),
        }
    }
}

impl From<PointOfInterestValidationError> for AppError {
    fn from(error: PointOfInterestValidationError) -> Self {
        AppError::ValidationError(error.to_string())
    }
}

impl From<MappingError> for AppError {
    fn from(error: MappingError) -> Self {
        AppError::Unexpected(anyhow::Error::new(error).context("Failed to map a response"))
    }
}

impl From<AuthorizationError> for AppError {
    fn from(error: AuthorizationError) -> Self {
        AppError::Forbidden(error.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Configuration(_) | AppError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let body = match self {
            AppError::ValidationError(s) | AppError::NotFound(s) | AppError::Forbidden(s) => {
                s.clone()
            }
            AppError::Configuration(_) | AppError::Unexpected(_) => {
                "An unexpected error occurred.".to_string()
            }
        };
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(body)
    }
}
