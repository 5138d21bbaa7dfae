use crate::domain::city_info::models::point_of_interest::PointOfInterestValidationError;

#[derive(thiserror::Error, Debug)]
pub enum CityInfoError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<PointOfInterestValidationError> for CityInfoError {
    fn from(error: PointOfInterestValidationError) -> Self {
        Self::ValidationError(error.to_string())
    }
}
