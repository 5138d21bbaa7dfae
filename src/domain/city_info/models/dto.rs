use serde::{Deserialize, Serialize};

use super::point_of_interest::{NewPointOfInterest, PointOfInterestValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWithoutPointsOfInterestDto {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub number_of_points_of_interest: usize,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterestDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestDto {
    pub id: i32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForCreationDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForUpdateDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<PointOfInterestForCreationDto> for NewPointOfInterest {
    type Error = PointOfInterestValidationError;

    fn try_from(dto: PointOfInterestForCreationDto) -> Result<Self, Self::Error> {
        NewPointOfInterest::parse(dto.name, dto.description)
    }
}

impl TryFrom<PointOfInterestForUpdateDto> for NewPointOfInterest {
    type Error = PointOfInterestValidationError;

    fn try_from(dto: PointOfInterestForUpdateDto) -> Result<Self, Self::Error> {
        NewPointOfInterest::parse(dto.name, dto.description)
    }
}
