use async_trait::async_trait;

use super::errors::CityInfoError;
use super::models::{
    city::{City, CityId},
    point_of_interest::{NewPointOfInterest, PointOfInterest, PointOfInterestId},
};

#[async_trait]
/// Represents a store of cities and their points of interest.
pub trait CityInfoRepository: Send + Sync + 'static {
    /// Returns every city, without points of interest, ordered by name.
    async fn get_cities(&self) -> Result<Vec<City>, CityInfoError>;

    async fn get_city(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
    ) -> Result<Option<City>, CityInfoError>;

    async fn city_exists(&self, city_id: CityId) -> Result<bool, CityInfoError>;

    async fn get_points_of_interest_for_city(
        &self,
        city_id: CityId,
    ) -> Result<Vec<PointOfInterest>, CityInfoError>;

    async fn get_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, CityInfoError>;

    /// Stores a new point of interest and returns it with its assigned id.
    async fn add_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest: NewPointOfInterest,
    ) -> Result<PointOfInterest, CityInfoError>;

    async fn update_point_of_interest(
        &self,
        point_of_interest: &PointOfInterest,
    ) -> Result<(), CityInfoError>;

    async fn delete_point_of_interest(
        &self,
        point_of_interest: &PointOfInterest,
    ) -> Result<(), CityInfoError>;
}
