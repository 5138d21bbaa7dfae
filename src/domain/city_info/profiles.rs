use crate::domain::mapping::{MapperConfiguration, MappingProfile};

use super::models::{
    city::City,
    dto::{CityDto, CityWithoutPointsOfInterestDto, PointOfInterestDto},
    point_of_interest::PointOfInterest,
};

/// Every profile the API needs, in registration order.
pub fn all() -> Vec<Box<dyn MappingProfile>> {
    vec![Box::new(CityProfile), Box::new(PointOfInterestProfile)]
}

pub struct CityProfile;

impl MappingProfile for CityProfile {
    fn name(&self) -> &'static str {
        "CityProfile"
    }

    fn configure(&self, configuration: &mut MapperConfiguration) {
        configuration
            .create_map::<City, CityWithoutPointsOfInterestDto>(|city| {
                CityWithoutPointsOfInterestDto {
                    id: city.id,
                    name: city.name.clone(),
                    description: city.description.clone(),
                }
            })
            .create_map::<City, CityDto>(|city| CityDto {
                id: city.id,
                name: city.name.clone(),
                description: city.description.clone(),
                number_of_points_of_interest: city.points_of_interest.len(),
                points_of_interest: city
                    .points_of_interest
                    .iter()
                    .map(point_of_interest_dto)
                    .collect(),
            });
    }
}

pub struct PointOfInterestProfile;

impl MappingProfile for PointOfInterestProfile {
    fn name(&self) -> &'static str {
        "PointOfInterestProfile"
    }

    fn configure(&self, configuration: &mut MapperConfiguration) {
        configuration.create_map::<PointOfInterest, PointOfInterestDto>(point_of_interest_dto);
    }
}

fn point_of_interest_dto(point_of_interest: &PointOfInterest) -> PointOfInterestDto {
    PointOfInterestDto {
        id: point_of_interest.id,
        name: point_of_interest.name.clone(),
        description: point_of_interest.description.clone(),
    }
}
