use crate::domain::city_info::models::city::{City, CityId};
use crate::domain::city_info::models::dto::{CityDto, CityWithoutPointsOfInterestDto};
use crate::domain::city_info::ports::CityInfoRepository;
use crate::domain::mapping::Mapper;
use crate::inbound::http::errors::AppError;
use crate::inbound::http::inject::Inject;
use crate::inbound::http::negotiation::Negotiated;
use actix_web::{web, Either};

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityQuery {
    #[serde(default)]
    include_points_of_interest: bool,
}

#[tracing::instrument(name = "Listing cities", skip_all)]
pub async fn get_cities(
    repository: Inject<dyn CityInfoRepository>,
    mapper: Inject<Mapper>,
) -> Result<Negotiated<CityWithoutPointsOfInterestDto>, AppError> {
    let cities = repository.get_cities().await?;
    let cities = mapper.map_all::<City, CityWithoutPointsOfInterestDto>(&cities)?;
    Ok(Negotiated::list("cities", "city", cities))
}

#[tracing::instrument(
    name = "Fetching a city",
    skip(repository, mapper),
    fields(city_id = %*city_id)
)]
pub async fn get_city(
    city_id: web::Path<CityId>,
    query: web::Query<CityQuery>,
    repository: Inject<dyn CityInfoRepository>,
    mapper: Inject<Mapper>,
) -> Result<Either<Negotiated<CityDto>, Negotiated<CityWithoutPointsOfInterestDto>>, AppError> {
    let city_id = city_id.into_inner();
    let include = query.include_points_of_interest;
    let city = repository
        .get_city(city_id, include)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("City with id {} was not found.", city_id)))?;

    if include {
        let city = mapper.map::<City, CityDto>(&city)?;
        Ok(Either::Left(Negotiated::ok("city", city)))
    } else {
        let city = mapper.map::<City, CityWithoutPointsOfInterestDto>(&city)?;
        Ok(Either::Right(Negotiated::ok("city", city)))
    }
}
