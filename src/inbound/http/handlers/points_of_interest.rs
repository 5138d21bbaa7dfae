use crate::domain::city_info::models::city::CityId;
use crate::domain::city_info::models::dto::{
    PointOfInterestDto, PointOfInterestForCreationDto, PointOfInterestForUpdateDto,
};
use crate::domain::city_info::models::point_of_interest::{
    NewPointOfInterest, PointOfInterest, PointOfInterestId,
};
use crate::domain::city_info::ports::CityInfoRepository;
use crate::domain::mapping::Mapper;
use crate::domain::notification::models::MailMessage;
use crate::domain::notification::ports::MailService;
use crate::inbound::http::errors::AppError;
use crate::inbound::http::inject::Inject;
use crate::inbound::http::negotiation::Negotiated;
use actix_web::{web, HttpRequest, HttpResponse};
use anyhow::Context;

pub const POINT_OF_INTEREST_ROUTE: &str = "get_point_of_interest";

async fn ensure_city_exists(
    repository: &dyn CityInfoRepository,
    city_id: CityId,
) -> Result<(), AppError> {
    if repository.city_exists(city_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "City with id {} was not found.",
            city_id
        )))
    }
}

async fn find_point_of_interest(
    repository: &dyn CityInfoRepository,
    city_id: CityId,
    point_of_interest_id: PointOfInterestId,
) -> Result<PointOfInterest, AppError> {
    ensure_city_exists(repository, city_id).await?;
    repository
        .get_point_of_interest_for_city(city_id, point_of_interest_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Point of interest with id {} was not found in city {}.",
                point_of_interest_id, city_id
            ))
        })
}

#[tracing::instrument(
    name = "Listing points of interest",
    skip(repository, mapper),
    fields(city_id = %*city_id)
)]
pub async fn get_points_of_interest(
    city_id: web::Path<CityId>,
    repository: Inject<dyn CityInfoRepository>,
    mapper: Inject<Mapper>,
) -> Result<Negotiated<PointOfInterestDto>, AppError> {
    let city_id = city_id.into_inner();
    ensure_city_exists(&*repository, city_id).await?;

    let points_of_interest = repository.get_points_of_interest_for_city(city_id).await?;
    let points_of_interest =
        mapper.map_all::<PointOfInterest, PointOfInterestDto>(&points_of_interest)?;
    Ok(Negotiated::list(
        "pointsOfInterest",
        "pointOfInterest",
        points_of_interest,
    ))
}

#[tracing::instrument(name = "Fetching a point of interest", skip(repository, mapper))]
pub async fn get_point_of_interest(
    path: web::Path<(CityId, PointOfInterestId)>,
    repository: Inject<dyn CityInfoRepository>,
    mapper: Inject<Mapper>,
) -> Result<Negotiated<PointOfInterestDto>, AppError> {
    let (city_id, point_of_interest_id) = path.into_inner();
    let point_of_interest =
        find_point_of_interest(&*repository, city_id, point_of_interest_id).await?;

    let point_of_interest = mapper.map::<PointOfInterest, PointOfInterestDto>(&point_of_interest)?;
    Ok(Negotiated::ok("pointOfInterest", point_of_interest))
}

#[tracing::instrument(
    name = "Adding a point of interest",
    skip(req, body, repository, mapper),
    fields(city_id = %*city_id, name = %body.name)
)]
pub async fn create_point_of_interest(
    req: HttpRequest,
    city_id: web::Path<CityId>,
    body: web::Json<PointOfInterestForCreationDto>,
    repository: Inject<dyn CityInfoRepository>,
    mapper: Inject<Mapper>,
) -> Result<Negotiated<PointOfInterestDto>, AppError> {
    let city_id = city_id.into_inner();
    let new_point_of_interest = NewPointOfInterest::try_from(body.into_inner())?;
    ensure_city_exists(&*repository, city_id).await?;

    let created = repository
        .add_point_of_interest_for_city(city_id, new_point_of_interest)
        .await?;

    let location = req
        .url_for(
            POINT_OF_INTEREST_ROUTE,
            [city_id.to_string(), created.id.to_string()],
        )
        .context("Failed to build the location of the new point of interest")?;
    let created = mapper.map::<PointOfInterest, PointOfInterestDto>(&created)?;
    Ok(Negotiated::created(
        location.to_string(),
        "pointOfInterest",
        created,
    ))
}

#[tracing::instrument(
    name = "Updating a point of interest",
    skip(body, repository),
    fields(name = %body.name)
)]
pub async fn update_point_of_interest(
    path: web::Path<(CityId, PointOfInterestId)>,
    body: web::Json<PointOfInterestForUpdateDto>,
    repository: Inject<dyn CityInfoRepository>,
) -> Result<HttpResponse, AppError> {
    let (city_id, point_of_interest_id) = path.into_inner();
    let changes = NewPointOfInterest::try_from(body.into_inner())?;
    let point_of_interest =
        find_point_of_interest(&*repository, city_id, point_of_interest_id).await?;

    repository
        .update_point_of_interest(&point_of_interest.apply(changes))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(name = "Deleting a point of interest", skip(repository, mail_service))]
pub async fn delete_point_of_interest(
    path: web::Path<(CityId, PointOfInterestId)>,
    repository: Inject<dyn CityInfoRepository>,
    mail_service: Inject<dyn MailService>,
) -> Result<HttpResponse, AppError> {
    let (city_id, point_of_interest_id) = path.into_inner();
    let point_of_interest =
        find_point_of_interest(&*repository, city_id, point_of_interest_id).await?;

    repository
        .delete_point_of_interest(&point_of_interest)
        .await?;

    let message = MailMessage::new(
        "Point of interest deleted.",
        &format!(
            "Point of interest {} with id {} was deleted.",
            point_of_interest.name, point_of_interest.id
        ),
    )
    .context("Failed to compose the deletion mail")?;
    // A failed notification does not fail the request.
    if let Err(e) = mail_service.send(&message).await {
        tracing::error!(error = ?e, "Failed to send the deletion mail");
    }

    Ok(HttpResponse::NoContent().finish())
}
