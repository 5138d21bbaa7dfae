use anyhow::Context;
use async_trait::async_trait;

use super::PostgresDb;
use crate::domain::city_info::{
    errors::CityInfoError,
    models::{
        city::{City, CityId},
        point_of_interest::{NewPointOfInterest, PointOfInterest, PointOfInterestId},
    },
    ports::CityInfoRepository,
};

#[derive(sqlx::FromRow)]
struct CityRow {
    id: i32,
    name: String,
    description: Option<String>,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        City::new(row.id, &row.name, row.description.as_deref())
    }
}

#[derive(sqlx::FromRow)]
struct PointOfInterestRow {
    id: i32,
    city_id: i32,
    name: String,
    description: Option<String>,
}

impl From<PointOfInterestRow> for PointOfInterest {
    fn from(row: PointOfInterestRow) -> Self {
        PointOfInterest {
            id: row.id,
            city_id: row.city_id,
            name: row.name,
            description: row.description,
        }
    }
}

#[async_trait]
impl CityInfoRepository for PostgresDb {
    #[tracing::instrument(name = "Fetching all cities", skip(self))]
    async fn get_cities(&self) -> Result<Vec<City>, CityInfoError> {
        let rows = sqlx::query_as::<_, CityRow>(
            r#"SELECT id, name, description FROM cities ORDER BY name"#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch cities from the database")?;

        Ok(rows.into_iter().map(City::from).collect())
    }

    #[tracing::instrument(name = "Fetching a city", skip(self))]
    async fn get_city(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
    ) -> Result<Option<City>, CityInfoError> {
        let row = sqlx::query_as::<_, CityRow>(
            r#"SELECT id, name, description FROM cities WHERE id = $1"#,
        )
        .bind(city_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch a city from the database")?;

        let Some(city) = row.map(City::from) else {
            return Ok(None);
        };
        if !include_points_of_interest {
            return Ok(Some(city));
        }

        let points_of_interest = self.get_points_of_interest_for_city(city_id).await?;
        Ok(Some(city.with_points_of_interest(points_of_interest)))
    }

    #[tracing::instrument(name = "Checking if a city exists", skip(self))]
    async fn city_exists(&self, city_id: CityId) -> Result<bool, CityInfoError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM cities WHERE id = $1)"#,
        )
        .bind(city_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check whether a city exists")?;

        Ok(exists)
    }

    #[tracing::instrument(name = "Fetching points of interest for a city", skip(self))]
    async fn get_points_of_interest_for_city(
        &self,
        city_id: CityId,
    ) -> Result<Vec<PointOfInterest>, CityInfoError> {
        let rows = sqlx::query_as::<_, PointOfInterestRow>(
            r#"SELECT id, city_id, name, description FROM points_of_interest
            WHERE city_id = $1 ORDER BY id"#,
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch points of interest from the database")?;

        Ok(rows.into_iter().map(PointOfInterest::from).collect())
    }

    #[tracing::instrument(name = "Fetching a point of interest", skip(self))]
    async fn get_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, CityInfoError> {
        let row = sqlx::query_as::<_, PointOfInterestRow>(
            r#"SELECT id, city_id, name, description FROM points_of_interest
            WHERE city_id = $1 AND id = $2"#,
        )
        .bind(city_id)
        .bind(point_of_interest_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch a point of interest from the database")?;

        Ok(row.map(PointOfInterest::from))
    }

    #[tracing::instrument(
        name = "Saving a new point of interest",
        skip(self, point_of_interest),
        fields(point_of_interest_name = %point_of_interest.name.as_ref())
    )]
    async fn add_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest: NewPointOfInterest,
    ) -> Result<PointOfInterest, CityInfoError> {
        let row = sqlx::query_as::<_, PointOfInterestRow>(
            r#"INSERT INTO points_of_interest (city_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, city_id, name, description"#,
        )
        .bind(city_id)
        .bind(String::from(point_of_interest.name))
        .bind(point_of_interest.description.map(String::from))
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert a new point of interest in the database")?;

        Ok(row.into())
    }

    #[tracing::instrument(
        name = "Updating a point of interest",
        skip(self, point_of_interest),
        fields(point_of_interest_id = point_of_interest.id)
    )]
    async fn update_point_of_interest(
        &self,
        point_of_interest: &PointOfInterest,
    ) -> Result<(), CityInfoError> {
        let result = sqlx::query(
            r#"UPDATE points_of_interest SET name = $1, description = $2
            WHERE id = $3 AND city_id = $4"#,
        )
        .bind(&point_of_interest.name)
        .bind(&point_of_interest.description)
        .bind(point_of_interest.id)
        .bind(point_of_interest.city_id)
        .execute(&self.pool)
        .await
        .context("Failed to update a point of interest in the database")?;

        if result.rows_affected() == 0 {
            return Err(CityInfoError::NotFound(format!(
                "Point of interest with id {} not found",
                point_of_interest.id
            )));
        }
        Ok(())
    }

    #[tracing::instrument(
        name = "Deleting a point of interest",
        skip(self, point_of_interest),
        fields(point_of_interest_id = point_of_interest.id)
    )]
    async fn delete_point_of_interest(
        &self,
        point_of_interest: &PointOfInterest,
    ) -> Result<(), CityInfoError> {
        let result = sqlx::query(r#"DELETE FROM points_of_interest WHERE id = $1 AND city_id = $2"#)
            .bind(point_of_interest.id)
            .bind(point_of_interest.city_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete a point of interest from the database")?;

        if result.rows_affected() == 0 {
            return Err(CityInfoError::NotFound(format!(
                "Point of interest with id {} not found",
                point_of_interest.id
            )));
        }
        Ok(())
    }
}
