use crate::helpers::configure_database;
use city_info::domain::city_info::errors::CityInfoError;
use city_info::domain::city_info::models::point_of_interest::{
    NewPointOfInterest, PointOfInterest,
};
use city_info::domain::city_info::ports::CityInfoRepository;
use claim::{assert_none, assert_ok, assert_some};

fn new_point_of_interest(name: &str, description: Option<&str>) -> NewPointOfInterest {
    NewPointOfInterest::parse(name.to_string(), description.map(str::to_string)).unwrap()
}

#[tokio::test]
async fn cities_are_read_ordered_by_name() {
    let repository = configure_database().await;

    let cities = repository.get_cities().await.unwrap();

    let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Antwerp", "New York City", "Paris"]);
    assert!(cities.iter().all(|c| c.points_of_interest.is_empty()));
}

#[tokio::test]
async fn a_city_is_read_with_or_without_its_points_of_interest() {
    let repository = configure_database().await;

    let bare = assert_some!(repository.get_city(3, false).await.unwrap());
    let full = assert_some!(repository.get_city(3, true).await.unwrap());

    assert_eq!(bare.name, "Paris");
    assert!(bare.points_of_interest.is_empty());
    let names: Vec<&str> = full
        .points_of_interest
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Eiffel Tower", "The Louvre"]);
}

#[tokio::test]
async fn an_unknown_city_is_absent() {
    let repository = configure_database().await;

    assert_none!(repository.get_city(42, true).await.unwrap());
    assert!(!repository.city_exists(42).await.unwrap());
    assert!(repository.city_exists(1).await.unwrap());
}

#[tokio::test]
async fn points_of_interest_are_read_per_city() {
    let repository = configure_database().await;

    let points_of_interest = repository.get_points_of_interest_for_city(1).await.unwrap();

    assert_eq!(points_of_interest.len(), 2);
    assert!(points_of_interest.iter().all(|p| p.city_id == 1));
    assert!(repository
        .get_points_of_interest_for_city(42)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn a_point_of_interest_is_only_found_under_its_own_city() {
    let repository = configure_database().await;

    let central_park = assert_some!(repository
        .get_point_of_interest_for_city(1, 1)
        .await
        .unwrap());

    assert_eq!(central_park.name, "Central Park");
    assert_none!(repository
        .get_point_of_interest_for_city(2, 1)
        .await
        .unwrap());
}

#[tokio::test]
async fn added_points_of_interest_get_a_new_id_and_are_persisted() {
    let repository = configure_database().await;

    let added = repository
        .add_point_of_interest_for_city(
            2,
            new_point_of_interest("Rubens House", Some("The home of Peter Paul Rubens.")),
        )
        .await
        .unwrap();

    assert_eq!(added.city_id, 2);
    assert!(added.id > 6);
    let stored = assert_some!(repository
        .get_point_of_interest_for_city(2, added.id)
        .await
        .unwrap());
    assert_eq!(stored, added);
}

#[tokio::test]
async fn updates_are_persisted() {
    let repository = configure_database().await;
    let louvre = assert_some!(repository
        .get_point_of_interest_for_city(3, 6)
        .await
        .unwrap());

    let updated = louvre.apply(new_point_of_interest("Louvre Museum", None));
    assert_ok!(repository.update_point_of_interest(&updated).await);

    let stored = assert_some!(repository
        .get_point_of_interest_for_city(3, 6)
        .await
        .unwrap());
    assert_eq!(stored.name, "Louvre Museum");
    assert_none!(stored.description);
}

#[tokio::test]
async fn updating_an_unknown_point_of_interest_is_not_found() {
    let repository = configure_database().await;
    let missing = PointOfInterest {
        id: 99,
        city_id: 3,
        name: "Nowhere".to_string(),
        description: None,
    };

    let outcome = repository.update_point_of_interest(&missing).await;

    assert!(matches!(outcome, Err(CityInfoError::NotFound(_))));
}

#[tokio::test]
async fn deleted_points_of_interest_are_gone() {
    let repository = configure_database().await;
    let eiffel_tower = assert_some!(repository
        .get_point_of_interest_for_city(3, 5)
        .await
        .unwrap());

    assert_ok!(repository.delete_point_of_interest(&eiffel_tower).await);

    assert_none!(repository
        .get_point_of_interest_for_city(3, 5)
        .await
        .unwrap());
    assert_eq!(
        repository
            .get_points_of_interest_for_city(3)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn deleting_an_unknown_point_of_interest_is_not_found() {
    let repository = configure_database().await;
    let central_park = assert_some!(repository
        .get_point_of_interest_for_city(1, 1)
        .await
        .unwrap());
    let elsewhere = PointOfInterest {
        city_id: 2,
        ..central_park
    };

    let outcome = repository.delete_point_of_interest(&elsewhere).await;

    assert!(matches!(outcome, Err(CityInfoError::NotFound(_))));
    assert_some!(repository
        .get_point_of_interest_for_city(1, 1)
        .await
        .unwrap());
}
