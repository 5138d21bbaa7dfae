use async_trait::async_trait;
use city_info::configuration::{
    get_configuration, AuthorizationSettings, ConnectionStrings, Environment,
};
use city_info::domain::city_info::errors::CityInfoError;
use city_info::domain::city_info::models::city::{City, CityId};
use city_info::domain::city_info::models::point_of_interest::{
    NewPointOfInterest, PointOfInterest, PointOfInterestId,
};
use city_info::domain::city_info::ports::CityInfoRepository;
use city_info::domain::city_info::profiles;
use city_info::domain::notification::models::MailMessage;
use city_info::domain::notification::ports::{MailError, MailService};
use city_info::inbound::http::Application;
use city_info::outbound::db::postgres_db::PostgresDb;
use city_info::outbound::telemetry::init_logger;
use city_info::registry::ServiceRegistry;
use city_info::startup::{register_authorization, register_mapper};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let c = get_configuration().expect("Failed to read configuration");
    let default_filter_level = c.general.log_level;
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        init_logger(&subscriber_name, &default_filter_level, std::io::stdout)
            .expect("Failed to set up logging");
    } else {
        init_logger(&subscriber_name, &default_filter_level, std::io::sink)
            .expect("Failed to set up logging");
    }
});

#[derive(Default)]
struct Store {
    cities: Vec<City>,
    points_of_interest: Vec<PointOfInterest>,
    next_id: PointOfInterestId,
}

/// Repository double holding the seed data in memory.
#[derive(Clone)]
pub struct InMemoryCityInfo {
    store: Arc<Mutex<Store>>,
}

impl InMemoryCityInfo {
    pub fn seeded() -> Self {
        let cities = vec![
            City::new(1, "New York City", Some("The one with that big park.")),
            City::new(
                2,
                "Antwerp",
                Some("The one with the cathedral that was never really finished."),
            ),
            City::new(3, "Paris", Some("The one with that big tower.")),
        ];
        let points_of_interest = [
            (1, "Central Park", "The most visited urban park in the United States."),
            (1, "Empire State Building", "A 102-story skyscraper located in Midtown Manhattan."),
            (2, "Cathedral of Our Lady", "A Gothic style cathedral."),
            (2, "Antwerp Central Station", "The finest example of railway architecture in Belgium."),
            (3, "Eiffel Tower", "A wrought iron lattice tower on the Champ de Mars."),
            (3, "The Louvre", "The world's largest museum."),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (city_id, name, description))| PointOfInterest {
            id: i as PointOfInterestId + 1,
            city_id,
            name: name.to_string(),
            description: Some(description.to_string()),
        })
        .collect::<Vec<_>>();

        let next_id = points_of_interest.len() as PointOfInterestId + 1;
        Self {
            store: Arc::new(Mutex::new(Store {
                cities,
                points_of_interest,
                next_id,
            })),
        }
    }

    pub fn point_of_interest(&self, id: PointOfInterestId) -> Option<PointOfInterest> {
        self.store
            .lock()
            .points_of_interest
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }
}

#[async_trait]
impl CityInfoRepository for InMemoryCityInfo {
    async fn get_cities(&self) -> Result<Vec<City>, CityInfoError> {
        let mut cities = self.store.lock().cities.clone();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cities)
    }

    async fn get_city(
        &self,
        city_id: CityId,
        include_points_of_interest: bool,
    ) -> Result<Option<City>, CityInfoError> {
        let city = self
            .store
            .lock()
            .cities
            .iter()
            .find(|c| c.id == city_id)
            .cloned();
        match city {
            Some(city) if include_points_of_interest => {
                let points_of_interest = self.get_points_of_interest_for_city(city_id).await?;
                Ok(Some(city.with_points_of_interest(points_of_interest)))
            }
            city => Ok(city),
        }
    }

    async fn city_exists(&self, city_id: CityId) -> Result<bool, CityInfoError> {
        Ok(self.store.lock().cities.iter().any(|c| c.id == city_id))
    }

    async fn get_points_of_interest_for_city(
        &self,
        city_id: CityId,
    ) -> Result<Vec<PointOfInterest>, CityInfoError> {
        Ok(self
            .store
            .lock()
            .points_of_interest
            .iter()
            .filter(|p| p.city_id == city_id)
            .cloned()
            .collect())
    }

    async fn get_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest_id: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, CityInfoError> {
        Ok(self
            .store
            .lock()
            .points_of_interest
            .iter()
            .find(|p| p.city_id == city_id && p.id == point_of_interest_id)
            .cloned())
    }

    async fn add_point_of_interest_for_city(
        &self,
        city_id: CityId,
        point_of_interest: NewPointOfInterest,
    ) -> Result<PointOfInterest, CityInfoError> {
        let mut store = self.store.lock();
        let created = PointOfInterest {
            id: store.next_id,
            city_id,
            name: point_of_interest.name.into(),
            description: point_of_interest.description.map(String::from),
        };
        store.next_id += 1;
        store.points_of_interest.push(created.clone());
        Ok(created)
    }

    async fn update_point_of_interest(
        &self,
        point_of_interest: &PointOfInterest,
    ) -> Result<(), CityInfoError> {
        let mut store = self.store.lock();
        let stored = store
            .points_of_interest
            .iter_mut()
            .find(|p| p.id == point_of_interest.id)
            .ok_or_else(|| CityInfoError::NotFound(point_of_interest.id.to_string()))?;
        *stored = point_of_interest.clone();
        Ok(())
    }

    async fn delete_point_of_interest(
        &self,
        point_of_interest: &PointOfInterest,
    ) -> Result<(), CityInfoError> {
        self.store
            .lock()
            .points_of_interest
            .retain(|p| p.id != point_of_interest.id);
        Ok(())
    }
}

/// Repository double whose every call fails unexpectedly.
pub struct BrokenCityInfo;

#[async_trait]
impl CityInfoRepository for BrokenCityInfo {
    async fn get_cities(&self) -> Result<Vec<City>, CityInfoError> {
        Err(anyhow::anyhow!("The <database> is unreachable").into())
    }

    async fn get_city(&self, _: CityId, _: bool) -> Result<Option<City>, CityInfoError> {
        Err(anyhow::anyhow!("The <database> is unreachable").into())
    }

    async fn city_exists(&self, _: CityId) -> Result<bool, CityInfoError> {
        Err(anyhow::anyhow!("The <database> is unreachable").into())
    }

    async fn get_points_of_interest_for_city(
        &self,
        _: CityId,
    ) -> Result<Vec<PointOfInterest>, CityInfoError> {
        Err(anyhow::anyhow!("The <database> is unreachable").into())
    }

    async fn get_point_of_interest_for_city(
        &self,
        _: CityId,
        _: PointOfInterestId,
    ) -> Result<Option<PointOfInterest>, CityInfoError> {
        Err(anyhow::anyhow!("The <database> is unreachable").into())
    }

    async fn add_point_of_interest_for_city(
        &self,
        _: CityId,
        _: NewPointOfInterest,
    ) -> Result<PointOfInterest, CityInfoError> {
        Err(anyhow::anyhow!("The <database> is unreachable").into())
    }

    async fn update_point_of_interest(&self, _: &PointOfInterest) -> Result<(), CityInfoError> {
        Err(anyhow::anyhow!("The <database> is unreachable").into())
    }

    async fn delete_point_of_interest(&self, _: &PointOfInterest) -> Result<(), CityInfoError> {
        Err(anyhow::anyhow!("The <database> is unreachable").into())
    }
}

/// Mail double that keeps every sent message.
#[derive(Clone, Default)]
pub struct RecordingMail {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl RecordingMail {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl MailService for RecordingMail {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

pub struct TestSettings {
    pub environment: Environment,
    pub api_key: Option<String>,
    pub broken_repository: bool,
    pub register_mail: bool,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            environment: Environment::Local,
            api_key: None,
            broken_repository: false,
            register_mail: true,
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub repository: InMemoryCityInfo,
    pub mail: RecordingMail,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn get(&self, path: &str, accept: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}{}", &self.address, path))
            .header("Accept", accept)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_point_of_interest(
        &self,
        city_id: CityId,
        body: serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .post(&format!(
                "{}/api/cities/{}/pointsofinterest",
                &self.address, city_id
            ))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
        body: serde_json::Value,
    ) -> reqwest::Response {
        self.api_client
            .put(&format!(
                "{}/api/cities/{}/pointsofinterest/{}",
                &self.address, city_id, id
            ))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_point_of_interest(
        &self,
        city_id: CityId,
        id: PointOfInterestId,
        api_key: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self.api_client.delete(&format!(
            "{}/api/cities/{}/pointsofinterest/{}",
            &self.address, city_id, id
        ));
        if let Some(api_key) = api_key {
            request = request.header("X-Api-Key", api_key);
        }
        request.send().await.expect("Failed to execute request.")
    }
}

pub fn build_registry(
    settings: &TestSettings,
    repository: &InMemoryCityInfo,
    mail: &RecordingMail,
) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    if settings.broken_repository {
        registry
            .add_scoped::<dyn CityInfoRepository, _>(|| -> Arc<dyn CityInfoRepository> {
                Arc::new(BrokenCityInfo)
            })
            .unwrap();
    } else {
        let repository = repository.clone();
        registry
            .add_scoped::<dyn CityInfoRepository, _>(move || -> Arc<dyn CityInfoRepository> {
                Arc::new(repository.clone())
            })
            .unwrap();
    }
    register_mapper(&mut registry, profiles::all()).unwrap();
    if settings.register_mail {
        let mail = mail.clone();
        registry
            .add_transient::<dyn MailService, _>(move || -> Arc<dyn MailService> {
                Arc::new(mail.clone())
            })
            .unwrap();
    }
    register_authorization(
        &mut registry,
        &AuthorizationSettings {
            api_key: settings.api_key.clone().map(Secret::new),
        },
    )
    .unwrap();
    registry
}

pub async fn try_spawn_app(settings: TestSettings) -> Result<TestApp, anyhow::Error> {
    Lazy::force(&TRACING);
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration");
        c.application.port = 0;
        c
    };

    let repository = InMemoryCityInfo::seeded();
    let mail = RecordingMail::default();
    let registry = build_registry(&settings, &repository, &mail);

    let application =
        Application::build(registry, configuration.application, settings.environment).await?;
    let address = format!("http://127.0.0.1:{}", application.port());
    let _ = tokio::spawn(application.run_until_stopped());

    Ok(TestApp {
        address,
        repository,
        mail,
        api_client: reqwest::Client::new(),
    })
}

pub async fn spawn_app_with(settings: TestSettings) -> TestApp {
    try_spawn_app(settings)
        .await
        .expect("Failed to build application")
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(TestSettings::default()).await
}

/// Creates a randomly named database next to the configured one, migrates and
/// seeds it, and returns a repository pointing at it.
pub async fn configure_database() -> PostgresDb {
    Lazy::force(&TRACING);
    let configuration = get_configuration().expect("Failed to read configuration");
    let connection_string = configuration
        .db_connection_string
        .city_info_db()
        .expect("Missing connection string")
        .expose_secret()
        .clone();
    let database_name = Uuid::new_v4().to_string();

    let options =
        PgConnectOptions::from_str(&connection_string).expect("Invalid connection string");
    let mut connection = PgConnection::connect_with(&options.clone().database("postgres"))
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, database_name).as_str())
        .await
        .expect("Failed to create database");

    let connection_pool = PgPool::connect_with(options.database(&database_name))
        .await
        .expect("Failed to connect to Postgres");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    let mut url = reqwest::Url::parse(&connection_string).expect("Invalid connection string");
    url.set_path(&format!("/{}", database_name));
    PostgresDb::new(&ConnectionStrings {
        city_info_db: Some(Secret::new(url.to_string())),
    })
    .expect("Failed to build the repository")
}
