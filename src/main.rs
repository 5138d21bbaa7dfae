use city_info::configuration::get_configuration;
use city_info::domain::city_info::profiles;
use city_info::inbound::http::Application;
use city_info::outbound::telemetry::init_logger;
use city_info::startup::register_services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration()?;
    init_logger("city_info", &configuration.log_level(), std::io::stdout)?;

    let registry = register_services(&configuration, profiles::all())?;
    let application = Application::build(
        registry,
        configuration.application,
        configuration.environment,
    )
    .await?;

    application.run_until_stopped().await?;
    Ok(())
}
