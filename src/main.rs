#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate prometheus;
#[macro_use]
extern crate rocket;

use config::Config;
use growatt_sensors::api;
use growatt_sensors::platform::{self, Platform};
use growatt_sensors::sensor::{Sensor, SensorSnapshot};
use growatt_sensors::throttle::SCAN_INTERVAL;
use rocket::http::ContentType;
use rocket::State;
use std::time::Duration;
use tokio::sync::Mutex;

mod metrics;

#[derive(Clone, serde::Deserialize)]
pub struct GrowattConfig {
    api_url: String,
    username: String,
    password: String,
    plant_id: String,
    name: String,
    /// Minimum seconds between two fetches of the same device
    interval: u64,
}

/// Structure containing state for API handlers.
pub struct StateData {
    /// Locked for a whole update cycle so cycles never overlap
    platform: Mutex<Platform>,
}

/// Read settings from `growatt.toml` (optional) and `GROWATT_*` environment variables.
pub fn read_settings() -> Result<GrowattConfig, config::ConfigError> {
    let mut settings = Config::default();
    settings
        .set_default("api_url", api::DEFAULT_API_URL)?
        .set_default("plant_id", platform::DEFAULT_PLANT_ID)?
        .set_default("name", platform::DEFAULT_NAME)?
        .set_default("interval", SCAN_INTERVAL.as_secs() as i64)?
        .merge(config::File::with_name("growatt").required(false))?
        .merge(config::Environment::with_prefix("GROWATT"))?;

    settings.try_into()
}

#[get("/metrics")]
async fn metrics_route(state: &State<StateData>) -> Result<String, api::Error> {
    let mut platform = state.platform.lock().await;
    platform.update().await;
    metrics::collect(&platform);
    metrics::read()
}

#[get("/sensors")]
async fn sensors_route(state: &State<StateData>) -> Result<(ContentType, String), api::Error> {
    let mut platform = state.platform.lock().await;
    platform.update().await;

    let snapshots: Vec<SensorSnapshot> = platform.sensors().iter().map(Sensor::snapshot).collect();
    serde_json::to_string(&snapshots)
        .map(|body| (ContentType::JSON, body))
        .or(Err(api::Error::FormatError))
}

#[get("/dump-devices")]
async fn dump_devices_route(
    state: &State<StateData>,
) -> Result<(ContentType, String), api::Error> {
    let dump = state.platform.lock().await.dump().await;

    serde_json::to_string_pretty(&dump)
        .map(|body| (ContentType::JSON, body))
        .or(Err(api::Error::FormatError))
}

#[rocket::main]
async fn main() {
    env_logger::init();

    let settings = match read_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let api = api::api(settings.api_url, settings.username, settings.password);
    let platform = match platform::setup(
        &api,
        &settings.plant_id,
        &settings.name,
        Duration::from_secs(settings.interval),
    )
    .await
    {
        Ok(platform) => platform,
        Err(e) => {
            log::error!("Setup of Growatt sensors failed: {}", e);
            std::process::exit(1);
        }
    };

    let state = StateData {
        platform: Mutex::new(platform),
    };

    if let Err(e) = rocket::build()
        .manage(state)
        .mount("/", routes![metrics_route, sensors_route, dump_devices_route])
        .launch()
        .await
    {
        log::error!("Server stopped: {}", e);
    }
}
