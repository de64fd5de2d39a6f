use crate::api::{self, Error, Payload};
use crate::model;
use crate::probe::{Probe, ProbeKind};
use crate::sensor::catalog::{self, SensorDefinition};
use crate::sensor::{Sensor, SharedProbe};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Plant id meaning "use the first plant of the account".
pub const DEFAULT_PLANT_ID: &str = "0";
pub const DEFAULT_NAME: &str = "Growatt";

/// All sensors of one plant, with the probes feeding them.
#[derive(Debug)]
pub struct Platform {
    plant_id: model::PlantId,
    probes: Vec<SharedProbe>,
    sensors: Vec<Sensor>,
}

fn sensors_for(
    probe: &SharedProbe,
    name: &str,
    id: &str,
    definitions: &'static [SensorDefinition],
) -> Vec<Sensor> {
    definitions
        .iter()
        .map(|definition| {
            Sensor::new(
                probe.clone(),
                name.to_owned(),
                definition,
                format!("{}-{}", id, definition.key),
            )
        })
        .collect()
}

fn shared(probe: Probe) -> SharedProbe {
    Arc::new(Mutex::new(probe))
}

/// Log in, resolve the plant and create sensors for the plant totals and every supported device
/// of the plant.
///
/// `plant_id` of `DEFAULT_PLANT_ID` picks the first plant of the account.
pub async fn setup(
    api: &model::Api,
    plant_id: &str,
    name: &str,
    interval: Duration,
) -> Result<Platform, Error> {
    let logged_in_api = api::login(api).await.map_err(|e| {
        if let Error::LoginError(message) = &e {
            log::error!("{}", message);
        }
        e
    })?;

    let plant_id = if plant_id == DEFAULT_PLANT_ID {
        api::plant_list(&logged_in_api)
            .await?
            .into_iter()
            .next()
            .map(|plant| {
                log::info!("Using plant {} ({})", plant.id, plant.name);
                plant.id
            })
            .ok_or(Error::NoPlant)?
    } else {
        plant_id.to_owned()
    };

    let devices = api::device_list(&logged_in_api, &plant_id).await?;
    let platform = Platform::from_devices(api, plant_id, name, &devices, interval);

    log::info!(
        "Set up {} sensors for plant {} ({} devices)",
        platform.sensors.len(),
        platform.plant_id,
        devices.len()
    );
    Ok(platform)
}

impl Platform {
    /// Create probes and sensors for `plant_id` and its `devices`, without contacting the server.
    pub fn from_devices(
        api: &model::Api,
        plant_id: model::PlantId,
        name: &str,
        devices: &[model::Device],
        interval: Duration,
    ) -> Self {
        let total = shared(Probe::new(
            api.clone(),
            plant_id.to_owned(),
            ProbeKind::Total,
            interval,
        ));
        let mut sensors = sensors_for(
            &total,
            &format!("{} Total", name),
            &plant_id,
            catalog::TOTAL_SENSORS,
        );
        let mut probes = vec![total];

        for device in devices {
            let kind = match &device.device_type {
                model::DeviceType::Inverter => ProbeKind::Inverter,
                model::DeviceType::Storage => ProbeKind::Storage {
                    plant_id: plant_id.to_owned(),
                },
                model::DeviceType::Unsupported(device_type) => {
                    log::warn!(
                        "Skipping device {} ({}): unsupported device type {}",
                        device.id,
                        device.alias,
                        device_type
                    );
                    continue;
                }
            };

            let probe = shared(Probe::new(api.clone(), device.id.to_owned(), kind, interval));
            sensors.extend(sensors_for(
                &probe,
                &device.alias,
                &device.id,
                catalog::for_device(&device.device_type),
            ));
            probes.push(probe);
        }

        Platform {
            plant_id,
            probes,
            sensors,
        }
    }

    pub fn plant_id(&self) -> &str {
        &self.plant_id
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    /// Update every sensor. Failures are logged and do not stop the remaining sensors.
    pub async fn update(&mut self) {
        for sensor in self.sensors.iter_mut() {
            if let Err(e) = sensor.update().await {
                log::error!("Unable to update {}: {}", sensor.unique_id(), e);
            }
        }
    }

    /// Cached payload of every probe, keyed by device (or plant) id.
    pub async fn dump(&self) -> HashMap<String, Payload> {
        let mut dump = HashMap::new();
        for probe in &self.probes {
            let probe = probe.lock().await;
            dump.insert(probe.device_id().to_owned(), probe.data().clone());
        }
        dump
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::endpoint;
    use crate::test_util::{self, read_resource};
    use crate::throttle::SCAN_INTERVAL;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn devices() -> Vec<model::Device> {
        vec![
            model::Device {
                id: "INV0000001".to_string(),
                alias: "Roof".to_string(),
                device_type: model::DeviceType::Inverter,
            },
            model::Device {
                id: "STO0000001".to_string(),
                alias: "Battery".to_string(),
                device_type: model::DeviceType::Storage,
            },
            model::Device {
                id: "MAX0000001".to_string(),
                alias: "Shed".to_string(),
                device_type: model::DeviceType::Unsupported("max".to_string()),
            },
        ]
    }

    fn keys_with_prefix<'a>(platform: &'a Platform, prefix: &str) -> Vec<&'a str> {
        platform
            .sensors()
            .iter()
            .filter(|sensor| sensor.unique_id().starts_with(prefix))
            .map(|sensor| sensor.key())
            .collect()
    }

    #[test]
    fn storage_device_gets_storage_catalog() {
        let api = test_util::api(String::from("http://localhost"));
        let platform = Platform::from_devices(
            &api,
            "98765".to_string(),
            DEFAULT_NAME,
            &devices(),
            SCAN_INTERVAL,
        );

        let storage_keys = keys_with_prefix(&platform, "STO0000001-");
        let expected: Vec<&str> = catalog::STORAGE_SENSORS.iter().map(|d| d.key).collect();
        assert_eq!(expected, storage_keys);
        assert!(storage_keys
            .iter()
            .all(|key| !catalog::INVERTER_SENSORS.iter().any(|d| d.key == *key)));
    }

    #[test]
    fn enumerates_totals_then_devices() {
        let api = test_util::api(String::from("http://localhost"));
        let platform = Platform::from_devices(
            &api,
            "98765".to_string(),
            DEFAULT_NAME,
            &devices(),
            SCAN_INTERVAL,
        );

        assert_eq!(
            catalog::TOTAL_SENSORS.len()
                + catalog::INVERTER_SENSORS.len()
                + catalog::STORAGE_SENSORS.len(),
            platform.sensors().len()
        );
        assert_eq!(
            catalog::INVERTER_SENSORS.len(),
            keys_with_prefix(&platform, "INV0000001-").len()
        );
        assert!(keys_with_prefix(&platform, "MAX0000001-").is_empty());

        let first = &platform.sensors()[0];
        assert_eq!("98765-total_money_today", first.unique_id());
        assert_eq!("Growatt Total Total money today", first.name());

        let roof = platform
            .sensors()
            .iter()
            .find(|sensor| sensor.unique_id() == "INV0000001-inverter_temperature")
            .unwrap();
        assert_eq!("Roof Temperature", roof.name());
    }

    #[tokio::test]
    async fn storage_probe_knows_plant() {
        let api = test_util::api(String::from("http://localhost"));
        let platform = Platform::from_devices(
            &api,
            "98765".to_string(),
            DEFAULT_NAME,
            &devices(),
            SCAN_INTERVAL,
        );

        let mut kinds = Vec::new();
        for probe in &platform.probes {
            kinds.push(probe.lock().await.kind().clone());
        }
        assert_eq!(
            vec![
                ProbeKind::Total,
                ProbeKind::Inverter,
                ProbeKind::Storage {
                    plant_id: "98765".to_string()
                },
            ],
            kinds
        );
    }

    #[tokio::test]
    async fn setup_discovers_first_plant() {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", endpoint::LOGIN)
            .with_status(200)
            .with_body(read_resource("login.json"))
            .create_async()
            .await;
        let plant_list = server
            .mock("GET", endpoint::PLANT_LIST)
            .match_query(Matcher::UrlEncoded("userId".into(), "1234567".into()))
            .with_status(200)
            .with_body(read_resource("plantList.json"))
            .create_async()
            .await;
        let plant_info = server
            .mock("GET", endpoint::PLANT_INFO)
            .match_query(Matcher::UrlEncoded("plantId".into(), "98765".into()))
            .with_status(200)
            .with_body(read_resource("plantInfo.json"))
            .create_async()
            .await;

        let platform = setup(
            &test_util::api(server.url()),
            DEFAULT_PLANT_ID,
            DEFAULT_NAME,
            SCAN_INTERVAL,
        )
        .await
        .unwrap();

        assert_eq!("98765", platform.plant_id());
        assert_eq!(
            catalog::TOTAL_SENSORS.len()
                + catalog::INVERTER_SENSORS.len()
                + catalog::STORAGE_SENSORS.len(),
            platform.sensors().len()
        );
        plant_list.assert_async().await;
        plant_info.assert_async().await;
    }

    #[tokio::test]
    async fn setup_with_configured_plant() {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", endpoint::LOGIN)
            .with_status(200)
            .with_body(read_resource("login.json"))
            .create_async()
            .await;
        let plant_list = server
            .mock("GET", endpoint::PLANT_LIST)
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let _plant_info = server
            .mock("GET", endpoint::PLANT_INFO)
            .match_query(Matcher::UrlEncoded("plantId".into(), "11111".into()))
            .with_status(200)
            .with_body(read_resource("plantInfo.json"))
            .create_async()
            .await;

        let platform = setup(
            &test_util::api(server.url()),
            "11111",
            "Home",
            SCAN_INTERVAL,
        )
        .await
        .unwrap();

        assert_eq!("11111", platform.plant_id());
        assert_eq!("Home Total Energy Today", platform.sensors()[2].name());
        plant_list.assert_async().await;
    }

    #[tokio::test]
    async fn setup_aborts_on_wrong_credentials() {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", endpoint::LOGIN)
            .with_status(200)
            .with_body(read_resource("login_failed.json"))
            .create_async()
            .await;

        let result = setup(
            &test_util::api(server.url()),
            DEFAULT_PLANT_ID,
            DEFAULT_NAME,
            SCAN_INTERVAL,
        )
        .await;
        assert!(matches!(result, Err(Error::LoginError(_))));
    }

    #[tokio::test]
    async fn setup_without_plants() {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", endpoint::LOGIN)
            .with_status(200)
            .with_body(read_resource("login.json"))
            .create_async()
            .await;
        let _plant_list = server
            .mock("GET", endpoint::PLANT_LIST)
            .match_query(Matcher::UrlEncoded("userId".into(), "1234567".into()))
            .with_status(200)
            .with_body(r#"{"back": {"data": [], "success": true}}"#)
            .create_async()
            .await;

        let result = setup(
            &test_util::api(server.url()),
            DEFAULT_PLANT_ID,
            DEFAULT_NAME,
            SCAN_INTERVAL,
        )
        .await;
        assert!(matches!(result, Err(Error::NoPlant)));
    }

    #[tokio::test]
    async fn update_and_dump() {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", endpoint::LOGIN)
            .with_status(200)
            .with_body(read_resource("login.json"))
            .create_async()
            .await;
        let _plant_info = server
            .mock("GET", endpoint::PLANT_INFO)
            .match_query(Matcher::UrlEncoded("plantId".into(), "98765".into()))
            .with_status(200)
            .with_body(read_resource("plantInfo.json"))
            .create_async()
            .await;
        let _inverter = server
            .mock("GET", endpoint::INVERTER)
            .match_query(Matcher::UrlEncoded("inverterId".into(), "INV0000001".into()))
            .with_status(200)
            .with_body(read_resource("inverterDetail.json"))
            .create_async()
            .await;

        let devices = vec![model::Device {
            id: "INV0000001".to_string(),
            alias: "Roof".to_string(),
            device_type: model::DeviceType::Inverter,
        }];
        let mut platform = Platform::from_devices(
            &test_util::api(server.url()),
            "98765".to_string(),
            DEFAULT_NAME,
            &devices,
            SCAN_INTERVAL,
        );
        platform.update().await;

        let money = platform
            .sensors()
            .iter()
            .find(|sensor| sensor.key() == "total_money_today")
            .unwrap();
        assert_eq!(Some(&json!("3.1")), money.state());

        let temperature = platform
            .sensors()
            .iter()
            .find(|sensor| sensor.key() == "inverter_temperature")
            .unwrap();
        assert_eq!(Some(&json!(38.9)), temperature.state());

        let dump = platform.dump().await;
        assert_eq!(2, dump.len());
        assert_eq!(Some(&json!(1500)), dump["INV0000001"].get("pac"));
        assert!(dump["98765"].get("deviceList").is_none());
    }
}
