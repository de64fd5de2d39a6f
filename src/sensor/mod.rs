pub mod catalog;

use crate::api::Error;
use crate::probe::Probe;
use catalog::{DeviceClass, SensorDefinition};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const ICON: &str = "mdi:solar-power";

/// Probe shared by all sensors of one device
pub type SharedProbe = Arc<Mutex<Probe>>;

/// A single value of a device exposed as an entity.
#[derive(Debug)]
pub struct Sensor {
    definition: &'static SensorDefinition,
    probe: SharedProbe,
    /// Prefix of the display name: the device alias, or `"{name} Total"` for plant totals
    name: String,
    unique_id: String,
    state: Option<Value>,
}

/// Serializable view of a `Sensor` after its last update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub unique_id: String,
    pub name: String,
    pub state: Option<Value>,
    pub unit_of_measurement: &'static str,
    pub device_class: Option<DeviceClass>,
    pub icon: &'static str,
}

impl Sensor {
    pub fn new(
        probe: SharedProbe,
        name: String,
        definition: &'static SensorDefinition,
        unique_id: String,
    ) -> Self {
        Sensor {
            definition,
            probe,
            name,
            unique_id,
            state: None,
        }
    }

    pub fn key(&self) -> &'static str {
        self.definition.key
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.name, self.definition.name)
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn icon(&self) -> &'static str {
        ICON
    }

    /// Value read from the probe on the last `update()`; `None` before the first one or when
    /// the device doesn't report the field.
    pub fn state(&self) -> Option<&Value> {
        self.state.as_ref()
    }

    pub fn device_class(&self) -> Option<DeviceClass> {
        self.definition.device_class
    }

    pub fn unit_of_measurement(&self) -> &'static str {
        self.definition.unit
    }

    /// Update the probe (subject to its throttle) and re-read the state from its cache.
    ///
    /// The state is re-read even when the probe update fails, so a failed update shows the
    /// last successfully fetched value.
    pub async fn update(&mut self) -> Result<(), Error> {
        let mut probe = self.probe.lock().await;
        let result = probe.update().await;
        self.state = self.definition.value_from(probe.data());
        result
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            unique_id: self.unique_id.to_owned(),
            name: self.name(),
            state: self.state.clone(),
            unit_of_measurement: self.unit_of_measurement(),
            device_class: self.device_class(),
            icon: self.icon(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::endpoint;
    use crate::probe::ProbeKind;
    use crate::test_util::{self, read_resource};
    use crate::throttle::SCAN_INTERVAL;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn sensors_share_probe() {
        let mut server = Server::new_async().await;
        let _login = server
            .mock("POST", endpoint::LOGIN)
            .with_status(200)
            .with_body(read_resource("login.json"))
            .create_async()
            .await;
        let detail = server
            .mock("GET", endpoint::INVERTER)
            .match_query(Matcher::UrlEncoded("inverterId".into(), "INV0000001".into()))
            .with_status(200)
            .with_body(read_resource("inverterDetail.json"))
            .expect(1)
            .create_async()
            .await;

        let probe = Arc::new(Mutex::new(Probe::new(
            test_util::api(server.url()),
            "INV0000001".to_string(),
            ProbeKind::Inverter,
            SCAN_INTERVAL,
        )));
        let mut output = Sensor::new(
            probe.clone(),
            "Roof".to_string(),
            catalog::find("inverter_current_wattage").unwrap(),
            "INV0000001-inverter_current_wattage".to_string(),
        );
        let mut voltage = Sensor::new(
            probe,
            "Roof".to_string(),
            catalog::find("inverter_voltage_input_1").unwrap(),
            "INV0000001-inverter_voltage_input_1".to_string(),
        );

        assert_eq!(None, output.state());

        output.update().await.unwrap();
        voltage.update().await.unwrap();

        assert_eq!(Some(&json!(1500)), output.state());
        assert_eq!(Some(&json!(312.46)), voltage.state());
        detail.assert_async().await;
    }

    #[test]
    fn snapshot() {
        let probe = Arc::new(Mutex::new(Probe::new(
            test_util::api(String::from("http://localhost")),
            "98765".to_string(),
            ProbeKind::Total,
            SCAN_INTERVAL,
        )));
        let sensor = Sensor::new(
            probe,
            "Growatt Total".to_string(),
            catalog::find("total_energy_today").unwrap(),
            "98765-total_energy_today".to_string(),
        );

        assert_eq!(
            SensorSnapshot {
                unique_id: "98765-total_energy_today".to_string(),
                name: "Growatt Total Energy Today".to_string(),
                state: None,
                unit_of_measurement: "kWh",
                device_class: Some(DeviceClass::Power),
                icon: "mdi:solar-power",
            },
            sensor.snapshot()
        );
        assert_eq!(
            json!({
                "unique_id": "98765-total_energy_today",
                "name": "Growatt Total Energy Today",
                "state": null,
                "unit_of_measurement": "kWh",
                "device_class": "power",
                "icon": "mdi:solar-power"
            }),
            serde_json::to_value(sensor.snapshot()).unwrap()
        );
    }
}
