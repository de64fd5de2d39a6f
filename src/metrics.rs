use growatt_sensors::platform::Platform;
use growatt_sensors::sensor::Sensor;
use growatt_sensors::Error;
use prometheus::{Encoder, GaugeVec, TextEncoder};
use serde_json::Value;

lazy_static! {
    static ref SENSOR_VALUE_GAUGE: GaugeVec = register_gauge_vec!(
        opts!(
            "growatt_sensor_value",
            "value of a Growatt sensor as last read from its device",
        ),
        &["unique_id", "name", "unit", "device_class"],
    )
    .unwrap();
}

/// Growatt reports some numbers as JSON strings.
fn numeric(state: &Value) -> Option<f64> {
    match state {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Feed the state of `sensor` to its gauge. Sensors without a numeric state lose their gauge.
fn process_sensor(sensor: &Sensor) {
    let name = sensor.name();
    let labels = [
        sensor.unique_id(),
        name.as_str(),
        sensor.unit_of_measurement(),
        sensor.device_class().map(|c| c.as_str()).unwrap_or(""),
    ];

    match sensor.state().and_then(numeric) {
        Some(value) => SENSOR_VALUE_GAUGE.with_label_values(&labels).set(value),
        None => {
            log::trace!("{} has no numeric state", sensor.unique_id());
            let _ = SENSOR_VALUE_GAUGE.remove_label_values(&labels);
        }
    }
}

/// Copy the current state of every sensor of `platform` to the Prometheus registry.
pub fn collect(platform: &Platform) {
    for sensor in platform.sensors() {
        process_sensor(sensor);
    }
}

/// Read metrics from Prometheus exporter registry.
pub fn read() -> Result<String, Error> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode(&metric_families, &mut buffer)
        .or(Err(Error::FormatError))?;
    String::from_utf8(buffer).or(Err(Error::FormatError))
}
