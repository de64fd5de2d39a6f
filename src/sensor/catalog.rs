use crate::api::Payload;
use crate::model::DeviceType;
use serde::Serialize;
use serde_json::Value;
use DeviceClass::{Battery, Power, Temperature};

pub const ENERGY_KILO_WATT_HOUR: &str = "kWh";
pub const POWER_WATT: &str = "W";
pub const TEMP_CELSIUS: &str = "°C";
pub const VOLT: &str = "V";
pub const AMPERE: &str = "A";
pub const HERTZ: &str = "Hz";
pub const VOLT_AMPERE: &str = "VA";
pub const PERCENTAGE: &str = "%";
pub const EURO: &str = "€";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Power,
    Temperature,
    Battery,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Power => "power",
            DeviceClass::Temperature => "temperature",
            DeviceClass::Battery => "battery",
        }
    }
}

/// One row of a sensor catalog: which field of the probe payload a sensor shows, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    /// Key in the probe payload
    pub field: &'static str,
    pub device_class: Option<DeviceClass>,
    /// Number of decimals to round to
    pub round: Option<u32>,
}

const fn sensor(
    key: &'static str,
    name: &'static str,
    unit: &'static str,
    field: &'static str,
) -> SensorDefinition {
    SensorDefinition {
        key,
        name,
        unit,
        field,
        device_class: None,
        round: None,
    }
}

impl SensorDefinition {
    const fn class(self, device_class: DeviceClass) -> Self {
        SensorDefinition {
            device_class: Some(device_class),
            ..self
        }
    }

    const fn round(self, digits: u32) -> Self {
        SensorDefinition {
            round: Some(digits),
            ..self
        }
    }

    /// Read this sensor's value from `payload`, rounded if the definition asks for it.
    pub fn value_from(&self, payload: &Payload) -> Option<Value> {
        let value = payload.get(self.field)?;
        Some(match self.round {
            Some(digits) => round_value(value, digits),
            None => value.clone(),
        })
    }
}

/// Round numbers and numeric strings to `digits` decimals, ties to even. Integers and
/// anything that isn't a number are returned unchanged.
fn round_value(value: &Value, digits: u32) -> Value {
    let number = match value {
        Value::Number(n) if n.is_f64() => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) => {
            let factor = 10f64.powi(digits as i32);
            Value::from((n * factor).round_ties_even() / factor)
        }
        None => value.clone(),
    }
}

#[rustfmt::skip]
pub static TOTAL_SENSORS: &[SensorDefinition] = &[
    sensor("total_money_today", "Total money today", EURO, "plantMoneyText"),
    sensor("total_money_total", "Money lifetime", EURO, "totalMoneyText"),
    sensor("total_energy_today", "Energy Today", ENERGY_KILO_WATT_HOUR, "todayEnergy").class(Power),
    sensor("total_output_power", "Output Power", POWER_WATT, "invTodayPpv").class(Power),
    sensor("total_energy_output", "Lifetime energy output", ENERGY_KILO_WATT_HOUR, "totalEnergy").class(Power),
    sensor("total_maximum_output", "Maximum power", POWER_WATT, "nominalPower").class(Power),
];

#[rustfmt::skip]
pub static INVERTER_SENSORS: &[SensorDefinition] = &[
    sensor("inverter_energy_today", "Energy today", ENERGY_KILO_WATT_HOUR, "powerToday").class(Power).round(1),
    sensor("inverter_energy_total", "Lifetime energy output", ENERGY_KILO_WATT_HOUR, "powerTotal").class(Power).round(1),
    sensor("inverter_voltage_input_1", "Input 1 voltage", VOLT, "vpv1").round(2),
    sensor("inverter_amperage_input_1", "Input 1 Amperage", AMPERE, "ipv1").round(1),
    sensor("inverter_wattage_input_1", "Input 1 Wattage", POWER_WATT, "ppv1").class(Power).round(1),
    sensor("inverter_voltage_input_2", "Input 2 voltage", VOLT, "vpv2").round(1),
    sensor("inverter_amperage_input_2", "Input 2 Amperage", AMPERE, "ipv2").round(1),
    sensor("inverter_wattage_input_2", "Input 2 Wattage", POWER_WATT, "ppv2").class(Power).round(1),
    sensor("inverter_voltage_input_3", "Input 3 voltage", VOLT, "vpv3").round(1),
    sensor("inverter_amperage_input_3", "Input 3 Amperage", AMPERE, "ipv3").round(1),
    sensor("inverter_wattage_input_3", "Input 3 Wattage", POWER_WATT, "ppv3").class(Power).round(1),
    sensor("inverter_internal_wattage", "Internal wattage", POWER_WATT, "ppv").class(Power).round(1),
    sensor("inverter_reactive_voltage", "Reactive voltage", VOLT, "vacr").round(1),
    sensor("inverter_inverter_reactive_amperage", "Reactive amperage", AMPERE, "iacr").round(1),
    sensor("inverter_frequency", "AC frequency", HERTZ, "fac").round(1),
    sensor("inverter_current_wattage", "Output power", POWER_WATT, "pac").class(Power).round(1),
    sensor("inverter_current_reactive_wattage", "Reactive wattage", POWER_WATT, "pacr").class(Power).round(1),
    sensor("inverter_ipm_temperature", "Intelligent Power Management temperature", TEMP_CELSIUS, "ipmTemperature").class(Temperature).round(1),
    sensor("inverter_temperature", "Temperature", TEMP_CELSIUS, "temperature").class(Temperature).round(1),
];

#[rustfmt::skip]
pub static STORAGE_SENSORS: &[SensorDefinition] = &[
    sensor("storage_storage_production_today", "Storage production today", ENERGY_KILO_WATT_HOUR, "eBatDisChargeToday").class(Power),
    sensor("storage_storage_production_lifetime", "Lifetime Storage production", ENERGY_KILO_WATT_HOUR, "eBatDisChargeTotal").class(Power),
    sensor("storage_grid_discharge_today", "Grid discharged today", ENERGY_KILO_WATT_HOUR, "eacDisChargeToday").class(Power),
    sensor("storage_load_consumption_today", "Load consumption today", ENERGY_KILO_WATT_HOUR, "eopDischrToday").class(Power),
    sensor("storage_load_consumption_lifetime", "Lifetime load consumption", ENERGY_KILO_WATT_HOUR, "eopDischrTotal").class(Power),
    sensor("storage_grid_charged_today", "Grid charged today", ENERGY_KILO_WATT_HOUR, "eacChargeToday").class(Power),
    sensor("storage_charge_storage_lifetime", "Lifetime storaged charged", ENERGY_KILO_WATT_HOUR, "eChargeTotal").class(Power),
    sensor("storage_solar_production", "Solar power production", POWER_WATT, "ppv").class(Power),
    sensor("storage_battery_percentage", "Battery percentage", PERCENTAGE, "capacity").class(Battery),
    sensor("storage_power_flow", "Storage charging/ discharging(-ve)", POWER_WATT, "pCharge").class(Power),
    sensor("storage_load_consumption_solar_storage", "Load consumption(Solar + Storage)", VOLT_AMPERE, "rateVA"),
    sensor("storage_charge_today", "Charge today", ENERGY_KILO_WATT_HOUR, "eChargeToday").class(Power),
    sensor("storage_import_from_grid", "Import from grid", POWER_WATT, "pAcInPut").class(Power),
    sensor("storage_import_from_grid_today", "Import from grid today", ENERGY_KILO_WATT_HOUR, "eToUserToday").class(Power),
    sensor("storage_import_from_grid_total", "Import from grid total", ENERGY_KILO_WATT_HOUR, "eToUserTotal").class(Power),
    sensor("storage_load_consumption", "Load consumption", POWER_WATT, "outPutPower").class(Power),
    sensor("storage_grid_voltage", "AC input voltage", VOLT, "vGrid").round(2),
    sensor("storage_pv_charging_voltage", "PV charging voltage", VOLT, "vpv").round(2),
    sensor("storage_ac_input_frequency_out", "AC input frequency", HERTZ, "freqOutPut").round(2),
    sensor("storage_output_voltage", "Output voltage", VOLT, "outPutVolt").round(2),
    sensor("storage_ac_output_frequency", "Ac output frequency", HERTZ, "freqGrid").round(2),
    sensor("storage_current_PV", "Solar charge current", AMPERE, "iAcCharge").round(2),
    sensor("storage_current_1", "Solar current to storage", AMPERE, "iChargePV1").round(2),
    sensor("storage_grid_amperage_input", "Grid charge current", AMPERE, "chgCurr").round(2),
    sensor("storage_grid_out_current", "Grid out current", AMPERE, "outPutCurrent").round(2),
    sensor("storage_battery_voltage", "Battery voltage", VOLT, "vBat").round(2),
    sensor("storage_load_percentage", "Load percentage", PERCENTAGE, "loadPercent").class(Battery).round(2),
];

/// Catalog of sensors for a device of `device_type`. Empty for unsupported device types.
pub fn for_device(device_type: &DeviceType) -> &'static [SensorDefinition] {
    match device_type {
        DeviceType::Inverter => INVERTER_SENSORS,
        DeviceType::Storage => STORAGE_SENSORS,
        DeviceType::Unsupported(_) => &[],
    }
}

/// Look up a sensor definition by key across all catalogs.
pub fn find(key: &str) -> Option<&'static SensorDefinition> {
    TOTAL_SENSORS
        .iter()
        .chain(INVERTER_SENSORS)
        .chain(STORAGE_SENSORS)
        .find(|definition| definition.key == key)
}
