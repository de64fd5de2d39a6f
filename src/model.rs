pub type PlantId = String;
pub type DeviceSn = String;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Inverter,
    Storage,
    Unsupported(String),
}

impl From<&str> for DeviceType {
    fn from(s: &str) -> Self {
        match s {
            "inverter" => DeviceType::Inverter,
            "storage" => DeviceType::Storage,
            other => DeviceType::Unsupported(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Api {
    pub api_url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoggedInApi {
    pub api_url: String,
    pub user_id: String,
    pub client: reqwest::Client,
}

#[derive(Debug, Clone)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    pub id: DeviceSn,
    pub alias: String,
    pub device_type: DeviceType,
}
