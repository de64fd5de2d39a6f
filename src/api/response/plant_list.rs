use super::string_or_number;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    #[serde(deserialize_with = "string_or_number")]
    pub plant_id: String,
    #[serde(default)]
    pub plant_name: String,
}

#[derive(Deserialize)]
pub struct Back {
    pub data: Vec<Data>,
}

#[derive(Deserialize)]
pub struct PlantList {
    pub back: Back,
}
