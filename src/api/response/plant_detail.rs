use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
pub struct PlantDetail {
    pub back: Map<String, Value>,
}
