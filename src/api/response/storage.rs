use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
pub struct StorageEnergyOverview {
    pub obj: Map<String, Value>,
}
