use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    pub device_sn: String,
    /* sic */
    #[serde(default)]
    pub device_ailas: String,
    pub device_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceList {
    pub device_list: Vec<Data>,
}
