pub type Endpoint = str;

pub const LOGIN: &Endpoint = "/LoginAPI.do";
pub const PLANT_LIST: &Endpoint = "/PlantListAPI.do";
pub const PLANT_DETAIL: &Endpoint = "/PlantDetailAPI.do";
pub const PLANT_INFO: &Endpoint = "/newTwoPlantAPI.do";
pub const PLANT_SETTINGS: &Endpoint = "/newPlantAPI.do";
pub const INVERTER: &Endpoint = "/newInverterAPI.do";
pub const STORAGE: &Endpoint = "/newStorageAPI.do";

/* Values of the `op` query parameter selecting the sub-operation of an endpoint */
pub mod op {
    pub const ALL_DEVICE_LIST: &str = "getAllDeviceList";
    pub const PLANT_SETTINGS: &str = "getPlant";
    pub const INVERTER_DETAIL: &str = "getInverterDetailData";
    pub const STORAGE_INFO: &str = "getStorageInfo_sacolar";
    pub const STORAGE_PARAMS: &str = "getStorageParams_sacolar";
    pub const STORAGE_ENERGY_OVERVIEW: &str = "getEnergyOverviewData_sacolar";
}
