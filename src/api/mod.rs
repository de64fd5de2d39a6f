pub mod endpoint;
pub mod error;
pub mod password;
pub mod response;

use crate::model;
pub use error::Error;
pub use password::hash_password;
use reqwest::RequestBuilder;
use response::device_list::DeviceList;
use response::login::{self, Login};
use response::plant_detail::PlantDetail;
use response::plant_list::PlantList;
use response::storage::StorageEnergyOverview;
use response::ErrCode;
use serde_json::{Map, Value};

pub const DEFAULT_API_URL: &str = "http://server.growatt.com";

const USER_AGENT: &str = "Dalvik/2.1.0 (Linux; U; Android 12; growatt-sensors)";

/// Raw JSON object as returned by the Growatt server.
pub type Payload = Map<String, Value>;

/// Aggregation period of `plant_detail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timespan {
    /// `date` formatted as `YYYY-MM-DD`
    Day = 1,
    /// `date` formatted as `YYYY-MM`
    Month = 2,
}

pub fn api(api_url: String, username: String, password: String) -> model::Api {
    model::Api {
        api_url,
        username,
        password,
    }
}

/// Map Non-200 API response to Error
fn map_api_err(error: reqwest::Error) -> Error {
    match error.status() {
        Some(http::StatusCode::TOO_MANY_REQUESTS) => Error::RateExceeded(error.to_string()),
        Some(http::StatusCode::UNAUTHORIZED) => Error::LoginError(error.to_string()),
        _ => Error::ApiError(error.to_string()),
    }
}

/// Check `back` of a login response. Return the user id if login succeeded, or a `LoginError`
/// describing the vendor error code otherwise.
fn map_login_status(back: login::Back) -> Result<String, Error> {
    if back.success {
        return back
            .user
            .map(|user| user.id)
            .ok_or(Error::UnexpectedApiResponse);
    }

    let err_code = back.err_code.unwrap_or_default();
    match ErrCode::parse(&err_code) {
        Some(ErrCode::WrongCredentials) => Err(Error::LoginError(String::from(
            "Username or Password may be incorrect!",
        ))),
        None => Err(Error::LoginError(format!(
            "errCode {}: {}",
            err_code,
            back.msg.unwrap_or_else(|| "(no error message received)".to_string())
        ))),
    }
}

fn into_payload(value: Value) -> Result<Payload, Error> {
    match value {
        Value::Object(payload) => Ok(payload),
        _ => Err(Error::UnexpectedApiResponse),
    }
}

async fn send(request: RequestBuilder, endpoint: &endpoint::Endpoint) -> Result<Value, Error> {
    let response_text = request
        .send()
        .await
        .map_err(map_api_err)?
        .error_for_status()
        .map_err(map_api_err)?
        .text()
        .await
        .map_err(|e| Error::ApiError(format!("Error reading API response: {}", e)))?;

    log::trace!("endpoint: {}, response_text: {}", endpoint, response_text);

    serde_json::from_str::<Value>(&response_text)
        .map_err(|e| Error::InvalidResponse(response_text, e.to_string()))
}

async fn get(
    api: &model::LoggedInApi,
    endpoint: &endpoint::Endpoint,
    query: &[(&str, &str)],
) -> Result<Value, Error> {
    let url = format!("{}{}", api.api_url, endpoint);
    send(api.client.get(url).query(query), endpoint).await
}

async fn post(
    api: &model::LoggedInApi,
    endpoint: &endpoint::Endpoint,
    query: &[(&str, &str)],
    form: &[(&str, &str)],
) -> Result<Value, Error> {
    let url = format!("{}{}", api.api_url, endpoint);
    send(api.client.post(url).query(query).form(form), endpoint).await
}

/// Open a new session. The returned client carries the session cookie set by the server.
pub async fn login(api: &model::Api) -> Result<model::LoggedInApi, Error> {
    let client = reqwest::ClientBuilder::new()
        .cookie_store(true)
        .user_agent(USER_AGENT)
        .build()
        .or(Err(Error::InternalError))?;
    let url = format!("{}{}", api.api_url, endpoint::LOGIN);

    let password = hash_password(&api.password);
    let form = [
        ("userName", api.username.as_str()),
        ("password", password.as_str()),
    ];

    send(client.post(url).form(&form), endpoint::LOGIN)
        .await
        .map(serde_json::from_value::<Login>)?
        .or(Err(Error::UnexpectedApiResponse))
        .map(|response| map_login_status(response.back))?
        .map(|user_id| model::LoggedInApi {
            api_url: api.api_url.to_owned(),
            user_id,
            client,
        })
}

/// List plants owned by the logged in user.
pub async fn plant_list(api: &model::LoggedInApi) -> Result<Vec<model::Plant>, Error> {
    get(api, endpoint::PLANT_LIST, &[("userId", api.user_id.as_str())])
        .await
        .map(serde_json::from_value::<PlantList>)?
        .or(Err(Error::UnexpectedApiResponse))
        .map(|response| {
            response
                .back
                .data
                .into_iter()
                .map(|plant| model::Plant {
                    id: plant.plant_id,
                    name: plant.plant_name,
                })
                .collect()
        })
}

/// Energy production of `plant_id` aggregated over `timespan`, for the period containing `date`.
pub async fn plant_detail(
    api: &model::LoggedInApi,
    plant_id: &str,
    timespan: Timespan,
    date: &str,
) -> Result<Payload, Error> {
    let timespan = (timespan as u8).to_string();
    let query = [
        ("plantId", plant_id),
        ("type", timespan.as_str()),
        ("date", date),
    ];

    get(api, endpoint::PLANT_DETAIL, &query)
        .await
        .map(serde_json::from_value::<PlantDetail>)?
        .or(Err(Error::UnexpectedApiResponse))
        .map(|response| response.back)
}

/// Plant overview including totals, earnings and the `deviceList`.
pub async fn plant_info(api: &model::LoggedInApi, plant_id: &str) -> Result<Payload, Error> {
    let query = [
        ("op", endpoint::op::ALL_DEVICE_LIST),
        ("plantId", plant_id),
        ("pageNum", "1"),
        ("pageSize", "1"),
    ];

    get(api, endpoint::PLANT_INFO, &query)
        .await
        .and_then(into_payload)
}

/// Plant configuration as entered in the Growatt portal.
pub async fn plant_settings(api: &model::LoggedInApi, plant_id: &str) -> Result<Payload, Error> {
    let query = [("op", endpoint::op::PLANT_SETTINGS), ("plantId", plant_id)];

    get(api, endpoint::PLANT_SETTINGS, &query)
        .await
        .and_then(into_payload)
}

/// List all devices of `plant_id`
pub async fn device_list(
    api: &model::LoggedInApi,
    plant_id: &str,
) -> Result<Vec<model::Device>, Error> {
    plant_info(api, plant_id)
        .await
        .map(|payload| serde_json::from_value::<DeviceList>(Value::Object(payload)))?
        .or(Err(Error::UnexpectedApiResponse))
        .map(|response| {
            response
                .device_list
                .into_iter()
                .map(|device| model::Device {
                    id: device.device_sn,
                    alias: device.device_ailas,
                    device_type: model::DeviceType::from(device.device_type.as_str()),
                })
                .collect()
        })
}

/// "All parameters" of a PV inverter.
pub async fn inverter_detail(
    api: &model::LoggedInApi,
    inverter_id: &str,
) -> Result<Payload, Error> {
    let query = [
        ("op", endpoint::op::INVERTER_DETAIL),
        ("inverterId", inverter_id),
    ];

    get(api, endpoint::INVERTER, &query)
        .await
        .and_then(into_payload)
}

pub async fn storage_detail(api: &model::LoggedInApi, storage_id: &str) -> Result<Payload, Error> {
    let query = [("op", endpoint::op::STORAGE_INFO), ("storageId", storage_id)];

    get(api, endpoint::STORAGE, &query)
        .await
        .and_then(into_payload)
}

/// Storage parameters. Live readings are nested under `storageDetailBean`.
pub async fn storage_params(api: &model::LoggedInApi, storage_id: &str) -> Result<Payload, Error> {
    let query = [("op", endpoint::op::STORAGE_PARAMS), ("storageId", storage_id)];

    get(api, endpoint::STORAGE, &query)
        .await
        .and_then(into_payload)
}

/// Daily and lifetime energy counters of a storage unit.
pub async fn storage_energy_overview(
    api: &model::LoggedInApi,
    plant_id: &str,
    storage_id: &str,
) -> Result<Payload, Error> {
    let query = [("op", endpoint::op::STORAGE_ENERGY_OVERVIEW)];
    let form = [("plantId", plant_id), ("storageSn", storage_id)];

    post(api, endpoint::STORAGE, &query, &form)
        .await
        .map(serde_json::from_value::<StorageEnergyOverview>)?
        .or(Err(Error::UnexpectedApiResponse))
        .map(|response| response.obj)
}
