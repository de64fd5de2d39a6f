use crate::api::{self, Error, Payload};
use crate::model;
use crate::throttle::Throttle;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;

lazy_static! {
    static ref NOT_A_NUMBER: Regex = Regex::new(r"[^\d.,]").unwrap();
}

/* Earnings come in as "3.1/€" */
const MONEY_FIELDS: [&str; 2] = ["plantMoneyText", "totalMoneyText"];

/// What a probe fetches on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeKind {
    /// Plant-wide totals; the probe's id is the plant id.
    Total,
    Inverter,
    Storage { plant_id: model::PlantId },
}

/// Fetches and caches the data of one device.
#[derive(Debug)]
pub struct Probe {
    api: model::Api,
    device_id: String,
    kind: ProbeKind,
    data: Payload,
    throttle: Throttle,
}

/// Strip everything but digits and decimal separators from `text`.
pub fn sanitize_money(text: &str) -> String {
    NOT_A_NUMBER.replace_all(text, "").into_owned()
}

fn reshape_total(mut payload: Payload) -> Payload {
    payload.remove("deviceList");
    for field in &MONEY_FIELDS {
        if let Some(Value::String(text)) = payload.get_mut(*field) {
            *text = sanitize_money(text);
        }
    }
    payload
}

/// Merge live storage readings with the energy overview. Overview keys win.
fn merge_storage(mut params: Payload, overview: Payload) -> Result<Payload, Error> {
    match params.remove("storageDetailBean") {
        Some(Value::Object(mut detail)) => {
            detail.extend(overview);
            Ok(detail)
        }
        _ => Err(Error::UnexpectedApiResponse),
    }
}

impl Probe {
    pub fn new(api: model::Api, device_id: String, kind: ProbeKind, interval: Duration) -> Self {
        Probe {
            api,
            device_id,
            kind,
            data: Payload::new(),
            throttle: Throttle::new(interval),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn kind(&self) -> &ProbeKind {
        &self.kind
    }

    pub fn data(&self) -> &Payload {
        &self.data
    }

    pub fn get_data(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Log in again and refresh the cached data, unless the last update is more recent than the
    /// throttle interval.
    ///
    /// A response that is not valid JSON is logged and the previously cached data is kept. Any
    /// other error leaves the cache untouched as well and is returned. Only a completed update,
    /// including the stale read, starts a new throttle interval, so failed ones are retried on the
    /// next call.
    pub async fn update(&mut self) -> Result<(), Error> {
        if !self.throttle.ready() {
            log::trace!(
                "Less than {:?} since last update of {}, keeping cached data",
                self.throttle.interval(),
                self.device_id
            );
            return Ok(());
        }

        let api = api::login(&self.api).await?;
        log::debug!("Updating data for {}", self.device_id);

        let fetched = self.fetch(&api).await;
        self.store(fetched)?;
        self.throttle.touch();
        Ok(())
    }

    async fn fetch(&self, api: &model::LoggedInApi) -> Result<Payload, Error> {
        match &self.kind {
            ProbeKind::Total => api::plant_info(api, &self.device_id)
                .await
                .map(reshape_total),
            ProbeKind::Inverter => api::inverter_detail(api, &self.device_id).await,
            ProbeKind::Storage { plant_id } => {
                let params = api::storage_params(api, &self.device_id).await?;
                let overview =
                    api::storage_energy_overview(api, plant_id, &self.device_id).await?;
                merge_storage(params, overview)
            }
        }
    }

    fn store(&mut self, fetched: Result<Payload, Error>) -> Result<(), Error> {
        match fetched {
            Ok(data) => {
                self.data = data;
                Ok(())
            }
            Err(Error::InvalidResponse(body, reason)) => {
                log::error!("Unable to fetch data from Growatt server");
                log::debug!("{}: {} ({})", self.device_id, reason, body);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
