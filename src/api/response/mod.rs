pub mod device_list;
pub mod login;
pub mod plant_detail;
pub mod plant_list;
pub mod storage;

use num_derive::FromPrimitive;
use serde::Deserialize;
use serde_json::Value;

/// Vendor error codes reported in `errCode` of a failed login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum ErrCode {
    WrongCredentials = 102,
}

impl ErrCode {
    pub fn parse(err_code: &str) -> Option<ErrCode> {
        err_code
            .trim()
            .parse::<u64>()
            .ok()
            .and_then(num::FromPrimitive::from_u64)
    }
}

/// Growatt returns identifiers either as JSON strings or as numbers depending on endpoint.
pub fn string_or_number<'de, D: serde::Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
