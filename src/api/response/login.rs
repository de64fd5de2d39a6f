use super::string_or_number;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Back {
    pub success: bool,
    pub err_code: Option<String>,
    pub msg: Option<String>,
    pub user: Option<User>,
}

#[derive(Deserialize)]
pub struct Login {
    pub back: Back,
}
