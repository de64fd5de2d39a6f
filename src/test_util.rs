use crate::model;
use std::fs;
use std::path::PathBuf;

pub fn read_resource(filename: &str) -> String {
    let mut d = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push(format!("resources/test/{}", filename));
    fs::read_to_string(d.as_path()).unwrap()
}

pub fn api(api_url: String) -> model::Api {
    model::Api {
        api_url,
        username: "user".to_string(),
        password: "password".to_string(),
    }
}

pub fn logged_in_api(api_url: String) -> model::LoggedInApi {
    model::LoggedInApi {
        api_url,
        user_id: "1234567".to_string(),
        client: reqwest::Client::new(),
    }
}
