use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::fmt;
use std::io::Cursor;

#[derive(Debug, Clone)]
pub enum Error {
    LoginError(String),
    ApiError(String),
    UnexpectedApiResponse,
    /// Body that failed to decode as JSON, and the decoder's reason
    InvalidResponse(String, String),
    RateExceeded(String),
    NoPlant,
    FormatError,
    InternalError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LoginError(s) => write!(f, "login failed: {}", s),
            Error::ApiError(s) => write!(f, "API error: {}", s),
            Error::UnexpectedApiResponse => write!(f, "unexpected API response"),
            Error::InvalidResponse(body, reason) => {
                write!(f, "invalid API response ({}): {}", reason, body)
            }
            Error::RateExceeded(s) => write!(f, "rate exceeded: {}", s),
            Error::NoPlant => write!(f, "no plant registered for this account"),
            Error::FormatError => write!(f, "unable to format output"),
            Error::InternalError => write!(f, "internal error"),
        }
    }
}

impl std::error::Error for Error {}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        match self {
            Error::RateExceeded(s) => {
                let error = format!("<html><body><h3>429 Too Many Requests</h3>Growatt server response: <code>{}</code></body></html>", s);
                Response::build()
                    .status(Status::TooManyRequests)
                    .sized_body(error.len(), Cursor::new(error))
                    .header(ContentType::new("text", "html"))
                    .ok()
            }
            Error::LoginError(s) => {
                let error = format!("<html><body><h3>403 Forbidden</h3>Error while authenticating to Growatt server: <code>{}</code></body></html>", s);
                Response::build()
                    .status(Status::Forbidden)
                    .sized_body(error.len(), Cursor::new(error))
                    .header(ContentType::new("text", "html"))
                    .ok()
            }
            _ => {
                let error = format!(
                    "<html><body><h3>Unknown exception</h3><code>{}</code></body></html>",
                    self
                );
                Response::build()
                    .status(Status::InternalServerError)
                    .sized_body(error.len(), Cursor::new(error))
                    .header(ContentType::new("text", "html"))
                    .ok()
            }
        }
    }
}
