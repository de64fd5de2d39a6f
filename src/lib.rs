pub mod api;
pub mod model;
pub mod platform;
pub mod probe;
pub mod sensor;
pub mod throttle;

pub use api::Error;

#[cfg(test)]
mod test_util;
