pub mod auth_api;
pub mod client_api;
pub mod http;
pub mod material_api;
mod records;
pub mod session_api;

pub use http::HttpGateway;
