// Shared services
// The HTTP transport only compiles for the browser; URL building is shared
pub mod api_service;

pub use api_service::ApiService;
