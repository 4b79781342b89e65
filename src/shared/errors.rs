use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx status. `body` keeps the response text when one could be read.
    #[error("HTTP error! status: {status} {status_text}")]
    Http {
        status: u16,
        status_text: String,
        body: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(target_arch = "wasm32")]
impl From<gloo_net::Error> for ClientError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ClientError::Decode(e.to_string()),
            other => ClientError::Network(other.to_string()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for ClientError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        ClientError::Network(format!("{:?}", value))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
