// Domain models (business entities)
// Pure Rust, no framework dependencies

pub mod api;
pub mod message;

pub use api::{ActionResponse, ChatReply, ChatRequest};
pub use message::{ChatMessage, Sender};
