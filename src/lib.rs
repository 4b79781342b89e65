// Public API exports (DOM-free controllers, usable natively)
pub mod config;
pub mod domain;
pub mod shared;

// Page controllers; browser bindings under `app::web` are WASM-only
pub mod app;
