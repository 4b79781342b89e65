//! CineChat page scripts - Main Entry Point
//!
//! Built for `wasm32-unknown-unknown` and loaded by every server-rendered
//! page. Each controller binds only when its elements are present.

// WASM entry point (browser)
#[cfg(target_arch = "wasm32")]
fn main() {
    if let Err(e) = cinechat_web::app::web::start() {
        web_sys::console::error_1(&format!("[WASM] CineChat init failed: {}", e).into());
    }
}

// Native build: nothing to bind to
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    cinechat_web::shared::logging::init();
    tracing::warn!("cinechat-web drives browser pages; build it for wasm32-unknown-unknown");
}
