//! Browser bindings
//!
//! Looks up the fixed element ids of the server-rendered pages and wires
//! each controller that has its elements present. Pages without a given
//! element simply skip that controller.

pub mod dom;
pub mod pages;

pub use pages::start;
