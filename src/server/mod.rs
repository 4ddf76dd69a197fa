//! HTTP server for Grove

pub mod http;

pub use http::{run, AppState};
