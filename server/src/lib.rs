// Library exports for testing and reuse

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod session;
pub mod upstream;

pub use app::{build_app, routes, run, AppState};
