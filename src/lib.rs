pub mod config;
pub mod core;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod startup;

pub use config::Config;
pub use startup::{AppState, build_app, build_cors, build_router};
