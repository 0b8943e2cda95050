pub mod api;
pub mod config;
pub mod fetch;
pub mod handle;
pub mod loader;
pub mod model;
pub mod service;
