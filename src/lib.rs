//! Movie rating and content-based recommendation service backed by the
//! OMDb metadata API.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
