//! Types shared between the admin dashboard, the CLI and the API client.

pub mod api;
pub mod dynamic_data;
pub mod endpoints;
pub mod models;
