//! Backend REST API access
//!
//! `AdminApi` is the seam between the console and the network; the
//! console only ever talks to `Arc<dyn AdminApi>`.

pub mod client;
pub mod errors;

pub use client::{AdminApi, Endpoints, HttpAdminApi};
pub use errors::ApiError;
