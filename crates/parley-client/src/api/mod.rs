//! API endpoint implementations.

mod akool;

pub use akool::AkoolApi;
